use std::collections::HashSet;

use crate::middleware::auth::AuthUser;

/// A job's requirement set is met when every required skill id has been
/// completed. Reflexive: an equal set satisfies, and an empty requirement set
/// is trivially met by anyone, including anonymous callers.
pub fn requirements_met(required: &HashSet<String>, completed: &HashSet<String>) -> bool {
    required.is_subset(completed)
}

/// Decides whether a job's contact details are disclosed to the caller.
///
/// Admins always see contact. A verified user sees it when the job's
/// requirements are met by their completed skills. Anonymous callers and
/// users without a verified email only see contact on requirement-free jobs.
///
/// `completed` is the caller's completed-skill set, fetched once per request
/// and reused for every job in a listing.
pub fn can_view_contact(
    user: Option<&AuthUser>,
    required: &HashSet<String>,
    completed: &HashSet<String>,
) -> bool {
    match user {
        Some(user) if user.admin => true,
        Some(user) if user.email_verified => requirements_met(required, completed),
        _ => required.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn set(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    fn user(email_verified: bool, admin: bool) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email_verified,
            admin,
        }
    }

    #[test]
    fn empty_requirements_disclose_to_everyone() {
        let empty = set(&[]);
        assert!(can_view_contact(None, &empty, &empty));
        assert!(can_view_contact(Some(&user(false, false)), &empty, &empty));
        assert!(can_view_contact(Some(&user(true, false)), &empty, &empty));
        assert!(can_view_contact(Some(&user(true, true)), &empty, &empty));
    }

    #[test]
    fn anonymous_is_blocked_by_any_requirement() {
        assert!(!can_view_contact(None, &set(&["rust"]), &set(&["rust"])));
    }

    #[test]
    fn unverified_user_is_treated_like_anonymous() {
        let caller = user(false, false);
        assert!(!can_view_contact(
            Some(&caller),
            &set(&["rust"]),
            &set(&["rust"])
        ));
    }

    #[test]
    fn verified_user_needs_a_superset_of_required_skills() {
        let caller = user(true, false);
        let required = set(&["rust", "sql"]);

        assert!(can_view_contact(
            Some(&caller),
            &required,
            &set(&["rust", "sql"])
        ));
        assert!(can_view_contact(
            Some(&caller),
            &required,
            &set(&["rust", "sql", "docker"])
        ));
        assert!(!can_view_contact(Some(&caller), &required, &set(&["rust"])));
        assert!(!can_view_contact(Some(&caller), &required, &set(&[])));
    }

    #[test]
    fn admin_always_sees_contact() {
        let caller = user(false, true);
        assert!(can_view_contact(
            Some(&caller),
            &set(&["rust", "sql"]),
            &set(&[])
        ));
    }

    #[test]
    fn requirements_met_is_reflexive() {
        let skills = set(&["a", "b"]);
        assert!(requirements_met(&skills, &skills));
        assert!(requirements_met(&set(&[]), &set(&[])));
        assert!(!requirements_met(&set(&["a", "b"]), &set(&["b"])));
    }
}
