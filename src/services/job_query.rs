use sqlx::{Postgres, QueryBuilder};

use crate::dto::job_dto::JobListQuery;

pub const SELECT_JOBS: &str = "SELECT id, company_id, title, description, location, remote, \
     job_type, responsibilities, professional_level, salary_min, salary_max, salary_unit, \
     salary_per, contact, last_update FROM jobs";

/// Escapes LIKE metacharacters so user input only ever matches literally.
pub fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}

fn push_clause(query: &mut QueryBuilder<'static, Postgres>, has_where: &mut bool) {
    if *has_where {
        query.push(" AND ");
    } else {
        query.push(" WHERE ");
        *has_where = true;
    }
}

/// Translates the optional filter parameters into a SELECT over jobs. All
/// provided filters combine with AND; none means an unrestricted listing.
/// `requirements_met` is deliberately absent here: it is applied by the
/// handler as a per-job post-filter against the caller's completed skills.
pub fn build_list_query(filter: &JobListQuery) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(SELECT_JOBS);
    let mut has_where = false;

    if let Some(term) = &filter.search_term {
        let pattern = contains_pattern(term);
        push_clause(&mut query, &mut has_where);
        query.push("(title ILIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR description ILIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR responsibilities::text ILIKE ");
        query.push_bind(pattern);
        query.push(")");
    }
    if let Some(location) = &filter.location {
        push_clause(&mut query, &mut has_where);
        query.push("location ILIKE ");
        query.push_bind(contains_pattern(location));
    }
    if let Some(remote) = filter.remote {
        push_clause(&mut query, &mut has_where);
        query.push("remote = ");
        query.push_bind(remote);
    }
    if let Some(types) = &filter.job_type {
        push_clause(&mut query, &mut has_where);
        query.push("job_type = ANY(");
        query.push_bind(
            types
                .iter()
                .map(|job_type| job_type.as_str().to_string())
                .collect::<Vec<String>>(),
        );
        query.push(")");
    }
    if let Some(levels) = &filter.professional_level {
        push_clause(&mut query, &mut has_where);
        query.push("professional_level = ANY(");
        query.push_bind(
            levels
                .iter()
                .map(|level| level.as_str().to_string())
                .collect::<Vec<String>>(),
        );
        query.push(")");
    }
    if let Some(salary_min) = filter.salary_min {
        push_clause(&mut query, &mut has_where);
        query.push("salary_min >= ");
        query.push_bind(salary_min);
    }
    if let Some(salary_max) = filter.salary_max {
        push_clause(&mut query, &mut has_where);
        query.push("salary_max <= ");
        query.push_bind(salary_max);
    }
    if let Some(unit) = &filter.salary_unit {
        push_clause(&mut query, &mut has_where);
        query.push("salary_unit ILIKE ");
        query.push_bind(contains_pattern(unit));
    }
    if let Some(per) = filter.salary_per {
        push_clause(&mut query, &mut has_where);
        query.push("salary_per = ");
        query.push_bind(per.as_str());
    }

    query.push(" ORDER BY last_update DESC");
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::{JobType, ProfessionalLevel, SalaryPer};

    #[test]
    fn no_filters_means_unrestricted_listing() {
        let query = build_list_query(&JobListQuery::default());
        let sql = query.sql();
        assert!(!sql.contains("WHERE"));
        assert!(sql.ends_with(" ORDER BY last_update DESC"));
    }

    #[test]
    fn search_term_spans_title_description_and_responsibilities() {
        let filter = JobListQuery {
            search_term: Some("rust".into()),
            ..Default::default()
        };
        let sql = build_list_query(&filter).sql().to_string();
        assert!(sql.contains("(title ILIKE $1 OR description ILIKE $2 OR responsibilities::text ILIKE $3)"));
    }

    #[test]
    fn filters_combine_with_and() {
        let filter = JobListQuery {
            location: Some("berlin".into()),
            remote: Some(true),
            job_type: Some(vec![JobType::Internship]),
            professional_level: Some(vec![ProfessionalLevel::Junior, ProfessionalLevel::Senior]),
            salary_min: Some(1_000),
            salary_max: Some(9_000),
            salary_unit: Some("eur".into()),
            salary_per: Some(SalaryPer::Month),
            ..Default::default()
        };
        let sql = build_list_query(&filter).sql().to_string();
        assert!(sql.contains("WHERE location ILIKE $1"));
        assert!(sql.contains(" AND remote = $2"));
        assert!(sql.contains(" AND job_type = ANY($3)"));
        assert!(sql.contains(" AND professional_level = ANY($4)"));
        assert!(sql.contains(" AND salary_min >= $5"));
        assert!(sql.contains(" AND salary_max <= $6"));
        assert!(sql.contains(" AND salary_unit ILIKE $7"));
        assert!(sql.contains(" AND salary_per = $8"));
    }

    #[test]
    fn remote_absent_means_no_remote_constraint() {
        let filter = JobListQuery {
            search_term: Some("dev".into()),
            ..Default::default()
        };
        let sql = build_list_query(&filter).sql().to_string();
        assert!(!sql.contains("remote ="));
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }
}
