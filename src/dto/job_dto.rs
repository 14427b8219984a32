use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::dto::company_dto::CompanyResponse;
use crate::models::company::Company;
use crate::models::job::{Job, JobType, ProfessionalLevel, SalaryPer};
use crate::models::skill_requirement::{SkillRequirement, DEFAULT_SKILL_LEVEL};

pub const MAX_RESPONSIBILITIES: usize = 16;
pub const MAX_RESPONSIBILITY_LEN: usize = 512;

fn default_skill_level() -> i32 {
    DEFAULT_SKILL_LEVEL
}

/// Comma-separated set filters (`?type=full_time,internship`). An absent or
/// empty parameter disables the filter.
fn deserialize_csv<'de, D, T>(deserializer: D) -> std::result::Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .split(',')
            .map(|part| part.trim().parse::<T>().map_err(serde::de::Error::custom))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Some),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SalaryPayload {
    #[validate(range(min = 0))]
    pub min: i64,
    #[validate(range(min = 0))]
    pub max: i64,
    #[validate(length(min = 1, max = 255))]
    pub unit: String,
    pub per: SalaryPer,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SkillRequirementPayload {
    #[validate(length(min = 1, max = 255))]
    pub skill_id: String,
    #[serde(default = "default_skill_level")]
    #[validate(range(min = 1, max = 100))]
    pub level: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateJobPayload {
    pub company_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
    #[validate(length(min = 1, max = 255))]
    pub location: String,
    pub remote: bool,
    #[serde(rename = "type")]
    pub job_type: JobType,
    #[serde(default)]
    #[validate(length(max = 16))]
    pub responsibilities: Vec<String>,
    pub professional_level: ProfessionalLevel,
    #[validate(nested)]
    pub salary: SalaryPayload,
    #[validate(length(min = 1, max = 255))]
    pub contact: String,
    #[serde(default)]
    #[validate(nested)]
    pub skill_requirements: Vec<SkillRequirementPayload>,
}

impl CreateJobPayload {
    /// Cross-field checks the derive can't express: the salary range must be
    /// well-formed and each responsibility entry stays within bounds.
    pub fn check_bounds(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_salary_bounds(&self.salary, &mut errors);
        check_responsibility_entries(&self.responsibilities, &mut errors);
        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct UpdateJobPayload {
    pub company_id: Option<Uuid>,
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 2000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub location: Option<String>,
    pub remote: Option<bool>,
    #[serde(rename = "type")]
    pub job_type: Option<JobType>,
    #[validate(length(max = 16))]
    pub responsibilities: Option<Vec<String>>,
    pub professional_level: Option<ProfessionalLevel>,
    #[validate(nested)]
    pub salary: Option<SalaryPayload>,
    #[validate(length(min = 1, max = 255))]
    pub contact: Option<String>,
    #[validate(nested)]
    pub skill_requirements: Option<Vec<SkillRequirementPayload>>,
}

impl UpdateJobPayload {
    pub fn check_bounds(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(salary) = &self.salary {
            check_salary_bounds(salary, &mut errors);
        }
        if let Some(responsibilities) = &self.responsibilities {
            check_responsibility_entries(responsibilities, &mut errors);
        }
        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn check_salary_bounds(salary: &SalaryPayload, errors: &mut ValidationErrors) {
    if salary.min > salary.max {
        let mut error = ValidationError::new("salary_range");
        error.message = Some("salary min must not exceed salary max".into());
        errors.add("salary", error);
    }
}

fn check_responsibility_entries(responsibilities: &[String], errors: &mut ValidationErrors) {
    if responsibilities
        .iter()
        .any(|entry| entry.chars().count() > MAX_RESPONSIBILITY_LEN)
    {
        let mut error = ValidationError::new("responsibility_length");
        error.message = Some("each responsibility must be at most 512 characters".into());
        errors.add("responsibilities", error);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobListQuery {
    pub search_term: Option<String>,
    pub location: Option<String>,
    pub remote: Option<bool>,
    #[serde(rename = "type", deserialize_with = "deserialize_csv")]
    pub job_type: Option<Vec<JobType>>,
    #[serde(deserialize_with = "deserialize_csv")]
    pub professional_level: Option<Vec<ProfessionalLevel>>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub salary_unit: Option<String>,
    pub salary_per: Option<SalaryPer>,
    pub requirements_met: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryResponse {
    pub min: i64,
    pub max: i64,
    pub unit: String,
    pub per: SalaryPer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillRequirementResponse {
    pub skill_id: String,
    pub level: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResponse {
    pub id: Uuid,
    pub company: CompanyResponse,
    pub title: String,
    pub description: String,
    pub location: String,
    pub remote: bool,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub responsibilities: Vec<String>,
    pub professional_level: ProfessionalLevel,
    pub salary: SalaryResponse,
    pub contact: Option<String>,
    pub last_update: DateTime<Utc>,
    pub skill_requirements: Vec<SkillRequirementResponse>,
}

impl JobResponse {
    /// `include_contact` is the visibility policy's verdict; the contact field
    /// is nulled rather than omitted so the response shape stays stable.
    pub fn from_parts(
        job: Job,
        company: Company,
        requirements: Vec<SkillRequirement>,
        include_contact: bool,
    ) -> Self {
        Self {
            id: job.id,
            company: CompanyResponse::from(company),
            title: job.title,
            description: job.description,
            location: job.location,
            remote: job.remote,
            job_type: job.job_type,
            responsibilities: job.responsibilities.0,
            professional_level: job.professional_level,
            salary: SalaryResponse {
                min: job.salary_min,
                max: job.salary_max,
                unit: job.salary_unit,
                per: job.salary_per,
            },
            contact: include_contact.then_some(job.contact),
            last_update: job.last_update,
            skill_requirements: requirements
                .into_iter()
                .map(|requirement| SkillRequirementResponse {
                    skill_id: requirement.skill_id,
                    level: requirement.level,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_salary() -> SalaryPayload {
        SalaryPayload {
            min: 50,
            max: 100,
            unit: "EUR".into(),
            per: SalaryPer::Month,
        }
    }

    fn base_create() -> CreateJobPayload {
        CreateJobPayload {
            company_id: Uuid::new_v4(),
            title: "Backend Engineer".into(),
            description: "Build the job board".into(),
            location: "Berlin".into(),
            remote: true,
            job_type: JobType::FullTime,
            responsibilities: vec!["write code".into(), "review PRs".into()],
            professional_level: ProfessionalLevel::Senior,
            salary: base_salary(),
            contact: "jobs@example.com".into(),
            skill_requirements: vec![],
        }
    }

    #[test]
    fn inverted_salary_range_is_rejected() {
        let mut payload = base_create();
        payload.salary.min = 100;
        payload.salary.max = 50;
        assert!(payload.validate().is_ok());
        assert!(payload.check_bounds().is_err());
    }

    #[test]
    fn well_formed_salary_range_passes() {
        let payload = base_create();
        assert!(payload.validate().is_ok());
        assert!(payload.check_bounds().is_ok());
    }

    #[test]
    fn oversized_responsibility_entry_is_rejected() {
        let mut payload = base_create();
        payload.responsibilities = vec!["x".repeat(MAX_RESPONSIBILITY_LEN + 1)];
        assert!(payload.check_bounds().is_err());
    }

    #[test]
    fn too_many_responsibilities_fail_validation() {
        let mut payload = base_create();
        payload.responsibilities = (0..MAX_RESPONSIBILITIES + 1)
            .map(|i| format!("task {}", i))
            .collect();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn update_bounds_only_checked_when_supplied() {
        let payload = UpdateJobPayload::default();
        assert!(payload.check_bounds().is_ok());

        let payload = UpdateJobPayload {
            salary: Some(SalaryPayload {
                min: 10,
                max: 5,
                unit: "EUR".into(),
                per: SalaryPer::Hour,
            }),
            ..Default::default()
        };
        assert!(payload.check_bounds().is_err());
    }

    #[test]
    fn responsibilities_keep_their_order_through_the_response() {
        use crate::models::job::Job;
        use sqlx::types::Json;

        let job = Job {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            title: "Backend Engineer".into(),
            description: "Build the job board".into(),
            location: "Berlin".into(),
            remote: true,
            job_type: JobType::FullTime,
            responsibilities: Json(vec!["write code".into(), "review PRs".into()]),
            professional_level: ProfessionalLevel::Senior,
            salary_min: 50,
            salary_max: 100,
            salary_unit: "EUR".into(),
            salary_per: SalaryPer::Month,
            contact: "jobs@example.com".into(),
            last_update: chrono::Utc::now(),
        };
        let company = Company {
            id: job.company_id,
            name: "ACME".into(),
            description: None,
            website: None,
            youtube_video: None,
            twitter_handle: None,
            instagram_handle: None,
            logo_url: None,
        };

        let visible = JobResponse::from_parts(job.clone(), company.clone(), vec![], true);
        assert_eq!(visible.responsibilities, vec!["write code", "review PRs"]);
        assert_eq!(visible.contact.as_deref(), Some("jobs@example.com"));

        let hidden = JobResponse::from_parts(job, company, vec![], false);
        assert_eq!(hidden.contact, None);
        let serialized = serde_json::to_value(&hidden).unwrap();
        assert!(serialized["contact"].is_null());
    }

    #[test]
    fn list_query_parses_csv_sets() {
        let query: JobListQuery =
            serde_urlencoded::from_str("type=internship,mini_job&professional_level=junior")
                .unwrap();
        assert_eq!(
            query.job_type,
            Some(vec![JobType::Internship, JobType::MiniJob])
        );
        assert_eq!(
            query.professional_level,
            Some(vec![ProfessionalLevel::Junior])
        );
        assert_eq!(query.remote, None);
    }

    #[test]
    fn list_query_rejects_unknown_type() {
        assert!(serde_urlencoded::from_str::<JobListQuery>("type=freelance").is_err());
    }
}
