use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum JobType {
    FullTime,
    PartTime,
    Internship,
    Temporary,
    MiniJob,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full_time",
            JobType::PartTime => "part_time",
            JobType::Internship => "internship",
            JobType::Temporary => "temporary",
            JobType::MiniJob => "mini_job",
        }
    }
}

impl std::str::FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full_time" => Ok(JobType::FullTime),
            "part_time" => Ok(JobType::PartTime),
            "internship" => Ok(JobType::Internship),
            "temporary" => Ok(JobType::Temporary),
            "mini_job" => Ok(JobType::MiniJob),
            other => Err(format!("unknown job type: {}", other)),
        }
    }
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ProfessionalLevel {
    Entry,
    Junior,
    Senior,
    Manager,
}

impl ProfessionalLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfessionalLevel::Entry => "entry",
            ProfessionalLevel::Junior => "junior",
            ProfessionalLevel::Senior => "senior",
            ProfessionalLevel::Manager => "manager",
        }
    }
}

impl std::str::FromStr for ProfessionalLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entry" => Ok(ProfessionalLevel::Entry),
            "junior" => Ok(ProfessionalLevel::Junior),
            "senior" => Ok(ProfessionalLevel::Senior),
            "manager" => Ok(ProfessionalLevel::Manager),
            other => Err(format!("unknown professional level: {}", other)),
        }
    }
}

impl std::fmt::Display for ProfessionalLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum SalaryPer {
    Once,
    Task,
    Hour,
    Day,
    Month,
    Year,
}

impl SalaryPer {
    pub fn as_str(&self) -> &'static str {
        match self {
            SalaryPer::Once => "once",
            SalaryPer::Task => "task",
            SalaryPer::Hour => "hour",
            SalaryPer::Day => "day",
            SalaryPer::Month => "month",
            SalaryPer::Year => "year",
        }
    }
}

impl std::fmt::Display for SalaryPer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A job posting. `responsibilities` is stored as a JSONB array so the
/// original ordering survives round-trips. `contact` is sensitive and only
/// serialized for callers that pass the visibility policy.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub remote: bool,
    pub job_type: JobType,
    pub responsibilities: Json<Vec<String>>,
    pub professional_level: ProfessionalLevel,
    pub salary_min: i64,
    pub salary_max: i64,
    pub salary_unit: String,
    pub salary_per: SalaryPer,
    pub contact: String,
    pub last_update: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_type_round_trips_through_wire_names() {
        for job_type in [
            JobType::FullTime,
            JobType::PartTime,
            JobType::Internship,
            JobType::Temporary,
            JobType::MiniJob,
        ] {
            assert_eq!(job_type.as_str().parse::<JobType>(), Ok(job_type));
        }
        assert!("freelance".parse::<JobType>().is_err());
    }

    #[test]
    fn enums_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&JobType::MiniJob).unwrap(),
            "\"mini_job\""
        );
        assert_eq!(
            serde_json::to_string(&ProfessionalLevel::Entry).unwrap(),
            "\"entry\""
        );
        assert_eq!(serde_json::to_string(&SalaryPer::Hour).unwrap(), "\"hour\"");
    }
}
