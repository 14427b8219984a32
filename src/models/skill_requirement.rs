use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Rows without an explicit proficiency level are populated with this value.
pub const DEFAULT_SKILL_LEVEL: i32 = 10;

/// "This job requires skill X at proficiency level L." Owned exclusively by
/// its job: replaced atomically on update and cascade-deleted with the job.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SkillRequirement {
    pub job_id: Uuid,
    pub skill_id: String,
    pub level: i32,
}
