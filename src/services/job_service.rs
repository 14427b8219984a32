use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::job_dto::{CreateJobPayload, SkillRequirementPayload, UpdateJobPayload};
use crate::error::{db_error_code, Error, Result, SQLSTATE_FOREIGN_KEY_VIOLATION};
use crate::models::job::Job;
use crate::models::skill_requirement::SkillRequirement;
use crate::services::job_query::{self, SELECT_JOBS};

const JOB_COLUMNS: &str = "id, company_id, title, description, location, remote, job_type, \
     responsibilities, professional_level, salary_min, salary_max, salary_unit, salary_per, \
     contact, last_update";

/// A job together with its owned skill requirements.
#[derive(Debug, Clone)]
pub struct JobRecord {
    pub job: Job,
    pub requirements: Vec<SkillRequirement>,
}

#[derive(Clone)]
pub struct JobService {
    pool: PgPool,
}

impl JobService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: &crate::dto::job_dto::JobListQuery) -> Result<Vec<JobRecord>> {
        let mut builder = job_query::build_list_query(query);
        let jobs: Vec<Job> = builder.build_query_as::<Job>().fetch_all(&self.pool).await?;

        let ids: Vec<Uuid> = jobs.iter().map(|job| job.id).collect();
        let mut requirements = self.requirements_by_job(&ids).await?;

        Ok(jobs
            .into_iter()
            .map(|job| {
                let requirements = requirements.remove(&job.id).unwrap_or_default();
                JobRecord { job, requirements }
            })
            .collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<JobRecord> {
        let job: Option<Job> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_JOBS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        let job = job.ok_or(Error::JobNotFound)?;
        let requirements = self
            .requirements_by_job(&[id])
            .await?
            .remove(&id)
            .unwrap_or_default();
        Ok(JobRecord { job, requirements })
    }

    async fn requirements_by_job(
        &self,
        job_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<SkillRequirement>>> {
        if job_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<SkillRequirement> = sqlx::query_as(
            "SELECT job_id, skill_id, level FROM skill_requirements \
             WHERE job_id = ANY($1) ORDER BY skill_id",
        )
        .bind(job_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<SkillRequirement>> = HashMap::new();
        for row in rows {
            grouped.entry(row.job_id).or_default().push(row);
        }
        Ok(grouped)
    }

    pub async fn create(&self, payload: &CreateJobPayload) -> Result<JobRecord> {
        let requirements = normalize_requirements(&payload.skill_requirements);

        let mut tx = self.pool.begin().await?;

        let job: Job = sqlx::query_as(&format!(
            "INSERT INTO jobs ({}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING {}",
            JOB_COLUMNS, JOB_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(payload.company_id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.location)
        .bind(payload.remote)
        .bind(payload.job_type.as_str())
        .bind(Json(payload.responsibilities.clone()))
        .bind(payload.professional_level.as_str())
        .bind(payload.salary.min)
        .bind(payload.salary.max)
        .bind(&payload.salary.unit)
        .bind(payload.salary.per.as_str())
        .bind(&payload.contact)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(translate_job_write_error)?;

        let requirements = insert_requirements(&mut tx, job.id, &requirements).await?;
        tx.commit().await?;

        Ok(JobRecord { job, requirements })
    }

    /// Applies a partial update. `last_update` is stamped even when nothing
    /// else changed. A supplied requirement set that differs from the stored
    /// one is swapped atomically inside the same transaction.
    pub async fn update(&self, current: JobRecord, payload: &UpdateJobPayload) -> Result<JobRecord> {
        let mut tx = self.pool.begin().await?;

        let mut query = build_job_update(&current.job, payload);
        let job: Job = query
            .build_query_as::<Job>()
            .fetch_one(&mut *tx)
            .await
            .map_err(translate_job_write_error)?;

        let mut requirements = current.requirements;
        if let Some(requested) = &payload.skill_requirements {
            if requirements_changed(&requirements, requested) {
                sqlx::query("DELETE FROM skill_requirements WHERE job_id = $1")
                    .bind(job.id)
                    .execute(&mut *tx)
                    .await?;
                let normalized = normalize_requirements(requested);
                requirements = insert_requirements(&mut tx, job.id, &normalized).await?;
            }
        }

        tx.commit().await?;
        Ok(JobRecord { job, requirements })
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        // Skill requirements go with the job via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::JobNotFound);
        }
        Ok(())
    }
}

/// The advisory company lookup in the handler can lose a race against a
/// concurrent company deletion; the FK constraint is the authoritative guard.
fn translate_job_write_error(err: sqlx::Error) -> Error {
    match db_error_code(&err).as_deref() {
        Some(SQLSTATE_FOREIGN_KEY_VIOLATION) => Error::CompanyNotFound,
        _ => Error::Database(err),
    }
}

async fn insert_requirements(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    job_id: Uuid,
    requirements: &[SkillRequirementPayload],
) -> Result<Vec<SkillRequirement>> {
    if requirements.is_empty() {
        return Ok(Vec::new());
    }
    let mut insert =
        QueryBuilder::new("INSERT INTO skill_requirements (job_id, skill_id, level) ");
    insert.push_values(requirements.iter(), |mut row, requirement| {
        row.push_bind(job_id);
        row.push_bind(requirement.skill_id.clone());
        row.push_bind(requirement.level);
    });
    insert.build().execute(&mut **tx).await?;

    Ok(requirements
        .iter()
        .map(|requirement| SkillRequirement {
            job_id,
            skill_id: requirement.skill_id.clone(),
            level: requirement.level,
        })
        .collect())
}

/// Deduplicates by skill id (last entry wins) and orders deterministically.
fn normalize_requirements(requirements: &[SkillRequirementPayload]) -> Vec<SkillRequirementPayload> {
    let mut by_id: BTreeMap<String, i32> = BTreeMap::new();
    for requirement in requirements {
        by_id.insert(requirement.skill_id.clone(), requirement.level);
    }
    by_id
        .into_iter()
        .map(|(skill_id, level)| SkillRequirementPayload { skill_id, level })
        .collect()
}

/// The owned requirement set is only replaced when the requested set differs
/// from the stored one, compared as (skill id -> level) maps.
pub fn requirements_changed(
    current: &[SkillRequirement],
    requested: &[SkillRequirementPayload],
) -> bool {
    let stored: BTreeMap<&str, i32> = current
        .iter()
        .map(|requirement| (requirement.skill_id.as_str(), requirement.level))
        .collect();
    let incoming: BTreeMap<&str, i32> = requested
        .iter()
        .map(|requirement| (requirement.skill_id.as_str(), requirement.level))
        .collect();
    stored != incoming
}

/// Stages supplied-and-different columns; `last_update` is always staged so
/// reaching the endpoint counts as a touch.
fn build_job_update(current: &Job, payload: &UpdateJobPayload) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("UPDATE jobs SET ");
    {
        let mut set = query.separated(", ");

        if let Some(company_id) = payload.company_id {
            if company_id != current.company_id {
                set.push("company_id");
                set.push_unseparated(" = ");
                set.push_bind_unseparated(company_id);
            }
        }
        if let Some(title) = &payload.title {
            if *title != current.title {
                set.push("title");
                set.push_unseparated(" = ");
                set.push_bind_unseparated(title.clone());
            }
        }
        if let Some(description) = &payload.description {
            if *description != current.description {
                set.push("description");
                set.push_unseparated(" = ");
                set.push_bind_unseparated(description.clone());
            }
        }
        if let Some(location) = &payload.location {
            if *location != current.location {
                set.push("location");
                set.push_unseparated(" = ");
                set.push_bind_unseparated(location.clone());
            }
        }
        if let Some(remote) = payload.remote {
            if remote != current.remote {
                set.push("remote");
                set.push_unseparated(" = ");
                set.push_bind_unseparated(remote);
            }
        }
        if let Some(job_type) = payload.job_type {
            if job_type != current.job_type {
                set.push("job_type");
                set.push_unseparated(" = ");
                set.push_bind_unseparated(job_type.as_str());
            }
        }
        if let Some(responsibilities) = &payload.responsibilities {
            if *responsibilities != current.responsibilities.0 {
                set.push("responsibilities");
                set.push_unseparated(" = ");
                set.push_bind_unseparated(Json(responsibilities.clone()));
            }
        }
        if let Some(level) = payload.professional_level {
            if level != current.professional_level {
                set.push("professional_level");
                set.push_unseparated(" = ");
                set.push_bind_unseparated(level.as_str());
            }
        }
        if let Some(salary) = &payload.salary {
            let differs = salary.min != current.salary_min
                || salary.max != current.salary_max
                || salary.unit != current.salary_unit
                || salary.per != current.salary_per;
            if differs {
                set.push("salary_min");
                set.push_unseparated(" = ");
                set.push_bind_unseparated(salary.min);
                set.push("salary_max");
                set.push_unseparated(" = ");
                set.push_bind_unseparated(salary.max);
                set.push("salary_unit");
                set.push_unseparated(" = ");
                set.push_bind_unseparated(salary.unit.clone());
                set.push("salary_per");
                set.push_unseparated(" = ");
                set.push_bind_unseparated(salary.per.as_str());
            }
        }
        if let Some(contact) = &payload.contact {
            if *contact != current.contact {
                set.push("contact");
                set.push_unseparated(" = ");
                set.push_bind_unseparated(contact.clone());
            }
        }

        set.push("last_update");
        set.push_unseparated(" = ");
        set.push_bind_unseparated(Utc::now());
    }
    query.push(" WHERE id = ");
    query.push_bind(current.id);
    query.push(&format!(" RETURNING {}", JOB_COLUMNS));
    query
}
