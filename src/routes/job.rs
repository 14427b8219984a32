use std::collections::HashSet;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::job_dto::{CreateJobPayload, JobListQuery, JobResponse, UpdateJobPayload},
    error::{Error, Result},
    middleware::auth::Identity,
    models::skill_requirement::SkillRequirement,
    services::job_service::{requirements_changed, JobRecord},
    services::visibility,
    AppState,
};

fn required_ids(requirements: &[SkillRequirement]) -> HashSet<String> {
    requirements
        .iter()
        .map(|requirement| requirement.skill_id.clone())
        .collect()
}

/// One completed-skill fetch per request, shared by the visibility policy and
/// the requirements_met post-filter. Admins skip the fetch: the policy
/// overrides for them and the filter treats them like any other caller with
/// an empty completed set.
async fn completed_for(state: &AppState, identity: &Identity) -> HashSet<String> {
    match &identity.0 {
        Some(user) if user.email_verified && !user.admin => {
            state.skills_service.completed_skills_or_empty(user.id).await
        }
        _ => HashSet::new(),
    }
}

#[utoipa::path(
    get,
    path = "/api/jobboard/jobs",
    params(
        ("search_term" = Option<String>, Query, description = "Substring match on title, description or responsibilities"),
        ("location" = Option<String>, Query, description = "Substring match on location"),
        ("remote" = Option<bool>, Query, description = "Exact remote match"),
        ("type" = Option<String>, Query, description = "Comma-separated set of job types"),
        ("professional_level" = Option<String>, Query, description = "Comma-separated set of professional levels"),
        ("salary_min" = Option<i64>, Query, description = "Lower bound on the job's salary_min"),
        ("salary_max" = Option<i64>, Query, description = "Upper bound on the job's salary_max"),
        ("salary_unit" = Option<String>, Query, description = "Substring match on salary unit"),
        ("salary_per" = Option<String>, Query, description = "Exact salary period match"),
        ("requirements_met" = Option<bool>, Query, description = "Keep only jobs whose requirements the caller has (or has not) completed")
    ),
    responses(
        (status = 200, description = "Filtered list of jobs", body = Json<Vec<JobResponse>>)
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<JobListQuery>,
) -> Result<impl IntoResponse> {
    let completed = completed_for(&state, &identity).await;
    let records = state.job_service.list(&query).await?;

    let company_ids: Vec<Uuid> = records.iter().map(|record| record.job.company_id).collect();
    let companies = state.company_service.by_ids(&company_ids).await?;

    let mut jobs = Vec::with_capacity(records.len());
    for record in records {
        let required = required_ids(&record.requirements);
        if let Some(wanted) = query.requirements_met {
            if visibility::requirements_met(&required, &completed) != wanted {
                continue;
            }
        }
        let include_contact =
            visibility::can_view_contact(identity.0.as_ref(), &required, &completed);
        let company = companies
            .get(&record.job.company_id)
            .cloned()
            .ok_or_else(|| Error::Internal("job references a missing company".to_string()))?;
        jobs.push(JobResponse::from_parts(
            record.job,
            company,
            record.requirements,
            include_contact,
        ));
    }
    Ok(Json(jobs))
}

#[utoipa::path(
    get,
    path = "/api/jobboard/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job found", body = Json<JobResponse>),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let record = state.job_service.get_by_id(id).await?;
    let company = state.company_service.get_by_id(record.job.company_id).await?;

    let completed = completed_for(&state, &identity).await;
    let required = required_ids(&record.requirements);
    let include_contact = visibility::can_view_contact(identity.0.as_ref(), &required, &completed);

    Ok(Json(JobResponse::from_parts(
        record.job,
        company,
        record.requirements,
        include_contact,
    )))
}

/// Every requested skill id must be known to the external catalog.
async fn ensure_skills_exist(
    state: &AppState,
    requested: &[crate::dto::job_dto::SkillRequirementPayload],
) -> Result<()> {
    if requested.is_empty() {
        return Ok(());
    }
    let catalog = state.skills_service.catalog().await?;
    if requested
        .iter()
        .any(|requirement| !catalog.contains(&requirement.skill_id))
    {
        return Err(Error::SkillNotFound);
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/jobboard/jobs",
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Job created successfully", body = Json<JobResponse>),
        (status = 404, description = "Company or skill not found"),
        (status = 422, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    Json(payload): Json<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    payload.check_bounds()?;

    let company = state.company_service.get_by_id(payload.company_id).await?;
    ensure_skills_exist(&state, &payload.skill_requirements).await?;

    let record = state.job_service.create(&payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(JobResponse::from_parts(
            record.job,
            company,
            record.requirements,
            true,
        )),
    ))
}

#[utoipa::path(
    patch,
    path = "/api/jobboard/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    request_body = UpdateJobPayload,
    responses(
        (status = 200, description = "Job updated successfully", body = Json<JobResponse>),
        (status = 404, description = "Job, company or skill not found"),
        (status = 422, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    payload.check_bounds()?;

    let current: JobRecord = state.job_service.get_by_id(id).await?;

    // Re-linking to another company requires that company to exist.
    if let Some(company_id) = payload.company_id {
        if company_id != current.job.company_id {
            state.company_service.get_by_id(company_id).await?;
        }
    }
    // A changed requirement set is validated against the catalog before the
    // swap; an unknown id rejects the whole update.
    if let Some(requested) = &payload.skill_requirements {
        if requirements_changed(&current.requirements, requested) {
            ensure_skills_exist(&state, requested).await?;
        }
    }

    let record = state.job_service.update(current, &payload).await?;
    let company = state.company_service.get_by_id(record.job.company_id).await?;

    Ok(Json(JobResponse::from_parts(
        record.job,
        company,
        record.requirements,
        true,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/jobboard/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 204, description = "Job deleted successfully"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.job_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
