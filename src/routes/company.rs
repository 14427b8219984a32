use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::company_dto::{CompanyResponse, CreateCompanyPayload, UpdateCompanyPayload},
    error::Result,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/jobboard/companies",
    responses(
        (status = 200, description = "List of companies", body = Json<Vec<CompanyResponse>>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin privileges required")
    )
)]
#[axum::debug_handler]
pub async fn list_companies(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let companies = state.company_service.list().await?;
    let companies: Vec<CompanyResponse> = companies.into_iter().map(Into::into).collect();
    Ok(Json(companies))
}

#[utoipa::path(
    post,
    path = "/api/jobboard/companies",
    request_body = CreateCompanyPayload,
    responses(
        (status = 201, description = "Company created successfully", body = Json<CompanyResponse>),
        (status = 409, description = "A company with this name already exists"),
        (status = 422, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_company(
    State(state): State<AppState>,
    Json(payload): Json<CreateCompanyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let company = state.company_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(CompanyResponse::from(company))))
}

#[utoipa::path(
    patch,
    path = "/api/jobboard/companies/{id}",
    params(
        ("id" = Uuid, Path, description = "Company ID")
    ),
    request_body = UpdateCompanyPayload,
    responses(
        (status = 200, description = "Company updated successfully", body = Json<CompanyResponse>),
        (status = 404, description = "Company not found"),
        (status = 409, description = "A company with this name already exists"),
        (status = 422, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCompanyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let company = state.company_service.update(id, payload).await?;
    Ok(Json(CompanyResponse::from(company)))
}

#[utoipa::path(
    delete,
    path = "/api/jobboard/companies/{id}",
    params(
        ("id" = Uuid, Path, description = "Company ID")
    ),
    responses(
        (status = 204, description = "Company deleted successfully"),
        (status = 404, description = "Company not found"),
        (status = 409, description = "Company still has jobs attached")
    )
)]
#[axum::debug_handler]
pub async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.company_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
