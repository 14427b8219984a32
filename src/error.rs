use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("This company does not exist.")]
    CompanyNotFound,

    #[error("This job does not exist.")]
    JobNotFound,

    #[error("This skill does not exist.")]
    SkillNotFound,

    #[error("A company with this name already exists.")]
    CompanyAlreadyExists,

    #[error("This company still has jobs attached to it.")]
    CompanyInUse,

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Skill directory error: {0}")]
    SkillDirectory(#[from] reqwest::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable machine-readable code included in every error response body.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Config(_) => "configuration_error",
            Error::Unauthorized(_) => "unauthorized",
            Error::Forbidden(_) => "forbidden",
            Error::CompanyNotFound => "company_not_found",
            Error::JobNotFound => "job_not_found",
            Error::SkillNotFound => "skill_not_found",
            Error::CompanyAlreadyExists => "company_already_exists",
            Error::CompanyInUse => "company_in_use",
            Error::Validation(_) => "validation_error",
            Error::Database(_) => "database_error",
            Error::SkillDirectory(_) => "skill_directory_unavailable",
            Error::Anyhow(_) | Error::Internal(_) | Error::Io(_) => "internal_error",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let code = self.code();
        let (status, message) = match self {
            Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Error::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            Error::CompanyNotFound | Error::JobNotFound | Error::SkillNotFound => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            Error::CompanyAlreadyExists | Error::CompanyInUse => {
                (StatusCode::CONFLICT, self.to_string())
            }
            Error::Validation(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            Error::SkillDirectory(err) => (
                StatusCode::BAD_GATEWAY,
                format!("Skill directory unavailable: {}", err),
            ),
            Error::Database(err) => {
                tracing::error!(error = ?err, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                )
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
            ),
        };

        let body = Json(json!({ "error": code, "message": message }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::Database(err)
    }
}

pub const SQLSTATE_UNIQUE_VIOLATION: &str = "23505";
pub const SQLSTATE_FOREIGN_KEY_VIOLATION: &str = "23503";

/// SQLSTATE of a store-level error, if it carries one. The services use this
/// to translate integrity violations into business errors instead of leaking
/// raw storage failures.
pub fn db_error_code(err: &sqlx::Error) -> Option<String> {
    if let sqlx::Error::Database(db) = err {
        db.code().map(|code| code.into_owned())
    } else {
        None
    }
}
