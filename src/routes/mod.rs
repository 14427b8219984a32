pub mod company;
pub mod health;
pub mod job;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::middleware::{auth, cors, rate_limit};
use crate::AppState;

/// Assembles the full application router. Admin and public groups carry their
/// own auth middleware and rate limiter; axum merges the method routers where
/// the groups share a path.
pub fn router(state: AppState) -> Router {
    let config = crate::config::get_config();

    let admin_api = Router::new()
        .route(
            "/api/jobboard/companies",
            get(company::list_companies).post(company::create_company),
        )
        .route(
            "/api/jobboard/companies/:id",
            axum::routing::patch(company::update_company).delete(company::delete_company),
        )
        .route("/api/jobboard/jobs", post(job::create_job))
        .route(
            "/api/jobboard/jobs/:id",
            axum::routing::patch(job::update_job).delete(job::delete_job),
        )
        .layer(axum::middleware::from_fn(auth::require_admin))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::new_rps_state(config.admin_rps),
            rate_limit::rps_middleware,
        ));

    let public_api = Router::new()
        .route("/api/jobboard/jobs", get(job::list_jobs))
        .route("/api/jobboard/jobs/:id", get(job::get_job))
        .layer(axum::middleware::from_fn(auth::attach_identity))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::new_rps_state(config.public_rps),
            rate_limit::rps_middleware,
        ));

    Router::new()
        .route("/health", get(health::health))
        .merge(admin_api)
        .merge(public_api)
        .with_state(state)
        .layer(cors::permissive_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
}
