pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::services::{
    company_service::CompanyService, job_service::JobService, skills_service::SkillsService,
};
use crate::utils::ttl_cache::SystemClock;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub company_service: CompanyService,
    pub job_service: JobService,
    pub skills_service: SkillsService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();

        let company_service = CompanyService::new(pool.clone());
        let job_service = JobService::new(pool.clone());
        let skills_service = SkillsService::new(
            config.skills_service_url.clone(),
            Duration::from_secs(config.skills_cache_ttl_secs),
            Arc::new(SystemClock),
        );

        Self {
            pool,
            company_service,
            job_service,
            skills_service,
        }
    }
}
