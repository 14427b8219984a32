pub mod company_service;
pub mod job_query;
pub mod job_service;
pub mod skills_service;
pub mod visibility;
