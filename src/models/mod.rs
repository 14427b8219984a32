pub mod company;
pub mod job;
pub mod skill_requirement;
