pub mod actor;
pub mod config;
pub mod database;
pub mod git;
pub mod github;
