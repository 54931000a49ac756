// Library for tests to access modules

pub mod config;
pub mod db;
pub mod docker_repo;
pub mod models;
pub mod monitor_repo;
pub mod plan_repo;
pub mod routes;
pub mod session;
pub mod user_repo;
pub mod version;
