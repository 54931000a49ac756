// Shared test helpers: a full app wired against a temp SQLite file and a
// Docker endpoint that is guaranteed unreachable.

use axum_test::TestServer;
use nexus_net::config::AppConfig;
use nexus_net::db;
use nexus_net::docker_repo::DockerRepo;
use nexus_net::monitor_repo::MonitorRepo;
use nexus_net::plan_repo::PlanRepo;
use nexus_net::routes;
use nexus_net::session::SessionStore;
use nexus_net::user_repo::UserRepo;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

pub const TEST_CONFIG: &str = r#"
[server]
port = 8081
host = "0.0.0.0"

[database]
path = "data/test.db"
max_pool_size = 2

[docker]
host = "tcp://127.0.0.1:1"
timeout_secs = 1
"#;

pub fn test_app_config() -> AppConfig {
    AppConfig::load_from_str(TEST_CONFIG).unwrap()
}

/// Build a TestServer plus the TempDir keeping its database alive.
pub async fn test_server() -> (TestServer, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().unwrap();
    let mut config = test_app_config();
    config.database.path = dir.path().join("test.db").to_str().unwrap().to_string();
    config.server.bug_report_log = dir
        .path()
        .join("bug_reports.log")
        .to_str()
        .unwrap()
        .to_string();

    let pool = db::connect(&config.database.path, config.database.max_pool_size)
        .await
        .unwrap();
    db::init(&pool).await.unwrap();

    let app = routes::app(
        Arc::new(DockerRepo::connect(&config.docker)),
        Arc::new(MonitorRepo::new()),
        Arc::new(UserRepo::new(pool.clone())),
        Arc::new(PlanRepo::new(pool)),
        Arc::new(SessionStore::new(Duration::from_secs(3600))),
        config,
    );
    (TestServer::new(app), dir)
}

/// Register a user and log in; returns the bearer token.
pub async fn register_and_login(server: &TestServer, username: &str) -> String {
    let response = server
        .post("/api/register")
        .json(&json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "secret123",
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let response = server
        .post("/api/login")
        .json(&json!({"username": username, "password": "secret123"}))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    body["token"].as_str().unwrap().to_string()
}
