// End-to-end checks for the public surface: root, version, monitoring and
// bug reports.

mod common;

use axum::http::StatusCode;
use common::{register_and_login, test_server};
use nexus_net::version::{NAME, VERSION};
use serde_json::{Value, json};

#[tokio::test]
async fn root_and_version_endpoints() {
    let (server, _dir) = test_server().await;

    let response = server.get("/").await;
    response.assert_status_ok();
    response.assert_text("Nexus-Net API");

    let response = server.get("/version").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["name"], NAME);
    assert_eq!(body["version"], VERSION);
}

#[tokio::test]
async fn monitoring_stats_require_authentication() {
    let (server, _dir) = test_server().await;
    let response = server.get("/api/monitoring/stats").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn monitoring_stats_report_host_gauges() {
    let (server, _dir) = test_server().await;
    let token = register_and_login(&server, "alice").await;

    let response = server
        .get("/api/monitoring/stats")
        .authorization_bearer(&token)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    // CPU needs a second sample before it reads; RAM is always present.
    let ram = body["ramPercent"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&ram));
    if let Some(cpu) = body["cpuPercent"].as_f64() {
        assert!((0.0..=100.0).contains(&cpu));
    }
}

#[tokio::test]
async fn bug_reports_append_to_the_configured_log() {
    let (server, dir) = test_server().await;
    let token = register_and_login(&server, "alice").await;

    let response = server
        .post("/api/report-bug")
        .authorization_bearer(&token)
        .json(&json!({
            "title": "Broken gauge",
            "description": "CPU gauge stuck at zero",
        }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);

    let log = std::fs::read_to_string(dir.path().join("bug_reports.log")).unwrap();
    assert!(log.contains("User: alice"));
    assert!(log.contains("Title: Broken gauge"));
    assert!(log.contains("Desc: CPU gauge stuck at zero"));
}

#[tokio::test]
async fn bug_reports_require_authentication() {
    let (server, _dir) = test_server().await;
    let response = server
        .post("/api/report-bug")
        .json(&json!({"title": "t", "description": "d"}))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}
