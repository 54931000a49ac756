// Root, version and bug reports

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::{Value, json};

use super::AppState;
use super::auth::{AuthUser, internal_error};
use crate::version::{NAME, VERSION};

pub(super) async fn root_handler() -> impl IntoResponse {
    "Nexus-Net API"
}

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(json!({
        "name": NAME,
        "version": VERSION,
    }))
}

#[derive(Deserialize)]
pub(super) struct BugReportRequest {
    title: String,
    description: String,
}

/// POST /api/report-bug — append one line to the report log.
pub(super) async fn report_bug(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<BugReportRequest>,
) -> (StatusCode, Json<Value>) {
    let username = match state.user_repo.find_by_id(user.user_id).await {
        Ok(Some(profile)) => profile.username,
        Ok(None) => format!("user#{}", user.user_id),
        Err(e) => return internal_error(e),
    };
    let line = format!(
        "[{}] User: {} | Title: {} | Desc: {}\n",
        chrono::Utc::now().to_rfc3339(),
        username,
        req.title,
        req.description
    );
    let path = state.config.server.bug_report_log.clone();
    let res = tokio::task::spawn_blocking(move || append_line(&path, &line)).await;
    match res {
        Ok(Ok(())) => (StatusCode::OK, Json(json!({"success": true}))),
        Ok(Err(e)) => internal_error(e),
        Err(e) => internal_error(e),
    }
}

fn append_line(path: &str, line: &str) -> std::io::Result<()> {
    use std::io::Write;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    file.write_all(line.as_bytes())
}
