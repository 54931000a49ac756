// Plan CRUD. A plan owned by another user is indistinguishable from a
// missing one (404 either way).

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use super::AppState;
use super::auth::{AuthUser, internal_error};

fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"success": false, "error": "Plan not found"})),
    )
}

/// GET /api/plans — own plans, newest first.
pub(super) async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> (StatusCode, Json<Value>) {
    match state.plan_repo.list_for_user(user.user_id).await {
        Ok(plans) => (
            StatusCode::OK,
            Json(json!({"success": true, "plans": plans})),
        ),
        Err(e) => internal_error(e),
    }
}

#[derive(Deserialize)]
pub(super) struct CreateRequest {
    name: String,
}

/// POST /api/plans — create with an empty graph document.
pub(super) async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateRequest>,
) -> (StatusCode, Json<Value>) {
    if req.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "error": "Plan name is required"})),
        );
    }
    match state.plan_repo.create(user.user_id, req.name.trim()).await {
        Ok(plan) => (
            StatusCode::CREATED,
            Json(json!({"success": true, "plan": plan})),
        ),
        Err(e) => internal_error(e),
    }
}

/// GET /api/plans/{id}
pub(super) async fn fetch(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> (StatusCode, Json<Value>) {
    match state.plan_repo.get(user.user_id, id).await {
        Ok(Some(plan)) => (
            StatusCode::OK,
            Json(json!({"success": true, "plan": plan})),
        ),
        Ok(None) => not_found(),
        Err(e) => internal_error(e),
    }
}

#[derive(Deserialize)]
pub(super) struct SaveRequest {
    /// Either a pre-serialized JSON string or the document itself.
    data: Value,
}

/// POST /api/save/{id} — replace the document blob.
pub(super) async fn save(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<SaveRequest>,
) -> (StatusCode, Json<Value>) {
    let data = match req.data {
        Value::String(s) => s,
        other => other.to_string(),
    };
    match state.plan_repo.save_data(user.user_id, id, &data).await {
        Ok(true) => (StatusCode::OK, Json(json!({"success": true}))),
        Ok(false) => not_found(),
        Err(e) => internal_error(e),
    }
}

/// DELETE /api/plans/{id}
pub(super) async fn remove(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> (StatusCode, Json<Value>) {
    match state.plan_repo.delete(user.user_id, id).await {
        Ok(true) => (StatusCode::OK, Json(json!({"success": true}))),
        Ok(false) => not_found(),
        Err(e) => internal_error(e),
    }
}
