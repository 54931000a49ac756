// Docker API routes. Container ids are validated here, before the facade is
// invoked; every facade outcome (ok or error) serializes with HTTP 200 —
// the facade never surfaces a fault that would turn into a 500.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};

use super::AppState;
use super::auth::AuthUser;
use crate::docker_repo::is_valid_container_id;

type ApiResponse = (StatusCode, Json<Value>);

fn invalid_id() -> ApiResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"success": false, "error": "Invalid container ID format"})),
    )
}

fn failure<E: std::fmt::Display>(e: E) -> ApiResponse {
    (
        StatusCode::OK,
        Json(json!({"success": false, "error": e.to_string()})),
    )
}

/// GET /api/docker/containers — all containers, stopped ones included.
pub(super) async fn list_containers(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResponse {
    match state.docker_repo.list_containers(true).await {
        Ok(containers) => (
            StatusCode::OK,
            Json(json!({"success": true, "containers": containers})),
        ),
        Err(e) => failure(e),
    }
}

/// GET /api/docker/containers/{id}/status
pub(super) async fn container_status(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse {
    if !is_valid_container_id(&id) {
        return invalid_id();
    }
    match state.docker_repo.container_status(&id).await {
        Ok(status) => (
            StatusCode::OK,
            Json(json!({"success": true, "status": status})),
        ),
        Err(e) => failure(e),
    }
}

/// GET /api/docker/containers/{id}/stats
pub(super) async fn container_stats(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse {
    if !is_valid_container_id(&id) {
        return invalid_id();
    }
    match state.docker_repo.container_stats(&id).await {
        Ok(stats) => (
            StatusCode::OK,
            Json(json!({"success": true, "stats": stats})),
        ),
        Err(e) => failure(e),
    }
}

/// POST /api/docker/containers/{id}/start
pub(super) async fn start_container(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse {
    if !is_valid_container_id(&id) {
        return invalid_id();
    }
    match state.docker_repo.start_container(&id).await {
        Ok(message) => (
            StatusCode::OK,
            Json(json!({"success": true, "message": message})),
        ),
        Err(e) => failure(e),
    }
}

/// POST /api/docker/containers/{id}/stop
pub(super) async fn stop_container(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse {
    if !is_valid_container_id(&id) {
        return invalid_id();
    }
    match state.docker_repo.stop_container(&id).await {
        Ok(message) => (
            StatusCode::OK,
            Json(json!({"success": true, "message": message})),
        ),
        Err(e) => failure(e),
    }
}

/// POST /api/docker/containers/{id}/restart
pub(super) async fn restart_container(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse {
    if !is_valid_container_id(&id) {
        return invalid_id();
    }
    match state.docker_repo.restart_container(&id).await {
        Ok(message) => (
            StatusCode::OK,
            Json(json!({"success": true, "message": message})),
        ),
        Err(e) => failure(e),
    }
}

/// GET /api/docker/networks
pub(super) async fn list_networks(State(state): State<AppState>, _user: AuthUser) -> ApiResponse {
    match state.docker_repo.list_networks().await {
        Ok(networks) => (
            StatusCode::OK,
            Json(json!({"success": true, "networks": networks})),
        ),
        Err(e) => failure(e),
    }
}
