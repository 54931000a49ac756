// Profile settings: update, password change, account deletion

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use super::AppState;
use super::auth::{AuthUser, internal_error};
use crate::user_repo::UserRepoError;

const DEFAULT_THEME_COLOR: &str = "#38bdf8";

/// A theme color must be a #rrggbb hex value; anything else falls back to
/// the default accent.
fn normalize_theme_color(color: Option<&str>) -> &str {
    match color {
        Some(c)
            if c.len() == 7
                && c.starts_with('#')
                && c[1..].bytes().all(|b| b.is_ascii_hexdigit()) =>
        {
            c
        }
        _ => DEFAULT_THEME_COLOR,
    }
}

/// GET /api/settings
pub(super) async fn profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> (StatusCode, Json<Value>) {
    match state.user_repo.find_by_id(user.user_id).await {
        Ok(Some(profile)) => (
            StatusCode::OK,
            Json(json!({"success": true, "user": profile})),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "error": "User not found"})),
        ),
        Err(e) => internal_error(e),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UpdateRequest {
    username: String,
    email: String,
    theme_color: Option<String>,
}

/// POST /api/settings/update
pub(super) async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<UpdateRequest>,
) -> (StatusCode, Json<Value>) {
    let color = normalize_theme_color(req.theme_color.as_deref());
    match state
        .user_repo
        .update_profile(user.user_id, &req.username, &req.email, color)
        .await
    {
        Ok(()) => (StatusCode::OK, Json(json!({"success": true}))),
        Err(UserRepoError::UsernameTaken) => (
            StatusCode::CONFLICT,
            Json(json!({"success": false, "error": "Username already exists"})),
        ),
        Err(e) => internal_error(e),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PasswordRequest {
    current_password: String,
    new_password: String,
}

/// POST /api/settings/password
pub(super) async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<PasswordRequest>,
) -> (StatusCode, Json<Value>) {
    match state
        .user_repo
        .change_password(user.user_id, &req.current_password, &req.new_password)
        .await
    {
        Ok(true) => (StatusCode::OK, Json(json!({"success": true}))),
        Ok(false) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "error": "Current password is incorrect"})),
        ),
        Err(e) => internal_error(e),
    }
}

/// POST /api/settings/delete — remove the account, its plans and sessions.
pub(super) async fn delete_account(
    State(state): State<AppState>,
    user: AuthUser,
) -> (StatusCode, Json<Value>) {
    match state.user_repo.delete_account(user.user_id).await {
        Ok(()) => {
            state.sessions.destroy_user(user.user_id).await;
            (StatusCode::OK, Json(json!({"success": true})))
        }
        Err(e) => internal_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_theme_colors_pass_through() {
        assert_eq!(normalize_theme_color(Some("#a1B2c3")), "#a1B2c3");
        assert_eq!(normalize_theme_color(Some("#000000")), "#000000");
    }

    #[test]
    fn invalid_theme_colors_fall_back() {
        assert_eq!(normalize_theme_color(Some("red")), DEFAULT_THEME_COLOR);
        assert_eq!(normalize_theme_color(Some("#fff")), DEFAULT_THEME_COLOR);
        assert_eq!(normalize_theme_color(Some("#12345g")), DEFAULT_THEME_COLOR);
        assert_eq!(normalize_theme_color(None), DEFAULT_THEME_COLOR);
    }
}
