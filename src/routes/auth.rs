// Registration, login and the session extractor

use axum::Json;
use axum::extract::{FromRequestParts, State};
use axum::http::{HeaderMap, StatusCode, header, request::Parts};
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::json;

use super::AppState;
use crate::user_repo::UserRepoError;

pub(crate) const SESSION_COOKIE: &str = "nexus_sid";

/// Extracts the authenticated user from a bearer token or the session
/// cookie; rejects with a 401 envelope otherwise.
pub struct AuthUser {
    pub user_id: i64,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(token) = request_token(&parts.headers)
            && let Some(user_id) = state.sessions.resolve(&token).await
        {
            return Ok(AuthUser { user_id });
        }
        Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "error": "Authentication required"})),
        ))
    }
}

pub(super) fn request_token(headers: &HeaderMap) -> Option<String> {
    bearer_token(headers).or_else(|| cookie_token(headers))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';')
        .map(str::trim)
        .find_map(|kv| kv.strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
        .map(str::to_string)
}

#[derive(Deserialize)]
pub(super) struct RegisterRequest {
    username: String,
    email: String,
    password: String,
}

pub(super) async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> impl IntoResponse {
    if req.username.is_empty() || req.password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "error": "Username and password are required"})),
        );
    }
    match state
        .user_repo
        .create_user(&req.username, &req.email, &req.password)
        .await
    {
        Ok(user) => (
            StatusCode::CREATED,
            Json(json!({"success": true, "user": user})),
        ),
        Err(UserRepoError::UsernameTaken) => (
            StatusCode::CONFLICT,
            Json(json!({"success": false, "error": "Username already exists"})),
        ),
        Err(e) => internal_error(e),
    }
}

#[derive(Deserialize)]
pub(super) struct LoginRequest {
    username: String,
    password: String,
}

pub(super) async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    match state
        .user_repo
        .authenticate(&req.username, &req.password)
        .await
    {
        Ok(Some(user)) => {
            let token = state.sessions.create(user.id).await;
            let cookie = format!(
                "{}={}; HttpOnly; SameSite=Lax; Path=/",
                SESSION_COOKIE, token
            );
            (
                StatusCode::OK,
                [(header::SET_COOKIE, cookie)],
                Json(json!({"success": true, "token": token, "user": user})),
            )
                .into_response()
        }
        Ok(None) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "error": "Invalid username or password"})),
        )
            .into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

pub(super) async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> (StatusCode, Json<serde_json::Value>) {
    if let Some(token) = request_token(&headers) {
        state.sessions.destroy(&token).await;
    }
    (StatusCode::OK, Json(json!({"success": true})))
}

pub(super) fn internal_error<E: std::fmt::Display>(e: E) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"success": false, "error": e.to_string()})),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_is_extracted() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc123"),
        );
        assert_eq!(request_token(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn cookie_token_is_extracted_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; nexus_sid=tok42; lang=fr"),
        );
        assert_eq!(request_token(&headers).as_deref(), Some("tok42"));
    }

    #[test]
    fn bearer_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer a"));
        headers.insert(header::COOKIE, HeaderValue::from_static("nexus_sid=b"));
        assert_eq!(request_token(&headers).as_deref(), Some("a"));
    }

    #[test]
    fn missing_credentials_yield_none() {
        let headers = HeaderMap::new();
        assert_eq!(request_token(&headers), None);
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(request_token(&headers), None);
    }
}
