// Host monitoring endpoint for the dashboard gauges

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{Value, json};

use super::AppState;
use super::auth::{AuthUser, internal_error};

/// GET /api/monitoring/stats — CPU/RAM/Wi-Fi, flattened into the envelope.
pub(super) async fn stats_handler(
    State(state): State<AppState>,
    _user: AuthUser,
) -> (StatusCode, Json<Value>) {
    match state.monitor_repo.get_monitoring_stats().await {
        Ok(stats) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "cpuPercent": stats.cpu_percent,
                "ramPercent": stats.ram_percent,
                "wifi": stats.wifi,
            })),
        ),
        Err(e) => internal_error(e),
    }
}
