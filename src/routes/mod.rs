// HTTP routes (JSON API)

mod auth;
mod docker;
mod misc;
mod monitoring;
mod plans;
mod settings;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::docker_repo::DockerRepo;
use crate::monitor_repo::MonitorRepo;
use crate::plan_repo::PlanRepo;
use crate::session::SessionStore;
use crate::user_repo::UserRepo;

pub use auth::AuthUser;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) docker_repo: Arc<DockerRepo>,
    pub(crate) monitor_repo: Arc<MonitorRepo>,
    pub(crate) user_repo: Arc<UserRepo>,
    pub(crate) plan_repo: Arc<PlanRepo>,
    pub(crate) sessions: Arc<SessionStore>,
    pub(crate) config: AppConfig,
}

#[allow(clippy::too_many_arguments)]
pub fn app(
    docker_repo: Arc<DockerRepo>,
    monitor_repo: Arc<MonitorRepo>,
    user_repo: Arc<UserRepo>,
    plan_repo: Arc<PlanRepo>,
    sessions: Arc<SessionStore>,
    config: AppConfig,
) -> Router {
    let state = AppState {
        docker_repo,
        monitor_repo,
        user_repo,
        plan_repo,
        sessions,
        config,
    };
    Router::new()
        .route("/", get(misc::root_handler)) // GET /
        .route("/version", get(misc::version_handler)) // GET /version
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/settings", get(settings::profile))
        .route("/api/settings/update", post(settings::update_profile))
        .route("/api/settings/password", post(settings::change_password))
        .route("/api/settings/delete", post(settings::delete_account))
        .route("/api/plans", get(plans::list).post(plans::create))
        .route("/api/plans/{id}", get(plans::fetch).delete(plans::remove))
        .route("/api/save/{id}", post(plans::save))
        .route("/api/report-bug", post(misc::report_bug))
        .route("/api/monitoring/stats", get(monitoring::stats_handler))
        .route("/api/docker/containers", get(docker::list_containers))
        .route(
            "/api/docker/containers/{id}/status",
            get(docker::container_status),
        )
        .route(
            "/api/docker/containers/{id}/stats",
            get(docker::container_stats),
        )
        .route(
            "/api/docker/containers/{id}/start",
            post(docker::start_container),
        )
        .route(
            "/api/docker/containers/{id}/stop",
            post(docker::stop_container),
        )
        .route(
            "/api/docker/containers/{id}/restart",
            post(docker::restart_container),
        )
        .route("/api/docker/networks", get(docker::list_networks))
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
