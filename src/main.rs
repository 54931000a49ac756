use anyhow::Result;
use nexus_net::*;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;

    let pool = db::connect(
        &app_config.database.path,
        app_config.database.max_pool_size,
    )
    .await?;
    db::init(&pool).await?;

    // One connector per process; a missing daemon degrades Docker routes to
    // "not available" instead of failing startup.
    let docker_repo = Arc::new(docker_repo::DockerRepo::connect(&app_config.docker));
    if docker_repo.is_available().await {
        tracing::info!("Docker daemon reachable");
    } else {
        tracing::warn!("Docker daemon not reachable; container routes will report unavailable");
    }

    let monitor_repo = Arc::new(monitor_repo::MonitorRepo::new());
    let user_repo = Arc::new(user_repo::UserRepo::new(pool.clone()));
    let plan_repo = Arc::new(plan_repo::PlanRepo::new(pool));
    let sessions = Arc::new(session::SessionStore::new(Duration::from_secs(
        app_config.session.ttl_hours * 3600,
    )));

    let app = routes::app(
        docker_repo,
        monitor_repo,
        user_repo,
        plan_repo,
        sessions,
        app_config.clone(),
    );
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    let in_container = std::path::Path::new("/.dockerenv").exists()
        || std::env::var("CONTAINER").as_deref() == Ok("1");

    if in_container {
        // In Docker: run server until error or SIGTERM (no signal handler; avoids immediate exit)
        axum::serve(listener, app).await?;
    } else {
        tokio::select! {
            result = axum::serve(listener, app) => {
                result?;
            }
            _ = async {
                #[cfg(unix)]
                {
                    let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                        Ok(s) => s,
                        Err(_) => {
                            let _ = tokio::signal::ctrl_c().await;
                            return;
                        }
                    };
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {}
                        _ = sigterm.recv() => {}
                    }
                }
                #[cfg(not(unix))]
                {
                    tokio::signal::ctrl_c().await
                }
            } => {
                tracing::info!("Received shutdown signal");
            }
        }
    }

    Ok(())
}
