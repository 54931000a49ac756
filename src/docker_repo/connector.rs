// Connection to the Docker daemon. One connector per process, built once at
// startup and injected into the facade.

use crate::config::DockerConfig;
use bollard::{API_DEFAULT_VERSION, Docker};
use tracing::{debug, warn};

#[cfg(windows)]
const WINDOWS_PIPE: &str = "//./pipe/docker_engine";

/// Owns the (single) client for the container daemon. When client
/// construction fails the connector stays permanently unavailable instead of
/// failing process startup; every probe then reports false.
pub struct RuntimeConnector {
    docker: Option<Docker>,
}

impl RuntimeConnector {
    /// Select exactly one transport: explicit endpoint from config or
    /// DOCKER_HOST, otherwise the platform default (named pipe on Windows,
    /// Unix socket elsewhere).
    pub fn connect(config: &DockerConfig) -> Self {
        match Self::build_client(config) {
            Ok(docker) => Self {
                docker: Some(docker),
            },
            Err(e) => {
                warn!("Docker not available: {}", e);
                Self { docker: None }
            }
        }
    }

    fn build_client(config: &DockerConfig) -> Result<Docker, bollard::errors::Error> {
        let timeout = config.timeout_secs;
        let endpoint = config
            .host
            .clone()
            .or_else(|| std::env::var("DOCKER_HOST").ok());
        if let Some(host) = endpoint {
            return Docker::connect_with_http(&host, timeout, API_DEFAULT_VERSION);
        }
        #[cfg(windows)]
        {
            Docker::connect_with_named_pipe(WINDOWS_PIPE, timeout, API_DEFAULT_VERSION)
        }
        #[cfg(not(windows))]
        {
            Docker::connect_with_unix(&config.socket_path, timeout, API_DEFAULT_VERSION)
        }
    }

    /// Liveness probe: one fresh daemon ping per call, no caching or retries.
    /// Never panics; any fault reads as "not reachable right now".
    pub async fn probe(&self) -> bool {
        let Some(docker) = &self.docker else {
            return false;
        };
        match docker.ping().await {
            Ok(_) => true,
            Err(e) => {
                debug!("Docker ping failed: {}", e);
                false
            }
        }
    }

    pub(crate) fn client(&self) -> Option<&Docker> {
        self.docker.as_ref()
    }
}
