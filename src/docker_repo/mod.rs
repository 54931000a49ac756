// Container lifecycle and stats facade over the Docker daemon (bollard).
//
// Every public operation probes daemon liveness first and returns errors as
// values; a daemon fault never propagates past this module as a panic or an
// unhandled error. Callers can serialize any outcome directly.

mod connector;
mod stats;

pub use connector::RuntimeConnector;

use crate::config::DockerConfig;
use crate::models::{
    ContainerState, ContainerStats, ContainerStatus, ContainerSummary, NetworkSummary, PortMapping,
};
use bollard::Docker;
use bollard::errors::Error as BollardError;
use bollard::query_parameters::{
    InspectContainerOptions, ListContainersOptions, ListNetworksOptions, RestartContainerOptions,
    StartContainerOptions, StatsOptions, StopContainerOptions,
};
use bollard::models::ContainerInspectResponse;
use futures_util::StreamExt;
use tracing::instrument;

/// Error taxonomy for facade operations. The message text is what the
/// frontend displays, so the variants render exactly the strings the
/// dashboard expects.
#[derive(Debug, thiserror::Error)]
pub enum DockerRepoError {
    /// Daemon unreachable (probe failed or the client never constructed).
    #[error("Docker not available")]
    Unavailable,
    /// Identifier does not look like a container id.
    #[error("Invalid container ID format")]
    InvalidId,
    /// Any other daemon fault, passed through verbatim.
    #[error("{0}")]
    Daemon(String),
}

/// Container ids are hex strings: the full 64 characters or a prefix of at
/// least 12, case-insensitive.
pub fn is_valid_container_id(id: &str) -> bool {
    (12..=64).contains(&id.len()) && id.bytes().all(|b| b.is_ascii_hexdigit())
}

pub struct DockerRepo {
    connector: RuntimeConnector,
}

impl DockerRepo {
    pub fn connect(config: &DockerConfig) -> Self {
        Self {
            connector: RuntimeConnector::connect(config),
        }
    }

    /// Fresh liveness probe against the daemon.
    pub async fn is_available(&self) -> bool {
        self.connector.probe().await
    }

    /// Probe-then-client guard shared by every operation: a daemon call can
    /// only be issued through a client obtained here, so an unavailable
    /// daemon short-circuits with zero round trips beyond the ping.
    async fn client(&self) -> Result<&Docker, DockerRepoError> {
        if !self.connector.probe().await {
            return Err(DockerRepoError::Unavailable);
        }
        self.connector.client().ok_or(DockerRepoError::Unavailable)
    }

    #[instrument(skip(self), fields(repo = "docker", operation = "list_containers"))]
    pub async fn list_containers(
        &self,
        all: bool,
    ) -> Result<Vec<ContainerSummary>, DockerRepoError> {
        let docker = self.client().await?;
        let opts = ListContainersOptions {
            all,
            ..Default::default()
        };
        let containers = docker
            .list_containers(Some(opts))
            .await
            .map_err(daemon_error)?;
        Ok(containers.into_iter().map(map_summary).collect())
    }

    #[instrument(skip(self), fields(repo = "docker", operation = "container_status"))]
    pub async fn container_status(&self, id: &str) -> Result<ContainerStatus, DockerRepoError> {
        if !is_valid_container_id(id) {
            return Err(DockerRepoError::InvalidId);
        }
        let docker = self.client().await?;
        let info = docker
            .inspect_container(id, None::<InspectContainerOptions>)
            .await
            .map_err(daemon_error)?;
        Ok(map_status(info))
    }

    /// One non-streaming stats fetch; the daemon includes the previous
    /// counter snapshot in the same response.
    #[instrument(skip(self), fields(repo = "docker", operation = "container_stats"))]
    pub async fn container_stats(&self, id: &str) -> Result<ContainerStats, DockerRepoError> {
        if !is_valid_container_id(id) {
            return Err(DockerRepoError::InvalidId);
        }
        let docker = self.client().await?;
        let opts = StatsOptions {
            stream: false,
            ..Default::default()
        };
        let mut stream = docker.stats(id, Some(opts));
        let raw = stream
            .next()
            .await
            .ok_or_else(|| DockerRepoError::Daemon("empty stats response".into()))?
            .map_err(daemon_error)?;
        Ok(stats::derive_stats(&raw))
    }

    /// Starting an already-running container is success, not an error: the
    /// daemon signals it with 304 and the caller just wanted it running.
    #[instrument(skip(self), fields(repo = "docker", operation = "start_container"))]
    pub async fn start_container(&self, id: &str) -> Result<&'static str, DockerRepoError> {
        if !is_valid_container_id(id) {
            return Err(DockerRepoError::InvalidId);
        }
        let docker = self.client().await?;
        match docker
            .start_container(id, None::<StartContainerOptions>)
            .await
        {
            Ok(()) => Ok("Container started"),
            Err(e) if is_not_modified(&e) => Ok("Container already started"),
            Err(e) => Err(daemon_error(e)),
        }
    }

    #[instrument(skip(self), fields(repo = "docker", operation = "stop_container"))]
    pub async fn stop_container(&self, id: &str) -> Result<&'static str, DockerRepoError> {
        if !is_valid_container_id(id) {
            return Err(DockerRepoError::InvalidId);
        }
        let docker = self.client().await?;
        match docker.stop_container(id, None::<StopContainerOptions>).await {
            Ok(()) => Ok("Container stopped"),
            Err(e) if is_not_modified(&e) => Ok("Container already stopped"),
            Err(e) => Err(daemon_error(e)),
        }
    }

    #[instrument(skip(self), fields(repo = "docker", operation = "restart_container"))]
    pub async fn restart_container(&self, id: &str) -> Result<&'static str, DockerRepoError> {
        if !is_valid_container_id(id) {
            return Err(DockerRepoError::InvalidId);
        }
        let docker = self.client().await?;
        docker
            .restart_container(id, None::<RestartContainerOptions>)
            .await
            .map_err(daemon_error)?;
        Ok("Container restarted")
    }

    #[instrument(skip(self), fields(repo = "docker", operation = "list_networks"))]
    pub async fn list_networks(&self) -> Result<Vec<NetworkSummary>, DockerRepoError> {
        let docker = self.client().await?;
        let networks = docker
            .list_networks(None::<ListNetworksOptions>)
            .await
            .map_err(daemon_error)?;
        Ok(networks.into_iter().map(map_network).collect())
    }
}

fn daemon_error(e: BollardError) -> DockerRepoError {
    DockerRepoError::Daemon(e.to_string())
}

/// HTTP 304 from the daemon: the container is already in the requested state.
fn is_not_modified(e: &BollardError) -> bool {
    matches!(
        e,
        BollardError::DockerResponseServerError {
            status_code: 304,
            ..
        }
    )
}

fn map_summary(c: bollard::models::ContainerSummary) -> ContainerSummary {
    let id = c.id.unwrap_or_default();
    // Daemons may report several names per container; only the first is
    // surfaced, with the leading slash stripped.
    let name = c
        .names
        .as_ref()
        .and_then(|n| n.first())
        .map(|n| n.trim_start_matches('/').to_string())
        .unwrap_or_else(|| id.clone());
    ContainerSummary {
        name,
        image: c.image.unwrap_or_default(),
        state: c
            .state
            .map(|s| ContainerState::from_docker(&s.to_string()))
            .unwrap_or(ContainerState::Unknown),
        status: c.status.unwrap_or_default(),
        created: c.created.unwrap_or(0),
        ports: c
            .ports
            .unwrap_or_default()
            .into_iter()
            .map(map_port)
            .collect(),
        id,
    }
}

fn map_port(p: bollard::models::PortSummary) -> PortMapping {
    PortMapping {
        ip: p.ip,
        private_port: p.private_port,
        public_port: p.public_port,
        protocol: p.typ.map(|t| t.to_string()).unwrap_or_default(),
    }
}

fn map_status(info: ContainerInspectResponse) -> ContainerStatus {
    let state = info.state.unwrap_or_default();
    ContainerStatus {
        id: info.id.unwrap_or_default(),
        name: info
            .name
            .as_deref()
            .map(|n| n.trim_start_matches('/').to_string())
            .unwrap_or_default(),
        state: state
            .status
            .map(|s| ContainerState::from_docker(&s.to_string()))
            .unwrap_or(ContainerState::Unknown),
        running: state.running.unwrap_or(false),
        paused: state.paused.unwrap_or(false),
        restarting: state.restarting.unwrap_or(false),
        exit_code: state.exit_code.unwrap_or(0),
        started_at: state.started_at.unwrap_or_default(),
        finished_at: state.finished_at.unwrap_or_default(),
    }
}

fn map_network(n: bollard::models::Network) -> NetworkSummary {
    NetworkSummary {
        id: n.id.unwrap_or_default(),
        name: n.name.unwrap_or_default(),
        driver: n.driver.unwrap_or_default(),
        scope: n.scope.unwrap_or_default(),
        created: n.created.unwrap_or_default(),
    }
}
