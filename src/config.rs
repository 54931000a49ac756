use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub docker: DockerConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    /// File that POST /api/report-bug appends to.
    #[serde(default = "default_bug_report_log")]
    pub bug_report_log: String,
}

fn default_bug_report_log() -> String {
    "bug_reports.log".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_pool_size: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DockerConfig {
    /// Explicit daemon endpoint (e.g. "tcp://127.0.0.1:2375"). Falls back to
    /// the DOCKER_HOST env var, then the platform default transport.
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default = "default_socket_path")]
    pub socket_path: String,
    /// Per-request timeout for daemon calls, in seconds.
    #[serde(default = "default_docker_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_socket_path() -> String {
    "/var/run/docker.sock".into()
}

fn default_docker_timeout_secs() -> u64 {
    30
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            host: None,
            socket_path: default_socket_path(),
            timeout_secs: default_docker_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_ttl_hours")]
    pub ttl_hours: u64,
}

fn default_session_ttl_hours() -> u64 {
    24
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_session_ttl_hours(),
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.database.path.is_empty(),
            "database.path must be non-empty"
        );
        anyhow::ensure!(
            self.database.max_pool_size > 0,
            "database.max_pool_size must be > 0, got {}",
            self.database.max_pool_size
        );
        anyhow::ensure!(
            !self.docker.socket_path.is_empty(),
            "docker.socket_path must be non-empty"
        );
        anyhow::ensure!(
            self.docker.timeout_secs > 0,
            "docker.timeout_secs must be > 0, got {}",
            self.docker.timeout_secs
        );
        anyhow::ensure!(
            self.session.ttl_hours > 0,
            "session.ttl_hours must be > 0, got {}",
            self.session.ttl_hours
        );
        Ok(())
    }
}
