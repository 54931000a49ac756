// Wire-format view models (camelCase JSON, matching the dashboard frontend)

mod container;
mod monitoring;
mod network;
mod plan;
mod user;

pub use container::{ContainerState, ContainerStats, ContainerStatus, ContainerSummary, PortMapping};
pub use monitoring::{MonitoringStats, WifiStats};
pub use network::NetworkSummary;
pub use plan::Plan;
pub use user::UserProfile;
