// Host monitoring view models (dashboard gauges)

use serde::{Deserialize, Serialize};

/// Snapshot for GET /api/monitoring/stats. Percentages are clamped to
/// [0, 100] and null when the underlying counters are unusable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringStats {
    pub cpu_percent: Option<f64>,
    pub ram_percent: Option<f64>,
    pub wifi: Option<WifiStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WifiStats {
    pub iface: String,
    pub rx_kbps: Option<i64>,
    pub tx_kbps: Option<i64>,
    pub utilization_percent: Option<f64>,
}
