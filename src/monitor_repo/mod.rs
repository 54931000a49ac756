// Host CPU/RAM/Wi-Fi gauges via sysinfo

mod linux;

use crate::models::{MonitoringStats, WifiStats};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use sysinfo::{Networks, System};
use tracing::instrument;

/// Cumulative rx/tx byte counters per interface plus the sampling instant,
/// kept between calls to turn totals into rates.
type NetworkSample = (HashMap<String, (u64, u64)>, Instant);

pub struct MonitorRepo {
    sys: Arc<std::sync::Mutex<System>>,
    networks: Arc<std::sync::Mutex<Networks>>,
    last_cpu_refresh: Arc<std::sync::Mutex<Option<(Instant, f64)>>>,
    last_network: Arc<std::sync::Mutex<Option<NetworkSample>>>,
}

impl Default for MonitorRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitorRepo {
    pub fn new() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();
        let networks = Networks::new_with_refreshed_list();
        Self {
            sys: Arc::new(std::sync::Mutex::new(sys)),
            networks: Arc::new(std::sync::Mutex::new(networks)),
            last_cpu_refresh: Arc::new(std::sync::Mutex::new(None)),
            last_network: Arc::new(std::sync::Mutex::new(None)),
        }
    }

    /// One dashboard sample: global CPU load, RAM usage and the Wi-Fi link,
    /// all clamped to [0, 100] with null for unusable values.
    #[instrument(skip(self), fields(repo = "monitor", operation = "get_monitoring_stats"))]
    pub async fn get_monitoring_stats(&self) -> anyhow::Result<MonitoringStats> {
        let sys = self.sys.clone();
        let networks = self.networks.clone();
        let last_cpu_refresh = self.last_cpu_refresh.clone();
        let last_network = self.last_network.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;

            let now = Instant::now();
            let usage = if let Ok(mut guard) = last_cpu_refresh.lock() {
                if let Some((prev_ts, prev_usage)) = *guard {
                    let dt = now.duration_since(prev_ts);
                    if dt >= sysinfo::MINIMUM_CPU_UPDATE_INTERVAL {
                        sys.refresh_cpu_all();
                        let new_usage = sys.global_cpu_usage() as f64;
                        *guard = Some((now, new_usage));
                        new_usage
                    } else {
                        // Too soon for a meaningful CPU sample, reuse the last one
                        prev_usage
                    }
                } else {
                    // First call: refresh to establish baseline
                    sys.refresh_cpu_all();
                    *guard = Some((now, 0.0));
                    0.0
                }
            } else {
                sys.refresh_cpu_all();
                0.0
            };
            let cpu_percent = clamp_percent(usage);

            sys.refresh_memory();
            let total = sys.total_memory();
            let used = total.saturating_sub(sys.available_memory());
            let ram_percent = clamp_percent((used as f64 / total as f64) * 100.0);

            let mut networks_guard = networks
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo networks lock poisoned: {}", e))?;
            networks_guard.refresh(true);

            let candidates: Vec<WifiCandidate> = networks_guard
                .list()
                .keys()
                .map(|name| WifiCandidate {
                    name: name.clone(),
                    wireless: linux::is_wireless(name),
                    up: linux::is_operstate_up(name),
                })
                .collect();

            let totals: HashMap<String, (u64, u64)> = networks_guard
                .list()
                .iter()
                .map(|(name, data)| {
                    (
                        name.clone(),
                        (data.total_received(), data.total_transmitted()),
                    )
                })
                .collect();

            let rates = if let Ok(mut guard) = last_network.lock() {
                let rates = guard.take().and_then(|(prev, prev_ts)| {
                    let dt_secs = now.duration_since(prev_ts).as_secs_f64();
                    (dt_secs > 0.0).then(|| {
                        totals
                            .iter()
                            .filter_map(|(name, (rx, tx))| {
                                prev.get(name).map(|(prx, ptx)| {
                                    (
                                        name.clone(),
                                        (
                                            rx.saturating_sub(*prx) as f64 / dt_secs,
                                            tx.saturating_sub(*ptx) as f64 / dt_secs,
                                        ),
                                    )
                                })
                            })
                            .collect::<HashMap<String, (f64, f64)>>()
                    })
                });
                *guard = Some((totals, now));
                rates
            } else {
                None
            };

            let wifi = pick_wifi_interface(&candidates).map(|idx| {
                let iface = candidates[idx].name.clone();
                let rate = rates.as_ref().and_then(|r| r.get(&iface)).copied();
                let speed_mbps = linux::get_interface_speed_mbps(&iface);
                WifiStats {
                    rx_kbps: rate.map(|(rx, _)| (rx * 8.0 / 1000.0).round() as i64),
                    tx_kbps: rate.map(|(_, tx)| (tx * 8.0 / 1000.0).round() as i64),
                    utilization_percent: rate
                        .and_then(|(rx, tx)| wifi_utilization(rx, tx, speed_mbps)),
                    iface,
                }
            });

            Ok(MonitoringStats {
                cpu_percent,
                ram_percent,
                wifi,
            })
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }
}

pub(crate) struct WifiCandidate {
    pub(crate) name: String,
    pub(crate) wireless: bool,
    pub(crate) up: bool,
}

/// Interface selection: an operational wireless interface wins, then an
/// operational interface with a Wi-Fi-looking name, then any wireless one.
pub(crate) fn pick_wifi_interface(candidates: &[WifiCandidate]) -> Option<usize> {
    candidates
        .iter()
        .position(|c| c.up && c.wireless)
        .or_else(|| candidates.iter().position(|c| c.up && has_wifi_name(&c.name)))
        .or_else(|| candidates.iter().position(|c| c.wireless))
}

fn has_wifi_name(name: &str) -> bool {
    let n = name.to_lowercase();
    n.contains("wi-fi") || n.contains("wifi") || n.contains("wlan") || n.contains("wireless")
}

/// Clamp to [0, 100]; NaN/infinite values read as "no data".
pub(crate) fn clamp_percent(value: f64) -> Option<f64> {
    value.is_finite().then(|| value.clamp(0.0, 100.0))
}

/// Link utilization from byte rates against the advertised link speed.
/// Unknown speed (0) means utilization cannot be computed.
pub(crate) fn wifi_utilization(
    rx_bytes_per_sec: f64,
    tx_bytes_per_sec: f64,
    speed_mbps: u64,
) -> Option<f64> {
    if speed_mbps == 0 {
        return None;
    }
    let total_bits_per_sec = (rx_bytes_per_sec + tx_bytes_per_sec) * 8.0;
    let max_bits_per_sec = speed_mbps as f64 * 1_000_000.0;
    clamp_percent(total_bits_per_sec / max_bits_per_sec * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, wireless: bool, up: bool) -> WifiCandidate {
        WifiCandidate {
            name: name.into(),
            wireless,
            up,
        }
    }

    #[test]
    fn picks_operational_wireless_first() {
        let c = vec![
            candidate("eth0", false, true),
            candidate("wlp3s0", true, true),
        ];
        assert_eq!(pick_wifi_interface(&c), Some(1));
    }

    #[test]
    fn falls_back_to_wifi_looking_name_when_up() {
        let c = vec![
            candidate("eth0", false, true),
            candidate("WiFi-Adapter", false, true),
        ];
        assert_eq!(pick_wifi_interface(&c), Some(1));
    }

    #[test]
    fn falls_back_to_any_wireless_then_none() {
        let c = vec![
            candidate("eth0", false, true),
            candidate("wlan0", true, false),
        ];
        assert_eq!(pick_wifi_interface(&c), Some(1));
        assert_eq!(pick_wifi_interface(&[candidate("eth0", false, true)]), None);
    }

    #[test]
    fn clamp_percent_bounds_and_rejects_non_finite() {
        assert_eq!(clamp_percent(50.0), Some(50.0));
        assert_eq!(clamp_percent(-3.0), Some(0.0));
        assert_eq!(clamp_percent(250.0), Some(100.0));
        assert_eq!(clamp_percent(f64::NAN), None);
        assert_eq!(clamp_percent(f64::INFINITY), None);
    }

    #[test]
    fn utilization_needs_a_known_link_speed() {
        assert_eq!(wifi_utilization(1000.0, 1000.0, 0), None);
        // 2000 B/s total = 16000 bit/s on a 1 Mbit link -> 1.6%
        let u = wifi_utilization(1000.0, 1000.0, 1).unwrap();
        assert!((u - 1.6).abs() < 1e-9);
    }
}
