// Derive CPU/memory percentages from one raw Docker stats snapshot.

use crate::models::ContainerStats;
use bollard::models::ContainerStatsResponse;

const BYTES_PER_MIB: f64 = 1_048_576.0;

/// Two-sample CPU delta derivation. The daemon reports paired current and
/// previous counter blocks in a single response; every nested field is
/// optional and absent values fall back to 0 (or 1 for the core count).
/// Exposed for unit tests.
pub(crate) fn derive_stats(s: &ContainerStatsResponse) -> ContainerStats {
    let cpu = s.cpu_stats.as_ref();
    let precpu = s.precpu_stats.as_ref();

    let total_usage = cpu
        .and_then(|c| c.cpu_usage.as_ref())
        .and_then(|u| u.total_usage)
        .unwrap_or(0) as i64;
    let pre_total_usage = precpu
        .and_then(|c| c.cpu_usage.as_ref())
        .and_then(|u| u.total_usage)
        .unwrap_or(0) as i64;
    let cpu_delta = total_usage - pre_total_usage;

    let system_usage = cpu.and_then(|c| c.system_cpu_usage).unwrap_or(0) as i64;
    let pre_system_usage = precpu.and_then(|c| c.system_cpu_usage).unwrap_or(0) as i64;
    let system_delta = system_usage - pre_system_usage;

    // online_cpus of 0 falls through to the per-core list, then to 1.
    let core_count = cpu
        .and_then(|c| c.online_cpus)
        .filter(|&n| n > 0)
        .map(|n| n as usize)
        .or_else(|| {
            cpu.and_then(|c| c.cpu_usage.as_ref())
                .and_then(|u| u.percpu_usage.as_ref())
                .map(|p| p.len())
        })
        .filter(|&n| n > 0)
        .unwrap_or(1);

    // Both deltas must be positive; samples taken too close together or
    // wrapped counters would otherwise produce NaN or a spurious spike.
    let cpu_percent = if system_delta > 0 && cpu_delta > 0 {
        (cpu_delta as f64 / system_delta as f64) * core_count as f64 * 100.0
    } else {
        0.0
    };

    let mem_usage = s.memory_stats.as_ref().and_then(|m| m.usage).unwrap_or(0);
    let mem_limit = s.memory_stats.as_ref().and_then(|m| m.limit).unwrap_or(0);
    let mem_percent = if mem_limit > 0 {
        (mem_usage as f64 / mem_limit as f64) * 100.0
    } else {
        0.0
    };

    ContainerStats {
        cpu_percent,
        mem_percent,
        mem_usage_mb: mem_usage as f64 / BYTES_PER_MIB,
        mem_limit_mb: mem_limit as f64 / BYTES_PER_MIB,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bollard::models::{ContainerCpuStats, ContainerCpuUsage, ContainerMemoryStats};

    fn cpu_block(total_usage: u64, system_cpu_usage: u64, online_cpus: Option<u32>) -> ContainerCpuStats {
        ContainerCpuStats {
            cpu_usage: Some(ContainerCpuUsage {
                total_usage: Some(total_usage),
                ..Default::default()
            }),
            system_cpu_usage: Some(system_cpu_usage),
            online_cpus,
            throttling_data: None,
        }
    }

    #[test]
    fn derive_stats_computes_cpu_percent_from_deltas() {
        // cpuDelta 1000, systemDelta 10000, 2 cores -> 20%
        let s = ContainerStatsResponse {
            cpu_stats: Some(cpu_block(2000, 20000, Some(2))),
            precpu_stats: Some(cpu_block(1000, 10000, Some(2))),
            ..Default::default()
        };
        let out = derive_stats(&s);
        assert!((out.cpu_percent - 20.0).abs() < 1e-9);
    }

    #[test]
    fn derive_stats_zero_system_delta_yields_zero_not_nan() {
        let s = ContainerStatsResponse {
            cpu_stats: Some(cpu_block(5000, 7777, Some(4))),
            precpu_stats: Some(cpu_block(1000, 7777, Some(4))),
            ..Default::default()
        };
        let out = derive_stats(&s);
        assert_eq!(out.cpu_percent, 0.0);
        assert!(out.cpu_percent.is_finite());
    }

    #[test]
    fn derive_stats_negative_cpu_delta_yields_zero() {
        // Wrapped counter: current below previous.
        let s = ContainerStatsResponse {
            cpu_stats: Some(cpu_block(100, 20000, Some(2))),
            precpu_stats: Some(cpu_block(5000, 10000, Some(2))),
            ..Default::default()
        };
        assert_eq!(derive_stats(&s).cpu_percent, 0.0);
    }

    #[test]
    fn derive_stats_falls_back_to_percpu_list_then_one() {
        let mut cpu = cpu_block(2000, 20000, None);
        cpu.cpu_usage.as_mut().unwrap().percpu_usage = Some(vec![1, 2, 3, 4]);
        let s = ContainerStatsResponse {
            cpu_stats: Some(cpu),
            precpu_stats: Some(cpu_block(1000, 10000, None)),
            ..Default::default()
        };
        // (1000/10000) * 4 * 100
        assert!((derive_stats(&s).cpu_percent - 40.0).abs() < 1e-9);

        let s = ContainerStatsResponse {
            cpu_stats: Some(cpu_block(2000, 20000, None)),
            precpu_stats: Some(cpu_block(1000, 10000, None)),
            ..Default::default()
        };
        // No core information at all -> 1 core
        assert!((derive_stats(&s).cpu_percent - 10.0).abs() < 1e-9);
    }

    #[test]
    fn derive_stats_online_cpus_zero_is_ignored() {
        let s = ContainerStatsResponse {
            cpu_stats: Some(cpu_block(2000, 20000, Some(0))),
            precpu_stats: Some(cpu_block(1000, 10000, Some(0))),
            ..Default::default()
        };
        assert!((derive_stats(&s).cpu_percent - 10.0).abs() < 1e-9);
    }

    #[test]
    fn derive_stats_memory_figures() {
        let s = ContainerStatsResponse {
            memory_stats: Some(ContainerMemoryStats {
                usage: Some(256 * 1024 * 1024),
                limit: Some(512 * 1024 * 1024),
                ..Default::default()
            }),
            ..Default::default()
        };
        let out = derive_stats(&s);
        assert!((out.mem_percent - 50.0).abs() < 1e-9);
        assert!((out.mem_usage_mb - 256.0).abs() < 1e-9);
        assert!((out.mem_limit_mb - 512.0).abs() < 1e-9);
    }

    #[test]
    fn derive_stats_zero_mem_limit_yields_zero_percent() {
        let s = ContainerStatsResponse {
            memory_stats: Some(ContainerMemoryStats {
                usage: Some(123_456_789),
                limit: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(derive_stats(&s).mem_percent, 0.0);
    }

    #[test]
    fn derive_stats_tolerates_fully_absent_blocks() {
        let out = derive_stats(&ContainerStatsResponse::default());
        assert_eq!(out.cpu_percent, 0.0);
        assert_eq!(out.mem_percent, 0.0);
        assert_eq!(out.mem_usage_mb, 0.0);
        assert_eq!(out.mem_limit_mb, 0.0);
    }
}
