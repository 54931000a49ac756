// Linux-specific helpers: /sys/class/net lookups for wireless detection,
// operational state and link speed.

/// An interface is wireless when the kernel exposes a wireless/ directory
/// for it.
pub(super) fn is_wireless(interface_name: &str) -> bool {
    #[cfg(target_os = "linux")]
    {
        let path = format!("/sys/class/net/{}/wireless", interface_name);
        return std::path::Path::new(&path).is_dir();
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = interface_name;
        false
    }
}

/// Read /sys/class/net/<interface>/operstate; "up" means operational.
pub(super) fn is_operstate_up(interface_name: &str) -> bool {
    #[cfg(target_os = "linux")]
    {
        let path = format!("/sys/class/net/{}/operstate", interface_name);
        return std::fs::read_to_string(&path)
            .map(|s| s.trim().eq_ignore_ascii_case("up"))
            .unwrap_or(false);
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = interface_name;
        false
    }
}

/// Read link speed from /sys/class/net/<interface>/speed (Linux).
/// Returns megabits per second, or 0 if unavailable.
pub(super) fn get_interface_speed_mbps(interface_name: &str) -> u64 {
    #[cfg(target_os = "linux")]
    {
        let path = format!("/sys/class/net/{}/speed", interface_name);
        if let Ok(content) = std::fs::read_to_string(&path)
            && let Ok(mbps) = content.trim().parse::<i64>()
            && mbps > 0
        {
            return mbps as u64;
        }
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = interface_name;
    }
    0
}
