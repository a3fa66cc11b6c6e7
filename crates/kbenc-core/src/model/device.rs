// ── Device-level domain types ──

use serde::{Deserialize, Serialize};

/// The encoder device a session talks to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRef {
    /// Required by the web API to address channels; optional on ECS.
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Firmware and uptime summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub version: Option<String>,
    pub uptime: Option<String>,
}

/// Encoder resource statistics, kept in the textual form the device
/// reports them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderStats {
    pub cpu: Option<String>,
    pub memory: Option<String>,
    pub disk_free: Option<String>,
    pub disk_total: Option<String>,
    pub disk_used_percent: Option<String>,
    pub network_incoming: Option<String>,
    pub network_outgoing: Option<String>,
}

/// `1d2h3m4s`
pub fn format_uptime(days: u64, hrs: u64, mins: u64, secs: u64) -> String {
    format!("{days}d{hrs}h{mins}m{secs}s")
}

impl SystemInfo {
    /// Uptime from a plain second count.
    pub fn uptime_from_secs(total: u64) -> String {
        format_uptime(total / 86_400, total % 86_400 / 3600, total % 3600 / 60, total % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_formats() {
        assert_eq!(format_uptime(1, 2, 3, 4), "1d2h3m4s");
        assert_eq!(SystemInfo::uptime_from_secs(93_784), "1d2h3m4s");
        assert_eq!(SystemInfo::uptime_from_secs(59), "0d0h0m59s");
    }
}
