// ── API-to-domain type conversions ──
//
// Bridges raw `kbenc_api` response types of both generations into the
// canonical `kbenc_core::model` types. Missing optional data becomes a
// default (unknown state, empty info line) rather than an error.

use kbenc_api::ecs::models::{EcsChannel, EcsChannelRef, EcsDevice, EcsSystem};
use kbenc_api::models::StreamStatus;
use kbenc_api::web::models::{WebChannel, WebDevice, WebStatistics, WebSystemInfo};

use crate::model::{Channel, DeviceRef, EncoderStats, LinkStatus, RunState, SystemInfo, format_uptime};

// ── Helpers ────────────────────────────────────────────────────────

fn link(status: Option<&StreamStatus>) -> (LinkStatus, String) {
    (
        LinkStatus::lenient(status.and_then(StreamStatus::status)),
        status
            .and_then(StreamStatus::info)
            .unwrap_or_default()
            .to_owned(),
    )
}

fn run_state(raw: Option<&str>) -> RunState {
    raw.map(RunState::from).unwrap_or_default()
}

// ── Web API ────────────────────────────────────────────────────────

impl From<WebChannel> for Channel {
    fn from(raw: WebChannel) -> Self {
        let (input_status, input_info) = link(raw.input.as_ref());
        let (output_status, output_info) = link(raw.output.as_ref());
        Channel {
            run_state: run_state(raw.state.as_deref()),
            recording_armed: raw.recording.as_deref() == Some("active"),
            input_status,
            input_info,
            output_status,
            output_info,
            id: raw.id,
            name: raw.name,
        }
    }
}

impl From<WebDevice> for DeviceRef {
    fn from(raw: WebDevice) -> Self {
        DeviceRef {
            id: Some(raw.id),
            name: raw.name,
        }
    }
}

impl From<WebSystemInfo> for SystemInfo {
    fn from(raw: WebSystemInfo) -> Self {
        SystemInfo {
            version: raw.version.map(|v| {
                format!(
                    "{} Build {}",
                    v.release.unwrap_or_default(),
                    v.build.unwrap_or_default()
                )
            }),
            uptime: raw
                .uptime
                .map(|u| format_uptime(u.days, u.hrs, u.mins, u.secs)),
        }
    }
}

impl From<WebStatistics> for EncoderStats {
    fn from(raw: WebStatistics) -> Self {
        let disk = raw.disk_space.unwrap_or_default();
        let network = raw.network.unwrap_or_default();
        EncoderStats {
            cpu: raw.cpu,
            memory: raw.memory,
            disk_free: disk.free,
            disk_total: disk.total,
            disk_used_percent: disk.used_percent,
            network_incoming: network.incoming,
            network_outgoing: network.outgoing,
        }
    }
}

// ── ECS API ────────────────────────────────────────────────────────

/// Merge a summary entry with its detail document. The summary is
/// authoritative for id and name.
impl From<(EcsChannelRef, EcsChannel)> for Channel {
    fn from((summary, detail): (EcsChannelRef, EcsChannel)) -> Self {
        let (input_status, input_info) = link(detail.input.as_ref());
        let (output_status, output_info) = link(detail.output.as_ref());
        Channel {
            recording_armed: detail.is_record_armed(),
            run_state: run_state(detail.state.as_deref()),
            name: summary
                .name
                .or(detail.name)
                .unwrap_or_else(|| summary.id.clone()),
            id: summary.id,
            input_status,
            input_info,
            output_status,
            output_info,
        }
    }
}

impl From<EcsDevice> for DeviceRef {
    fn from(raw: EcsDevice) -> Self {
        DeviceRef {
            id: raw.id,
            name: raw.name,
        }
    }
}

impl From<&EcsSystem> for SystemInfo {
    fn from(raw: &EcsSystem) -> Self {
        let uptime = raw.uptime.as_deref().map(|u| {
            u.parse::<u64>()
                .map_or_else(|_| u.to_owned(), SystemInfo::uptime_from_secs)
        });
        SystemInfo {
            version: raw.version.clone(),
            uptime,
        }
    }
}

impl From<&EcsSystem> for EncoderStats {
    fn from(raw: &EcsSystem) -> Self {
        EncoderStats {
            cpu: raw.cpu.clone(),
            memory: raw.memory.clone(),
            ..EncoderStats::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn web_channel_to_domain() {
        let raw: WebChannel = serde_json::from_value(json!({
            "_id": "c1",
            "name": "Cam1",
            "state": "running",
            "recording": "active",
            "input": { "status": "warning", "message": "no audio" },
            "output": "ok"
        }))
        .unwrap();

        let ch = Channel::from(raw);
        assert_eq!(ch.run_state, RunState::Running);
        assert!(ch.recording_armed);
        assert_eq!(ch.input_status, LinkStatus::Warning);
        assert_eq!(ch.input_info, "no audio");
        assert_eq!(ch.output_status, LinkStatus::Ok);
        assert_eq!(ch.output_info, "");
    }

    #[test]
    fn web_channel_without_state_is_unknown() {
        let raw: WebChannel = serde_json::from_value(json!({ "_id": "c2" })).unwrap();
        let ch = Channel::from(raw);
        assert_eq!(ch.run_state, RunState::Unknown);
        assert!(!ch.recording_armed);
    }

    #[test]
    fn web_system_formats_version_and_uptime() {
        let raw: WebSystemInfo = serde_json::from_value(json!({
            "version": { "release": "5.3.1", "build": 2201 },
            "uptime": { "days": 3, "hrs": 4, "mins": 5, "secs": 6 }
        }))
        .unwrap();
        let info = SystemInfo::from(raw);
        assert_eq!(info.version.as_deref(), Some("5.3.1 Build 2201"));
        assert_eq!(info.uptime.as_deref(), Some("3d4h5m6s"));
    }

    #[test]
    fn ecs_channel_prefers_summary_name() {
        let summary: EcsChannelRef =
            serde_json::from_value(json!({ "id": "7", "name": "Main" })).unwrap();
        let detail: EcsChannel =
            serde_json::from_value(json!({ "name": "ignored", "status": "idle" })).unwrap();
        let ch = Channel::from((summary, detail));
        assert_eq!(ch.id, "7");
        assert_eq!(ch.name, "Main");
        assert_eq!(ch.run_state, RunState::Idle);
    }
}
