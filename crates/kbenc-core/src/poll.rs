// ── Poll cycle ──
//
// Fetches one round of device state. Stage one (system, plus device
// discovery while the device id is unknown) must succeed before stage
// two (channels and statistics) is attempted. Each stage is joined
// all-or-nothing; the first error aborts the cycle.

use futures_util::future::try_join_all;
use kbenc_api::SessionToken;
use kbenc_api::ecs::models::EcsSummary;
use tracing::debug;

use crate::error::CoreError;
use crate::model::{Channel, DeviceRef, EncoderStats, SystemInfo};
use crate::session::EncoderClient;

/// Everything one successful cycle observed.
#[derive(Debug, Clone, Default)]
pub struct CycleSnapshot {
    /// Set when this cycle discovered the device.
    pub device: Option<DeviceRef>,
    pub system: SystemInfo,
    /// `None` when stage two did not run.
    pub channels: Option<Vec<Channel>>,
    pub stats: Option<EncoderStats>,
}

impl CycleSnapshot {
    /// Device-level variable values carried by this snapshot.
    pub fn device_values(&self) -> Vec<(String, String)> {
        let stats = self.stats.clone().unwrap_or_default();
        let pairs = [
            ("current_version", self.system.version.clone()),
            ("uptime", self.system.uptime.clone()),
            ("device_name", self.device.as_ref().and_then(|d| d.name.clone())),
            ("current_cpu_usage", stats.cpu),
            ("current_mem_usage", stats.memory),
            ("free_disk_space", stats.disk_free),
            ("total_disk_space", stats.disk_total),
            ("used_disk_space", stats.disk_used_percent),
            ("network_incoming", stats.network_incoming),
            ("network_outgoing", stats.network_outgoing),
        ];
        pairs
            .into_iter()
            .filter_map(|(id, value)| value.map(|v| (id.to_owned(), v)))
            .collect()
    }
}

/// Run one cycle. `device` is the device discovered earlier in this
/// connection lifetime, if any.
pub async fn fetch_cycle(
    client: &EncoderClient,
    session: &SessionToken,
    device: Option<&DeviceRef>,
) -> Result<CycleSnapshot, CoreError> {
    match client {
        EncoderClient::Web(web) => fetch_web(web, session, device).await,
        EncoderClient::Ecs(ecs) => fetch_ecs(ecs, session, device).await,
    }
}

async fn fetch_web(
    web: &kbenc_api::WebClient,
    session: &SessionToken,
    known: Option<&DeviceRef>,
) -> Result<CycleSnapshot, CoreError> {
    let known_id = known.and_then(|d| d.id.clone());

    // Stage one
    let (system, discovered) = if known_id.is_some() {
        (web.get_system(session).await?, None)
    } else {
        let (system, devices) =
            tokio::try_join!(web.get_system(session), web.list_devices(session))?;
        (system, devices.into_iter().next().map(DeviceRef::from))
    };

    let mut snapshot = CycleSnapshot {
        system: system.into(),
        ..CycleSnapshot::default()
    };

    let device_id = known_id.or_else(|| discovered.as_ref().and_then(|d| d.id.clone()));
    snapshot.device = discovered;

    // Stage two
    let Some(device_id) = device_id else {
        debug!("no encoder device reported yet");
        return Ok(snapshot);
    };
    let (channels, stats) = tokio::try_join!(
        web.list_channels(session, &device_id),
        web.get_statistics(session, &device_id),
    )?;
    snapshot.channels = Some(channels.into_iter().map(Channel::from).collect());
    snapshot.stats = Some(stats.into());
    Ok(snapshot)
}

async fn fetch_ecs(
    ecs: &kbenc_api::EcsClient,
    session: &SessionToken,
    known: Option<&DeviceRef>,
) -> Result<CycleSnapshot, CoreError> {
    // Stage one: a single summary document.
    let EcsSummary {
        system,
        device,
        channels: refs,
    } = ecs.get_summary(session).await?;

    let mut snapshot = CycleSnapshot {
        system: system.as_ref().map(SystemInfo::from).unwrap_or_default(),
        stats: system.as_ref().map(EncoderStats::from),
        device: if known.is_none() {
            Some(device.map(DeviceRef::from).unwrap_or_default())
        } else {
            None
        },
        channels: None,
    };

    // Stage two: one detail document per listed channel.
    let details = try_join_all(refs.iter().map(|r| ecs.get_channel(session, &r.id))).await?;
    snapshot.channels = Some(
        refs.into_iter()
            .zip(details)
            .map(Channel::from)
            .collect(),
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_values_skip_missing_readings() {
        let snapshot = CycleSnapshot {
            device: Some(DeviceRef {
                id: Some("d1".into()),
                name: Some("KB".into()),
            }),
            system: SystemInfo {
                version: Some("5.3 Build 1".into()),
                uptime: None,
            },
            channels: None,
            stats: Some(EncoderStats {
                cpu: Some("12".into()),
                ..EncoderStats::default()
            }),
        };

        let values = snapshot.device_values();
        assert!(values.contains(&("device_name".into(), "KB".into())));
        assert!(values.contains(&("current_cpu_usage".into(), "12".into())));
        assert!(!values.iter().any(|(id, _)| id == "uptime"));
    }
}
