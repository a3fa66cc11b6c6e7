// Web API encoder endpoints
//
// Everything under `/api/kulabyte/{deviceId}`: the channel list, encoder
// statistics, and per-channel control commands.

use tracing::{debug, warn};

use crate::auth::SessionToken;
use crate::error::Error;
use crate::web::client::WebClient;
use crate::web::models::{WebChannel, WebStatistics};

/// Channel control commands accepted by the web API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum WebCommand {
    #[strum(serialize = "start")]
    Start,
    #[strum(serialize = "stop")]
    Stop,
    #[strum(serialize = "recording/start")]
    StartRecording,
    #[strum(serialize = "recording/stop")]
    StopRecording,
}

impl WebCommand {
    /// Path segments appended after `/channels/{channelId}`.
    pub fn segments(self) -> &'static [&'static str] {
        match self {
            Self::Start => &["start"],
            Self::Stop => &["stop"],
            Self::StartRecording => &["recording", "start"],
            Self::StopRecording => &["recording", "stop"],
        }
    }
}

impl WebClient {
    /// List the encoder's channels.
    ///
    /// `GET /api/kulabyte/{deviceId}/channels` — a JSON array; anything
    /// else is a protocol violation reported as [`Error::UnexpectedShape`].
    /// Null or malformed entries inside the array are logged and skipped.
    pub async fn list_channels(
        &self,
        session: &SessionToken,
        device_id: &str,
    ) -> Result<Vec<WebChannel>, Error> {
        let url = self.fresh_endpoint(&["api", "kulabyte", device_id, "channels"])?;
        debug!(device_id, "listing channels");
        let serde_json::Value::Array(entries) = self.get_value(session, url).await? else {
            return Err(Error::UnexpectedShape {
                endpoint: format!("/api/kulabyte/{device_id}/channels"),
                expected: "array of channels",
            });
        };
        Ok(entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                if entry.is_null() {
                    warn!(device_id, index, "skipping null channel entry");
                    return None;
                }
                serde_json::from_value::<WebChannel>(entry)
                    .inspect_err(|e| {
                        warn!(device_id, index, error = %e, "skipping malformed channel entry");
                    })
                    .ok()
            })
            .collect())
    }

    /// Get CPU, memory, disk and network statistics.
    ///
    /// `GET /api/kulabyte/{deviceId}/encoder/statistics`
    pub async fn get_statistics(
        &self,
        session: &SessionToken,
        device_id: &str,
    ) -> Result<WebStatistics, Error> {
        let url = self.fresh_endpoint(&["api", "kulabyte", device_id, "encoder", "statistics"])?;
        debug!(device_id, "fetching encoder statistics");
        self.get(session, url).await
    }

    /// Send a control command to one channel.
    ///
    /// `POST /api/kulabyte/{deviceId}/channels/{channelId}/{command}`
    /// The response body is not inspected.
    pub async fn control_channel(
        &self,
        session: &SessionToken,
        device_id: &str,
        channel_id: &str,
        command: WebCommand,
    ) -> Result<(), Error> {
        let mut segments = vec!["api", "kulabyte", device_id, "channels", channel_id];
        segments.extend_from_slice(command.segments());
        let url = self.endpoint(&segments)?;
        debug!(device_id, channel_id, %command, "controlling channel");
        self.post_empty(session, url).await
    }
}

#[cfg(test)]
mod tests {
    use super::WebCommand;

    #[test]
    fn recording_commands_span_two_segments() {
        assert_eq!(WebCommand::StartRecording.segments(), ["recording", "start"]);
        assert_eq!(WebCommand::StopRecording.to_string(), "recording/stop");
        assert_eq!(WebCommand::Stop.segments(), ["stop"]);
    }
}
