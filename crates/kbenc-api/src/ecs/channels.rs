// ECS API summary and channel endpoints

use tracing::debug;

use crate::auth::SessionToken;
use crate::ecs::client::EcsClient;
use crate::ecs::models::{EcsChannel, EcsCommand, EcsInvoke, EcsSummary};
use crate::error::Error;
use crate::transport::decode;

impl EcsClient {
    /// Get the device/system/channel summary.
    ///
    /// `GET /ecs.json` — a `channels` member that is present but not an
    /// array is reported as [`Error::UnexpectedShape`].
    pub async fn get_summary(&self, session: &SessionToken) -> Result<EcsSummary, Error> {
        let url = self.endpoint(&["ecs.json"])?;
        debug!("fetching ecs summary");
        let mut value = self.get_value(session, url).await?;
        if let Some(obj) = value.as_object_mut() {
            if obj.get("channels").is_some_and(serde_json::Value::is_null) {
                obj.remove("channels");
            }
        }
        let channels_ok = value.get("channels").is_none_or(serde_json::Value::is_array);
        if !value.is_object() || !channels_ok {
            return Err(Error::UnexpectedShape {
                endpoint: "/ecs.json".into(),
                expected: "object with a channel array",
            });
        }
        decode(value)
    }

    /// Get one channel's state document.
    ///
    /// `GET /ecs/channels/{id}.json`
    pub async fn get_channel(&self, session: &SessionToken, channel_id: &str) -> Result<EcsChannel, Error> {
        let file = format!("{channel_id}.json");
        let url = self.endpoint(&["ecs", "channels", &file])?;
        debug!(channel_id, "fetching channel");
        self.get(session, url).await
    }

    /// Invoke a command on one channel.
    ///
    /// `PUT /ecs/channels/{id}.json` with `{invoke:{command, param}}`.
    pub async fn invoke(
        &self,
        session: &SessionToken,
        channel_id: &str,
        command: EcsCommand,
    ) -> Result<(), Error> {
        let file = format!("{channel_id}.json");
        let url = self.endpoint(&["ecs", "channels", &file])?;
        debug!(channel_id, %command, "invoking channel command");
        self.put(session, url, &EcsInvoke::new(command)).await
    }
}
