//! Shared helpers for command handlers.

use std::sync::Arc;
use std::time::Duration;

use kbenc_core::{Channel, Controller, ControllerConfig};

use crate::error::CliError;

/// Connect, wait for the first successful poll cycle, run `f`, then
/// disconnect.
pub async fn with_encoder<F, Fut, T>(
    config: ControllerConfig,
    wait: Duration,
    f: F,
) -> Result<T, CliError>
where
    F: FnOnce(Controller) -> Fut,
    Fut: Future<Output = Result<T, CliError>>,
{
    Controller::oneshot(config, wait, |controller| async move { Ok(f(controller).await) }).await?
}

/// Resolve a channel by id, then by display name, then by raw name.
pub fn resolve_channel(
    channels: &[Arc<Channel>],
    identifier: &str,
) -> Result<Arc<Channel>, CliError> {
    channels
        .iter()
        .find(|c| c.id == identifier)
        .or_else(|| channels.iter().find(|c| c.label() == identifier))
        .or_else(|| channels.iter().find(|c| c.name == identifier))
        .cloned()
        .ok_or_else(|| CliError::ChannelNotFound {
            identifier: identifier.into(),
        })
}
