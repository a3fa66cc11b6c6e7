// ── Action dispatch ──
//
// Maps generation-independent channel commands onto REST calls. No
// response body is read; a failed call is logged and reported, never
// retried.

use futures_util::future::join_all;
use kbenc_api::SessionToken;
use kbenc_api::ecs::EcsCommand;
use kbenc_api::web::WebCommand;
use tracing::{debug, warn};

use crate::command::DispatchReport;
use crate::error::CoreError;
use crate::model::{ChannelCommand, DeviceRef};
use crate::session::EncoderClient;

fn web_command(command: ChannelCommand) -> Option<WebCommand> {
    match command {
        ChannelCommand::Start => Some(WebCommand::Start),
        ChannelCommand::Stop => Some(WebCommand::Stop),
        ChannelCommand::StartRecording => Some(WebCommand::StartRecording),
        ChannelCommand::StopRecording => Some(WebCommand::StopRecording),
        ChannelCommand::PrepareStop => None,
    }
}

fn ecs_command(command: ChannelCommand) -> EcsCommand {
    match command {
        ChannelCommand::Start => EcsCommand::StartChannel,
        ChannelCommand::Stop => EcsCommand::StopChannel,
        ChannelCommand::StartRecording => EcsCommand::StartRecord,
        ChannelCommand::StopRecording => EcsCommand::StopRecord,
        ChannelCommand::PrepareStop => EcsCommand::PrepareStop,
    }
}

/// Send one command to one channel.
pub async fn dispatch(
    client: &EncoderClient,
    session: &SessionToken,
    device: Option<&DeviceRef>,
    channel_id: &str,
    command: ChannelCommand,
) -> Result<(), CoreError> {
    debug!(channel_id, %command, "dispatching");
    match client {
        EncoderClient::Web(web) => {
            let cmd = web_command(command).ok_or_else(|| CoreError::Unsupported {
                operation: command.to_string(),
                required: "the ecs API".into(),
            })?;
            let device_id = device
                .and_then(|d| d.id.as_deref())
                .ok_or(CoreError::DeviceUnknown)?;
            web.control_channel(session, device_id, channel_id, cmd).await?;
        }
        EncoderClient::Ecs(ecs) => {
            ecs.invoke(session, channel_id, ecs_command(command)).await?;
        }
    }
    Ok(())
}

/// Send one command to each listed channel. Every call is made
/// regardless of earlier failures.
pub async fn dispatch_each(
    client: &EncoderClient,
    session: &SessionToken,
    device: Option<&DeviceRef>,
    channel_ids: &[String],
    command: ChannelCommand,
) -> DispatchReport {
    let results = join_all(
        channel_ids
            .iter()
            .map(|id| dispatch(client, session, device, id, command)),
    )
    .await;

    let mut report = DispatchReport {
        attempted: channel_ids.to_vec(),
        failed: Vec::new(),
    };
    for (id, result) in channel_ids.iter().zip(results) {
        if let Err(e) = result {
            warn!(channel_id = %id, %command, error = %e, "channel command failed");
            report.failed.push((id.clone(), e.to_string()));
        }
    }
    report
}
