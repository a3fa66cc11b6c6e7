// ── Host-facing actions ──
//
// The action vocabulary a host presents to its user, and the report
// returned after dispatching one.

use kbenc_api::ApiGeneration;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::ChannelCommand;
use crate::surface::PLACEHOLDER_CHOICE_ID;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    StartChannel,
    StopChannel,
    StartChannelAll,
    StopChannelAll,
    ArmRecording,
    DisarmRecording,
    /// ECS only.
    PrepareStopChannel,
}

impl ActionKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::StartChannel => "Start a Channel",
            Self::StopChannel => "Stop a Channel",
            Self::StartChannelAll => "Start All Channels",
            Self::StopChannelAll => "Stop All Channels",
            Self::ArmRecording => "Arm Recording",
            Self::DisarmRecording => "Disarm Recording",
            Self::PrepareStopChannel => "Prepare to Stop a Channel",
        }
    }

    pub fn takes_channel(self) -> bool {
        !matches!(self, Self::StartChannelAll | Self::StopChannelAll)
    }

    pub fn command(self) -> ChannelCommand {
        match self {
            Self::StartChannel | Self::StartChannelAll => ChannelCommand::Start,
            Self::StopChannel | Self::StopChannelAll => ChannelCommand::Stop,
            Self::ArmRecording => ChannelCommand::StartRecording,
            Self::DisarmRecording => ChannelCommand::StopRecording,
            Self::PrepareStopChannel => ChannelCommand::PrepareStop,
        }
    }

    pub fn supported_by(self, api: ApiGeneration) -> bool {
        self != Self::PrepareStopChannel || api == ApiGeneration::Ecs
    }
}

/// One entry of the published action catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDefinition {
    pub id: ActionKind,
    pub label: String,
    /// Whether the action carries a `channel` option.
    pub channel_option: bool,
}

/// The actions offered for an API generation.
pub fn action_catalog(api: ApiGeneration) -> Vec<ActionDefinition> {
    use strum::IntoEnumIterator;

    ActionKind::iter()
        .filter(|kind| kind.supported_by(api))
        .map(|kind| ActionDefinition {
            id: kind,
            label: kind.label().to_owned(),
            channel_option: kind.takes_channel(),
        })
        .collect()
}

/// A fully specified action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// One channel.
    Channel {
        command: ChannelCommand,
        channel: String,
    },
    /// Every known channel, one independent call each.
    AllChannels { command: ChannelCommand },
}

impl Action {
    /// Build an action from its catalog id and selected channel.
    pub fn new(kind: ActionKind, channel: Option<&str>) -> Result<Self, CoreError> {
        if !kind.takes_channel() {
            return Ok(Self::AllChannels {
                command: kind.command(),
            });
        }
        match channel {
            Some(id) if !id.is_empty() && id != PLACEHOLDER_CHOICE_ID => Ok(Self::Channel {
                command: kind.command(),
                channel: id.to_owned(),
            }),
            _ => Err(CoreError::ValidationFailed {
                message: format!("{kind} needs a channel"),
            }),
        }
    }

    pub fn command(&self) -> ChannelCommand {
        match self {
            Self::Channel { command, .. } | Self::AllChannels { command } => *command,
        }
    }
}

/// Outcome of dispatching an action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    /// Channel ids a request was sent for.
    pub attempted: Vec<String>,
    /// `(channel id, error message)` for every failed request.
    pub failed: Vec<(String, String)>,
}

impl DispatchReport {
    pub fn succeeded(&self) -> usize {
        self.attempted.len() - self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}
