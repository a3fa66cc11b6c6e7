// ── Channel domain types ──

use std::fmt;

use serde::{Deserialize, Serialize};

/// Channel run state as reported by the encoder.
///
/// Unrecognized states are kept verbatim in [`Other`](Self::Other) so
/// newer firmware never fails a poll cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RunState {
    Starting,
    Running,
    Idle,
    Stopping,
    Stopped,
    Error,
    #[default]
    Unknown,
    Other(String),
}

impl RunState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Idle => "idle",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
            Self::Error => "error",
            Self::Unknown => "unknown",
            Self::Other(s) => s,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Starting | Self::Running)
    }
}

impl From<&str> for RunState {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "starting" => Self::Starting,
            "running" => Self::Running,
            "idle" => Self::Idle,
            "stopping" => Self::Stopping,
            "stopped" => Self::Stopped,
            "error" => Self::Error,
            "" | "unknown" => Self::Unknown,
            _ => Self::Other(s.trim().to_owned()),
        }
    }
}

impl From<String> for RunState {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<RunState> for String {
    fn from(state: RunState) -> Self {
        state.as_str().to_owned()
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Health of a channel's input or output.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LinkStatus {
    #[default]
    Unknown,
    Warning,
    Error,
    Ok,
}

impl LinkStatus {
    /// Parse a reported status, treating anything unrecognized as unknown.
    pub fn lenient(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.trim().parse().ok()).unwrap_or_default()
    }
}

/// Per-channel control commands, independent of API generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChannelCommand {
    Start,
    Stop,
    StartRecording,
    StopRecording,
    /// ECS only: let the channel finish its current segment before stopping.
    PrepareStop,
}

/// An encoder channel, as last observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    /// Name as sent by the encoder (may be percent-encoded).
    pub name: String,
    pub run_state: RunState,
    pub input_status: LinkStatus,
    pub input_info: String,
    pub output_status: LinkStatus,
    pub output_info: String,
    pub recording_armed: bool,
}

impl Channel {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            run_state: RunState::Unknown,
            input_status: LinkStatus::Unknown,
            input_info: String::new(),
            output_status: LinkStatus::Unknown,
            output_info: String::new(),
            recording_armed: false,
        }
    }

    /// Human-readable (percent-decoded) name.
    pub fn label(&self) -> String {
        decode_name(&self.name)
    }

    pub fn variables(&self) -> ChannelVariables {
        ChannelVariables::for_name(&self.name)
    }
}

/// Percent-decode a channel name, keeping the raw text if it does not
/// decode to valid UTF-8.
pub fn decode_name(raw: &str) -> String {
    urlencoding::decode(raw).map_or_else(|_| raw.to_owned(), std::borrow::Cow::into_owned)
}

/// Variable-name suffix for a channel: the decoded name with every
/// whitespace run collapsed to a single `_`.
pub fn variable_suffix(raw_name: &str) -> String {
    decode_name(raw_name)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// The six variable identifiers derived from one channel name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelVariables {
    pub state: String,
    pub input: String,
    pub input_info: String,
    pub output: String,
    pub output_info: String,
    pub armed: String,
}

impl ChannelVariables {
    pub fn for_name(raw_name: &str) -> Self {
        let n = variable_suffix(raw_name);
        Self {
            state: format!("state_{n}"),
            input: format!("input_{n}"),
            input_info: format!("input_info_{n}"),
            output: format!("output_{n}"),
            output_info: format!("output_info_{n}"),
            armed: format!("armed_{n}"),
        }
    }

    /// `(identifier, label)` pairs in catalog order.
    pub fn definitions(&self, channel_label: &str) -> [(String, String); 6] {
        [
            (self.state.clone(), format!("State of {channel_label}")),
            (self.input.clone(), format!("Input status of {channel_label}")),
            (self.input_info.clone(), format!("Input info of {channel_label}")),
            (self.output.clone(), format!("Output status of {channel_label}")),
            (self.output_info.clone(), format!("Output info of {channel_label}")),
            (self.armed.clone(), format!("Recording armed on {channel_label}")),
        ]
    }

    /// `(identifier, value)` pairs for the channel's current state.
    pub fn values(&self, channel: &Channel) -> [(String, String); 6] {
        [
            (self.state.clone(), channel.run_state.to_string()),
            (self.input.clone(), channel.input_status.to_string()),
            (self.input_info.clone(), channel.input_info.clone()),
            (self.output.clone(), channel.output_status.to_string()),
            (self.output_info.clone(), channel.output_info.clone()),
            (self.armed.clone(), channel.recording_armed.to_string()),
        ]
    }
}
