// ── Boolean feedbacks ──
//
// Predicates a host evaluates against the current channel set whenever
// the surface bumps its feedback generation.

use serde::{Deserialize, Serialize};

use crate::model::{Channel, LinkStatus, RunState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Feedback {
    ChannelState {
        channel: String,
        #[serde(default = "default_expected_state")]
        state: RunState,
    },
    InputStatus {
        channel: String,
        status: LinkStatus,
    },
    OutputStatus {
        channel: String,
        status: LinkStatus,
    },
    RecordingArmed {
        channel: String,
    },
}

fn default_expected_state() -> RunState {
    RunState::Running
}

impl Feedback {
    /// `channel_state` with the default expectation (`running`).
    pub fn channel_running(channel: impl Into<String>) -> Self {
        Self::ChannelState {
            channel: channel.into(),
            state: default_expected_state(),
        }
    }

    pub fn channel_id(&self) -> &str {
        match self {
            Self::ChannelState { channel, .. }
            | Self::InputStatus { channel, .. }
            | Self::OutputStatus { channel, .. }
            | Self::RecordingArmed { channel } => channel,
        }
    }

    /// Evaluate against the referenced channel; `None` (unknown channel)
    /// is always false.
    pub fn evaluate(&self, channel: Option<&Channel>) -> bool {
        let Some(ch) = channel else {
            return false;
        };
        match self {
            Self::ChannelState { state, .. } => ch.run_state == *state,
            Self::InputStatus { status, .. } => ch.input_status == *status,
            Self::OutputStatus { status, .. } => ch.output_status == *status,
            Self::RecordingArmed { .. } => ch.recording_armed,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cam() -> Channel {
        let mut ch = Channel::new("c1", "Cam1");
        ch.run_state = RunState::Running;
        ch.output_status = LinkStatus::Error;
        ch
    }

    #[test]
    fn unknown_channel_is_false() {
        assert!(!Feedback::channel_running("missing").evaluate(None));
        assert!(!Feedback::RecordingArmed { channel: "missing".into() }.evaluate(None));
    }

    #[test]
    fn predicates_compare_current_state() {
        let ch = cam();
        assert!(Feedback::channel_running("c1").evaluate(Some(&ch)));
        assert!(
            !Feedback::ChannelState { channel: "c1".into(), state: RunState::Idle }
                .evaluate(Some(&ch))
        );
        assert!(
            Feedback::OutputStatus { channel: "c1".into(), status: LinkStatus::Error }
                .evaluate(Some(&ch))
        );
        assert!(!Feedback::RecordingArmed { channel: "c1".into() }.evaluate(Some(&ch)));
    }

    #[test]
    fn channel_state_defaults_to_running() {
        let fb: Feedback =
            serde_json::from_str(r#"{"type":"channel_state","channel":"c1"}"#).unwrap();
        assert_eq!(fb, Feedback::channel_running("c1"));
    }
}
