//! Channel command handlers.

use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use serde::Serialize;
use tabled::Tabled;

use kbenc_core::{Channel, ControllerConfig, Feedback, RunState};

use crate::cli::{ChannelsArgs, ChannelsCommand, CheckArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util::{resolve_channel, with_encoder};

// ── Table rows ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ChannelRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Input")]
    input: String,
    #[tabled(rename = "Output")]
    output: String,
    #[tabled(rename = "Armed")]
    armed: String,
}

fn channel_row(ch: &Channel, color: bool) -> ChannelRow {
    ChannelRow {
        id: ch.id.clone(),
        name: ch.label(),
        state: output::paint_run_state(&ch.run_state, color),
        input: output::paint_link(ch.input_status, color),
        output: output::paint_link(ch.output_status, color),
        armed: if ch.recording_armed { "yes" } else { "no" }.into(),
    }
}

/// A channel together with its derived variables.
#[derive(Serialize)]
struct ChannelDetail {
    #[serde(flatten)]
    channel: Channel,
    label: String,
    variables: IndexMap<String, String>,
}

impl ChannelDetail {
    fn new(channel: &Channel) -> Self {
        Self {
            label: channel.label(),
            variables: channel.variables().values(channel).into_iter().collect(),
            channel: channel.clone(),
        }
    }
}

fn detail(d: &ChannelDetail, color: bool) -> String {
    let ch = &d.channel;
    let mut pairs = vec![
        ("ID", ch.id.clone()),
        ("Name", d.label.clone()),
        ("State", output::paint_run_state(&ch.run_state, color)),
        ("Input", output::paint_link(ch.input_status, color)),
        ("Input info", ch.input_info.clone()),
        ("Output", output::paint_link(ch.output_status, color)),
        ("Output info", ch.output_info.clone()),
        ("Recording armed", ch.recording_armed.to_string()),
    ];
    pairs.extend(d.variables.iter().map(|(k, v)| (k.as_str(), v.clone())));
    output::detail_lines(&pairs)
}

// ── Feedback predicate ───────────────────────────────────────────────

fn feedback_for(args: &CheckArgs, channel_id: &str) -> Feedback {
    let channel = channel_id.to_owned();
    let p = &args.predicate;
    if p.armed {
        Feedback::RecordingArmed { channel }
    } else if let Some(status) = p.input_status {
        Feedback::InputStatus {
            channel,
            status: status.into(),
        }
    } else if let Some(status) = p.output_status {
        Feedback::OutputStatus {
            channel,
            status: status.into(),
        }
    } else if let Some(ref state) = p.state {
        Feedback::ChannelState {
            channel,
            state: RunState::from(state.as_str()),
        }
    } else {
        Feedback::channel_running(channel)
    }
}

// ── Handler ──────────────────────────────────────────────────────────

pub async fn handle(
    config: ControllerConfig,
    wait: Duration,
    args: ChannelsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(global.color);

    match args.command {
        ChannelsCommand::List => {
            let snapshot = with_encoder(config, wait, |c| async move { Ok(c.channels()) }).await?;
            let channels: Vec<Channel> = snapshot.iter().map(|c| Channel::clone(c)).collect();
            let out = output::render_list(
                global.output,
                &channels,
                |ch| channel_row(ch, color),
                |ch| ch.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ChannelsCommand::Get { channel } => {
            let found = with_encoder(config, wait, |c| async move {
                resolve_channel(&c.channels(), &channel)
            })
            .await?;
            let d = ChannelDetail::new(&found);
            let out = output::render_single(global.output, &d, |d| detail(d, color), |d| {
                d.channel.id.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ChannelsCommand::Check(args) => {
            let holds = with_encoder(config, wait, |c| async move {
                let found: Arc<Channel> = resolve_channel(&c.channels(), &args.channel)?;
                let feedback = feedback_for(&args, &found.id);
                tracing::debug!(?feedback, "evaluating feedback");
                Ok(c.check(&feedback))
            })
            .await?;
            output::print_output(&holds.to_string(), global.quiet);
            if holds {
                Ok(())
            } else {
                Err(CliError::CheckFailed)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use kbenc_core::LinkStatus;

    use super::*;
    use crate::cli::{Cli, Command};

    fn check_args(argv: &[&str]) -> CheckArgs {
        let mut full = vec!["kbenc", "channels", "check", "c1"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Channels(ChannelsArgs {
                command: ChannelsCommand::Check(args),
            }) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn default_check_is_running() {
        let fb = feedback_for(&check_args(&[]), "c1");
        assert_eq!(fb, Feedback::channel_running("c1"));
    }

    #[test]
    fn explicit_predicates_map_to_feedbacks() {
        assert_eq!(
            feedback_for(&check_args(&["--state", "idle"]), "c1"),
            Feedback::ChannelState {
                channel: "c1".into(),
                state: RunState::Idle,
            }
        );
        assert_eq!(
            feedback_for(&check_args(&["--output-status", "error"]), "c1"),
            Feedback::OutputStatus {
                channel: "c1".into(),
                status: LinkStatus::Error,
            }
        );
        assert_eq!(
            feedback_for(&check_args(&["--armed"]), "c1"),
            Feedback::RecordingArmed {
                channel: "c1".into()
            }
        );
    }

    #[test]
    fn predicates_are_mutually_exclusive() {
        let parsed = Cli::try_parse_from([
            "kbenc", "channels", "check", "c1", "--armed", "--state", "idle",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn detail_lists_derived_variables() {
        let mut ch = Channel::new("c1", "My Channel");
        ch.run_state = RunState::Running;
        let text = detail(&ChannelDetail::new(&ch), false);
        assert!(text.contains("state_My_Channel"));
        assert!(text.contains("running"));
    }
}
