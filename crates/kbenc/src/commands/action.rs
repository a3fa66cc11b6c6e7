//! Action handler: one channel command, or a command fanned out to every
//! known channel.

use std::time::Duration;

use kbenc_core::{Action, ActionKind, ControllerConfig, DispatchReport};

use crate::cli::{ActionArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util::{resolve_channel, with_encoder};

fn summary(kind: ActionKind, report: &DispatchReport) -> String {
    let mut lines = vec![format!(
        "{}: {} of {} request(s) succeeded",
        kind.label(),
        report.succeeded(),
        report.attempted.len()
    )];
    lines.extend(
        report
            .failed
            .iter()
            .map(|(channel, reason)| format!("  {channel}: {reason}")),
    );
    lines.join("\n")
}

pub async fn handle(
    config: ControllerConfig,
    wait: Duration,
    args: ActionArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let kind = ActionKind::from(args.action);
    if !kind.supported_by(config.api) {
        return Err(CliError::Unsupported {
            operation: kind.to_string(),
            required: "the ECS API (--api ecs)".into(),
        });
    }
    if kind.takes_channel() && args.channel.is_none() {
        return Err(CliError::Validation {
            field: "channel".into(),
            reason: format!("{kind} needs a channel id or name"),
        });
    }

    let report = with_encoder(config, wait, |c| async move {
        let channel_id = match args.channel {
            Some(ref ident) if kind.takes_channel() => {
                Some(resolve_channel(&c.channels(), ident)?.id.clone())
            }
            _ => None,
        };
        let action = Action::new(kind, channel_id.as_deref())?;
        tracing::info!(?action, "dispatching");
        Ok(c.execute(action).await?)
    })
    .await?;

    let out = output::render_single(
        global.output,
        &report,
        |r| summary(kind, r),
        |r| r.attempted.join("\n"),
    )?;
    output::print_output(&out, global.quiet);

    if report.is_success() {
        Ok(())
    } else {
        Err(CliError::PartialFailure {
            attempted: report.attempted.len(),
            failed: report.failed.len(),
            details: report
                .failed
                .iter()
                .map(|(channel, reason)| format!("{channel}: {reason}"))
                .collect::<Vec<_>>()
                .join("\n"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_failures() {
        let report = DispatchReport {
            attempted: vec!["c1".into(), "c2".into(), "c3".into()],
            failed: vec![("c1".into(), "HTTP 500".into())],
        };
        let text = summary(ActionKind::StopChannelAll, &report);
        assert!(text.starts_with("Stop All Channels: 2 of 3 request(s) succeeded"));
        assert!(text.contains("c1: HTTP 500"));
    }
}
