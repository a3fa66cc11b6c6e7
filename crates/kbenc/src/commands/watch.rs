//! Watch handler: stay connected and print variable changes as the poll
//! loop publishes them.

use futures_util::StreamExt;
use serde::Serialize;

use kbenc_core::surface::VariableValues;
use kbenc_core::{ConnectionStatus, Controller, ControllerConfig};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Debug, PartialEq, Eq, Serialize)]
struct Change {
    id: String,
    value: String,
}

/// Entries of `next` that are new or differ from `prev`, in publish order.
fn diff(prev: &VariableValues, next: &VariableValues, filter: Option<&str>) -> Vec<Change> {
    next.iter()
        .filter(|(id, _)| filter.is_none_or(|f| id.starts_with(f)))
        .filter(|(id, value)| prev.get(*id) != Some(*value))
        .map(|(id, value)| Change {
            id: id.clone(),
            value: value.clone(),
        })
        .collect()
}

fn render_change(change: &Change, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Json | OutputFormat::JsonCompact => {
            #[derive(Serialize)]
            struct Line<'a> {
                at: String,
                #[serde(flatten)]
                change: &'a Change,
            }
            output::render_json(
                &Line {
                    at: chrono::Local::now().to_rfc3339(),
                    change,
                },
                true,
            )
        }
        OutputFormat::Plain => Ok(format!("{}={}", change.id, change.value)),
        OutputFormat::Table | OutputFormat::Yaml => Ok(format!(
            "{} {} = {}",
            chrono::Local::now().format("%H:%M:%S"),
            change.id,
            change.value
        )),
    }
}

pub async fn handle(
    config: ControllerConfig,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let config = config::with_poll_interval(config, args.interval.as_deref())?;
    let color = output::should_color(global.color);
    let filter = args.filter.as_deref();

    let controller = Controller::new(config);
    let mut status = controller.surface().subscribe_status();
    let mut values = controller.surface().values().into_stream();
    controller.connect().await;

    let mut prev = VariableValues::default();
    let result = loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break Ok(()),

            changed = status.changed() => {
                if changed.is_err() {
                    break Err(CliError::Disconnected);
                }
                let now = *status.borrow_and_update();
                let detail = match (now, controller.surface().last_error()) {
                    (ConnectionStatus::Error, Some(reason)) => format!(" ({reason})"),
                    _ => String::new(),
                };
                if !global.quiet {
                    eprintln!("status: {}{detail}", output::paint_status(now, color));
                }
                if now == ConnectionStatus::BadConfig {
                    break Err(CliError::Validation {
                        field: "config".into(),
                        reason: "host, username and password are required".into(),
                    });
                }
            }

            next = values.next() => {
                let Some(next) = next else {
                    break Err(CliError::Disconnected);
                };
                let rendered: Result<Vec<String>, CliError> = diff(&prev, &next, filter)
                    .iter()
                    .map(|change| render_change(change, global.output))
                    .collect();
                match rendered {
                    Ok(lines) => lines.iter().for_each(|l| output::print_output(l, global.quiet)),
                    Err(e) => break Err(e),
                }
                prev = next;
            }
        }
    };

    controller.disconnect().await;
    result
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use indexmap::IndexMap;

    use super::*;

    fn values(pairs: &[(&str, &str)]) -> VariableValues {
        Arc::new(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect::<IndexMap<_, _>>(),
        )
    }

    #[test]
    fn diff_reports_new_and_changed_only() {
        let prev = values(&[("state_Cam1", "running"), ("uptime", "0d0h0m1s")]);
        let next = values(&[
            ("state_Cam1", "idle"),
            ("uptime", "0d0h0m1s"),
            ("state_Cam2", "running"),
        ]);
        let changes = diff(&prev, &next, None);
        assert_eq!(
            changes,
            vec![
                Change {
                    id: "state_Cam1".into(),
                    value: "idle".into()
                },
                Change {
                    id: "state_Cam2".into(),
                    value: "running".into()
                },
            ]
        );
    }

    #[test]
    fn diff_honours_prefix_filter() {
        let next = values(&[("state_Cam1", "idle"), ("uptime", "1d0h0m0s")]);
        let changes = diff(&VariableValues::default(), &next, Some("state_"));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].id, "state_Cam1");
    }

    #[test]
    fn plain_change_is_key_value() {
        let change = Change {
            id: "uptime".into(),
            value: "1d0h0m0s".into(),
        };
        assert_eq!(
            render_change(&change, OutputFormat::Plain).ok().as_deref(),
            Some("uptime=1d0h0m0s")
        );
    }
}
