//! Status handler: connection status plus the published variables.

use std::time::Duration;

use serde::Serialize;
use tabled::Tabled;

use kbenc_core::surface::BASELINE_VARIABLES;
use kbenc_core::{ConnectionStatus, ControllerConfig};

use crate::cli::{GlobalOpts, OutputFormat, StatusArgs};
use crate::error::CliError;
use crate::output;

use super::util::with_encoder;

#[derive(Debug, Serialize)]
struct StatusReport {
    status: ConnectionStatus,
    host: String,
    channels: usize,
    variables: Vec<VariableRow>,
}

#[derive(Debug, Clone, Serialize, Tabled)]
struct VariableRow {
    #[tabled(rename = "Variable")]
    id: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn is_device_variable(id: &str) -> bool {
    BASELINE_VARIABLES.iter().any(|(baseline, _)| *baseline == id)
}

pub async fn handle(
    config: ControllerConfig,
    wait: Duration,
    args: StatusArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let host = config.host.clone();
    let report = with_encoder(config, wait, |c| async move {
        let surface = c.surface();
        let values = surface.values().latest();
        let variables = surface
            .variables()
            .latest()
            .iter()
            .filter(|def| args.all || is_device_variable(&def.id))
            .map(|def| VariableRow {
                id: def.id.clone(),
                label: def.label.clone(),
                value: values.get(&def.id).cloned().unwrap_or_default(),
            })
            .collect();

        Ok(StatusReport {
            status: c.status(),
            host,
            channels: c.channels().len(),
            variables,
        })
    })
    .await?;

    let color = output::should_color(global.color);
    let out = match global.output {
        OutputFormat::Table => {
            let header = output::detail_lines(&[
                ("Encoder", report.host.clone()),
                ("Status", output::paint_status(report.status, color)),
                ("Channels", report.channels.to_string()),
            ]);
            let table = output::render_list(
                OutputFormat::Table,
                &report.variables,
                VariableRow::clone,
                |v| v.id.clone(),
            )?;
            format!("{header}\n\n{table}")
        }
        OutputFormat::Plain => report
            .variables
            .iter()
            .map(|v| format!("{}={}", v.id, v.value))
            .collect::<Vec<_>>()
            .join("\n"),
        format => output::render_single(format, &report, |_| String::new(), |_| String::new())?,
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
