//! Command dispatch: bridges CLI args -> controller -> output formatting.

pub mod action;
pub mod channels;
pub mod config_cmd;
pub mod status;
pub mod util;
pub mod watch;

use std::time::Duration;

use crate::cli::{Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

/// Dispatch an encoder-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    let (profile_name, controller_config) = config::build_controller_config(global)?;
    let wait = Duration::from_secs(global.wait);

    tracing::debug!(profile = %profile_name, host = %controller_config.host, "resolved encoder");

    let result = match cmd {
        Command::Watch(args) => watch::handle(controller_config, args, global).await,
        Command::Channels(args) => channels::handle(controller_config, wait, args, global).await,
        Command::Status(args) => status::handle(controller_config, wait, args, global).await,
        Command::Action(args) => action::handle(controller_config, wait, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    };
    result.map_err(|e| e.for_profile(&profile_name))
}
