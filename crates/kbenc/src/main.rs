mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, CompletionsArgs};
use crate::error::CliError;

/// Crates whose events `-v` turns up. HTTP plumbing stays at `warn`
/// until `-vvv`.
const OWN_CRATES: &[&str] = &["kbenc", "kbenc_core", "kbenc_api", "kbenc_config"];

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&log_directives(cli.global.verbose, cli.global.quiet));

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Filter directives for the given `-v` count. `-q` keeps errors only.
fn log_directives(verbosity: u8, quiet: bool) -> String {
    let own = match (quiet, verbosity) {
        (true, _) => return "error".into(),
        (false, 0) => return "warn".into(),
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => return "trace".into(),
    };
    std::iter::once("warn".to_owned())
        .chain(OWN_CRATES.iter().map(|krate| format!("{krate}={own}")))
        .collect::<Vec<_>>()
        .join(",")
}

/// `RUST_LOG` wins over the flags when set.
fn init_tracing(directives: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_completions(args: &CompletionsArgs) {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "kbenc", &mut std::io::stdout());
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Local only: no encoder session
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),
        Command::Completions(args) => {
            print_completions(&args);
            Ok(())
        }

        cmd => {
            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &cli.global).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::log_directives;

    #[test]
    fn verbosity_scopes_to_own_crates() {
        assert_eq!(log_directives(0, false), "warn");
        assert_eq!(
            log_directives(1, false),
            "warn,kbenc=info,kbenc_core=info,kbenc_api=info,kbenc_config=info"
        );
        assert!(log_directives(2, false).contains("kbenc_api=debug"));
        assert_eq!(log_directives(3, false), "trace");
    }

    #[test]
    fn quiet_overrides_verbosity() {
        assert_eq!(log_directives(2, true), "error");
    }
}
