//! Clap derive structures for the `kbenc` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use kbenc_core::{ActionKind, ApiGeneration, LinkStatus};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// kbenc -- drive Haivision KB encoders from the command line
#[derive(Debug, Parser)]
#[command(
    name = "kbenc",
    version,
    about = "Monitor and control Haivision KB encoders",
    long_about = "Logs in to a KB encoder over its management API, polls system, \
        channel and statistics state, and starts or stops channels.\n\n\
        Both the web API (/api) and the ECS API (/ecs) generations are supported.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Encoder profile to use
    #[arg(long, short = 'p', env = "KBENC_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Encoder address: IP, hostname or URL (overrides profile)
    #[arg(long, short = 'H', env = "KBENC_HOST", global = true)]
    pub host: Option<String>,

    /// Management API generation (overrides profile)
    #[arg(long, env = "KBENC_API", global = true)]
    pub api: Option<ApiArg>,

    /// Login username (overrides profile)
    #[arg(long, short = 'u', global = true)]
    pub username: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "KBENC_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip certificate verification (the default unless a profile says otherwise)
    #[arg(long, short = 'k', env = "KBENC_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "KBENC_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Seconds to wait for the first poll cycle
    #[arg(long, default_value = "15", global = true)]
    pub wait: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ApiArg {
    /// Web API (/api/session, cookie sessions)
    Web,
    /// ECS API (/ecs/auth.json, header sessions)
    Ecs,
}

impl From<ApiArg> for ApiGeneration {
    fn from(arg: ApiArg) -> Self {
        match arg {
            ApiArg::Web => ApiGeneration::Web,
            ApiArg::Ecs => ApiGeneration::Ecs,
        }
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Stay connected and stream variable changes until interrupted
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// List and inspect encoder channels
    #[command(alias = "ch")]
    Channels(ChannelsArgs),

    /// Show connection status and device variables
    #[command(alias = "st")]
    Status(StatusArgs),

    /// Run a channel action (start, stop, arm recording, ...)
    #[command(alias = "a")]
    Action(ActionArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Poll interval override, e.g. "500ms" or "2s"
    #[arg(long)]
    pub interval: Option<String>,

    /// Only print variables whose id starts with this prefix
    #[arg(long)]
    pub filter: Option<String>,
}

// ── Channels ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ChannelsArgs {
    #[command(subcommand)]
    pub command: ChannelsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ChannelsCommand {
    /// List known channels
    #[command(alias = "ls")]
    List,

    /// Show one channel with its derived variables
    Get {
        /// Channel id or name
        channel: String,
    },

    /// Evaluate a feedback predicate against a channel
    ///
    /// Prints `true` or `false`; exits 1 when the predicate does not hold.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Channel id or name
    pub channel: String,

    #[command(flatten)]
    pub predicate: CheckPredicate,
}

#[derive(Debug, Args)]
#[group(required = false, multiple = false)]
pub struct CheckPredicate {
    /// Expected run state (default: running)
    #[arg(long)]
    pub state: Option<String>,

    /// Expected input status
    #[arg(long)]
    pub input_status: Option<StatusArg>,

    /// Expected output status
    #[arg(long)]
    pub output_status: Option<StatusArg>,

    /// Whether recording is armed
    #[arg(long)]
    pub armed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Unknown,
    Warning,
    Error,
    Ok,
}

impl From<StatusArg> for LinkStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Unknown => LinkStatus::Unknown,
            StatusArg::Warning => LinkStatus::Warning,
            StatusArg::Error => LinkStatus::Error,
            StatusArg::Ok => LinkStatus::Ok,
        }
    }
}

// ── Status ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Include every per-channel variable
    #[arg(long, short = 'a')]
    pub all: bool,
}

// ── Action ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ActionArgs {
    /// Action to run
    pub action: ActionArg,

    /// Channel id or name (required for single-channel actions)
    pub channel: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActionArg {
    /// Start one channel
    Start,
    /// Stop one channel
    Stop,
    /// Start every known channel
    StartAll,
    /// Stop every known channel
    StopAll,
    /// Arm recording on one channel
    Arm,
    /// Disarm recording on one channel
    Disarm,
    /// Prepare one channel to stop (ECS API only)
    PrepareStop,
}

impl From<ActionArg> for ActionKind {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Start => ActionKind::StartChannel,
            ActionArg::Stop => ActionKind::StopChannel,
            ActionArg::StartAll => ActionKind::StartChannelAll,
            ActionArg::StopAll => ActionKind::StopChannelAll,
            ActionArg::Arm => ActionKind::ArmRecording,
            ActionArg::Disarm => ActionKind::DisarmRecording,
            ActionArg::PrepareStop => ActionKind::PrepareStopChannel,
        }
    }
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Display the current configuration
    Show,

    /// Print the configuration file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set a value on the active profile
    Set {
        /// Key: host, api, username, password_env, insecure, ca_cert, timeout, poll_interval
        key: String,
        /// New value
        value: String,
    },

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Store a profile's password in the system keyring
    SetPassword {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
