//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use kbenc_config::ConfigError;
use kbenc_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const PARTIAL: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to encoder at {url}")]
    #[diagnostic(
        code(kbenc::connection_failed),
        help(
            "Check that the encoder is reachable and the host is correct.\n\
             {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Lost the encoder session")]
    #[diagnostic(
        code(kbenc::disconnected),
        help("The session was dropped while the command ran. Try again.")
    )]
    Disconnected,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(kbenc::auth_failed),
        help(
            "Verify the username and password.\n\
             Run: kbenc config set-password --profile {profile}"
        )
    )]
    AuthFailed { message: String, profile: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(kbenc::no_credentials),
        help(
            "Configure credentials with: kbenc config init\n\
             Or set KBENC_USERNAME and KBENC_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Channels ─────────────────────────────────────────────────────
    #[error("Channel '{identifier}' not found")]
    #[diagnostic(
        code(kbenc::channel_not_found),
        help("Run: kbenc channels list to see available channels")
    )]
    ChannelNotFound { identifier: String },

    #[error("{failed} of {attempted} requests failed")]
    #[diagnostic(code(kbenc::partial_failure), help("{details}"))]
    PartialFailure {
        attempted: usize,
        failed: usize,
        details: String,
    },

    #[error("Feedback does not hold")]
    #[diagnostic(code(kbenc::check_failed))]
    CheckFailed,

    #[error("The encoder did not report its device id")]
    #[diagnostic(
        code(kbenc::device_unknown),
        help("Channel commands need the device id from /api/devices. Try again once polling succeeds.")
    )]
    DeviceUnknown,

    // ── API ──────────────────────────────────────────────────────────
    #[error("Encoder API error: {message}")]
    #[diagnostic(code(kbenc::api_error))]
    ApiError { message: String },

    #[error("Operation '{operation}' is not supported")]
    #[diagnostic(code(kbenc::unsupported), help("This action requires {required}."))]
    Unsupported { operation: String, required: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(kbenc::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(kbenc::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: kbenc config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No encoder configured")]
    #[diagnostic(
        code(kbenc::no_config),
        help(
            "Create a profile with: kbenc config init\n\
             Or pass --host and --username. Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(kbenc::config))]
    Config(ConfigError),

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Timed out after {seconds}s waiting for {what}")]
    #[diagnostic(
        code(kbenc::timeout),
        help("Increase --wait, or check that the encoder responds.")
    )]
    Timeout { what: String, seconds: u64 },

    #[error("Encoder request timed out")]
    #[diagnostic(code(kbenc::request_timeout), help("Increase --timeout."))]
    RequestTimeout,

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    #[diagnostic(code(kbenc::serialization))]
    Serialization(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Disconnected => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::ChannelNotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::PartialFailure { .. } => exit_code::PARTIAL,
            Self::Timeout { .. } | Self::RequestTimeout => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NoConfig { .. } => exit_code::USAGE,
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            _ => exit_code::GENERAL,
        }
    }

    /// Fill in the profile name for credential-related errors.
    #[must_use]
    pub fn for_profile(self, name: &str) -> Self {
        match self {
            Self::AuthFailed { message, .. } => Self::AuthFailed {
                message,
                profile: name.into(),
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                message,
                profile: "default".into(),
            },

            CoreError::Disconnected => CliError::Disconnected,

            CoreError::Timeout => CliError::RequestTimeout,

            CoreError::WaitTimeout { what, secs } => CliError::Timeout {
                what: what.into(),
                seconds: secs,
            },

            CoreError::DeviceUnknown => CliError::DeviceUnknown,

            CoreError::Protocol { endpoint, expected } => CliError::ApiError {
                message: format!("unexpected response from {endpoint}: expected {expected}"),
            },

            CoreError::Unsupported {
                operation,
                required,
            } => CliError::Unsupported {
                operation,
                required,
            },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Api { message, status } => CliError::ApiError {
                message: match status {
                    Some(code) => format!("HTTP {code}: {message}"),
                    None => message,
                },
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_exit_with_auth_code() {
        let err = CliError::from(CoreError::AuthenticationFailed {
            message: "HTTP 403".into(),
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }

    #[test]
    fn wait_timeout_keeps_duration() {
        let err = CliError::from(CoreError::WaitTimeout {
            what: "the first poll cycle",
            secs: 15,
        });
        assert_eq!(err.exit_code(), exit_code::TIMEOUT);
        assert_eq!(
            err.to_string(),
            "Timed out after 15s waiting for the first poll cycle"
        );
    }

    #[test]
    fn missing_credentials_map_from_config() {
        let err = CliError::from(ConfigError::NoCredentials {
            profile: "studio".into(),
        });
        assert!(matches!(err, CliError::NoCredentials { ref profile } if profile == "studio"));
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }
}
