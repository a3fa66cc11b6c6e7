// ── Core error types ──
//
// User-facing errors from kbenc-core. Consumers never see raw HTTP
// status codes or JSON failures; `From<kbenc_api::Error>` translates
// transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to encoder at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Not connected to an encoder")]
    Disconnected,

    #[error("Encoder request timed out")]
    Timeout,

    #[error("Timed out after {secs}s waiting for {what}")]
    WaitTimeout { what: &'static str, secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Encoder device id is not known yet")]
    DeviceUnknown,

    #[error("Unexpected response from {endpoint}: expected {expected}")]
    Protocol {
        endpoint: String,
        expected: &'static str,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Operation not supported: {operation} (requires {required})")]
    Unsupported { operation: String, required: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api { message: String, status: Option<u16> },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Whether retrying after a fresh login could succeed.
    pub fn is_session_problem(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. } | Self::Disconnected)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<kbenc_api::Error> for CoreError {
    fn from(err: kbenc_api::Error) -> Self {
        match err {
            kbenc_api::Error::Authentication { message }
            | kbenc_api::Error::MissingSessionToken { message } => {
                CoreError::AuthenticationFailed { message }
            }
            kbenc_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            kbenc_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid encoder address: {e}"),
            },
            kbenc_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
            kbenc_api::Error::Http { status, body } if status == 401 || status == 403 => {
                CoreError::AuthenticationFailed {
                    message: format!("HTTP {status}: {body}"),
                }
            }
            kbenc_api::Error::Http { status, body } => CoreError::Api {
                message: format!("HTTP {status}: {body}"),
                status: Some(status),
            },
            kbenc_api::Error::Deserialization { message, body: _ } => CoreError::Api {
                message: format!("Malformed response: {message}"),
                status: None,
            },
            kbenc_api::Error::UnexpectedShape { endpoint, expected } => {
                CoreError::Protocol { endpoint, expected }
            }
            kbenc_api::Error::UnsupportedOperation(op) => CoreError::Unsupported {
                operation: op.to_string(),
                required: "a different encoder API generation".into(),
            },
        }
    }
}
