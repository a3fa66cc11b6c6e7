// ── Runtime connection configuration ──
//
// Describes *how* to reach one encoder and how often to talk to it.
// Carries credentials but never touches disk: the CLI (or any host
// binding) builds a `ControllerConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use kbenc_api::ApiGeneration;
use secrecy::{ExposeSecret, SecretString};

/// Delay between successful poll cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Session lifetime before a fresh login is forced.
pub const DEFAULT_REAUTH_INTERVAL: Duration = Duration::from_secs(20 * 60);
/// Delay before retrying a failed login.
pub const DEFAULT_LOGIN_RETRY_DELAY: Duration = Duration::from_secs(5);
/// Delay between tearing down a failed connection and logging in again.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(2500);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification. Encoders ship with self-signed certificates.
    #[default]
    DangerAcceptInvalid,
}

/// Configuration for one encoder connection.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Encoder address: IP, hostname, or full URL with scheme.
    pub host: String,
    /// Which management API the firmware speaks.
    pub api: ApiGeneration,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub reauth_interval: Duration,
    pub login_retry_delay: Duration,
    pub reconnect_delay: Duration,
}

impl ControllerConfig {
    /// Build a config with default timings.
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<SecretString>,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Host, username and password are all non-empty.
    pub fn is_complete(&self) -> bool {
        !self.host.trim().is_empty()
            && !self.username.is_empty()
            && !self.password.expose_secret().is_empty()
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            api: ApiGeneration::default(),
            username: String::new(),
            password: SecretString::from(String::new()),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(10),
            poll_interval: DEFAULT_POLL_INTERVAL,
            reauth_interval: DEFAULT_REAUTH_INTERVAL,
            login_retry_delay: DEFAULT_LOGIN_RETRY_DELAY,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completeness_requires_every_credential() {
        assert!(ControllerConfig::new("10.0.0.5", "admin", "pw".to_string()).is_complete());
        assert!(!ControllerConfig::new("", "admin", "pw".to_string()).is_complete());
        assert!(!ControllerConfig::new("10.0.0.5", "", "pw".to_string()).is_complete());
        assert!(!ControllerConfig::new("10.0.0.5", "admin", String::new()).is_complete());
    }

    #[test]
    fn default_timings() {
        let cfg = ControllerConfig::default();
        assert_eq!(cfg.poll_interval, Duration::from_secs(1));
        assert_eq!(cfg.reauth_interval, Duration::from_secs(1200));
        assert_eq!(cfg.login_retry_delay, Duration::from_secs(5));
        assert_eq!(cfg.reconnect_delay, Duration::from_millis(2500));
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
    }
}
