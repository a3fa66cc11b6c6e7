//! Configuration for the kbenc CLI and other hosts.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `kbenc_core::ControllerConfig`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use kbenc_core::{ApiGeneration, ControllerConfig, TlsVerification};

/// Keyring service name for stored passwords.
pub const KEYRING_SERVICE: &str = "kbenc";
/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "KBENC_CONFIG";
pub const PASSWORD_ENV: &str = "KBENC_PASSWORD";
pub const USERNAME_ENV: &str = "KBENC_USERNAME";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named encoder profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound { name: name.into() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    10
}

/// A named encoder profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Encoder address: IP, hostname or URL.
    pub host: String,

    /// Management API generation: "web" or "ecs".
    #[serde(default)]
    pub api: ApiGeneration,

    pub username: Option<String>,

    /// Plaintext password (prefer keyring or `password_env`).
    pub password: Option<String>,

    /// Environment variable holding the password.
    pub password_env: Option<String>,

    /// Skip certificate verification. Defaults to true; encoders ship
    /// self-signed certificates.
    pub insecure: Option<bool>,

    /// Custom CA certificate; implies verification.
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds.
    pub timeout: Option<u64>,

    /// Poll interval, e.g. "1s" or "500ms".
    pub poll_interval: Option<String>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `KBENC_CONFIG`, else the platform
/// config directory.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("com", "kbenc", "kbenc").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("kbenc");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from a specific file, merged over defaults and under
/// `KBENC_`-prefixed env vars (`KBENC_DEFAULTS__OUTPUT=json`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("KBENC_").split("__"));

    Ok(figment.extract()?)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(&path, cfg)?;
    Ok(path)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_account(profile_name: &str) -> String {
    format!("{profile_name}/password")
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &keyring_account(profile_name))?.set_password(password)?;
    Ok(())
}

fn keyring_password(profile_name: &str) -> Option<String> {
    keyring::Entry::new(KEYRING_SERVICE, &keyring_account(profile_name))
        .ok()?
        .get_password()
        .ok()
}

/// Resolve username + password from the process environment and the
/// system keyring.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<(String, SecretString), ConfigError> {
    resolve_credentials_with(
        profile,
        profile_name,
        |name| std::env::var(name).ok(),
        keyring_password,
    )
}

/// Credential chain with injectable lookups.
///
/// Username: profile, then `KBENC_USERNAME`. Password: the profile's
/// `password_env` variable, then `KBENC_PASSWORD`, then the keyring,
/// then plaintext.
pub fn resolve_credentials_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn(&str) -> Option<String>,
) -> Result<(String, SecretString), ConfigError> {
    let no_credentials = || ConfigError::NoCredentials {
        profile: profile_name.into(),
    };

    let username = profile
        .username
        .clone()
        .or_else(|| env(USERNAME_ENV))
        .filter(|u| !u.is_empty())
        .ok_or_else(no_credentials)?;

    let password = profile
        .password_env
        .as_deref()
        .and_then(&env)
        .or_else(|| env(PASSWORD_ENV))
        .or_else(|| keyring(profile_name))
        .or_else(|| profile.password.clone())
        .ok_or_else(no_credentials)?;

    Ok((username, SecretString::from(password)))
}

/// Build a `ControllerConfig` from a profile.
pub fn profile_to_controller_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ControllerConfig, ConfigError> {
    let (username, password) = resolve_credentials(profile, profile_name)?;
    build_controller_config(profile, defaults, username, password)
}

/// Translate a profile with already-resolved credentials.
pub fn build_controller_config(
    profile: &Profile,
    defaults: &Defaults,
    username: String,
    password: SecretString,
) -> Result<ControllerConfig, ConfigError> {
    if profile.host.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "host".into(),
            reason: "must not be empty".into(),
        });
    }

    let tls = match (&profile.ca_cert, profile.insecure) {
        (_, Some(true)) | (None, None) => TlsVerification::DangerAcceptInvalid,
        (Some(ca), _) => TlsVerification::CustomCa(ca.clone()),
        (None, Some(false)) => TlsVerification::SystemDefaults,
    };

    let mut config = ControllerConfig {
        host: profile.host.clone(),
        api: profile.api,
        username,
        password,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        ..ControllerConfig::default()
    };

    if let Some(ref raw) = profile.poll_interval {
        config.poll_interval =
            humantime::parse_duration(raw).map_err(|e| ConfigError::Validation {
                field: "poll_interval".into(),
                reason: e.to_string(),
            })?;
    }

    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn profile() -> Profile {
        Profile {
            host: "10.0.0.5".into(),
            username: Some("admin".into()),
            ..Profile::default()
        }
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn password_env_wins() {
        let p = Profile {
            password_env: Some("STUDIO_PW".into()),
            password: Some("plain".into()),
            ..profile()
        };
        let env = |name: &str| match name {
            "STUDIO_PW" => Some("from-profile-env".into()),
            PASSWORD_ENV => Some("from-global-env".into()),
            _ => None,
        };
        let (_, pw) = resolve_credentials_with(&p, "studio", env, |_| Some("kr".into())).unwrap();
        assert_eq!(pw.expose_secret(), "from-profile-env");
    }

    #[test]
    fn keyring_beats_plaintext() {
        let p = Profile {
            password: Some("plain".into()),
            ..profile()
        };
        let (_, pw) = resolve_credentials_with(&p, "studio", no_env, |name| {
            (name == "studio").then(|| "kr".to_string())
        })
        .unwrap();
        assert_eq!(pw.expose_secret(), "kr");
    }

    #[test]
    fn plaintext_is_last_resort() {
        let p = Profile {
            password: Some("plain".into()),
            ..profile()
        };
        let (user, pw) = resolve_credentials_with(&p, "studio", no_env, |_| None).unwrap();
        assert_eq!(user, "admin");
        assert_eq!(pw.expose_secret(), "plain");
    }

    #[test]
    fn missing_password_is_an_error() {
        let result = resolve_credentials_with(&profile(), "studio", no_env, |_| None);
        assert!(matches!(result, Err(ConfigError::NoCredentials { .. })));
    }

    #[test]
    fn tls_follows_profile() {
        let defaults = Defaults::default();
        let pw = || SecretString::from("pw".to_string());

        let cfg = build_controller_config(&profile(), &defaults, "a".into(), pw()).unwrap();
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(cfg.timeout, Duration::from_secs(10));

        let strict = Profile {
            insecure: Some(false),
            ca_cert: Some("/etc/kb-ca.pem".into()),
            ..profile()
        };
        let cfg = build_controller_config(&strict, &defaults, "a".into(), pw()).unwrap();
        assert_eq!(cfg.tls, TlsVerification::CustomCa("/etc/kb-ca.pem".into()));
    }

    #[test]
    fn poll_interval_uses_humantime() {
        let p = Profile {
            poll_interval: Some("500ms".into()),
            ..profile()
        };
        let cfg = build_controller_config(
            &p,
            &Defaults::default(),
            "a".into(),
            SecretString::from("pw".to_string()),
        )
        .unwrap();
        assert_eq!(cfg.poll_interval, Duration::from_millis(500));

        let bad = Profile {
            poll_interval: Some("soon".into()),
            ..profile()
        };
        assert!(
            build_controller_config(
                &bad,
                &Defaults::default(),
                "a".into(),
                SecretString::from("pw".to_string())
            )
            .is_err()
        );
    }

    #[test]
    fn save_then_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "studio".into(),
            Profile {
                api: ApiGeneration::Ecs,
                ..profile()
            },
        );
        save_config_to(&path, &cfg).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("[profiles.studio]"));
        assert!(text.contains("api = \"ecs\""));

        let loaded = load_config_from(&path).unwrap();
        let studio = loaded.profile("studio").unwrap();
        assert_eq!(studio.api, ApiGeneration::Ecs);
        assert_eq!(studio.host, "10.0.0.5");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded.default_profile.as_deref(), Some("default"));
        assert!(loaded.profile("default").is_err());
    }
}
