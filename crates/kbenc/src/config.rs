//! Profile selection and CLI flag overrides.
//!
//! Loading, saving and credential resolution live in `kbenc-config`;
//! this module only decides which profile applies and layers the
//! global flags over it before handing core a `ControllerConfig`.

use kbenc_config::{Config, Profile};
use kbenc_core::ControllerConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Pick the profile to use, falling back to a flags-only profile when
/// `--host` is given and the config has no matching entry.
pub fn select_profile(
    global: &GlobalOpts,
    config: &Config,
    profile_name: &str,
) -> Result<Profile, CliError> {
    if let Some(profile) = config.profiles.get(profile_name) {
        return Ok(apply_overrides(profile.clone(), global));
    }

    if global.host.is_some() {
        return Ok(apply_overrides(Profile::default(), global));
    }

    if config.profiles.is_empty() || global.profile.is_none() {
        return Err(CliError::NoConfig {
            path: kbenc_config::config_path().display().to_string(),
        });
    }

    Err(CliError::ProfileNotFound {
        name: profile_name.into(),
        available: config.profiles.keys().cloned().collect::<Vec<_>>().join(", "),
    })
}

/// Layer global flags over a profile. Flags win.
pub fn apply_overrides(mut profile: Profile, global: &GlobalOpts) -> Profile {
    if let Some(ref host) = global.host {
        profile.host.clone_from(host);
    }
    if let Some(api) = global.api {
        profile.api = api.into();
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    profile
}

/// Build the core configuration for the active profile.
pub fn build_controller_config(
    global: &GlobalOpts,
) -> Result<(String, ControllerConfig), CliError> {
    let cfg = kbenc_config::load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);
    let profile = select_profile(global, &cfg, &profile_name)?;

    let config = kbenc_config::profile_to_controller_config(&profile, &profile_name, &cfg.defaults)?;
    Ok((profile_name, config))
}

/// Override the poll interval from a humantime string.
pub fn with_poll_interval(
    mut config: ControllerConfig,
    raw: Option<&str>,
) -> Result<ControllerConfig, CliError> {
    if let Some(raw) = raw {
        config.poll_interval =
            humantime::parse_duration(raw).map_err(|e| CliError::Validation {
                field: "interval".into(),
                reason: e.to_string(),
            })?;
    }
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use clap::Parser;

    use kbenc_core::ApiGeneration;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["kbenc"];
        argv.extend_from_slice(args);
        argv.push("status");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with(name: &str, host: &str) -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            name.into(),
            Profile {
                host: host.into(),
                username: Some("admin".into()),
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn flags_override_profile() {
        let g = global(&["--host", "10.0.0.9", "--api", "ecs", "-u", "ops", "--timeout", "3"]);
        let cfg = config_with("default", "10.0.0.1");
        let profile = select_profile(&g, &cfg, "default").unwrap();
        assert_eq!(profile.host, "10.0.0.9");
        assert_eq!(profile.api, ApiGeneration::Ecs);
        assert_eq!(profile.username.as_deref(), Some("ops"));
        assert_eq!(profile.timeout, Some(3));
    }

    #[test]
    fn host_flag_works_without_config() {
        let g = global(&["--host", "10.0.0.9"]);
        let profile = select_profile(&g, &Config::default(), "default").unwrap();
        assert_eq!(profile.host, "10.0.0.9");
    }

    #[test]
    fn nothing_configured_is_no_config() {
        let g = global(&[]);
        let err = select_profile(&g, &Config::default(), "default").unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }

    #[test]
    fn unknown_named_profile_lists_available() {
        let g = global(&["--profile", "lab"]);
        let cfg = config_with("studio", "10.0.0.1");
        let err = select_profile(&g, &cfg, "lab").unwrap_err();
        match err {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "lab");
                assert_eq!(available, "studio");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn interval_override_parses_humantime() {
        let config = with_poll_interval(ControllerConfig::default(), Some("250ms")).unwrap();
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert!(with_poll_interval(ControllerConfig::default(), Some("soon")).is_err());
    }
}
