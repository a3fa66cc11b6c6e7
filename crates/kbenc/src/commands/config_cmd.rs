//! Config subcommand handlers.

use dialoguer::{Confirm, Input, Select};

use kbenc_config::{Config, Profile};
use kbenc_core::ApiGeneration;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Copy of the config safe to print: plaintext passwords are masked.
fn masked(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some("********".into());
        }
    }
    cfg
}

/// Apply one `config set` key to a profile.
fn set_profile_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    let invalid = |field: &str, reason: &str| CliError::Validation {
        field: field.into(),
        reason: reason.into(),
    };

    match key {
        "host" => profile.host = value,
        "api" => {
            profile.api = value
                .parse::<ApiGeneration>()
                .map_err(|_| invalid("api", "must be 'web' or 'ecs'"))?;
        }
        "username" => profile.username = Some(value),
        "password_env" | "password-env" => profile.password_env = Some(value),
        "insecure" => {
            profile.insecure = Some(
                value
                    .parse()
                    .map_err(|_| invalid("insecure", "must be 'true' or 'false'"))?,
            );
        }
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "timeout" => {
            profile.timeout = Some(
                value
                    .parse()
                    .map_err(|_| invalid("timeout", "must be a number (seconds)"))?,
            );
        }
        "poll_interval" | "poll-interval" => {
            humantime::parse_duration(&value)
                .map_err(|e| invalid("poll_interval", &e.to_string()))?;
            profile.poll_interval = Some(value);
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: host, api, username, \
                     password_env, insecure, ca_cert, timeout, poll_interval"
                ),
            });
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(),

        ConfigCommand::Show => {
            let cfg = masked(&kbenc_config::load_config_or_default());
            let out = output::render_single(
                global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|e| format!("{e}")),
                |_| "config".into(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", kbenc_config::config_path().display());
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = kbenc_config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: kbenc config init");
            } else {
                for (name, profile) in &cfg.profiles {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}\t{} ({})", profile.host, profile.api);
                }
            }
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = kbenc_config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();

            set_profile_key(profile, &key, value)?;

            kbenc_config::save_config(&cfg)?;
            eprintln!("✓ Set {key} on profile '{profile_name}'");
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = kbenc_config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: available_profiles(&cfg),
                    name,
                });
            }

            cfg.default_profile = Some(name.clone());
            kbenc_config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        ConfigCommand::SetPassword { profile } => {
            let cfg = kbenc_config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));

            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    available: available_profiles(&cfg),
                    name: profile_name,
                });
            }

            let secret = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            if secret.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "value cannot be empty".into(),
                });
            }

            kbenc_config::store_password(&profile_name, &secret)?;
            eprintln!("✓ Password stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}

// ── Init: interactive wizard ────────────────────────────────────────

fn init() -> Result<(), CliError> {
    let config_path = kbenc_config::config_path();
    eprintln!("kbenc configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let host: String = Input::new()
        .with_prompt("Encoder address (IP, hostname or URL)")
        .interact_text()
        .map_err(prompt_err)?;

    let api_choices = &["Web API (/api)", "ECS API (/ecs)"];
    let api = match Select::new()
        .with_prompt("Management API")
        .items(api_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?
    {
        0 => ApiGeneration::Web,
        _ => ApiGeneration::Ecs,
    };

    let username: String = Input::new()
        .with_prompt("Username")
        .interact_text()
        .map_err(prompt_err)?;

    let password = rpassword::prompt_password("Password: ").map_err(prompt_err)?;

    if username.is_empty() || password.is_empty() {
        return Err(CliError::Validation {
            field: "credentials".into(),
            reason: "username and password cannot be empty".into(),
        });
    }

    let store_choices = &[
        "Store password in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let plaintext = Select::new()
        .with_prompt("Where to store the password?")
        .items(store_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?
        == 1;

    let password_field = if plaintext {
        Some(password)
    } else {
        kbenc_config::store_password(&profile_name, &password)?;
        eprintln!("   ✓ Password stored in system keyring");
        None
    };

    let insecure = Confirm::new()
        .with_prompt("Accept the encoder's self-signed certificate?")
        .default(true)
        .interact()
        .map_err(prompt_err)?;

    let mut cfg = kbenc_config::load_config_or_default();
    cfg.profiles.insert(
        profile_name.clone(),
        Profile {
            host,
            api,
            username: Some(username),
            password: password_field,
            insecure: Some(insecure),
            ..Profile::default()
        },
    );
    cfg.default_profile = Some(profile_name.clone());

    let path = kbenc_config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Test it: kbenc status");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn set_known_keys() {
        let mut p = Profile::default();
        set_profile_key(&mut p, "host", "10.1.1.1".into()).unwrap();
        set_profile_key(&mut p, "api", "ecs".into()).unwrap();
        set_profile_key(&mut p, "insecure", "false".into()).unwrap();
        set_profile_key(&mut p, "poll-interval", "2s".into()).unwrap();
        assert_eq!(p.host, "10.1.1.1");
        assert_eq!(p.api, ApiGeneration::Ecs);
        assert_eq!(p.insecure, Some(false));
        assert_eq!(p.poll_interval.as_deref(), Some("2s"));
    }

    #[test]
    fn rejects_bad_values_and_unknown_keys() {
        let mut p = Profile::default();
        assert!(set_profile_key(&mut p, "api", "v3".into()).is_err());
        assert!(set_profile_key(&mut p, "timeout", "soon".into()).is_err());
        assert!(set_profile_key(&mut p, "poll_interval", "often".into()).is_err());
        assert!(set_profile_key(&mut p, "site", "x".into()).is_err());
    }

    #[test]
    fn show_masks_plaintext_passwords() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                password: Some("hunter2".into()),
                ..Profile::default()
            },
        );
        let shown = masked(&cfg);
        assert_eq!(
            shown.profiles["default"].password.as_deref(),
            Some("********")
        );
    }
}
