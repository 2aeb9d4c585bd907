//! Config subcommand handlers.

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

const MASK: &str = "****";

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of the config with every inline secret masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some(MASK.into());
        }
        if profile.api_token.is_some() {
            profile.api_token = Some(MASK.into());
        }
    }
    cfg
}

/// Render config as TOML for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    toml::to_string_pretty(&redacted(cfg)).unwrap_or_else(|e| format!("# cannot render: {e}"))
}

fn save(cfg: &Config, global: &GlobalOpts) -> Result<std::path::PathBuf, CliError> {
    Ok(config::save_config(cfg, global.config.as_deref())?)
}

fn profile_not_found(name: String, cfg: &Config) -> CliError {
    let available = cfg.profile_names();
    CliError::ProfileNotFound {
        name,
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
    }
}

fn prompt_secret(label: &str) -> Result<String, CliError> {
    let secret = rpassword::prompt_password(label).map_err(prompt_err)?;
    if secret.is_empty() {
        return Err(CliError::Validation {
            field: "secret".into(),
            reason: "value cannot be empty".into(),
        });
    }
    Ok(secret)
}

/// Offer to store a secret in the system keyring or return it for plaintext config.
///
/// Returns `Some(secret)` if the user chose plaintext, `None` if stored in keyring.
fn prompt_keyring_storage(
    secret: &str,
    keyring_key: &str,
    label: &str,
) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt(format!("Where to store the {label}?"))
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        zbxprov_config::store_secret(keyring_key, secret)?;
        eprintln!("   ✓ {label} stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(secret.to_owned()))
    }
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = global.config.clone().unwrap_or_else(config::config_path);
            eprintln!("zbxprov configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            // 1. Profile name
            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            // 2. Frontend URL
            let url: String = Input::new()
                .with_prompt("Zabbix frontend URL")
                .default("http://localhost:13080".into())
                .validate_with(|input: &String| {
                    zbxprov_config::endpoint_url(input)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;

            // 3. Auth method
            let auth_choices = &["Username/Password (user.login)", "API token"];
            let auth_selection = Select::new()
                .with_prompt("Authentication method")
                .items(auth_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let mut profile = Profile {
                url,
                ..Profile::default()
            };

            if auth_selection == 0 {
                let user: String = Input::new()
                    .with_prompt("Username")
                    .default("Admin".into())
                    .interact_text()
                    .map_err(prompt_err)?;
                let pass = prompt_secret("Password: ")?;
                profile.username = Some(user);
                profile.password = prompt_keyring_storage(
                    &pass,
                    &zbxprov_config::password_key(&profile_name),
                    "password",
                )?;
            } else {
                let token = prompt_secret("API token: ")?;
                profile.api_token = prompt_keyring_storage(
                    &token,
                    &zbxprov_config::api_token_key(&profile_name),
                    "API token",
                )?;
            }

            // 4. Token placement
            let style_choices = &[
                "body (auth field, servers before 7.2)",
                "header (Authorization: Bearer)",
            ];
            let style = Select::new()
                .with_prompt("Where should the session token go?")
                .items(style_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;
            profile.auth_style = if style == 0 { "body" } else { "header" }.into();

            // 5. Merge into the existing config, keeping other profiles
            let mut cfg = config::load(global)?;
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());

            let written = save(&cfg, global)?;

            eprintln!("\n✓ Configuration written to {}", written.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: zbxprov version");

            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            let out = output::render_single(
                global.output,
                &redacted(&cfg),
                format_config_redacted,
                |_| "config".into(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load(global)?;
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = cfg.profiles.entry(profile_name.clone()).or_default();

            match key.as_str() {
                "url" => {
                    zbxprov_config::endpoint_url(&value)?;
                    profile.url = value;
                }
                "username" => profile.username = Some(value),
                "password_env" | "password-env" => profile.password_env = Some(value),
                "api_token_env" | "api-token-env" => profile.api_token_env = Some(value),
                "auth_style" | "auth-style" => {
                    zbxprov_config::parse_auth_style(&value)?;
                    profile.auth_style = value;
                }
                "insecure" => {
                    profile.insecure = Some(value.parse().map_err(|_| CliError::Validation {
                        field: "insecure".into(),
                        reason: "must be 'true' or 'false'".into(),
                    })?);
                }
                "timeout" => {
                    profile.timeout = Some(value.parse().map_err(|_| CliError::Validation {
                        field: "timeout".into(),
                        reason: "must be a number (seconds)".into(),
                    })?);
                }
                "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
                other => {
                    return Err(CliError::Validation {
                        field: other.into(),
                        reason: format!(
                            "unknown config key '{other}'. Valid keys: url, username, \
                             password_env, api_token_env, auth_style, insecure, timeout, ca_cert"
                        ),
                    });
                }
            }

            save(&cfg, global)?;
            eprintln!("✓ Set {key} on profile '{profile_name}'");
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load(global)?;
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: zbxprov config init");
            } else {
                for name in cfg.profile_names() {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load(global)?;

            if !cfg.profiles.contains_key(&name) {
                return Err(profile_not_found(name, &cfg));
            }

            cfg.default_profile = Some(name.clone());
            save(&cfg, global)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        // ── SetPassword ─────────────────────────────────────────────
        ConfigCommand::SetPassword { profile, token } => {
            let cfg = config::load(global)?;
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));

            if !cfg.profiles.contains_key(&profile_name) {
                return Err(profile_not_found(profile_name, &cfg));
            }

            if token {
                let secret = prompt_secret("API token: ")?;
                zbxprov_config::store_secret(&zbxprov_config::api_token_key(&profile_name), &secret)?;
            } else {
                let secret = prompt_secret("Password: ")?;
                zbxprov_config::store_secret(&zbxprov_config::password_key(&profile_name), &secret)?;
            }

            eprintln!("✓ Secret stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}
