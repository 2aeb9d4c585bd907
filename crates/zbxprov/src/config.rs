//! CLI configuration: thin wrapper around `zbxprov_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--url, --api-token, etc.).

use secrecy::SecretString;

use zbxprov_core::{AuthCredentials, ConnectionConfig, Inventory};

use crate::cli::{GlobalOpts, InventorySource};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use zbxprov_config::{Config, Endpoint, Profile, config_path, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Load the config file named by `--config`, or the platform one.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(zbxprov_config::load_config(global.config.as_deref())?)
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Pick the active profile, or synthesize one from `--url` when the
/// config has none.
fn select_profile(global: &GlobalOpts, config: &Config) -> Result<(String, Profile), CliError> {
    let name = active_profile_name(global, config);

    if let Some(profile) = config.profiles.get(&name) {
        return Ok((name, profile.clone()));
    }

    // An explicitly requested profile must exist.
    if global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name,
            available: available_profiles(config),
        });
    }

    match global.url {
        Some(ref url) => Ok((
            name,
            Profile {
                url: url.clone(),
                ..Profile::default()
            },
        )),
        None if !config.profiles.is_empty() => Err(CliError::ProfileNotFound {
            name,
            available: available_profiles(config),
        }),
        None => Err(CliError::NoConfig {
            path: global
                .config
                .clone()
                .unwrap_or_else(config_path)
                .display()
                .to_string(),
        }),
    }
}

fn available_profiles(config: &Config) -> String {
    let names = config.profile_names();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

/// Apply connection flags onto the selected profile.
fn with_flag_overrides(mut profile: Profile, global: &GlobalOpts) -> Profile {
    if let Some(ref url) = global.url {
        profile.url.clone_from(url);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if global.timeout.is_some() {
        profile.timeout = global.timeout;
    }
    profile
}

/// Translate the active profile + global flags into a `ConnectionConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_connection(global: &GlobalOpts, config: &Config) -> Result<ConnectionConfig, CliError> {
    let (name, profile) = select_profile(global, config)?;
    let profile = with_flag_overrides(profile, global);

    match auth_from_flags(&profile, &name, global)? {
        Some(auth) => Ok(zbxprov_config::endpoint_connection(
            &profile,
            &config.defaults,
            auth,
        )?),
        None => Ok(zbxprov_config::profile_to_connection_config(
            &profile,
            &name,
            &config.defaults,
        )?),
    }
}

/// Endpoint for unauthenticated calls (`version`); credentials are never
/// resolved.
pub fn resolve_endpoint(global: &GlobalOpts, config: &Config) -> Result<Endpoint, CliError> {
    let (_, profile) = select_profile(global, config)?;
    let profile = with_flag_overrides(profile, global);
    Ok(zbxprov_config::profile_endpoint(&profile, &config.defaults)?)
}

/// Credentials named by flags, if any. `--api-token` wins over
/// `--username`.
fn auth_from_flags(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<Option<AuthCredentials>, CliError> {
    if let Some(ref token) = global.api_token {
        return Ok(Some(AuthCredentials::ApiToken(SecretString::from(
            token.clone(),
        ))));
    }
    if let Some(ref username) = global.username {
        let password = zbxprov_config::resolve_password(profile, profile_name)?;
        return Ok(Some(AuthCredentials::Password {
            username: username.clone(),
            password,
        }));
    }
    Ok(None)
}

/// The inventory to act on: `--inventory` replaces the config's groups.
pub fn resolve_inventory(source: &InventorySource, config: &Config) -> Result<Inventory, CliError> {
    let groups = match source.inventory {
        Some(ref path) => zbxprov_config::load_inventory_file(path)?,
        None => config.inventory.clone(),
    };
    Ok(zbxprov_config::build_inventory(groups)?)
}
