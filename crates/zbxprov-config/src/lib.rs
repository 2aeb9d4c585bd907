//! Configuration for the `zbxprov` CLI.
//!
//! TOML profiles, inventory and policy sections, credential resolution
//! (env + keyring + plaintext), and translation to
//! `zbxprov_core::ConnectionConfig`. The CLI adds `GlobalOpts`-aware
//! overrides on top.

mod credentials;
mod sections;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use zbxprov_core::{AuthCredentials, AuthStyle, ConnectionConfig, DeviceGroup, TlsVerification};

pub use credentials::{
    KEYRING_SERVICE, api_token_key, password_key, resolve_api_token, resolve_auth,
    resolve_password, store_secret,
};
pub use sections::{
    InterfaceSection, MigrateSection, SetupSection, build_inventory, load_inventory_file,
};

/// Env var prefix for config overrides (`ZBXPROV_DEFAULTS__TIMEOUT=60`).
pub const ENV_PREFIX: &str = "ZBXPROV_";

/// Env vars that belong to CLI flags, not to the config tree.
const FLAG_ENV_KEYS: [&str; 11] = [
    "config",
    "profile",
    "url",
    "username",
    "password",
    "api_token",
    "inventory",
    "output",
    "color",
    "insecure",
    "timeout",
];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

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
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named frontend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,

    /// Overrides for the setup policy.
    #[serde(default)]
    pub setup: SetupSection,

    /// Overrides for the migration policy.
    #[serde(default)]
    pub migrate: MigrateSection,

    /// Host groups and their devices, in provisioning order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inventory: Vec<DeviceGroup>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
            setup: SetupSection::default(),
            migrate: MigrateSection::default(),
            inventory: Vec::new(),
        }
    }
}

impl Config {
    /// Profile names, sorted.
    pub fn profile_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.profiles.keys().cloned().collect();
        names.sort();
        names
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
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
    30
}

/// A named frontend profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Frontend URL: the full `.../api_jsonrpc.php` endpoint or the
    /// frontend base it lives under.
    pub url: String,

    /// Username for `user.login`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Password (plaintext; prefer keyring or env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Environment variable name containing the password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    /// Pre-issued API token (plaintext; prefer keyring or env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Environment variable name containing the API token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token_env: Option<String>,

    /// Token placement: "body" or "header".
    #[serde(default = "default_auth_style")]
    pub auth_style: String,

    /// Path to custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,

    /// Override timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: None,
            password: None,
            password_env: None,
            api_token: None,
            api_token_env: None,
            auth_style: default_auth_style(),
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }
}

fn default_auth_style() -> String {
    "body".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "zbxprov", "zbxprov").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("zbxprov");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from defaults + file + environment.
///
/// `path` overrides the platform config location. A missing file is not
/// an error; a malformed one is.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(
            Env::prefixed(ENV_PREFIX)
                .ignore(&FLAG_ENV_KEYS)
                .split("__"),
        );

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path` (or the canonical
/// config path).
pub fn save_config(cfg: &Config, path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(path)
}

// ── Profile → ConnectionConfig ──────────────────────────────────────

/// Normalize a frontend URL to its JSON-RPC endpoint.
///
/// `http://zabbix:8080` and `http://zabbix:8080/` both become
/// `http://zabbix:8080/api_jsonrpc.php`; a URL already naming a `.php`
/// script is kept as is.
pub fn endpoint_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::Validation {
        field: "url".into(),
        reason,
    };

    let mut url = Url::parse(raw).map_err(|e| invalid(format!("{raw}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("{raw}: expected an http or https URL")));
    }
    if !url.path().ends_with(".php") {
        url.path_segments_mut()
            .map_err(|()| invalid(format!("{raw}: cannot be a base URL")))?
            .pop_if_empty()
            .push("api_jsonrpc.php");
    }
    Ok(url)
}

/// Parse a profile's `auth_style` value.
pub fn parse_auth_style(value: &str) -> Result<AuthStyle, ConfigError> {
    AuthStyle::from_str(value).map_err(|_| ConfigError::Validation {
        field: "auth_style".into(),
        reason: format!("expected 'body' or 'header', got '{value}'"),
    })
}

/// Where and how to reach a profile's frontend, without credentials.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub url: Url,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

/// Resolve a profile's endpoint URL, TLS mode and timeout.
pub fn profile_endpoint(profile: &Profile, defaults: &Defaults) -> Result<Endpoint, ConfigError> {
    let url = endpoint_url(&profile.url)?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    Ok(Endpoint { url, tls, timeout })
}

/// Build a `ConnectionConfig` from a profile, resolving its credentials.
pub fn profile_to_connection_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ConnectionConfig, ConfigError> {
    let auth = resolve_auth(profile, profile_name)?;
    endpoint_connection(profile, defaults, auth)
}

/// Build a `ConnectionConfig` from a profile with credentials supplied
/// by the caller.
pub fn endpoint_connection(
    profile: &Profile,
    defaults: &Defaults,
    auth: AuthCredentials,
) -> Result<ConnectionConfig, ConfigError> {
    let endpoint = profile_endpoint(profile, defaults)?;
    let auth_style = parse_auth_style(&profile.auth_style)?;

    Ok(ConnectionConfig {
        url: endpoint.url,
        auth,
        auth_style,
        tls: endpoint.tls,
        timeout: endpoint.timeout,
    })
}
