//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use zbxprov_config::ConfigError;
use zbxprov_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the Zabbix API at {url}")]
    #[diagnostic(
        code(zbxprov::connection_failed),
        help(
            "Check that the frontend is running and reachable.\n\
             Reason: {reason}\n\
             Try: zbxprov version --url {url}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(zbxprov::timeout),
        help("{reason}\nIncrease the timeout with --timeout or check the frontend's load.")
    )]
    Timeout { reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(zbxprov::auth_failed),
        help(
            "Server response:\n{response}\n\n\
             Verify the username and password, or store them with:\n\
             zbxprov config set-password"
        )
    )]
    AuthFailed { message: String, response: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(zbxprov::no_credentials),
        help(
            "Configure credentials with: zbxprov config init\n\
             Or set ZBXPROV_USERNAME and ZBXPROV_PASSWORD (or ZBXPROV_API_TOKEN)."
        )
    )]
    NoCredentials { profile: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(zbxprov::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(zbxprov::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(zbxprov::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: zbxprov config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No Zabbix frontend configured")]
    #[diagnostic(
        code(zbxprov::no_config),
        help(
            "Create a profile with: zbxprov config init\n\
             Or pass --url (ZBXPROV_URL). Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(zbxprov::config))]
    Config(Box<figment::Error>),

    #[error("{0}")]
    #[diagnostic(code(zbxprov::config_file))]
    ConfigFile(String),

    #[error("Keyring error: {0}")]
    #[diagnostic(
        code(zbxprov::keyring),
        help("Use password_env or a plaintext password in the profile instead.")
    )]
    Keyring(String),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(zbxprov::render))]
    Render(String),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },

            CoreError::AuthenticationFailed { message, response } => {
                Self::AuthFailed { message, response }
            }

            CoreError::Timeout { reason } => Self::Timeout { reason },

            CoreError::Api {
                message,
                code,
                status,
            } => Self::ApiError {
                code: code
                    .map(|c| c.to_string())
                    .or_else(|| status.map(|s| format!("HTTP {s}")))
                    .unwrap_or_else(|| "unknown".into()),
                message,
            },

            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => Self::ApiError {
                code: "internal".into(),
                message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Keyring(message) => Self::Keyring(message),
            ConfigError::Figment(err) => Self::Config(err),
            ConfigError::Io(err) => Self::Io(err),
            other @ (ConfigError::Parse { .. } | ConfigError::Serialization(_)) => {
                Self::ConfigFile(other.to_string())
            }
        }
    }
}
