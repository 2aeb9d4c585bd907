// ── Runtime connection configuration ──
//
// These types describe *how* to reach a Zabbix frontend. They carry
// credential data and connection tuning, but never touch disk.
// The CLI constructs a `ConnectionConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use zbxprov_api::{AuthStyle, Credentials, TlsMode, TransportConfig};

/// How to authenticate with the frontend.
///
/// Carries the credential data; `zbxprov_api::Credentials` is the
/// transport-level twin it converts into.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// `user.login` with a username and password.
    Password {
        username: String,
        password: SecretString,
    },
    /// Pre-issued API token; no login round trip.
    ApiToken(SecretString),
}

impl AuthCredentials {
    /// Whether the session has to be ended with `user.logout`.
    pub fn needs_logout(&self) -> bool {
        matches!(self, Self::Password { .. })
    }
}

impl From<&AuthCredentials> for Credentials {
    fn from(auth: &AuthCredentials) -> Self {
        match auth {
            AuthCredentials::Password { username, password } => Self::Password {
                username: username.clone(),
                password: password.clone(),
            },
            AuthCredentials::ApiToken(token) => Self::ApiToken(token.clone()),
        }
    }
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// Bundled root store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed frontends).
    DangerAcceptInvalid,
}

impl From<&TlsVerification> for TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => Self::System,
            TlsVerification::CustomCa(path) => Self::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => Self::DangerAcceptInvalid,
        }
    }
}

/// Configuration for connecting to a single frontend.
///
/// Built by the CLI, passed to [`Session::connect`](crate::Session::connect).
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Full JSON-RPC endpoint, e.g. `http://localhost:13080/api_jsonrpc.php`.
    pub url: Url,
    /// Authentication method and credentials.
    pub auth: AuthCredentials,
    /// Where the session token is carried.
    pub auth_style: AuthStyle,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ConnectionConfig {
    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: TlsMode::from(&self.tls),
            timeout: self.timeout,
        }
    }
}
