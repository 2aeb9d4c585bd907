use secrecy::SecretString;
use strum::{Display, EnumString};

/// Credentials for authenticating with a Zabbix frontend.
///
/// Each variant carries the secret material needed for its auth flow.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// `user.login` with username and password. The returned session
    /// token is held by the client for the rest of the run.
    Password {
        username: String,
        password: SecretString,
    },

    /// Pre-issued API token (Users > API tokens). No login or logout.
    ApiToken(SecretString),
}

/// Where the session token travels on authenticated calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum AuthStyle {
    /// `auth` member of the JSON-RPC envelope.
    #[default]
    Body,
    /// `Authorization: Bearer <token>` header. Newer servers only accept this.
    Header,
}
