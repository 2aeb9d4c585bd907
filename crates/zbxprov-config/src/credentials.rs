// ── Credential resolution (without CLI flags) ──
//
// Each secret is looked up in a fixed chain: env var, the profile's
// `*_env` indirection, the system keyring, then plaintext in the config
// file. The first hit wins.

use secrecy::SecretString;

use zbxprov_core::AuthCredentials;

use crate::{ConfigError, Profile};

/// Keyring service name all secrets are stored under.
pub const KEYRING_SERVICE: &str = "zbxprov";

/// Env var that overrides every profile's password.
const PASSWORD_ENV: &str = "ZBXPROV_PASSWORD";

/// Env var that supplies a username when the profile has none.
const USERNAME_ENV: &str = "ZBXPROV_USERNAME";

pub fn password_key(profile_name: &str) -> String {
    format!("{profile_name}/password")
}

pub fn api_token_key(profile_name: &str) -> String {
    format!("{profile_name}/api-token")
}

fn from_keyring(key: &str) -> Option<SecretString> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, key).ok()?;
    entry.get_password().ok().map(SecretString::from)
}

fn from_env(name: &str) -> Option<SecretString> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .map(SecretString::from)
}

/// Resolve the login password.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Global env var
    if let Some(pw) = from_env(PASSWORD_ENV) {
        return Ok(pw);
    }

    // 2. Profile's password_env → env var lookup
    if let Some(pw) = profile.password_env.as_deref().and_then(from_env) {
        return Ok(pw);
    }

    // 3. System keyring
    if let Some(pw) = from_keyring(&password_key(profile_name)) {
        return Ok(pw);
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve a pre-issued API token, if the profile has one anywhere.
pub fn resolve_api_token(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    profile
        .api_token_env
        .as_deref()
        .and_then(from_env)
        .or_else(|| from_keyring(&api_token_key(profile_name)))
        .or_else(|| profile.api_token.clone().map(SecretString::from))
}

/// Resolve `AuthCredentials`: an API token when one is available,
/// otherwise username and password.
pub fn resolve_auth(profile: &Profile, profile_name: &str) -> Result<AuthCredentials, ConfigError> {
    if let Some(token) = resolve_api_token(profile, profile_name) {
        return Ok(AuthCredentials::ApiToken(token));
    }

    let username = profile
        .username
        .clone()
        .or_else(|| std::env::var(USERNAME_ENV).ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;
    let password = resolve_password(profile, profile_name)?;

    Ok(AuthCredentials::Password { username, password })
}

/// Store a secret in the system keyring under `key`.
pub fn store_secret(key: &str, secret: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, key)
        .map_err(|e| ConfigError::Keyring(format!("failed to access keyring: {e}")))?;
    entry
        .set_password(secret)
        .map_err(|e| ConfigError::Keyring(format!("failed to store secret: {e}")))
}
