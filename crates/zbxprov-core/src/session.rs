// ── Authenticated session ──
//
// Authentication is the first step of every flow: the remaining steps
// need a `Session`, so they cannot run after a failed login.

use std::time::Duration;

use tracing::{debug, info, warn};
use url::Url;

use zbxprov_api::{AuthStyle, Credentials, TlsMode, TransportConfig, ZabbixClient};

use crate::config::{AuthCredentials, ConnectionConfig, TlsVerification};
use crate::error::CoreError;

/// Authenticated handle over one [`ZabbixClient`].
pub struct Session {
    client: ZabbixClient,
    logout_on_close: bool,
}

impl Session {
    /// Build a client from `config` and authenticate it.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, CoreError> {
        let client = ZabbixClient::new(config.url.clone(), config.auth_style, &config.transport())?;
        Self::authenticate(client, &config.auth).await
    }

    /// Authenticate an existing client.
    pub async fn authenticate(
        client: ZabbixClient,
        auth: &AuthCredentials,
    ) -> Result<Self, CoreError> {
        info!(endpoint = %client.endpoint(), "authenticating");
        client.authenticate(&Credentials::from(auth)).await?;
        debug!("session established");
        Ok(Self {
            client,
            logout_on_close: auth.needs_logout(),
        })
    }

    pub fn client(&self) -> &ZabbixClient {
        &self.client
    }

    /// End the session. Logout failures are logged, not returned: the
    /// work is already done and the server expires sessions on its own.
    pub async fn close(self) {
        if !self.logout_on_close {
            return;
        }
        if let Err(e) = self.client.logout().await {
            warn!(error = %e, "logout failed");
        }
    }
}

/// Remote API version, queried without credentials.
pub async fn api_version(
    url: Url,
    tls: &TlsVerification,
    timeout: Duration,
) -> Result<String, CoreError> {
    let transport = TransportConfig {
        tls: TlsMode::from(tls),
        timeout,
    };
    let client = ZabbixClient::new(url, AuthStyle::default(), &transport)?;
    Ok(client.api_version().await?)
}
