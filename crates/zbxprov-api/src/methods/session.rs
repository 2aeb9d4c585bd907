// Session endpoints
//
// `user.login` exchanges credentials for a session token held by the
// client; `user.logout` invalidates it. `apiinfo.version` is the one
// call that works without (and rejects) a token.

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::debug;

use crate::auth::Credentials;
use crate::client::{ZabbixClient, preview};
use crate::error::Error;

impl ZabbixClient {
    /// Remote API version string, e.g. `"6.0.25"`.
    ///
    /// `apiinfo.version`, sent without a session token.
    pub async fn api_version(&self) -> Result<String, Error> {
        debug!("querying API version");
        self.call_anonymous("apiinfo.version", &json!([])).await
    }

    /// Establish a session from either credential kind.
    ///
    /// Password credentials go through [`login`](Self::login); an API
    /// token is installed as-is without contacting the server.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<(), Error> {
        match credentials {
            Credentials::Password { username, password } => self.login(username, password).await,
            Credentials::ApiToken(token) => {
                debug!("using pre-issued API token");
                self.use_api_token(token.clone());
                Ok(())
            }
        }
    }

    /// Authenticate with username/password via `user.login`.
    ///
    /// On success the returned token is stored and attached to every
    /// later call. A response without a non-empty string `result` fails
    /// with [`Error::Authentication`] carrying the raw response body.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        debug!(username, "logging in at {}", self.endpoint());

        let params = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let (envelope, body) = match self.round_trip("user.login", &params, false).await {
            Ok(ok) => ok,
            Err(Error::Http { status, body }) => {
                return Err(Error::Authentication {
                    message: format!("login failed (HTTP {status})"),
                    body,
                });
            }
            Err(other) => return Err(other),
        };

        if let Some(err) = envelope.error {
            let detail = err.detail();
            let api: Error = err.into();
            return Err(Error::Authentication {
                message: if detail.is_empty() {
                    api.to_string()
                } else {
                    detail
                },
                body,
            });
        }

        match envelope.result {
            Some(Value::String(token)) if !token.is_empty() => {
                self.set_token(SecretString::from(token));
                debug!("login successful");
                Ok(())
            }
            _ => Err(Error::Authentication {
                message: format!(
                    "login response carried no session token: {}",
                    preview(&body)
                ),
                body,
            }),
        }
    }

    /// End the current session via `user.logout` and drop the token.
    pub async fn logout(&self) -> Result<(), Error> {
        debug!("logging out");
        let result: Result<Value, Error> = self.call("user.logout", &json!([])).await;
        self.clear_token();
        result.map(|_| ())
    }
}
