// JSON-RPC HTTP client
//
// Wraps `reqwest::Client` with the Zabbix request envelope, session token
// handling, and response unwrapping. The per-object methods (hosts,
// groups, interfaces, etc.) live in `methods/` as inherent impls to keep
// this module focused on transport mechanics.

use std::sync::{PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::auth::AuthStyle;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Protocol version tag sent in every envelope.
const JSONRPC_VERSION: &str = "2.0";

/// The frontend does not multiplex, so every request uses the same id.
const REQUEST_ID: u32 = 1;

/// Longest slice of a response body kept in error messages.
const BODY_PREVIEW: usize = 200;

#[derive(Serialize)]
struct Request<'a, P> {
    jsonrpc: &'static str,
    method: &'a str,
    params: &'a P,
    #[serde(skip_serializing_if = "Option::is_none")]
    auth: Option<&'a str>,
    id: u32,
}

/// Decoded response envelope: exactly one of `result` / `error` is set.
#[derive(Deserialize)]
pub(crate) struct Response {
    #[serde(default)]
    pub(crate) result: Option<Value>,
    #[serde(default)]
    pub(crate) error: Option<RpcError>,
}

#[derive(Deserialize)]
pub(crate) struct RpcError {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

impl RpcError {
    /// The `data` member flattened to text (it is usually a string).
    pub(crate) fn detail(&self) -> String {
        match &self.data {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

impl From<RpcError> for Error {
    fn from(err: RpcError) -> Self {
        let data = err.detail();
        Self::Api {
            code: err.code,
            message: err.message,
            data,
        }
    }
}

pub(crate) fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW).collect()
}

/// HTTP client for a Zabbix frontend's `api_jsonrpc.php` endpoint.
///
/// Builds the `{ jsonrpc, method, params, auth, id }` envelope and
/// returns the unwrapped `result` member. The session token obtained by
/// [`login`](Self::login) (or installed with
/// [`use_api_token`](Self::use_api_token)) is attached to every call
/// except the anonymous ones.
pub struct ZabbixClient {
    http: reqwest::Client,
    endpoint: Url,
    auth_style: AuthStyle,
    token: RwLock<Option<SecretString>>,
}

impl ZabbixClient {
    /// Create a client for `endpoint` (the full `.../api_jsonrpc.php` URL).
    pub fn new(
        endpoint: Url,
        auth_style: AuthStyle,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, endpoint, auth_style))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, endpoint: Url, auth_style: AuthStyle) -> Self {
        Self {
            http,
            endpoint,
            auth_style,
            token: RwLock::new(None),
        }
    }

    /// The JSON-RPC endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Whether a session token is currently held.
    pub fn has_session(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Install a pre-issued API token as the session token.
    pub fn use_api_token(&self, token: SecretString) {
        self.set_token(token);
    }

    // ── Session token management ─────────────────────────────────────

    pub(crate) fn set_token(&self, token: SecretString) {
        debug!("storing session token");
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    pub(crate) fn clear_token(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn current_token(&self) -> Option<SecretString> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // ── Calls ────────────────────────────────────────────────────────

    /// Invoke `method` with the session token attached (if one is held)
    /// and decode the `result` member.
    pub async fn call<P, T>(&self, method: &str, params: &P) -> Result<T, Error>
    where
        P: Serialize + Sync,
        T: DeserializeOwned,
    {
        let (envelope, body) = self.round_trip(method, params, true).await?;
        decode(method, envelope, &body)
    }

    /// Invoke `method` without the session token.
    ///
    /// `user.login` and `apiinfo.version` reject requests that carry one.
    pub async fn call_anonymous<P, T>(&self, method: &str, params: &P) -> Result<T, Error>
    where
        P: Serialize + Sync,
        T: DeserializeOwned,
    {
        let (envelope, body) = self.round_trip(method, params, false).await?;
        decode(method, envelope, &body)
    }

    /// Send one envelope and parse the response, returning the decoded
    /// envelope together with the raw body.
    pub(crate) async fn round_trip<P>(
        &self,
        method: &str,
        params: &P,
        authenticated: bool,
    ) -> Result<(Response, String), Error>
    where
        P: Serialize + Sync,
    {
        let token = if authenticated {
            self.current_token()
        } else {
            None
        };
        let exposed = token.as_ref().map(|t| t.expose_secret());

        let request = Request {
            jsonrpc: JSONRPC_VERSION,
            method,
            params,
            auth: match self.auth_style {
                AuthStyle::Body => exposed,
                AuthStyle::Header => None,
            },
            id: REQUEST_ID,
        };

        debug!(method, "POST {}", self.endpoint);

        let mut builder = self.http.post(self.endpoint.clone()).json(&request);
        if let (AuthStyle::Header, Some(token)) = (self.auth_style, exposed) {
            builder = builder.bearer_auth(token);
        }

        let resp = builder.send().await.map_err(Error::Transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(method, %status, bytes = body.len(), "response received");

        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        let envelope: Response = serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        })?;

        Ok((envelope, body))
    }
}

fn decode<T: DeserializeOwned>(method: &str, envelope: Response, body: &str) -> Result<T, Error> {
    if let Some(err) = envelope.error {
        return Err(err.into());
    }

    let result = envelope.result.ok_or_else(|| Error::Deserialization {
        message: format!("{method}: response has no result"),
        body: body.to_owned(),
    })?;

    serde_json::from_value(result).map_err(|e| Error::Deserialization {
        message: format!("{method}: {e}"),
        body: body.to_owned(),
    })
}
