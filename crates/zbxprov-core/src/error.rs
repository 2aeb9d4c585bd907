// ── Core error types ──
//
// Errors that end a whole flow. Per-item API failures never become a
// `CoreError`; they are recorded as `Outcome::Failed` in the step report.
// Transport, HTTP and TLS faults end the flow wherever they happen.
// The `From<zbxprov_api::Error>` impl translates transport-layer errors
// into user-facing variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to Zabbix API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    /// `response` is the raw login response, kept for diagnosis.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String, response: String },

    #[error("Request timed out: {reason}")]
    Timeout { reason: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// JSON-RPC error code, if the server sent one.
        code: Option<i64>,
        /// HTTP status, if the failure was at the HTTP layer.
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<zbxprov_api::Error> for CoreError {
    fn from(err: zbxprov_api::Error) -> Self {
        match err {
            zbxprov_api::Error::Authentication { message, body } => Self::AuthenticationFailed {
                message,
                response: body,
            },
            zbxprov_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    Self::Timeout {
                        reason: e.to_string(),
                    }
                } else if e.is_connect() {
                    Self::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    Self::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            zbxprov_api::Error::InvalidUrl(e) => Self::Config {
                message: format!("Invalid URL: {e}"),
            },
            zbxprov_api::Error::Tls(msg) => Self::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            zbxprov_api::Error::Http { status, body } => Self::Api {
                message: format!("HTTP {status}: {body}"),
                code: None,
                status: Some(status),
            },
            api @ zbxprov_api::Error::Api { .. } => Self::Api {
                code: api.api_code(),
                message: api.to_string(),
                status: None,
            },
            zbxprov_api::Error::Deserialization { message, body: _ } => {
                Self::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

/// Render an API error as the one-line reason stored in a report.
fn item_reason(err: &zbxprov_api::Error) -> String {
    match err {
        zbxprov_api::Error::Api { message, data, .. } if !data.is_empty() => {
            format!("{message} {data}")
        }
        other => other.to_string(),
    }
}

/// Split a client error: API rejections and undecodable results belong to
/// one item, everything else ends the run.
pub(crate) fn item_failure(err: zbxprov_api::Error) -> Result<String, CoreError> {
    match err {
        zbxprov_api::Error::Api { .. } | zbxprov_api::Error::Deserialization { .. } => {
            Ok(item_reason(&err))
        }
        other => Err(other.into()),
    }
}
