use thiserror::Error;

/// Top-level error type for the `zbxprov-api` crate.
///
/// Covers every failure mode of a JSON-RPC round trip: authentication,
/// transport, HTTP status, remote API errors and decoding.
/// `zbxprov-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected or answered without a session token.
    ///
    /// `body` is the raw response so the caller can show it verbatim.
    #[error("Authentication failed: {message}")]
    Authentication { message: String, body: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Non-success HTTP status from the endpoint.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    // ── JSON-RPC ────────────────────────────────────────────────────
    /// Error object returned in the JSON-RPC envelope.
    #[error("API error {code}: {message}{}", detail_suffix(.data))]
    Api {
        code: i64,
        message: String,
        data: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

fn detail_suffix(data: &str) -> String {
    if data.is_empty() {
        String::new()
    } else {
        format!(" ({data})")
    }
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Extract the JSON-RPC error code, if available.
    pub fn api_code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}
