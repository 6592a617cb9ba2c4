use thiserror::Error;

/// Top-level error type for the `smaxtec-api` crate.
///
/// Covers every failure mode of the client core: configuration,
/// authentication, transport, HTTP status classification, and decoding.
/// Nothing in this crate retries; every variant surfaces at the call site
/// that triggered it.
#[derive(Debug, Error)]
pub enum Error {
    // ── Configuration ───────────────────────────────────────────────
    /// Missing endpoint or credentials, detected at construction or on the
    /// first request that needs them.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    // ── Authentication ──────────────────────────────────────────────
    /// The token endpoint rejected the credentials (HTTP 401, 409 or 422).
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// The token endpoint answered, but the answer was unusable.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── HTTP status ─────────────────────────────────────────────────
    /// 4xx response. `message` comes from the JSON error body, or is
    /// `"unknown"` when the body carries none.
    #[error("{status} Error: {message}")]
    Client { status: u16, message: String },

    /// Any other non-2xx response (5xx, unexpected 3xx).
    #[error("HTTP {status} for {url}")]
    Http { status: u16, url: String },

    /// A write verb (POST/PUT) was answered with a 301. Write requests never
    /// follow redirects.
    #[error("301 redirect for {method} {url}")]
    Redirect { method: &'static str, url: String },

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

    // ── Data ────────────────────────────────────────────────────────
    /// JSON decoding failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Caller input that cannot be turned into a request.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ── Capabilities ────────────────────────────────────────────────
    /// Operation not available for this client's configuration.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
}

impl Error {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns `true` if the failure came from the login flow.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::InvalidCredentials | Self::Authentication { .. })
    }

    /// The HTTP status code behind this error, if there was a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Client { status, .. } | Self::Http { status, .. } => Some(*status),
            Self::Redirect { .. } => Some(301),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
