//! Upstream source error types.

/// Errors from the stop, route and depot sources.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Source returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Source throttled us
    #[error("rate limited by upstream source")]
    RateLimited,

    /// Response body could not be decoded
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// HTML page did not have the expected structure
    #[error("HTML parse error: {0}")]
    Html(String),

    /// Configured base URL is unusable
    #[error("invalid source URL: {0}")]
    InvalidUrl(String),
}

impl SourceError {
    /// Whether the source could not be reached at all (as opposed to
    /// answering badly).
    pub fn is_unreachable(&self) -> bool {
        matches!(self, SourceError::Http(e) if e.is_connect() || e.is_timeout())
    }
}
