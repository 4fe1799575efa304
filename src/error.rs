//! Crate-wide error type.
//!
//! Every public operation returns [`Result`]. The binary wraps these in
//! `anyhow` at the top level, library code never does.
//!
//! Payloads are plain strings so the error stays `Clone`, which lets mock
//! clients hand the same failure out repeatedly.

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, ItunesError>;

/// Errors that can occur while talking to the iTunes Search API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItunesError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Rate limited - try again later")]
    RateLimited,

    #[error("Failed to parse response at {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Cache error: {0}")]
    Cache(String),
}

impl ItunesError {
    /// Create an invalid request error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a parse error from a serde failure with its JSON path.
    pub fn parse(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        Self::Parse {
            path: err.path().to_string(),
            message: err.into_inner().to_string(),
        }
    }

    /// Whether the same request might succeed if sent again later.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) | Self::RateLimited => true,
            Self::Http { status, .. } => *status >= 500,
            Self::Parse { .. } | Self::InvalidRequest(_) | Self::Cache(_) => false,
        }
    }
}
