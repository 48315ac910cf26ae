//! Error types for the catalog subsystem.

use thiserror::Error;

/// Errors that can occur while talking to the course catalog.
#[derive(Debug, Error, Clone)]
pub enum CatalogError {
    /// Credentials or access token were rejected
    #[error("not authorized: {message}")]
    Auth { message: String },

    /// The requested resource does not exist
    #[error("not found: {message}")]
    NotFound { message: String },

    /// Structured 4xx business error from the catalog
    #[error("catalog rejected the request: {message}")]
    Api { message: String },

    /// A course page violated the data/links pagination contract
    #[error("invalid course page: {message}")]
    InvalidPage { message: String },

    /// Transport failure or malformed payload
    #[error("transport error: {message}")]
    Transport { message: String },
}

impl CatalogError {
    /// True for failures that may be transient. `Auth` and `Api` are
    /// deterministic rejections; `InvalidPage` is a schema mismatch. None of
    /// those are worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CatalogError::Transport { .. })
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::Transport {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for CatalogError {
    fn from(err: url::ParseError) -> Self {
        CatalogError::Transport {
            message: format!("invalid endpoint URL: {err}"),
        }
    }
}
