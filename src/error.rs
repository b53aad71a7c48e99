//! Error types for geopins

use thiserror::Error;

/// Main error type for geopins operations
#[derive(Error, Debug)]
pub enum Error {
    /// Caller input was malformed or out of range.
    ///
    /// The message is returned to clients verbatim, so it carries no prefix.
    #[error("{0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}

impl Error {
    /// Build a validation error from a message
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the caller can fix this error by correcting its input
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Result type alias for geopins operations
pub type Result<T> = std::result::Result<T, Error>;
