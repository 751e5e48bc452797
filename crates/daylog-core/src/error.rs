//! Unified error handling for daylog-core

use thiserror::Error;

/// Core error type for daylog-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid task id pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for daylog-core
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid timestamp error
    pub fn invalid_timestamp(msg: impl Into<String>) -> Self {
        Error::InvalidTimestamp(msg.into())
    }

    /// Create a fetch error
    pub fn fetch(msg: impl Into<String>) -> Self {
        Error::Fetch(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }
}
