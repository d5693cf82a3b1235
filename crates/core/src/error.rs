//! Error types for the Coursehub crates.

use thiserror::Error;

/// Top-level error type for all Coursehub operations.
#[derive(Debug, Error)]
pub enum CoursehubError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("credential error: {0}")]
    Credential(String),

    #[error("GitHub error: {0}")]
    GitHub(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// A convenience Result alias that defaults to [`CoursehubError`].
pub type Result<T> = std::result::Result<T, CoursehubError>;
