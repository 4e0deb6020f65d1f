//! Error types for the InsightBoard engine.

use thiserror::Error;

/// Result type alias using InsightBoard's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for InsightBoard operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Extraction backend failed
    #[error("Inference error: {0}")]
    Inference(String),

    /// Job queue or state transition error
    #[error("Job error: {0}")]
    Job(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// The message without its category prefix.
    ///
    /// Used wherever the text is shown to a client, such as a failed job's
    /// result or an HTTP error body.
    pub fn detail(&self) -> String {
        match self {
            Error::Database(e) => e.to_string(),
            Error::NotFound(msg)
            | Error::Inference(msg)
            | Error::Job(msg)
            | Error::Serialization(msg)
            | Error::Config(msg)
            | Error::InvalidInput(msg)
            | Error::Request(msg)
            | Error::Internal(msg) => msg.clone(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
