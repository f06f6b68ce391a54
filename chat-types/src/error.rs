//! Error types for chat-sync.

use thiserror::Error;

/// Errors that can occur when encoding or decoding wire data.
#[derive(Debug, Error)]
pub enum ChatError {
    /// JSON serialization failed
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// JSON deserialization failed
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The response parsed as JSON but did not have the expected shape
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
}
