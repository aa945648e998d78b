//! Errors produced while generating embeddings.

use thiserror::Error;

/// Error type for the embeddings crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EmbeddingsError {
    /// The deployment settings are incomplete or inconsistent.
    #[error("invalid embeddings configuration: {0}")]
    Config(String),

    /// The request could not be sent or the response body could not be
    /// read.
    #[error("embedding request failed")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status after retries were
    /// exhausted.
    #[error("embedding service returned status {status}: {body}")]
    Api { status: u16, body: String },

    /// The service answered 2xx but the body was not the expected shape.
    #[error("unexpected embedding response: {0}")]
    MalformedResponse(String),

    /// The returned vector does not match the configured width.
    #[error("embedding has {actual} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}
