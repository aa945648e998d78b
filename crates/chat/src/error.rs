//! Errors produced while answering a question.

use thiserror::Error;

/// Error type for the chat crate.
///
/// Wraps the upstream stages so one variant set covers the whole chain:
/// embedding the question, querying the index, and the completion call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatError {
    /// The deployment settings are incomplete or inconsistent.
    #[error("invalid chat configuration: {0}")]
    Config(String),

    /// Embedding the question failed.
    #[error("failed to embed question")]
    Embedding(#[from] embeddings::EmbeddingsError),

    /// Retrieving context chunks failed.
    #[error("failed to retrieve context")]
    Search(#[from] search::SearchError),

    /// The completion request could not be sent or the response body
    /// could not be read.
    #[error("chat completion request failed")]
    Request(#[from] reqwest::Error),

    /// The chat service answered with a non-success status.
    #[error("chat service returned status {status}: {body}")]
    Api { status: u16, body: String },

    /// The chat service answered 2xx but the body carried no usable
    /// completion.
    #[error("unexpected chat response: {0}")]
    MalformedResponse(String),
}
