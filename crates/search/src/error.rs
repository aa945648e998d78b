//! Errors produced while talking to the search service.

use thiserror::Error;

/// Error type for the search crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SearchError {
    /// The service settings are incomplete or inconsistent.
    #[error("invalid search configuration: {0}")]
    Config(String),

    /// A record reached the uploader without an embedding attached.
    #[error("record {chunk_id} has no content_vector; run the embedding pass first")]
    MissingVector { chunk_id: String },

    /// Documents could not be serialized for upload.
    #[error("failed to serialize documents")]
    Serialize(#[source] serde_json::Error),

    /// The request could not be sent or the response body could not be
    /// read.
    #[error("search request failed")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("search service returned status {status}: {body}")]
    Api { status: u16, body: String },

    /// The service answered 2xx but the body was not the expected shape.
    #[error("unexpected search response: {0}")]
    MalformedResponse(String),
}
