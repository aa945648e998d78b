//! Errors produced while partitioning and chunking documents.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for the ingest crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IngestError {
    /// Chunking thresholds are inconsistent.
    #[error("invalid chunking configuration: {0}")]
    InvalidConfig(String),

    /// Reading or writing a file failed.
    #[error("io error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The partition request could not be sent or the response body could
    /// not be read.
    #[error("partition request failed")]
    Request(#[from] reqwest::Error),

    /// The partition service answered with a non-success status.
    #[error("partition service returned status {status}: {body}")]
    Api { status: u16, body: String },

    /// The partition service answered 2xx but the body was not the
    /// expected element array.
    #[error("unexpected partition response: {0}")]
    MalformedResponse(String),

    /// A records file did not contain valid chunk records.
    #[error("failed to parse records")]
    Parse(#[source] serde_json::Error),

    /// Records could not be serialized.
    #[error("failed to serialize records")]
    Serialize(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_the_path() {
        let err = IngestError::Io {
            path: PathBuf::from("/tmp/data.json"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("/tmp/data.json"));
    }

    #[test]
    fn api_error_carries_status_and_body() {
        let err = IngestError::Api {
            status: 422,
            body: "unsupported file type".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("422"));
        assert!(msg.contains("unsupported file type"));
    }
}
