//! Wire types for index upload and retrieval.

use serde::{Deserialize, Serialize};

/// Outcome reported by the index for one uploaded document.
///
/// A batch upload returns one of these per document; a batch can succeed
/// partially, so callers must inspect every entry rather than the HTTP
/// status alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    /// Document key the index assigned the outcome to.
    pub key: String,

    /// Whether this document was accepted.
    #[serde(rename = "status")]
    pub succeeded: bool,

    /// Service explanation when the document was rejected.
    #[serde(rename = "errorMessage", default)]
    pub error_message: Option<String>,

    /// Per-document HTTP-style status code.
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

/// One chunk returned by a vector query, with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub source: String,
    pub content: String,
    pub chunk_id: String,
    #[serde(default)]
    pub page_number: Option<u32>,
    #[serde(rename = "@search.score", default)]
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_result_parses_service_fields() {
        let rejected: UploadResult = serde_json::from_str(
            r#"{"key":"chunk_3","status":false,"errorMessage":"document too large","statusCode":422}"#,
        )
        .unwrap();
        assert_eq!(rejected.key, "chunk_3");
        assert!(!rejected.succeeded);
        assert_eq!(rejected.error_message.as_deref(), Some("document too large"));
        assert_eq!(rejected.status_code, 422);

        let accepted: UploadResult = serde_json::from_str(
            r#"{"key":"chunk_0","status":true,"errorMessage":null,"statusCode":201}"#,
        )
        .unwrap();
        assert!(accepted.succeeded);
        assert!(accepted.error_message.is_none());
    }

    #[test]
    fn retrieved_chunk_parses_score_field() {
        let chunk: RetrievedChunk = serde_json::from_str(
            r#"{"@search.score":0.83,"source":"manual.pdf","content":"text","chunk_id":"chunk_1","page_number":2}"#,
        )
        .unwrap();
        assert_eq!(chunk.chunk_id, "chunk_1");
        assert_eq!(chunk.page_number, Some(2));
        assert!((chunk.score - 0.83).abs() < 1e-6);
    }

    #[test]
    fn retrieved_chunk_tolerates_missing_optional_fields() {
        let chunk: RetrievedChunk = serde_json::from_str(
            r#"{"source":"manual.pdf","content":"text","chunk_id":"chunk_1","page_number":null}"#,
        )
        .unwrap();
        assert_eq!(chunk.page_number, None);
        assert_eq!(chunk.score, 0.0);
    }
}
