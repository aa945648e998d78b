//! Vector index access for chunk records.
//!
//! Wraps the Azure AI Search REST API behind the [`SearchIndex`] trait:
//! batch document upload with per-document outcomes, and k-nearest
//! vector retrieval over the `content_vector` field.

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::{AzureSearchClient, SearchIndex};
pub use config::SearchConfig;
pub use error::SearchError;
pub use types::{RetrievedChunk, UploadResult};

pub use ingest::ChunkRecord;
