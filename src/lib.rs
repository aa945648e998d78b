//! Workspace umbrella crate for the document chat pipeline.
//!
//! This crate stitches the member crates into the two batch operations a
//! deployment runs before serving traffic: partitioning a document into
//! chunk records, and loading those records into the vector index. The
//! `partition` and `load` binaries are thin CLI wrappers around
//! [`pipeline::partition_document`] and [`pipeline::load_records`]; the
//! HTTP service lives in the `server` crate.

pub mod pipeline;

pub use pipeline::{
    load_records, partition_document, LoadSummary, PartitionSummary, PipelineError, UploadPolicy,
};

pub use chat::{AzureChatClient, ChatError, ChatModel, ChatModelConfig, RagChain};
pub use embeddings::{AzureEmbeddingsClient, EmbeddingsConfig, EmbeddingsError, TextEmbedder};
pub use ingest::{
    build_records, chunk_by_title, filter_page_breaks, read_records, write_records, Chunk,
    ChunkRecord, ChunkingConfig, Element, ElementKind, IngestError, PartitionClient,
    PartitionConfig,
};
pub use search::{
    AzureSearchClient, RetrievedChunk, SearchConfig, SearchError, SearchIndex, UploadResult,
};
