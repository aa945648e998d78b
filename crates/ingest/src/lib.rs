//! Document partitioning for the docrag pipeline.
//!
//! This crate owns the first stage of the pipeline: turning a source PDF
//! into an ordered list of [`ChunkRecord`]s ready for embedding and upload.
//! The heavy lifting (high-resolution layout analysis) is delegated to an
//! external partition API; everything after the HTTP call is local and
//! deterministic:
//!
//! 1. [`PartitionClient::partition_file`]: upload the document, receive
//!    layout [`Element`]s.
//! 2. [`filter_page_breaks`]: drop pagination artifacts.
//! 3. [`chunk_by_title`]: group elements under their nearest preceding
//!    heading, bounded by [`ChunkingConfig`] thresholds.
//! 4. [`build_records`] / [`write_records`]: assign `chunk_<i>` ids and
//!    persist the records file.
//!
//! The records file is plain JSON so the loader stage (and anything else)
//! can consume it without this crate.

pub mod chunk;
pub mod client;
pub mod error;
pub mod records;
pub mod types;

pub use chunk::{chunk_by_title, Chunk, ChunkingConfig};
pub use client::{PartitionClient, PartitionConfig, DEFAULT_PARTITION_API_URL};
pub use error::IngestError;
pub use records::{build_records, read_records, write_records, ChunkRecord};
pub use types::{filter_page_breaks, Element, ElementKind, ElementMetadata};
