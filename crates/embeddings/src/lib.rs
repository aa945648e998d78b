//! Text embeddings via an Azure OpenAI deployment.
//!
//! The [`TextEmbedder`] trait is the seam the rest of the pipeline codes
//! against; [`AzureEmbeddingsClient`] is the production implementation.
//! One text in, one vector out. Rate-limit and server errors are retried
//! a bounded number of times with exponential backoff.

pub mod client;
pub mod config;
pub mod error;

pub use client::{AzureEmbeddingsClient, TextEmbedder};
pub use config::EmbeddingsConfig;
pub use error::EmbeddingsError;
