//! Retrieval-augmented answering.
//!
//! [`RagChain`] wires the three seams together: embed the question with a
//! [`TextEmbedder`], pull the nearest chunks from a
//! [`SearchIndex`](search::SearchIndex), and hand both to a [`ChatModel`]
//! for the final answer. All three are trait objects, so callers choose
//! the implementations at startup.

pub mod chain;
pub mod client;
pub mod config;
pub mod error;

pub use chain::{RagChain, DEFAULT_TOP_K};
pub use client::{AzureChatClient, ChatModel};
pub use config::ChatModelConfig;
pub use error::ChatError;

pub use embeddings::TextEmbedder;
