//! Question answering over retrieved context.

use std::fmt::Write as _;
use std::sync::Arc;

use embeddings::TextEmbedder;
use search::{RetrievedChunk, SearchIndex};
use tracing::debug;

use crate::client::ChatModel;
use crate::error::ChatError;

/// Chunks retrieved per question when no override is configured.
pub const DEFAULT_TOP_K: usize = 4;

const SYSTEM_PROMPT: &str = "You are a documentation assistant. Answer the question using only \
the provided context. If the context does not contain the answer, say you don't know instead \
of guessing.";

/// The retrieval-augmented answering chain.
///
/// Holds its dependencies as trait objects so tests and alternative
/// providers can be swapped in without touching the chain itself.
#[derive(Clone)]
pub struct RagChain {
    embedder: Arc<dyn TextEmbedder>,
    index: Arc<dyn SearchIndex>,
    model: Arc<dyn ChatModel>,
    top_k: usize,
}

impl RagChain {
    pub fn new(
        embedder: Arc<dyn TextEmbedder>,
        index: Arc<dyn SearchIndex>,
        model: Arc<dyn ChatModel>,
    ) -> Self {
        Self {
            embedder,
            index,
            model,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Answer a question: embed it, retrieve the nearest chunks, and ask
    /// the model with the chunks rendered into the system prompt.
    pub async fn answer(&self, question: &str) -> Result<String, ChatError> {
        let vector = self.embedder.embed(question).await?;
        let chunks = self.index.vector_search(&vector, self.top_k).await?;
        debug!(chunks = chunks.len(), "retrieved context");

        let system = build_system_prompt(&chunks);
        self.model.complete(&system, question).await
    }
}

fn build_system_prompt(chunks: &[RetrievedChunk]) -> String {
    let mut prompt = String::from(SYSTEM_PROMPT);
    prompt.push_str("\n\nContext:\n");
    if chunks.is_empty() {
        prompt.push_str("No matching context was found.\n");
    } else {
        prompt.push_str(&render_context(chunks));
    }
    prompt
}

fn render_context(chunks: &[RetrievedChunk]) -> String {
    let mut out = String::new();
    for chunk in chunks {
        let page = match chunk.page_number {
            Some(page) => format!("page {page}"),
            None => "page unknown".to_string(),
        };
        let _ = writeln!(
            out,
            "Source: {} ({})\n{}\n---",
            chunk.source,
            page,
            chunk.content.trim()
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use embeddings::EmbeddingsError;
    use ingest::ChunkRecord;
    use search::{SearchError, UploadResult};

    struct FixedEmbedder {
        fail: bool,
    }

    #[async_trait]
    impl TextEmbedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingsError> {
            if self.fail {
                return Err(EmbeddingsError::Api {
                    status: 500,
                    body: "embedder down".to_string(),
                });
            }
            Ok(vec![0.1, 0.2, 0.3])
        }
    }

    struct FixedIndex {
        chunks: Vec<RetrievedChunk>,
        fail: bool,
        requested_k: AtomicUsize,
    }

    impl FixedIndex {
        fn with_chunks(chunks: Vec<RetrievedChunk>) -> Self {
            Self {
                chunks,
                fail: false,
                requested_k: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SearchIndex for FixedIndex {
        async fn upload_documents(
            &self,
            _records: &[ChunkRecord],
        ) -> Result<Vec<UploadResult>, SearchError> {
            unimplemented!("not used by the chain")
        }

        async fn vector_search(
            &self,
            _vector: &[f32],
            top_k: usize,
        ) -> Result<Vec<RetrievedChunk>, SearchError> {
            if self.fail {
                return Err(SearchError::Api {
                    status: 503,
                    body: "index down".to_string(),
                });
            }
            self.requested_k.store(top_k, Ordering::SeqCst);
            Ok(self.chunks.clone())
        }
    }

    struct EchoModel {
        seen_system: Mutex<Option<String>>,
    }

    impl EchoModel {
        fn new() -> Self {
            Self {
                seen_system: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl ChatModel for EchoModel {
        async fn complete(&self, system: &str, user: &str) -> Result<String, ChatError> {
            *self.seen_system.lock().unwrap() = Some(system.to_string());
            Ok(format!("answer to: {user}"))
        }
    }

    fn retrieved(chunk_id: &str, content: &str, page: Option<u32>) -> RetrievedChunk {
        RetrievedChunk {
            source: "manual.pdf".to_string(),
            content: content.to_string(),
            chunk_id: chunk_id.to_string(),
            page_number: page,
            score: 0.9,
        }
    }

    #[tokio::test]
    async fn answer_feeds_retrieved_context_to_the_model() {
        let index = Arc::new(FixedIndex::with_chunks(vec![
            retrieved("chunk_0", "Installation requires Rust 1.75.", Some(1)),
            retrieved("chunk_1", "Run the server with the default port.", None),
        ]));
        let model = Arc::new(EchoModel::new());
        let chain = RagChain::new(
            Arc::new(FixedEmbedder { fail: false }),
            index.clone(),
            model.clone(),
        );

        let answer = chain.answer("How do I install it?").await.unwrap();
        assert_eq!(answer, "answer to: How do I install it?");

        let system = model.seen_system.lock().unwrap().clone().unwrap();
        assert!(system.contains("Installation requires Rust 1.75."));
        assert!(system.contains("manual.pdf (page 1)"));
        assert!(system.contains("page unknown"));
        assert_eq!(index.requested_k.load(Ordering::SeqCst), DEFAULT_TOP_K);
    }

    #[tokio::test]
    async fn with_top_k_controls_retrieval_depth() {
        let index = Arc::new(FixedIndex::with_chunks(Vec::new()));
        let chain = RagChain::new(
            Arc::new(FixedEmbedder { fail: false }),
            index.clone(),
            Arc::new(EchoModel::new()),
        )
        .with_top_k(9);

        chain.answer("anything").await.unwrap();
        assert_eq!(index.requested_k.load(Ordering::SeqCst), 9);
    }

    #[tokio::test]
    async fn empty_retrieval_still_asks_the_model() {
        let model = Arc::new(EchoModel::new());
        let chain = RagChain::new(
            Arc::new(FixedEmbedder { fail: false }),
            Arc::new(FixedIndex::with_chunks(Vec::new())),
            model.clone(),
        );

        let answer = chain.answer("What color is it?").await.unwrap();
        assert!(answer.contains("What color is it?"));

        let system = model.seen_system.lock().unwrap().clone().unwrap();
        assert!(system.contains("No matching context was found."));
    }

    #[tokio::test]
    async fn embedding_failure_surfaces_as_embedding_error() {
        let chain = RagChain::new(
            Arc::new(FixedEmbedder { fail: true }),
            Arc::new(FixedIndex::with_chunks(Vec::new())),
            Arc::new(EchoModel::new()),
        );

        let err = chain.answer("anything").await.unwrap_err();
        assert!(matches!(err, ChatError::Embedding(_)));
    }

    #[tokio::test]
    async fn search_failure_surfaces_as_search_error() {
        let index = FixedIndex {
            chunks: Vec::new(),
            fail: true,
            requested_k: AtomicUsize::new(0),
        };
        let chain = RagChain::new(
            Arc::new(FixedEmbedder { fail: false }),
            Arc::new(index),
            Arc::new(EchoModel::new()),
        );

        let err = chain.answer("anything").await.unwrap_err();
        assert!(matches!(err, ChatError::Search(_)));
    }
}
