//! Azure AI Search client.

use std::time::Duration;

use async_trait::async_trait;
use ingest::ChunkRecord;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::{RetrievedChunk, UploadResult};

// Global HTTP client with connection pooling
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(32)
        .build()
        .expect("Failed to build HTTP client")
});

/// Vector index holding chunk documents.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Upload a batch of embedded records, one outcome per document.
    ///
    /// Every record must carry a `content_vector`. The batch is sent in a
    /// single request; partial acceptance shows up as rejected entries in
    /// the returned outcomes, not as an error.
    async fn upload_documents(
        &self,
        records: &[ChunkRecord],
    ) -> Result<Vec<UploadResult>, SearchError>;

    /// Return up to `top_k` chunks nearest to `vector`.
    async fn vector_search(
        &self,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievedChunk>, SearchError>;
}

/// [`SearchIndex`] backed by an Azure AI Search index.
#[derive(Debug, Clone)]
pub struct AzureSearchClient {
    config: SearchConfig,
}

impl AzureSearchClient {
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    fn docs_url(&self, operation: &str) -> String {
        format!(
            "{}/indexes/{}/docs/{}?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.index,
            operation,
            self.config.api_version
        )
    }
}

#[async_trait]
impl SearchIndex for AzureSearchClient {
    async fn upload_documents(
        &self,
        records: &[ChunkRecord],
    ) -> Result<Vec<UploadResult>, SearchError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }
        ensure_embedded(records)?;

        let body = serde_json::json!({ "value": upload_actions(records)? });
        info!(
            documents = records.len(),
            index = %self.config.index,
            "uploading documents"
        );

        let response = HTTP_CLIENT
            .post(self.docs_url("index"))
            .header("api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        // 207 Multi-Status marks a partially rejected batch; per-document
        // outcomes are in the body either way.
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: IndexBatchResponse = response
            .json()
            .await
            .map_err(|err| SearchError::MalformedResponse(err.to_string()))?;
        Ok(parsed.value)
    }

    async fn vector_search(
        &self,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievedChunk>, SearchError> {
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let request = SearchRequest {
            search: "*",
            select: "source,content,chunk_id,page_number",
            top: top_k,
            vector_queries: [VectorQuery {
                kind: "vector",
                vector,
                fields: "content_vector",
                k: top_k,
            }],
        };

        let response = HTTP_CLIENT
            .post(self.docs_url("search"))
            .header("api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|err| SearchError::MalformedResponse(err.to_string()))?;

        debug!(hits = parsed.value.len(), "vector query complete");
        Ok(parsed.value)
    }
}

fn ensure_embedded(records: &[ChunkRecord]) -> Result<(), SearchError> {
    for record in records {
        if record.content_vector.is_none() {
            return Err(SearchError::MissingVector {
                chunk_id: record.chunk_id.clone(),
            });
        }
    }
    Ok(())
}

fn upload_actions(records: &[ChunkRecord]) -> Result<Vec<Value>, SearchError> {
    records
        .iter()
        .map(|record| {
            let mut doc = serde_json::to_value(record).map_err(SearchError::Serialize)?;
            if let Value::Object(map) = &mut doc {
                map.insert("@search.action".to_string(), Value::from("upload"));
            }
            Ok(doc)
        })
        .collect()
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    search: &'static str,
    select: &'static str,
    top: usize,
    #[serde(rename = "vectorQueries")]
    vector_queries: [VectorQuery<'a>; 1],
}

#[derive(Serialize)]
struct VectorQuery<'a> {
    kind: &'static str,
    vector: &'a [f32],
    fields: &'static str,
    k: usize,
}

#[derive(Debug, Deserialize)]
struct IndexBatchResponse {
    value: Vec<UploadResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    value: Vec<RetrievedChunk>,
}
