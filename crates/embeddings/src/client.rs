//! Azure OpenAI embeddings client.

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::EmbeddingsConfig;
use crate::error::EmbeddingsError;

/// Attempts per request, counting the first one.
const MAX_ATTEMPTS: usize = 3;

// Global HTTP client with connection pooling
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(32)
        .build()
        .expect("Failed to build HTTP client")
});

/// Anything that turns a text into an embedding vector.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingsError>;
}

/// [`TextEmbedder`] backed by an Azure OpenAI embedding deployment.
#[derive(Debug, Clone)]
pub struct AzureEmbeddingsClient {
    config: EmbeddingsConfig,
    url: String,
}

impl AzureEmbeddingsClient {
    pub fn new(config: EmbeddingsConfig) -> Result<Self, EmbeddingsError> {
        config.validate()?;
        let url = embeddings_url(&config);
        Ok(Self { config, url })
    }

    pub fn config(&self) -> &EmbeddingsConfig {
        &self.config
    }

    async fn request_embedding(&self, text: &str) -> Result<Vec<f32>, EmbeddingsError> {
        let request = EmbeddingRequest {
            input: [text],
            dimensions: self.config.dimensions,
        };

        let mut attempt = 0usize;
        loop {
            let response = HTTP_CLIENT
                .post(&self.url)
                .header("api-key", &self.config.api_key)
                .json(&request)
                .send()
                .await;

            match response {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        let mut parsed: EmbeddingResponse = resp
                            .json()
                            .await
                            .map_err(|err| EmbeddingsError::MalformedResponse(err.to_string()))?;
                        parsed.data.sort_by_key(|entry| entry.index);
                        return parsed
                            .data
                            .into_iter()
                            .next()
                            .map(|entry| entry.embedding)
                            .ok_or_else(|| {
                                EmbeddingsError::MalformedResponse(
                                    "response contained no embeddings".to_string(),
                                )
                            });
                    }

                    let body = resp.text().await.unwrap_or_default();
                    if should_retry_status(status) && attempt + 1 < MAX_ATTEMPTS {
                        attempt += 1;
                        warn!(
                            status = status.as_u16(),
                            attempt, "embedding request failed, retrying"
                        );
                        tokio::time::sleep(retry_backoff(attempt)).await;
                        continue;
                    }
                    return Err(EmbeddingsError::Api {
                        status: status.as_u16(),
                        body,
                    });
                }
                Err(err) => {
                    if is_retryable_error(&err) && attempt + 1 < MAX_ATTEMPTS {
                        attempt += 1;
                        warn!(attempt, error = %err, "embedding request failed, retrying");
                        tokio::time::sleep(retry_backoff(attempt)).await;
                        continue;
                    }
                    return Err(err.into());
                }
            }
        }
    }
}

#[async_trait]
impl TextEmbedder for AzureEmbeddingsClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingsError> {
        let embedding = self.request_embedding(text).await?;

        if let Some(expected) = self.config.dimensions {
            if embedding.len() != expected {
                return Err(EmbeddingsError::DimensionMismatch {
                    expected,
                    actual: embedding.len(),
                });
            }
        }

        debug!(dimensions = embedding.len(), "embedded text");
        Ok(embedding)
    }
}

fn embeddings_url(config: &EmbeddingsConfig) -> String {
    format!(
        "{}/openai/deployments/{}/embeddings?api-version={}",
        config.endpoint.trim_end_matches('/'),
        config.deployment,
        config.api_version
    )
}

fn should_retry_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}

fn retry_backoff(attempt: usize) -> Duration {
    let capped = attempt.min(5) as u32;
    Duration::from_millis(500 * (1 << capped))
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: [&'a str; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}
