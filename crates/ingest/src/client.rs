//! HTTP client for the document partition service.
//!
//! The service accepts a document upload and returns the layout elements
//! it detected, as a JSON array. Elements come back in reading order.

use std::path::Path;
use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::multipart::{Form, Part};
use tracing::info;

use crate::error::IngestError;
use crate::types::Element;

/// Hosted partition endpoint used when no URL is configured.
pub const DEFAULT_PARTITION_API_URL: &str = "https://api.unstructured.io/general/v0/general";

/// Shared HTTP client. High-resolution partitioning of large documents
/// can run for minutes, so the request timeout is generous.
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(300))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to build HTTP client")
});

/// Where and how to partition documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionConfig {
    /// Partition service endpoint.
    pub api_url: String,

    /// API key, required by the hosted service. Self-hosted deployments
    /// accept unauthenticated requests.
    pub api_key: Option<String>,

    /// Partition strategy passed to the service. `hi_res` runs layout
    /// detection and is the slowest and most accurate option.
    pub strategy: String,

    /// Ask the service to recover table structure from PDFs.
    pub infer_table_structure: bool,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_PARTITION_API_URL.to_string(),
            api_key: None,
            strategy: "hi_res".to_string(),
            infer_table_structure: true,
        }
    }
}

impl PartitionConfig {
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = strategy.into();
        self
    }

    pub fn validate(&self) -> Result<(), IngestError> {
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(IngestError::InvalidConfig(format!(
                "partition api_url must be an http(s) URL, got {:?}",
                self.api_url
            )));
        }
        if self.strategy.is_empty() {
            return Err(IngestError::InvalidConfig(
                "partition strategy must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Client for the partition service.
#[derive(Debug, Clone)]
pub struct PartitionClient {
    config: PartitionConfig,
}

impl PartitionClient {
    pub fn new(config: PartitionConfig) -> Result<Self, IngestError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PartitionConfig {
        &self.config
    }

    /// Upload a document and return its layout elements in reading order.
    pub async fn partition_file(&self, source: &Path) -> Result<Vec<Element>, IngestError> {
        let bytes = tokio::fs::read(source)
            .await
            .map_err(|err| IngestError::Io {
                path: source.to_path_buf(),
                source: err,
            })?;

        let file_name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string());

        info!(
            file = %source.display(),
            bytes = bytes.len(),
            strategy = %self.config.strategy,
            "partitioning document"
        );

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/pdf")?;
        let mut form = Form::new()
            .part("files", part)
            .text("strategy", self.config.strategy.clone());
        if self.config.infer_table_structure {
            form = form.text("pdf_infer_table_structure", "true");
        }

        let mut request = HTTP_CLIENT.post(&self.config.api_url).multipart(form);
        if let Some(key) = &self.config.api_key {
            request = request.header("unstructured-api-key", key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IngestError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let elements: Vec<Element> = response
            .json()
            .await
            .map_err(|err| IngestError::MalformedResponse(err.to_string()))?;

        info!(elements = elements.len(), "partition complete");
        Ok(elements)
    }
}
