//! Search service settings.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// API version used when `AZURE_SEARCH_API_VERSION` is unset.
pub const DEFAULT_API_VERSION: &str = "2023-11-01";

/// Connection settings for an Azure AI Search index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Service endpoint, e.g. `https://my-service.search.windows.net`.
    pub endpoint: String,

    /// Admin or query key, depending on the operation.
    pub api_key: String,

    /// Name of the index holding the chunk documents.
    pub index: String,

    /// REST API version.
    pub api_version: String,
}

impl SearchConfig {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        index: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            index: index.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Build a config from environment variables.
    ///
    /// Requires `AZURE_SEARCH_ENDPOINT`, `AZURE_SEARCH_API_KEY` and
    /// `AZURE_SEARCH_INDEX`. `AZURE_SEARCH_API_VERSION` is optional. All
    /// missing required variables are reported in one error.
    pub fn from_env() -> Result<Self, SearchError> {
        let mut missing = Vec::new();
        let mut read = |name: &'static str| match std::env::var(name) {
            Ok(value) if !value.is_empty() => Some(value),
            _ => {
                missing.push(name);
                None
            }
        };

        let endpoint = read("AZURE_SEARCH_ENDPOINT");
        let api_key = read("AZURE_SEARCH_API_KEY");
        let index = read("AZURE_SEARCH_INDEX");

        if !missing.is_empty() {
            return Err(SearchError::Config(format!(
                "missing environment variables: {}",
                missing.join(", ")
            )));
        }

        let mut config = Self::new(
            endpoint.unwrap_or_default(),
            api_key.unwrap_or_default(),
            index.unwrap_or_default(),
        );

        if let Ok(version) = std::env::var("AZURE_SEARCH_API_VERSION") {
            if !version.is_empty() {
                config.api_version = version;
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(SearchError::Config(format!(
                "endpoint must be an http(s) URL, got {:?}",
                self.endpoint
            )));
        }
        if self.api_key.is_empty() {
            return Err(SearchError::Config("api_key must not be empty".into()));
        }
        if self.index.is_empty() {
            return Err(SearchError::Config("index must not be empty".into()));
        }
        if self.api_version.is_empty() {
            return Err(SearchError::Config(
                "api_version must not be empty".into(),
            ));
        }
        Ok(())
    }
}
