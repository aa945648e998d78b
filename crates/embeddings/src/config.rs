//! Embedding deployment settings.

use serde::{Deserialize, Serialize};

use crate::error::EmbeddingsError;

/// API version used when `AZURE_OPENAI_API_VERSION` is unset.
pub const DEFAULT_API_VERSION: &str = "2024-02-01";

/// Connection settings for an Azure OpenAI embedding deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    pub endpoint: String,

    /// API key for the resource.
    pub api_key: String,

    /// Name of the embedding model deployment.
    pub deployment: String,

    /// REST API version.
    pub api_version: String,

    /// Expected vector width. When set, every returned embedding is
    /// checked against it and the request asks the model to produce
    /// exactly this many dimensions.
    pub dimensions: Option<usize>,
}

impl EmbeddingsConfig {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        deployment: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            deployment: deployment.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            dimensions: None,
        }
    }

    /// Build a config from environment variables.
    ///
    /// Requires `AZURE_OPENAI_ENDPOINT`, `AZURE_OPENAI_API_KEY` and
    /// `AZURE_OPENAI_EMBEDDING_DEPLOYMENT`. `AZURE_OPENAI_API_VERSION`
    /// and `AZURE_OPENAI_EMBEDDING_DIMENSIONS` are optional. All missing
    /// required variables are reported in one error.
    pub fn from_env() -> Result<Self, EmbeddingsError> {
        let mut missing = Vec::new();
        let mut read = |name: &'static str| match std::env::var(name) {
            Ok(value) if !value.is_empty() => Some(value),
            _ => {
                missing.push(name);
                None
            }
        };

        let endpoint = read("AZURE_OPENAI_ENDPOINT");
        let api_key = read("AZURE_OPENAI_API_KEY");
        let deployment = read("AZURE_OPENAI_EMBEDDING_DEPLOYMENT");

        if !missing.is_empty() {
            return Err(EmbeddingsError::Config(format!(
                "missing environment variables: {}",
                missing.join(", ")
            )));
        }

        let mut config = Self::new(
            endpoint.unwrap_or_default(),
            api_key.unwrap_or_default(),
            deployment.unwrap_or_default(),
        );

        if let Ok(version) = std::env::var("AZURE_OPENAI_API_VERSION") {
            if !version.is_empty() {
                config.api_version = version;
            }
        }
        if let Ok(dims) = std::env::var("AZURE_OPENAI_EMBEDDING_DIMENSIONS") {
            if !dims.is_empty() {
                let parsed = dims.parse::<usize>().map_err(|_| {
                    EmbeddingsError::Config(format!(
                        "AZURE_OPENAI_EMBEDDING_DIMENSIONS must be a positive integer, got {dims:?}"
                    ))
                })?;
                config.dimensions = Some(parsed);
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn validate(&self) -> Result<(), EmbeddingsError> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(EmbeddingsError::Config(format!(
                "endpoint must be an http(s) URL, got {:?}",
                self.endpoint
            )));
        }
        if self.api_key.is_empty() {
            return Err(EmbeddingsError::Config("api_key must not be empty".into()));
        }
        if self.deployment.is_empty() {
            return Err(EmbeddingsError::Config(
                "deployment must not be empty".into(),
            ));
        }
        if self.api_version.is_empty() {
            return Err(EmbeddingsError::Config(
                "api_version must not be empty".into(),
            ));
        }
        if self.dimensions == Some(0) {
            return Err(EmbeddingsError::Config(
                "dimensions must be greater than zero when set".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> EmbeddingsConfig {
        EmbeddingsConfig::new(
            "https://example.openai.azure.com",
            "key",
            "text-embedding-3-small",
        )
    }

    #[test]
    fn new_uses_default_api_version() {
        let config = test_config();
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
        assert_eq!(config.dimensions, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_endpoint() {
        let config = EmbeddingsConfig::new("example.openai.azure.com", "key", "deploy");
        assert!(matches!(
            config.validate(),
            Err(EmbeddingsError::Config(_))
        ));
    }

    #[test]
    fn validate_rejects_empty_key_and_deployment() {
        let config = EmbeddingsConfig::new("https://example.com", "", "deploy");
        assert!(config.validate().is_err());

        let config = EmbeddingsConfig::new("https://example.com", "key", "");
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_dimensions() {
        let config = test_config().with_dimensions(0);
        assert!(config.validate().is_err());

        let config = test_config().with_dimensions(1536);
        assert!(config.validate().is_ok());
    }
}
