//! Chat model deployment settings.

use serde::{Deserialize, Serialize};

use crate::error::ChatError;

/// API version used when `AZURE_OPENAI_API_VERSION` is unset.
pub const DEFAULT_API_VERSION: &str = "2024-02-01";

/// Connection settings for an Azure OpenAI chat deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatModelConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    pub endpoint: String,

    /// API key for the resource.
    pub api_key: String,

    /// Name of the chat model deployment.
    pub deployment: String,

    /// REST API version.
    pub api_version: String,

    /// Sampling temperature. Zero keeps answers deterministic and glued
    /// to the retrieved context.
    pub temperature: f32,

    /// Completion length cap, service default when unset.
    pub max_tokens: Option<u32>,
}

impl ChatModelConfig {
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
            temperature: 0.0,
            max_tokens: None,
        }
    }

    /// Build a config from environment variables.
    ///
    /// Requires `AZURE_OPENAI_ENDPOINT`, `AZURE_OPENAI_API_KEY` and
    /// `AZURE_OPENAI_CHAT_DEPLOYMENT`. `AZURE_OPENAI_API_VERSION` is
    /// optional. All missing required variables are reported in one
    /// error.
    pub fn from_env() -> Result<Self, ChatError> {
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
        let deployment = read("AZURE_OPENAI_CHAT_DEPLOYMENT");

        if !missing.is_empty() {
            return Err(ChatError::Config(format!(
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

        config.validate()?;
        Ok(config)
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn validate(&self) -> Result<(), ChatError> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ChatError::Config(format!(
                "endpoint must be an http(s) URL, got {:?}",
                self.endpoint
            )));
        }
        if self.api_key.is_empty() {
            return Err(ChatError::Config("api_key must not be empty".into()));
        }
        if self.deployment.is_empty() {
            return Err(ChatError::Config("deployment must not be empty".into()));
        }
        if self.api_version.is_empty() {
            return Err(ChatError::Config("api_version must not be empty".into()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ChatError::Config(format!(
                "temperature must be between 0 and 2, got {}",
                self.temperature
            )));
        }
        Ok(())
    }
}
