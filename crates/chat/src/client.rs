//! Azure OpenAI chat completions client.

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ChatModelConfig;
use crate::error::ChatError;

// Global HTTP client with connection pooling
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(32)
        .build()
        .expect("Failed to build HTTP client")
});

/// A model that completes a system/user message pair.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, ChatError>;
}

/// [`ChatModel`] backed by an Azure OpenAI chat deployment.
#[derive(Debug, Clone)]
pub struct AzureChatClient {
    config: ChatModelConfig,
    url: String,
}

impl AzureChatClient {
    pub fn new(config: ChatModelConfig) -> Result<Self, ChatError> {
        config.validate()?;
        let url = completions_url(&config);
        Ok(Self { config, url })
    }

    pub fn config(&self) -> &ChatModelConfig {
        &self.config
    }
}

#[async_trait]
impl ChatModel for AzureChatClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, ChatError> {
        let request = ChatRequest {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = HTTP_CLIENT
            .post(&self.url)
            .header("api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|err| ChatError::MalformedResponse(err.to_string()))?;

        let answer = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                ChatError::MalformedResponse("response contained no choices".to_string())
            })?;

        debug!(chars = answer.len(), "completion received");
        Ok(answer)
    }
}

fn completions_url(config: &ChatModelConfig) -> String {
    format!(
        "{}/openai/deployments/{}/chat/completions?api-version={}",
        config.endpoint.trim_end_matches('/'),
        config.deployment,
        config.api_version
    )
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}
