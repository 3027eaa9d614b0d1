//! LLM Pool: provider selection for prompt-in, text-out completion.
//!
//! Wraps the provider clients behind `CompletionBackend` so the HTTP handlers
//! only see "prompt in, text out". Built once from config at startup.

pub mod client;
pub mod prompts;
pub mod types;

use async_trait::async_trait;

pub use client::{AnthropicClient, GeminiClient, LlmError};
use types::{GenerateContentRequest, Message, MessagesRequest};

use crate::config::{LlmConfig, Provider};

/// Anthropic requires `max_tokens`; Gemini uses its own default when unset.
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Anything that turns a prompt into text.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug)]
enum ProviderClient {
    Gemini(GeminiClient),
    Anthropic(AnthropicClient),
}

/// LLM connection pool with a fixed provider and model.
#[derive(Debug)]
pub struct LlmPool {
    client: ProviderClient,
    model: String,
    max_tokens: Option<u32>,
}

impl LlmPool {
    /// Create a pool from config. The API key must already be resolved.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                LlmError::MissingApiKey(format!(
                    "{} not set and no llm.api_key in config",
                    config.provider.api_key_env()
                ))
            })?;

        let client = match (config.provider, config.base_url.clone()) {
            (Provider::Gemini, Some(url)) => {
                ProviderClient::Gemini(GeminiClient::with_base_url(api_key, url))
            }
            (Provider::Gemini, None) => ProviderClient::Gemini(GeminiClient::new(api_key)),
            (Provider::Anthropic, Some(url)) => {
                ProviderClient::Anthropic(AnthropicClient::with_base_url(api_key, url))
            }
            (Provider::Anthropic, None) => {
                ProviderClient::Anthropic(AnthropicClient::new(api_key))
            }
        };

        Ok(Self {
            client,
            model: config.model().to_string(),
            max_tokens: config.max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider(&self) -> Provider {
        match self.client {
            ProviderClient::Gemini(_) => Provider::Gemini,
            ProviderClient::Anthropic(_) => Provider::Anthropic,
        }
    }
}

#[async_trait]
impl CompletionBackend for LlmPool {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let text = match &self.client {
            ProviderClient::Gemini(client) => {
                let request = GenerateContentRequest::prompt(prompt, self.max_tokens);
                client.generate_content(&self.model, &request).await?.text()
            }
            ProviderClient::Anthropic(client) => {
                let request = MessagesRequest {
                    model: self.model.clone(),
                    max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
                    messages: vec![Message::user(prompt)],
                    system: None,
                    temperature: None,
                };
                client.messages(&request).await?.text().map(str::to_string)
            }
        };
        text.ok_or(LlmError::EmptyResponse)
    }
}
