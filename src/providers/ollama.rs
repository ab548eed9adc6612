use super::{chat_request, parse_chat_response, Completion, LlmProvider};
use crate::config::{GenerationConfig, ProviderConfig};
use crate::error::MixologyError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::error::Error;
use std::time::{Duration, Instant};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Local models served by Ollama. No credential needed.
pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider from configuration
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, MixologyError> {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(OllamaProvider {
            client: Client::builder().timeout(timeout).build()?,
            base_url,
            model: config.model.clone(),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(base_url: String, model: String) -> Self {
        OllamaProvider {
            client: Client::new(),
            base_url,
            model,
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    async fn complete(
        &self,
        prompt: &str,
        params: &GenerationConfig,
    ) -> Result<Completion, Box<dyn Error + Send + Sync>> {
        let start = Instant::now();

        // Ollama uses OpenAI-compatible API
        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&chat_request(&self.model, prompt, params))
            .send()
            .await?;

        let latency_ms = start.elapsed().as_millis() as u64;
        let response_body: Value = response.json().await?;

        parse_chat_response(self.provider_name(), response_body, latency_ms)
    }
}
