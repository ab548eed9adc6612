use super::{chat_request, parse_chat_response, Completion, LlmProvider};
use crate::config::{GenerationConfig, ProviderConfig};
use crate::error::MixologyError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::error::Error;
use std::time::{Duration, Instant};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

/// Resolve the OpenAI key from configuration, then `OPENAI_API_KEY`.
///
/// Blank values count as missing.
pub fn resolve_api_key(configured: Option<&str>) -> Result<String, MixologyError> {
    configured
        .map(str::to_string)
        .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            MixologyError::MissingCredential(
                "OPENAI_API_KEY not found in config or environment".to_string(),
            )
        })
}

impl OpenAIProvider {
    /// Create a new OpenAI provider from configuration
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, MixologyError> {
        let api_key = resolve_api_key(config.api_key.as_deref())?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(OpenAIProvider {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url,
            model: config.model.clone(),
        })
    }

    /// Create a new OpenAI provider with simple parameters
    pub fn with_api_key(api_key: String, model: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string(), model)
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        OpenAIProvider {
            client: Client::new(),
            api_key,
            base_url,
            model,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        prompt: &str,
        params: &GenerationConfig,
    ) -> Result<Completion, Box<dyn Error + Send + Sync>> {
        let start = Instant::now();

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&chat_request(&self.model, prompt, params))
            .send()
            .await?;

        let latency_ms = start.elapsed().as_millis() as u64;
        let response_body: Value = response.json().await?;

        parse_chat_response(self.provider_name(), response_body, latency_ms)
    }
}
