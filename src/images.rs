//! Image generation for the finished drink.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::error::Error;
use std::time::Duration;

use crate::config::ImageConfig;
use crate::error::MixologyError;
use crate::providers::resolve_api_key;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Result of an image request: the raw service response and the first image URL
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub url: Option<String>,
    pub raw: Value,
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    fn provider_name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, Box<dyn Error + Send + Sync>>;
}

/// OpenAI images API (`/v1/images/generations`)
pub struct OpenAIImageGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: Option<String>,
    size: String,
    count: u32,
}

impl OpenAIImageGenerator {
    /// Create from configuration. `provider_key` is the text provider's key,
    /// used when the image section has none of its own.
    pub fn new(
        config: &ImageConfig,
        provider_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, MixologyError> {
        let api_key = resolve_api_key(config.api_key.as_deref().or(provider_key))?;

        Ok(OpenAIImageGenerator {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: config.model.clone(),
            size: config.size.clone(),
            count: config.count,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let defaults = ImageConfig::default();
        OpenAIImageGenerator {
            client: Client::new(),
            api_key,
            base_url,
            model: None,
            size: defaults.size,
            count: defaults.count,
        }
    }

    fn request_body(&self, prompt: &str) -> Value {
        let mut body = json!({
            "prompt": prompt,
            "n": self.count,
            "size": self.size
        });
        if let Some(model) = &self.model {
            body["model"] = json!(model);
        }
        body
    }
}

#[async_trait]
impl ImageGenerator for OpenAIImageGenerator {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, Box<dyn Error + Send + Sync>> {
        let response_body: Value = self
            .client
            .post(format!("{}/v1/images/generations", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&self.request_body(prompt))
            .send()
            .await?
            .json()
            .await?;
        debug!("Image response: {:?}", response_body);

        if let Some(error) = response_body.get("error") {
            let error_message = error
                .as_str()
                .unwrap_or_else(|| error["message"].as_str().unwrap_or("Unknown error"));
            return Err(format!("Image API error: {}", error_message).into());
        }

        if !response_body["data"].is_array() {
            return Err("Image response has no data".into());
        }

        let url = response_body["data"][0]["url"].as_str().map(String::from);
        Ok(GeneratedImage {
            url,
            raw: response_body,
        })
    }
}
