mod factory;
mod ollama;
mod open_ai;

pub use factory::ProviderFactory;
pub use ollama::OllamaProvider;
pub use open_ai::{resolve_api_key, OpenAIProvider};

use async_trait::async_trait;
use log::debug;
use serde_json::{json, Value};
use std::error::Error;

use crate::config::GenerationConfig;

/// Token counts reported by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: Option<u32>,
    pub output_tokens: Option<u32>,
}

/// Metadata about a completion call
#[derive(Debug, Clone, Default)]
pub struct CompletionMetadata {
    /// Model version reported by the provider
    pub model_version: Option<String>,
    pub tokens_used: TokenUsage,
    pub latency_ms: u64,
}

/// Generated text plus call metadata
#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,
    pub metadata: CompletionMetadata,
}

/// Unified trait for all text-generation providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "openai", "ollama")
    fn provider_name(&self) -> &str;

    /// Send a single-turn prompt and return the generated text
    async fn complete(
        &self,
        prompt: &str,
        params: &GenerationConfig,
    ) -> Result<Completion, Box<dyn Error + Send + Sync>>;
}

/// Request body for an OpenAI-compatible chat completion endpoint
fn chat_request(model: &str, prompt: &str, params: &GenerationConfig) -> Value {
    json!({
        "model": model,
        "messages": [
            {"role": "user", "content": prompt}
        ],
        "temperature": params.temperature,
        "top_p": params.top_p,
        "frequency_penalty": params.frequency_penalty,
        "presence_penalty": params.presence_penalty,
        "max_tokens": params.max_tokens
    })
}

/// Pull the generated text and usage out of an OpenAI-compatible response
fn parse_chat_response(
    provider: &str,
    response_body: Value,
    latency_ms: u64,
) -> Result<Completion, Box<dyn Error + Send + Sync>> {
    debug!("{} response: {:?}", provider, response_body);

    // Check for API error response
    if let Some(error) = response_body.get("error") {
        let error_message = error
            .as_str()
            .unwrap_or_else(|| error["message"].as_str().unwrap_or("Unknown error"));
        return Err(format!("{} API error: {}", provider, error_message).into());
    }

    let content = response_body["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| format!("Failed to extract content from {} response", provider))?
        .to_string();

    let model_version = response_body["model"].as_str().map(|s| s.to_string());
    let input_tokens = response_body["usage"]["prompt_tokens"]
        .as_u64()
        .map(|v| v as u32);
    let output_tokens = response_body["usage"]["completion_tokens"]
        .as_u64()
        .map(|v| v as u32);

    Ok(Completion {
        content,
        metadata: CompletionMetadata {
            model_version,
            tokens_used: TokenUsage {
                input_tokens,
                output_tokens,
            },
            latency_ms,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> GenerationConfig {
        GenerationConfig {
            temperature: 0.2,
            top_p: 1.0,
            frequency_penalty: 1.02,
            presence_penalty: 1.02,
            max_tokens: 75,
        }
    }

    #[test]
    fn test_chat_request_carries_sampling_params() {
        let body = chat_request("gpt-3.5-turbo", "Write a caption", &params());
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["messages"][0]["content"], "Write a caption");
        assert_eq!(body["max_tokens"], 75);
        assert!((body["frequency_penalty"].as_f64().unwrap() - 1.02).abs() < 1e-6);
    }

    #[test]
    fn test_parse_chat_response() {
        let body = json!({
            "model": "gpt-3.5-turbo-0125",
            "choices": [{"message": {"content": "Cocktail Name: Foo"}}],
            "usage": {"prompt_tokens": 120, "completion_tokens": 80}
        });
        let completion = parse_chat_response("openai", body, 12).unwrap();
        assert_eq!(completion.content, "Cocktail Name: Foo");
        assert_eq!(
            completion.metadata.model_version.as_deref(),
            Some("gpt-3.5-turbo-0125")
        );
        assert_eq!(completion.metadata.tokens_used.input_tokens, Some(120));
        assert_eq!(completion.metadata.latency_ms, 12);
    }

    #[test]
    fn test_parse_chat_response_error_object() {
        let body = json!({"error": {"message": "Incorrect API key provided"}});
        let err = parse_chat_response("openai", body, 0).unwrap_err();
        assert!(err.to_string().contains("Incorrect API key provided"));
    }

    #[test]
    fn test_parse_chat_response_without_choices() {
        let err = parse_chat_response("ollama", json!({}), 0).unwrap_err();
        assert!(err.to_string().contains("ollama"));
    }
}
