use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct MixologistConfig {
    /// Provider used for text generation when not specified
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Map of provider name to provider configuration
    #[serde(default = "default_providers")]
    pub providers: HashMap<String, ProviderConfig>,
    /// Sampling parameters for the recipe generation call
    #[serde(
        default = "default_generation",
        deserialize_with = "deserialize_generation"
    )]
    pub generation: GenerationConfig,
    /// Sampling parameters for the caption call
    #[serde(default = "default_caption", deserialize_with = "deserialize_caption")]
    pub caption: GenerationConfig,
    /// Image generation settings
    #[serde(default)]
    pub image: ImageConfig,
    /// Ingredient and inspiration sampling
    #[serde(default)]
    pub sampling: SamplingConfig,
    /// Response parsing behaviour
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Where finished drinks are archived
    #[serde(default)]
    pub archive: ArchiveConfig,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Configuration for a specific text-generation provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Model identifier (e.g., "gpt-3.5-turbo", "llama3")
    #[serde(default = "default_model")]
    pub model: String,
    /// API key for authentication (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
}

/// Sampling parameters sent with a completion request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    pub max_tokens: u32,
}

/// A `[generation]` or `[caption]` section as written; unset keys keep the
/// section's own defaults.
#[derive(Debug, Deserialize)]
struct GenerationOverrides {
    temperature: Option<f32>,
    top_p: Option<f32>,
    frequency_penalty: Option<f32>,
    presence_penalty: Option<f32>,
    max_tokens: Option<u32>,
}

impl GenerationOverrides {
    fn apply(self, base: GenerationConfig) -> GenerationConfig {
        GenerationConfig {
            temperature: self.temperature.unwrap_or(base.temperature),
            top_p: self.top_p.unwrap_or(base.top_p),
            frequency_penalty: self.frequency_penalty.unwrap_or(base.frequency_penalty),
            presence_penalty: self.presence_penalty.unwrap_or(base.presence_penalty),
            max_tokens: self.max_tokens.unwrap_or(base.max_tokens),
        }
    }
}

fn deserialize_generation<'de, D>(deserializer: D) -> Result<GenerationConfig, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(GenerationOverrides::deserialize(deserializer)?.apply(default_generation()))
}

fn deserialize_caption<'de, D>(deserializer: D) -> Result<GenerationConfig, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(GenerationOverrides::deserialize(deserializer)?.apply(default_caption()))
}

/// Configuration for the image-generation service
#[derive(Debug, Deserialize, Clone)]
pub struct ImageConfig {
    /// Whether a picture of the drink is generated
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Image model; the service default is used when unset
    pub model: Option<String>,
    /// Square resolution requested from the service
    #[serde(default = "default_image_size")]
    pub size: String,
    /// Number of images requested
    #[serde(default = "default_image_count")]
    pub count: u32,
    /// API key; falls back to the OpenAI provider key, then `OPENAI_API_KEY`
    pub api_key: Option<String>,
    /// Base URL for API endpoint
    pub base_url: Option<String>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: None,
            size: default_image_size(),
            count: default_image_count(),
            api_key: None,
            base_url: None,
        }
    }
}

/// How many catalog entries are drawn per request
#[derive(Debug, Deserialize, Clone)]
pub struct SamplingConfig {
    /// Ingredients drawn for Cocktail, Shot and Punch
    #[serde(default = "default_alcoholic_count")]
    pub alcoholic_count: usize,
    /// Ingredients drawn for Non-Alcoholic drinks
    #[serde(default = "default_non_alcoholic_count")]
    pub non_alcoholic_count: usize,
    /// Whether a named drink is drawn as inspiration
    #[serde(default = "default_true")]
    pub inspiration: bool,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            alcoholic_count: default_alcoholic_count(),
            non_alcoholic_count: default_non_alcoholic_count(),
            inspiration: true,
        }
    }
}

/// Response parsing options
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ExtractionConfig {
    /// Start the ingredients block at the "Ingredients" marker instead of the
    /// start of the generated text
    #[serde(default)]
    pub ingredients_from_marker: bool,
}

/// Archive backend selection
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveBackend {
    /// JSON files in a local directory
    #[default]
    Local,
    /// HTTP PUT to an S3-compatible object store
    Http,
    /// Nothing is archived
    Disabled,
}

/// Configuration for the archive sink
#[derive(Debug, Deserialize, Clone)]
pub struct ArchiveConfig {
    #[serde(default)]
    pub backend: ArchiveBackend,
    /// Target directory for the local backend
    #[serde(default = "default_archive_directory")]
    pub directory: PathBuf,
    /// Object store endpoint for the http backend (e.g. "https://s3.us-east-1.amazonaws.com")
    pub endpoint: Option<String>,
    /// Bucket name for the http backend
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Optional bearer token sent with archive writes
    pub token: Option<String>,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            backend: ArchiveBackend::default(),
            directory: default_archive_directory(),
            endpoint: None,
            bucket: default_bucket(),
            token: None,
        }
    }
}

impl Default for MixologistConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            providers: default_providers(),
            generation: default_generation(),
            caption: default_caption(),
            image: ImageConfig::default(),
            sampling: SamplingConfig::default(),
            extraction: ExtractionConfig::default(),
            archive: ArchiveConfig::default(),
            timeout: default_timeout(),
        }
    }
}

// Default value functions
fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_providers() -> HashMap<String, ProviderConfig> {
    let mut providers = HashMap::new();
    providers.insert(
        "openai".to_string(),
        ProviderConfig {
            enabled: true,
            model: default_model(),
            api_key: None,
            base_url: None,
        },
    );
    providers
}

fn default_true() -> bool {
    true
}

fn default_top_p() -> f32 {
    1.0
}

// Positive values push the model away from repeating itself
fn default_penalty() -> f32 {
    1.02
}

fn default_generation() -> GenerationConfig {
    GenerationConfig {
        temperature: 1.0,
        top_p: default_top_p(),
        frequency_penalty: default_penalty(),
        presence_penalty: default_penalty(),
        max_tokens: 600,
    }
}

fn default_caption() -> GenerationConfig {
    GenerationConfig {
        temperature: 0.2,
        top_p: default_top_p(),
        frequency_penalty: default_penalty(),
        presence_penalty: default_penalty(),
        max_tokens: 75,
    }
}

fn default_image_size() -> String {
    "512x512".to_string()
}

fn default_image_count() -> u32 {
    1
}

fn default_alcoholic_count() -> usize {
    1
}

fn default_non_alcoholic_count() -> usize {
    3
}

fn default_archive_directory() -> PathBuf {
    PathBuf::from("archive")
}

fn default_bucket() -> String {
    "mixologist".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl MixologistConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with MIXOLOGIST__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: MIXOLOGIST__PROVIDERS__OPENAI__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from `config.toml` (optional) and `MIXOLOGIST__*` variables
pub fn load_config() -> Result<MixologistConfig, ConfigError> {
    build_config(File::with_name("config").required(false))
}

/// Load configuration from an explicit file, which must exist
pub fn load_config_from(path: &Path) -> Result<MixologistConfig, ConfigError> {
    build_config(File::from(path).required(true))
}

fn build_config<S>(file: S) -> Result<MixologistConfig, ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    let settings = Config::builder()
        .add_source(file)
        // Use double underscore for nested: MIXOLOGIST__PROVIDERS__OPENAI__API_KEY
        .add_source(
            Environment::with_prefix("MIXOLOGIST")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_values() {
        assert_eq!(default_provider(), "openai");
        assert_eq!(default_model(), "gpt-3.5-turbo");
        assert_eq!(default_penalty(), 1.02);
        assert_eq!(default_image_size(), "512x512");
        assert_eq!(default_timeout(), 30);
    }

    #[test]
    fn test_generation_and_caption_defaults_differ() {
        let config = MixologistConfig::default();
        assert_eq!(config.generation.temperature, 1.0);
        assert_eq!(config.generation.max_tokens, 600);
        assert_eq!(config.caption.temperature, 0.2);
        assert_eq!(config.caption.max_tokens, 75);
    }

    #[test]
    fn test_default_sampling() {
        let sampling = SamplingConfig::default();
        assert_eq!(sampling.alcoholic_count, 1);
        assert_eq!(sampling.non_alcoholic_count, 3);
        assert!(sampling.inspiration);
    }

    #[test]
    fn test_default_config_has_openai_provider() {
        let config = MixologistConfig::default();
        let openai = config.providers.get("openai").unwrap();
        assert!(openai.enabled);
        assert!(openai.api_key.is_none());
        assert_eq!(config.archive.backend, ArchiveBackend::Local);
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
default_provider = "ollama"
timeout = 5

[providers.ollama]
model = "llama3"
base_url = "http://localhost:11434"

[caption]
temperature = 0.5
max_tokens = 50

[archive]
backend = "disabled"

[extraction]
ingredients_from_marker = true
"#
        )
        .unwrap();

        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.default_provider, "ollama");
        assert_eq!(config.timeout, 5);
        assert_eq!(config.providers["ollama"].model, "llama3");
        assert!(config.providers["ollama"].enabled);
        assert_eq!(config.caption.temperature, 0.5);
        assert_eq!(config.caption.frequency_penalty, 1.02);
        assert_eq!(config.generation.max_tokens, 600);
        assert_eq!(config.archive.backend, ArchiveBackend::Disabled);
        assert!(config.extraction.ingredients_from_marker);
    }

    #[test]
    fn test_partial_generation_sections_keep_their_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[generation]
temperature = 0.5

[caption]
max_tokens = 40
"#
        )
        .unwrap();

        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.generation.temperature, 0.5);
        assert_eq!(config.generation.max_tokens, 600);
        assert_eq!(config.generation.presence_penalty, 1.02);
        assert_eq!(config.caption.temperature, 0.2);
        assert_eq!(config.caption.max_tokens, 40);
    }

    #[test]
    fn test_load_config_missing_file_fails() {
        let result = load_config_from(Path::new("/nonexistent/mixologist.toml"));
        assert!(result.is_err());
    }
}
