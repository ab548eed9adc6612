use chrono::Local;
use log::{debug, info};
use rand::Rng;
use serde_json::Value;
use std::time::Duration;

use crate::archive::{sink_from_config, ArchiveSink, DisabledArchive};
use crate::assembler::{
    build_caption_prompt, build_generation_prompt, build_image_prompt, PromptAssembler,
};
use crate::config::{GenerationConfig, MixologistConfig, ProviderConfig};
use crate::error::MixologyError;
use crate::extractor::{IngredientsBlockStart, ResponseExtractor};
use crate::images::{ImageGenerator, OpenAIImageGenerator};
use crate::model::{Craziness, MixRecord, RecipeForm, RecipeRequest};
use crate::providers::{LlmProvider, ProviderFactory};

/// Runs one submission end to end: prompts, generation, parsing, image, archive.
pub struct Mixologist {
    provider: Box<dyn LlmProvider>,
    image_generator: Option<Box<dyn ImageGenerator>>,
    archive: Box<dyn ArchiveSink>,
    assembler: PromptAssembler,
    extractor: ResponseExtractor,
    generation: GenerationConfig,
    caption: GenerationConfig,
}

impl Mixologist {
    /// Creates a new builder
    ///
    /// # Example
    /// ```
    /// use mixologist::Mixologist;
    ///
    /// let builder = Mixologist::builder().craziness(3);
    /// ```
    pub fn builder() -> MixologistBuilder {
        MixologistBuilder::default()
    }

    /// Assemble from already constructed services, with default sampling and parsing
    pub fn new(
        provider: Box<dyn LlmProvider>,
        image_generator: Box<dyn ImageGenerator>,
        archive: Box<dyn ArchiveSink>,
    ) -> Self {
        let defaults = MixologistConfig::default();
        Self {
            provider,
            image_generator: Some(image_generator),
            archive,
            assembler: PromptAssembler::default(),
            extractor: ResponseExtractor::default(),
            generation: defaults.generation,
            caption: defaults.caption,
        }
    }

    /// Skip the image step; the record then carries no image
    pub fn without_images(mut self) -> Self {
        self.image_generator = None;
        self
    }

    pub fn with_assembler(mut self, assembler: PromptAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    pub fn with_extractor(mut self, extractor: ResponseExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_caption(mut self, caption: GenerationConfig) -> Self {
        self.caption = caption;
        self
    }

    pub fn generation(&self) -> &GenerationConfig {
        &self.generation
    }

    /// Validate the form and draw the random parts of the request
    pub fn prepare<R: Rng + ?Sized>(
        &self,
        form: RecipeForm,
        rng: &mut R,
    ) -> Result<RecipeRequest, MixologyError> {
        self.assembler.prepare(form, rng)
    }

    /// Prepare a request from the form with the thread RNG, then mix it
    pub async fn mix_form(&self, form: RecipeForm) -> Result<MixRecord, MixologyError> {
        let request = self.prepare(form, &mut rand::thread_rng())?;
        self.mix(request).await
    }

    /// Run the pipeline for one request.
    ///
    /// Calls happen strictly in order: recipe, caption, image, archive. Any
    /// failure ends the submission.
    pub async fn mix(&self, request: RecipeRequest) -> Result<MixRecord, MixologyError> {
        info!(
            "Building your {} recipe that pairs well with {} cuisine and {} for your {} occasion",
            request.drink, request.cuisine, request.main_dish, request.occasion
        );

        let generation_prompt = build_generation_prompt(&request);
        let caption_prompt = build_caption_prompt(&request);
        debug!("Generation prompt: {}", generation_prompt);

        let cocktail = self
            .provider
            .complete(&generation_prompt, &self.generation)
            .await
            .map_err(|e| MixologyError::Provider(e.to_string()))?;
        debug!(
            "Recipe generated by {} in {}ms",
            self.provider.provider_name(),
            cocktail.metadata.latency_ms
        );

        let caption = self
            .provider
            .complete(&caption_prompt, &self.caption)
            .await
            .map_err(|e| MixologyError::Provider(e.to_string()))?;

        let mut response = self.extractor.extract(&cocktail.content)?;
        response.caption = caption.content.trim().to_string();
        response.ingredient_list = request.ingredients().map(String::from).collect();
        response.inspiration = request.inspiration.clone();
        info!("Generated '{}'", response.cocktail_name);

        let image_prompt = build_image_prompt(&request, &response.cocktail_name);
        debug!("Image prompt: {}", image_prompt);
        let (image_url, image_response) = match &self.image_generator {
            Some(generator) => {
                let image = generator
                    .generate(&image_prompt)
                    .await
                    .map_err(|e| MixologyError::Image(e.to_string()))?;
                (image.url, image.raw)
            }
            None => (None, Value::Null),
        };

        let record = MixRecord {
            request,
            generation_prompt,
            caption_prompt,
            cocktail: cocktail.content,
            caption: caption.content,
            image_prompt,
            image_url,
            image_response,
            response,
            created_at: Local::now(),
        };

        self.archive.archive(&record).await?;
        Ok(record)
    }
}

/// Builder for configuring a [`Mixologist`]
#[derive(Default)]
pub struct MixologistBuilder {
    config: Option<MixologistConfig>,
    provider: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    craziness: Option<u8>,
    archive: Option<Box<dyn ArchiveSink>>,
    skip_archive: bool,
}

impl MixologistBuilder {
    /// Start from a loaded configuration instead of the defaults
    pub fn config(mut self, config: MixologistConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Select the text-generation provider by name ("openai" or "ollama")
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Set the API key for the text-generation provider
    ///
    /// This allows passing the API key directly instead of relying on
    /// environment variables or config files.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the model name for the text-generation provider
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the craziness level (0-10), which overrides the generation temperature
    pub fn craziness(mut self, level: u8) -> Self {
        self.craziness = Some(level);
        self
    }

    /// Archive to a custom sink instead of the configured one
    pub fn archive(mut self, sink: Box<dyn ArchiveSink>) -> Self {
        self.archive = Some(sink);
        self
    }

    /// Do not archive anything
    pub fn skip_archive(mut self) -> Self {
        self.skip_archive = true;
        self
    }

    /// Build the mixologist
    ///
    /// # Errors
    /// Returns `MixologyError` if:
    /// - The craziness level is out of range
    /// - The provider is unknown or disabled
    /// - No API key is available for OpenAI text generation, or for image
    ///   generation while it is enabled
    /// - The http archive backend has no endpoint
    pub fn build(self) -> Result<Mixologist, MixologyError> {
        let mut config = self.config.unwrap_or_default();
        let timeout = Duration::from_secs(config.timeout);

        let craziness = self.craziness.map(Craziness::new).transpose()?;

        if let Some(provider) = self.provider {
            config.default_provider = provider;
        }
        let provider_name = config.default_provider.clone();
        let provider_config = config
            .providers
            .entry(provider_name.clone())
            .or_insert_with(|| ProviderConfig {
                enabled: true,
                model: default_model_for(&provider_name).to_string(),
                api_key: None,
                base_url: None,
            });
        if let Some(key) = self.api_key {
            provider_config.api_key = Some(key);
        }
        if let Some(model) = self.model {
            provider_config.model = model;
        }

        let provider = ProviderFactory::create(&provider_name, provider_config, timeout)?;

        let image_generator = if config.image.enabled {
            let openai_key = config
                .providers
                .get("openai")
                .and_then(|openai| openai.api_key.clone());
            Some(OpenAIImageGenerator::new(
                &config.image,
                openai_key.as_deref(),
                timeout,
            )?)
        } else {
            None
        };

        let archive: Box<dyn ArchiveSink> = match (self.archive, self.skip_archive) {
            (_, true) => Box::new(DisabledArchive),
            (Some(sink), false) => sink,
            (None, false) => sink_from_config(&config.archive, timeout)?,
        };

        let mut generation = config.generation.clone();
        if let Some(craziness) = craziness {
            generation.temperature = craziness.temperature();
        }

        let ingredients_start = if config.extraction.ingredients_from_marker {
            IngredientsBlockStart::IngredientsMarker
        } else {
            IngredientsBlockStart::TextStart
        };

        Ok(Mixologist {
            provider,
            image_generator: image_generator
                .map(|generator| Box::new(generator) as Box<dyn ImageGenerator>),
            archive,
            assembler: PromptAssembler::new(config.sampling.clone()),
            extractor: ResponseExtractor::new(ingredients_start),
            generation,
            caption: config.caption.clone(),
        })
    }
}

fn default_model_for(provider: &str) -> &'static str {
    match provider {
        "ollama" => "llama3",
        _ => "gpt-3.5-turbo",
    }
}
