use thiserror::Error;

use crate::archive::ArchiveError;
use crate::extractor::ExtractError;

/// Errors that can occur while mixing a drink
#[derive(Error, Debug)]
pub enum MixologyError {
    /// No API key for the generation service; nothing was sent
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Form values that are not part of the catalogs
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The generated text did not contain a required section marker
    #[error("Failed to extract recipe: {0}")]
    Extraction(#[from] ExtractError),

    /// The text-generation provider failed or answered with an error
    #[error("Text generation failed: {0}")]
    Provider(String),

    /// The image-generation service failed or answered with an error
    #[error("Image generation failed: {0}")]
    Image(String),

    /// Transport-level HTTP failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Archive write failed
    #[error("Archive failed: {0}")]
    Archive(#[from] ArchiveError),

    /// Failed to serialize the working state
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}
