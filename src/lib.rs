pub mod archive;
pub mod assembler;
pub mod catalog;
pub mod config;
pub mod error;
pub mod extractor;
pub mod images;
pub mod model;
pub mod pipeline;
pub mod providers;
pub mod render;

pub use assembler::{
    build_caption_prompt, build_generation_prompt, build_image_prompt, PromptAssembler,
};
pub use crate::config::MixologistConfig;
pub use error::MixologyError;
pub use extractor::{extract, IngredientsBlockStart, ResponseExtractor};
pub use model::{Craziness, DrinkKind, MixRecord, RecipeForm, RecipeRequest, RecipeResponse};
pub use pipeline::{Mixologist, MixologistBuilder};

/// Mix one drink from a form using `config.toml` and `MIXOLOGIST__*` settings.
///
/// # Example
/// ```no_run
/// use mixologist::{mix_drink, DrinkKind, RecipeForm};
///
/// # async fn run() -> Result<(), mixologist::MixologyError> {
/// let form = RecipeForm {
///     drink: DrinkKind::Punch,
///     occasion: "Party".to_string(),
///     ..Default::default()
/// };
/// let record = mix_drink(form).await?;
/// println!("{}", record.response.cocktail_name);
/// # Ok(())
/// # }
/// ```
pub async fn mix_drink(form: RecipeForm) -> Result<MixRecord, MixologyError> {
    let config = MixologistConfig::load()?;
    let mixologist = Mixologist::builder().config(config).build()?;
    mixologist.mix_form(form).await
}
