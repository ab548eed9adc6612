//! Prompt assembly: turns a [`RecipeForm`] into a [`RecipeRequest`] and the
//! request into the prompts sent to the generation services.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog;
use crate::config::SamplingConfig;
use crate::error::MixologyError;
use crate::model::{normalize_main_dish, DrinkKind, RecipeForm, RecipeRequest};

/// Template asking for a recipe under the literal section headers
/// `Cocktail Name:`, `Ingredients:`, `Instructions:`, `Citations:` and `Rationale:`.
///
/// Loaded from `generation_prompt.txt` at compile time. `{{NAME}}` placeholders
/// are filled by [`build_generation_prompt`].
pub const GENERATION_TEMPLATE: &str = include_str!("generation_prompt.txt");

/// Template for the short menu-style caption.
pub const CAPTION_TEMPLATE: &str = include_str!("caption_prompt.txt");

/// Validates form input and draws the random parts of a request.
#[derive(Debug, Clone, Default)]
pub struct PromptAssembler {
    sampling: SamplingConfig,
}

impl PromptAssembler {
    pub fn new(sampling: SamplingConfig) -> Self {
        Self { sampling }
    }

    /// Number of catalog ingredients drawn for this kind of drink
    pub fn sample_size(&self, drink: DrinkKind) -> usize {
        if drink.is_alcoholic() {
            self.sampling.alcoholic_count
        } else {
            self.sampling.non_alcoholic_count
        }
    }

    /// Apply form defaults, validate against the catalogs and sample ingredients
    /// and inspiration from the catalogs matching the drink kind.
    pub fn prepare<R: Rng + ?Sized>(
        &self,
        form: RecipeForm,
        rng: &mut R,
    ) -> Result<RecipeRequest, MixologyError> {
        let drink = form.drink;
        let occasion = resolve(catalog::OCCASIONS, &form.occasion, catalog::ANY_OCCASION)
            .ok_or_else(|| {
                MixologyError::InvalidInput(format!("Unknown occasion '{}'", form.occasion))
            })?;
        let cuisine = resolve(catalog::CUISINES, &form.cuisine, catalog::ANY_CUISINE)
            .ok_or_else(|| {
                MixologyError::InvalidInput(format!("Unknown cuisine '{}'", form.cuisine))
            })?;

        let ingredient_catalog = drink.ingredient_catalog();
        let selected_ingredients = form
            .ingredients
            .iter()
            .map(|ingredient| {
                catalog::lookup(ingredient_catalog, ingredient)
                    .map(str::to_string)
                    .ok_or_else(|| {
                        MixologyError::InvalidInput(format!(
                            "'{}' is not offered for a {} drink",
                            ingredient, drink
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Independent draws, so the same ingredient can come up twice
        let sampled_ingredients = (0..self.sample_size(drink))
            .filter_map(|_| ingredient_catalog.choose(rng))
            .map(|ingredient| ingredient.to_string())
            .collect::<Vec<_>>();

        let inspiration = if self.sampling.inspiration {
            drink
                .inspiration_catalog()
                .choose(rng)
                .map(|name| name.to_string())
        } else {
            None
        };

        let request = RecipeRequest {
            drink,
            occasion: occasion.to_string(),
            cuisine: cuisine.to_string(),
            main_dish: normalize_main_dish(&form.main_dish),
            selected_ingredients,
            sampled_ingredients,
            inspiration,
            additional_constraints: drink.exclusion_clause().unwrap_or_default().to_string(),
        };
        debug!("Prepared request: {:?}", request);

        Ok(request)
    }
}

fn resolve(
    catalog: &[&'static str],
    value: &str,
    default: &'static str,
) -> Option<&'static str> {
    if value.trim().is_empty() {
        Some(default)
    } else {
        catalog::lookup(catalog, value)
    }
}

/// Build the main recipe-generation prompt.
///
/// The alcohol exclusion clause follows `request.drink` alone, whatever
/// `additional_constraints` holds.
pub fn build_generation_prompt(request: &RecipeRequest) -> String {
    let any_occasion = request.occasion == catalog::ANY_OCCASION;
    let occasion_intro = if any_occasion {
        String::new()
    } else {
        format!("The occasion is a {}. ", request.occasion)
    };
    let occasion_fit = if any_occasion {
        "any occasion".to_string()
    } else {
        format!("the {}", request.occasion)
    };
    let inspiration = request
        .inspiration
        .as_deref()
        .map(|name| format!("Draw inspiration from the {}. ", name))
        .unwrap_or_default();
    let constraints = request
        .drink
        .exclusion_clause()
        .map(|clause| format!("{}. ", clause))
        .unwrap_or_default();
    let main_dish = normalize_main_dish(&request.main_dish);

    fill_template(
        GENERATION_TEMPLATE.trim(),
        &[
            ("OCCASION_INTRO", &occasion_intro),
            ("DRINK", request.drink.label()),
            ("OCCASION_FIT", &occasion_fit),
            ("CUISINE", &request.cuisine),
            ("MAIN_DISH", &main_dish),
            ("INGREDIENTS", &request.ingredient_list()),
            ("INSPIRATION", &inspiration),
            ("CONSTRAINTS", &constraints),
        ],
    )
}

/// Build the prompt for the short menu-style description.
pub fn build_caption_prompt(request: &RecipeRequest) -> String {
    fill_template(
        CAPTION_TEMPLATE.trim(),
        &[
            ("DRINK", request.drink.label()),
            ("INGREDIENTS", &request.ingredient_list()),
            ("OCCASION", &request.occasion),
            ("CUISINE", &request.cuisine),
        ],
    )
}

/// Build the prompt for the picture of the finished drink.
pub fn build_image_prompt(request: &RecipeRequest, cocktail_name: &str) -> String {
    format!(
        "{} drink named {}. Contains {}. Magazine cover",
        request.drink.label(),
        cocktail_name,
        request.ingredient_list()
    )
}

/// Substitute `{{NAME}}` placeholders in a single pass.
///
/// Values are never rescanned, so user text containing braces is copied as-is.
/// Unknown placeholders are left untouched.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(template.len() + 256);
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            output.push_str(&rest[start..]);
            return output;
        };

        let name = &after_open[..end];
        match values.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => output.push_str(value),
            None => output.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after_open[end + 2..];
    }

    output.push_str(rest);
    output
}
