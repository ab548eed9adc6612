use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::catalog;
use crate::error::MixologyError;

/// Clause appended to the generation prompt for Non-Alcoholic drinks.
pub const NON_ALCOHOLIC_EXCLUSION: &str = "Do not include any alcohol. No whisky, cognac, spirits, VSOP, wine, bourbon, gin, scotch, beer in the ingredients";

/// The kind of drink the user asked for.
///
/// Selects the ingredient catalog, the inspiration catalog and whether the
/// alcohol exclusion clause applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrinkKind {
    Cocktail,
    Shot,
    Punch,
    #[serde(rename = "Non-Alcoholic")]
    NonAlcoholic,
}

impl DrinkKind {
    pub const ALL: [DrinkKind; 4] = [
        DrinkKind::Cocktail,
        DrinkKind::Shot,
        DrinkKind::Punch,
        DrinkKind::NonAlcoholic,
    ];

    /// Label shown to the user and interpolated into prompts
    pub fn label(&self) -> &'static str {
        match self {
            DrinkKind::Cocktail => "Cocktail",
            DrinkKind::Shot => "Shot",
            DrinkKind::Punch => "Punch",
            DrinkKind::NonAlcoholic => "Non-Alcoholic",
        }
    }

    pub fn is_alcoholic(&self) -> bool {
        !matches!(self, DrinkKind::NonAlcoholic)
    }

    pub fn ingredient_catalog(&self) -> &'static [&'static str] {
        if self.is_alcoholic() {
            catalog::ALCOHOLIC_INGREDIENTS
        } else {
            catalog::NON_ALCOHOLIC_INGREDIENTS
        }
    }

    pub fn inspiration_catalog(&self) -> &'static [&'static str] {
        if self.is_alcoholic() {
            catalog::COCKTAIL_INSPIRATIONS
        } else {
            catalog::MOCKTAIL_INSPIRATIONS
        }
    }

    pub fn exclusion_clause(&self) -> Option<&'static str> {
        if self.is_alcoholic() {
            None
        } else {
            Some(NON_ALCOHOLIC_EXCLUSION)
        }
    }
}

impl fmt::Display for DrinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DrinkKind {
    type Err = MixologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cocktail" => Ok(DrinkKind::Cocktail),
            "shot" => Ok(DrinkKind::Shot),
            "punch" => Ok(DrinkKind::Punch),
            "non-alcoholic" | "non_alcoholic" | "nonalcoholic" | "mocktail" => {
                Ok(DrinkKind::NonAlcoholic)
            }
            other => Err(MixologyError::InvalidInput(format!(
                "Unknown drink kind '{}'",
                other
            ))),
        }
    }
}

/// How adventurous the generator should be, 0 (tame) to 10 (wild).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Craziness(u8);

impl Craziness {
    pub const MAX: u8 = 10;

    pub fn new(level: u8) -> Result<Self, MixologyError> {
        if level > Self::MAX {
            return Err(MixologyError::InvalidInput(format!(
                "Craziness must be between 0 and {}, got {}",
                Self::MAX,
                level
            )));
        }
        Ok(Self(level))
    }

    pub fn level(&self) -> u8 {
        self.0
    }

    /// Sampling temperature for the recipe generation call
    pub fn temperature(&self) -> f32 {
        0.2 + 0.12 * f32::from(self.0)
    }
}

impl Default for Craziness {
    fn default() -> Self {
        Self(7)
    }
}

/// What the user filled into the form, before defaults and sampling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeForm {
    pub drink: DrinkKind,
    pub occasion: String,
    pub cuisine: String,
    pub main_dish: String,
    pub ingredients: Vec<String>,
}

impl Default for RecipeForm {
    fn default() -> Self {
        Self {
            drink: DrinkKind::Cocktail,
            occasion: String::new(),
            cuisine: String::new(),
            main_dish: String::new(),
            ingredients: Vec::new(),
        }
    }
}

/// Replace a blank main dish with the catch-all default.
pub fn normalize_main_dish(main_dish: &str) -> String {
    let trimmed = main_dish.trim();
    if trimmed.is_empty() {
        catalog::DEFAULT_MAIN_DISH.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Everything the prompts are built from. Created once per submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeRequest {
    pub drink: DrinkKind,
    pub occasion: String,
    pub cuisine: String,
    pub main_dish: String,
    pub selected_ingredients: Vec<String>,
    pub sampled_ingredients: Vec<String>,
    pub inspiration: Option<String>,
    /// Exclusion clause applied for this drink kind, kept for the archive.
    /// Prompts derive the clause from `drink` directly.
    pub additional_constraints: String,
}

impl RecipeRequest {
    /// Sampled ingredients followed by the user's picks
    pub fn ingredients(&self) -> impl Iterator<Item = &str> {
        self.sampled_ingredients
            .iter()
            .chain(self.selected_ingredients.iter())
            .map(String::as_str)
    }

    pub fn ingredient_list(&self) -> String {
        self.ingredients().collect::<Vec<_>>().join(", ")
    }
}

/// Structured recipe recovered from the generated text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecipeResponse {
    pub cocktail_name: String,
    /// Ingredients and instructions as displayed under "How to mix this?"
    pub ingredients: String,
    pub instructions: Option<String>,
    pub citations: Option<String>,
    pub rationale: String,
    pub catch_phrase: Option<String>,
    pub caption: String,
    /// Echo of the ingredients that went into the prompt
    pub ingredient_list: Vec<String>,
    pub inspiration: Option<String>,
}

/// Full working state of one submission; this is what gets archived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MixRecord {
    pub request: RecipeRequest,
    pub generation_prompt: String,
    pub caption_prompt: String,
    /// Raw text returned for the generation prompt
    pub cocktail: String,
    /// Raw text returned for the caption prompt
    pub caption: String,
    pub image_prompt: String,
    pub image_response: serde_json::Value,
    pub image_url: Option<String>,
    pub response: RecipeResponse,
    pub created_at: DateTime<Local>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drink_kind_parsing() {
        assert_eq!("cocktail".parse::<DrinkKind>().unwrap(), DrinkKind::Cocktail);
        assert_eq!(" Shot ".parse::<DrinkKind>().unwrap(), DrinkKind::Shot);
        assert_eq!(
            "Non-Alcoholic".parse::<DrinkKind>().unwrap(),
            DrinkKind::NonAlcoholic
        );
        assert_eq!(
            "mocktail".parse::<DrinkKind>().unwrap(),
            DrinkKind::NonAlcoholic
        );
        assert!("smoothie".parse::<DrinkKind>().is_err());
    }

    #[test]
    fn test_label_round_trips_through_from_str() {
        for kind in DrinkKind::ALL {
            assert_eq!(kind.label().parse::<DrinkKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_catalog_selection_follows_drink_kind() {
        for kind in DrinkKind::ALL {
            if kind.is_alcoholic() {
                assert_eq!(kind.ingredient_catalog(), catalog::ALCOHOLIC_INGREDIENTS);
                assert_eq!(kind.inspiration_catalog(), catalog::COCKTAIL_INSPIRATIONS);
                assert!(kind.exclusion_clause().is_none());
            } else {
                assert_eq!(
                    kind.ingredient_catalog(),
                    catalog::NON_ALCOHOLIC_INGREDIENTS
                );
                assert_eq!(kind.inspiration_catalog(), catalog::MOCKTAIL_INSPIRATIONS);
                assert_eq!(kind.exclusion_clause(), Some(NON_ALCOHOLIC_EXCLUSION));
            }
        }
    }

    #[test]
    fn test_serde_uses_display_label() {
        let json = serde_json::to_string(&DrinkKind::NonAlcoholic).unwrap();
        assert_eq!(json, "\"Non-Alcoholic\"");
    }

    #[test]
    fn test_craziness_bounds_and_temperature() {
        assert!(Craziness::new(11).is_err());
        assert!((Craziness::new(0).unwrap().temperature() - 0.2).abs() < 1e-6);
        assert!((Craziness::new(10).unwrap().temperature() - 1.4).abs() < 1e-6);
        assert_eq!(Craziness::default().level(), 7);
        assert!((Craziness::default().temperature() - 1.04).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_main_dish() {
        assert_eq!(normalize_main_dish(""), "all dishes");
        assert_eq!(normalize_main_dish("   "), "all dishes");
        assert_eq!(normalize_main_dish(" Pad Thai "), "Pad Thai");
    }

    #[test]
    fn test_ingredient_list_puts_sampled_first() {
        let request = RecipeRequest {
            drink: DrinkKind::Cocktail,
            occasion: "Party".to_string(),
            cuisine: "All".to_string(),
            main_dish: "all dishes".to_string(),
            selected_ingredients: vec!["Mint Leaves".to_string(), "Honey".to_string()],
            sampled_ingredients: vec!["Gin".to_string()],
            inspiration: None,
            additional_constraints: String::new(),
        };
        assert_eq!(request.ingredient_list(), "Gin, Mint Leaves, Honey");
    }
}
