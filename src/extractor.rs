//! Recovers the recipe sections from the free text returned by the generator.
//!
//! The generation prompt asks for a fixed sequence of section headers. The
//! scanner locates each header as a literal anchor; only `Ingredients` is
//! required, every other section degrades to empty or `None`.

use log::{debug, warn};
use std::fmt;
use thiserror::Error;

use crate::model::RecipeResponse;

/// A named section of the generated recipe, in the order the prompt asks for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    CocktailName,
    Ingredients,
    Instructions,
    Citations,
    Rationale,
}

impl Section {
    pub const ORDER: [Section; 5] = [
        Section::CocktailName,
        Section::Ingredients,
        Section::Instructions,
        Section::Citations,
        Section::Rationale,
    ];

    /// Literal text used to anchor the section
    pub fn marker(&self) -> &'static str {
        match self {
            Section::CocktailName => "Cocktail Name:",
            Section::Ingredients => "Ingredients",
            Section::Instructions => "Instructions:",
            Section::Citations => "Citations:",
            Section::Rationale => "Rationale",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Section::Ingredients)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker().trim_end_matches(':'))
    }
}

/// The rationale body starts after this label, not after the bare anchor.
const RATIONALE_LABEL: &str = "Rationale:";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("marker '{marker}' for section {section} not found in generated text")]
    MarkerNotFound {
        section: Section,
        marker: &'static str,
    },
}

/// Where the displayed ingredients block begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IngredientsBlockStart {
    /// From the very start of the text, so the block also repeats the cocktail
    /// name line. This is what the recipe page has always shown. The slice is
    /// kept as-is, surrounding whitespace included.
    #[default]
    TextStart,
    /// From the `Ingredients` anchor, trimmed.
    IngredientsMarker,
}

/// First occurrence of every section anchor in one text.
struct AnchorScan<'a> {
    text: &'a str,
    positions: [Option<usize>; 5],
}

impl<'a> AnchorScan<'a> {
    fn new(text: &'a str) -> Self {
        let positions = Section::ORDER.map(|section| text.find(section.marker()));
        Self { text, positions }
    }

    fn position(&self, section: Section) -> Option<usize> {
        let index = Section::ORDER
            .iter()
            .position(|candidate| *candidate == section)
            .unwrap_or_default();
        self.positions[index]
    }

    fn require(&self, section: Section) -> Result<usize, ExtractError> {
        self.position(section).ok_or(ExtractError::MarkerNotFound {
            section,
            marker: section.marker(),
        })
    }

    /// Body of `section`: after its marker, up to the nearest later anchor among `until`.
    fn body(&self, section: Section, until: &[Section]) -> Option<&'a str> {
        let start = self.position(section)? + section.marker().len();
        let end = until
            .iter()
            .filter_map(|next| self.text[start..].find(next.marker()))
            .min()
            .map(|offset| start + offset)
            .unwrap_or(self.text.len());
        Some(&self.text[start..end])
    }

    fn missing(&self) -> Vec<Section> {
        Section::ORDER
            .iter()
            .copied()
            .filter(|section| self.position(*section).is_none())
            .collect()
    }
}

/// Parses generated recipe text into a [`RecipeResponse`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseExtractor {
    ingredients_start: IngredientsBlockStart,
}

impl ResponseExtractor {
    pub fn new(ingredients_start: IngredientsBlockStart) -> Self {
        Self { ingredients_start }
    }

    /// Extract the named sections.
    ///
    /// Only the text-derived fields are filled; caption and the ingredient echo
    /// are left for the caller.
    ///
    /// # Errors
    /// Returns [`ExtractError::MarkerNotFound`] when the `Ingredients` anchor is absent.
    pub fn extract(&self, raw_text: &str) -> Result<RecipeResponse, ExtractError> {
        let scan = AnchorScan::new(raw_text);
        let ingredients_at = scan.require(Section::Ingredients)?;

        let missing = scan.missing();
        if !missing.is_empty() {
            debug!("Generated text lacks sections: {:?}", missing);
        }

        let cocktail_name = cocktail_name(&raw_text[..ingredients_at]);

        let block_start = match self.ingredients_start {
            IngredientsBlockStart::TextStart => 0,
            IngredientsBlockStart::IngredientsMarker => ingredients_at,
        };
        let block_end = raw_text[block_start..]
            .find(Section::Rationale.marker())
            .map(|offset| block_start + offset)
            .unwrap_or(raw_text.len());
        let block = &raw_text[block_start..block_end];
        let ingredients = match self.ingredients_start {
            IngredientsBlockStart::TextStart => block.to_string(),
            IngredientsBlockStart::IngredientsMarker => block.trim().to_string(),
        };

        let rationale = rationale(raw_text);
        if rationale.is_empty() {
            warn!("No rationale found in generated text");
        }

        Ok(RecipeResponse {
            cocktail_name,
            ingredients,
            instructions: non_empty(
                scan.body(Section::Instructions, &[Section::Citations, Section::Rationale]),
            ),
            citations: non_empty(scan.body(Section::Citations, &[Section::Rationale])),
            rationale,
            catch_phrase: catch_phrase(raw_text),
            ..Default::default()
        })
    }
}

/// Extract with the default ingredients-block behaviour.
pub fn extract(raw_text: &str) -> Result<RecipeResponse, ExtractError> {
    ResponseExtractor::default().extract(raw_text)
}

fn cocktail_name(head: &str) -> String {
    let head = head.trim();
    let name = match head.find(Section::CocktailName.marker()) {
        Some(at) => &head[at + Section::CocktailName.marker().len()..],
        None => head,
    };
    name.trim_matches(|c: char| c.is_whitespace() || c == '*' || c == '#')
        .to_string()
}

fn rationale(raw_text: &str) -> String {
    let text = raw_text.trim();
    text.find(RATIONALE_LABEL)
        .map(|at| text[at + RATIONALE_LABEL.len()..].to_string())
        .unwrap_or_default()
}

fn catch_phrase(raw_text: &str) -> Option<String> {
    let open = raw_text.find(|c: char| c == '"' || c == '“')?;
    let quote_len = raw_text[open..].chars().next()?.len_utf8();
    let rest = &raw_text[open + quote_len..];
    let close = rest.find(|c: char| c == '"' || c == '”')?;
    non_empty(Some(&rest[..close]))
}

fn non_empty(section: Option<&str>) -> Option<String> {
    section
        .map(str::trim)
        .filter(|body| !body.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_RESPONSE: &str = "Cocktail Name: Smoky Sunset\n\"Fire in a glass\"\n\nIngredients:\n- 2 oz Bourbon\n- 1 oz Orange Juice\n\nInstructions:\n1. Shake with ice.\n2. Strain.\n\nCitations:\nAdapted from the Old Fashioned.\n\nRationale:\nBourbon's vanilla notes complement orange.";

    #[test]
    fn test_minimal_response() {
        let response = extract("Cocktail Name: Foo\nIngredients\nX\nRationale:\nY").unwrap();
        assert_eq!(response.cocktail_name, "Foo");
        assert_eq!(response.rationale, "\nY");
        assert_eq!(response.ingredients, "Cocktail Name: Foo\nIngredients\nX\n");
    }

    #[test]
    fn test_full_response() {
        let response = extract(FULL_RESPONSE).unwrap();
        assert_eq!(response.cocktail_name, "Smoky Sunset\n\"Fire in a glass\"");
        assert_eq!(
            response.instructions.as_deref(),
            Some("1. Shake with ice.\n2. Strain.")
        );
        assert_eq!(
            response.citations.as_deref(),
            Some("Adapted from the Old Fashioned.")
        );
        assert_eq!(
            response.rationale,
            "\nBourbon's vanilla notes complement orange."
        );
        assert_eq!(response.catch_phrase.as_deref(), Some("Fire in a glass"));
        assert!(response.ingredients.contains("2 oz Bourbon"));
        assert!(!response.ingredients.contains("Rationale"));
    }

    #[test]
    fn test_text_start_block_repeats_name_line() {
        let response = extract(FULL_RESPONSE).unwrap();
        assert!(response.ingredients.starts_with("Cocktail Name: Smoky Sunset"));
    }

    #[test]
    fn test_text_start_block_keeps_surrounding_whitespace() {
        let text = "\n  Cocktail Name: Foo\nIngredients:\n- ice\n\nRationale:\nY";
        let response = extract(text).unwrap();
        assert_eq!(
            response.ingredients,
            "\n  Cocktail Name: Foo\nIngredients:\n- ice\n\n"
        );

        let marker = ResponseExtractor::new(IngredientsBlockStart::IngredientsMarker);
        assert_eq!(
            marker.extract(text).unwrap().ingredients,
            "Ingredients:\n- ice"
        );
    }

    #[test]
    fn test_marker_start_block_skips_name_line() {
        let extractor = ResponseExtractor::new(IngredientsBlockStart::IngredientsMarker);
        let response = extractor.extract(FULL_RESPONSE).unwrap();
        assert!(response.ingredients.starts_with("Ingredients:"));
        assert!(!response.ingredients.contains("Smoky Sunset"));
        assert!(response.ingredients.contains("Strain."));
    }

    #[test]
    fn test_missing_ingredients_marker() {
        let result = extract("Cocktail Name: Foo\nRationale:\nY");
        assert_eq!(
            result,
            Err(ExtractError::MarkerNotFound {
                section: Section::Ingredients,
                marker: "Ingredients",
            })
        );
        let message = result.unwrap_err().to_string();
        assert!(message.contains("'Ingredients'"));
    }

    #[test]
    fn test_missing_rationale_is_empty_not_error() {
        let response = extract("Cocktail Name: Foo\nIngredients:\n- ice\n- lime").unwrap();
        assert_eq!(response.rationale, "");
        assert_eq!(
            response.ingredients,
            "Cocktail Name: Foo\nIngredients:\n- ice\n- lime"
        );
        assert!(response.instructions.is_none());
        assert!(response.citations.is_none());
    }

    #[test]
    fn test_name_without_marker_uses_leading_text() {
        let response = extract("  Midnight Mule \nIngredients: ginger beer").unwrap();
        assert_eq!(response.cocktail_name, "Midnight Mule");
    }

    #[test]
    fn test_markdown_emphasis_stripped_from_name() {
        let response = extract("**Cocktail Name:** Velvet Thyme\n**Ingredients:**\n- Thyme").unwrap();
        assert_eq!(response.cocktail_name, "Velvet Thyme");
    }

    #[test]
    fn test_ordered_markers_always_yield_name_and_ingredients() {
        let names = ["A", "Blue Lagoon", "Señor Verde"];
        let bodies = ["x", "- 1 oz Gin\n- Tonic", "whatever\n\nelse"];
        for name in names {
            for body in bodies {
                let text = format!("Cocktail Name: {name}\nIngredients\n{body}\nRationale: because");
                let response = extract(&text).unwrap();
                assert_eq!(response.cocktail_name, name);
                assert!(!response.ingredients.is_empty());
                assert_eq!(response.rationale, " because");
            }
        }
    }

    #[test]
    fn test_curly_catch_phrase() {
        let response = extract("Cocktail Name: Zest\n“Bright and bold”\nIngredients: lemon").unwrap();
        assert_eq!(response.catch_phrase.as_deref(), Some("Bright and bold"));
    }

    #[test]
    fn test_section_display_and_requirements() {
        assert_eq!(Section::CocktailName.to_string(), "Cocktail Name");
        assert_eq!(Section::Ingredients.to_string(), "Ingredients");
        let required: Vec<Section> = Section::ORDER
            .iter()
            .copied()
            .filter(Section::is_required)
            .collect();
        assert_eq!(required, vec![Section::Ingredients]);
    }
}
