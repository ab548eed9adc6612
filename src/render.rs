//! Plain-text rendering of a finished mix for the terminal.

use crate::model::MixRecord;

const BULLET: &str = "🔹";
const PLAN: &str = "Draw Inspiration ➺ Pick Ingredients ➺ Generate Drink ➺ Mixing Instructions ➺ Visualize Drink ➺ Provide Explanation";

/// Render a record the way the result page lays it out: name, mixing
/// instructions, the picture and its caption, then the ingredients and
/// rationale behind the drink.
pub fn render(record: &MixRecord) -> String {
    let response = &record.response;
    let mut out = heading(&response.cocktail_name, '=');

    out.push_str(&subheading("How to mix this?"));
    out.push_str(&format!("{}\n\n", response.ingredients.trim()));

    out.push_str(&subheading("How will this drink look?"));
    match &record.image_url {
        Some(url) => out.push_str(&format!("{}\n", url)),
        None => out.push_str("(no image generated)\n"),
    }
    if !response.caption.is_empty() {
        out.push_str(&format!("{}\n", response.caption));
    }
    out.push('\n');

    out.push_str(&subheading("How did I come up with this?"));
    if let Some(inspiration) = &response.inspiration {
        out.push_str(&format!("Inspired by the {}\n", inspiration));
    }
    for ingredient in &response.ingredient_list {
        out.push_str(&format!("{} {}\n", BULLET, ingredient));
    }
    let rationale = response.rationale.trim();
    if !rationale.is_empty() {
        out.push_str(&format!("\n{}\n", rationale));
    }
    if let Some(catch_phrase) = &response.catch_phrase {
        out.push_str(&format!("\n\"{}\"\n", catch_phrase));
    }
    out.push('\n');

    out.push_str(&subheading("Under the Covers: Goal, Plan & Chain"));
    out.push_str(&format!(
        "Goal: Come up with an olfactory pleasant {}\nPlan: {}\n",
        record.request.drink, PLAN
    ));

    out
}

/// The full record as pretty JSON, for `--json`
pub fn render_json(record: &MixRecord) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(record)
}

fn heading(title: &str, underline: char) -> String {
    let width = title.chars().count().max(3);
    format!("{}\n{}\n\n", title, underline.to_string().repeat(width))
}

fn subheading(title: &str) -> String {
    heading(title, '-')
}
