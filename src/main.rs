use clap::Parser;
use log::{debug, error};
use std::path::PathBuf;
use std::process::ExitCode;

use mixologist::catalog;
use mixologist::config::{load_config, load_config_from};
use mixologist::render::{render, render_json};
use mixologist::{DrinkKind, Mixologist, MixologyError, RecipeForm};

#[derive(Parser, Debug)]
#[command(
    name = "mixologist",
    version,
    about = "Invent a drink for an occasion and a cuisine"
)]
struct Cli {
    /// Cocktail, Shot, Punch or Non-Alcoholic
    #[arg(long, default_value = "Cocktail")]
    drink: String,

    /// Occasion from the catalog (defaults to "All Occasions")
    #[arg(long, default_value = "")]
    occasion: String,

    /// Cuisine from the catalog (defaults to "All")
    #[arg(long, default_value = "")]
    cuisine: String,

    /// Ingredient to include; repeat for more
    #[arg(long = "ingredient")]
    ingredients: Vec<String>,

    /// Main dish the drink should pair with
    #[arg(long, default_value = "")]
    main_dish: String,

    /// 0 (tame) to 10 (wild)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=10))]
    craziness: Option<u8>,

    /// Text-generation provider ("openai" or "ollama")
    #[arg(long)]
    provider: Option<String>,

    /// Model for the text-generation provider
    #[arg(long)]
    model: Option<String>,

    /// Configuration file; defaults to ./config.toml when present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the full record as JSON instead of the rendered drink
    #[arg(long)]
    json: bool,

    /// Do not archive the result
    #[arg(long)]
    no_archive: bool,

    /// Print the occasion, cuisine and ingredient catalogs and exit
    #[arg(long)]
    list_catalogs: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    debug!("{:?}", cli);

    if cli.list_catalogs {
        print_catalogs();
        return ExitCode::SUCCESS;
    }

    match run(cli).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Mixing failed: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String, MixologyError> {
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    let form = RecipeForm {
        drink: cli.drink.parse::<DrinkKind>()?,
        occasion: cli.occasion,
        cuisine: cli.cuisine,
        main_dish: cli.main_dish,
        ingredients: cli.ingredients,
    };

    let mut builder = Mixologist::builder().config(config);
    if let Some(provider) = cli.provider {
        builder = builder.provider(provider);
    }
    if let Some(model) = cli.model {
        builder = builder.model(model);
    }
    if let Some(level) = cli.craziness {
        builder = builder.craziness(level);
    }
    if cli.no_archive {
        builder = builder.skip_archive();
    }

    let record = builder.build()?.mix_form(form).await?;

    if cli.json {
        Ok(render_json(&record)?)
    } else {
        Ok(render(&record))
    }
}

fn print_catalogs() {
    print_catalog("Occasions", catalog::OCCASIONS);
    print_catalog("Cuisines", catalog::CUISINES);
    for kind in [DrinkKind::Cocktail, DrinkKind::NonAlcoholic] {
        let title = if kind.is_alcoholic() {
            "Ingredients (Cocktail, Shot, Punch)"
        } else {
            "Ingredients (Non-Alcoholic)"
        };
        print_catalog(title, kind.ingredient_catalog());
    }
}

fn print_catalog(title: &str, entries: &[&str]) {
    println!("{}:", title);
    for entry in entries {
        println!("  {}", entry);
    }
    println!();
}
