use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use recipe_pdf::{
    ExportOptions, ImageLoader, KnownIngredients, RecipeRecord, export_recipes, layout_recipe,
    normalize_lines, parse_ingredient_line,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "recipdf", about = "Recipe PDF export CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export recipe records to PDF
    Export {
        /// Input JSON file (one record or an array of records)
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Export options JSON file
        #[arg(long)]
        options: Option<PathBuf>,

        /// Known ingredient names (JSON array or one name per line)
        #[arg(long)]
        known_ingredients: Option<PathBuf>,

        /// Output paper size (overrides the options file)
        #[arg(long, value_enum)]
        paper: Option<PaperArg>,

        /// Skip the hero image
        #[arg(long)]
        no_image: bool,
    },

    /// Show how records would be parsed and paginated, without writing a PDF
    Inspect {
        /// Input JSON file (one record or an array of records)
        #[arg(short, long)]
        input: PathBuf,

        /// Export options JSON file
        #[arg(long)]
        options: Option<PathBuf>,

        /// Known ingredient names (JSON array or one name per line)
        #[arg(long)]
        known_ingredients: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A4,
    A5,
    Letter,
    Legal,
}

impl From<PaperArg> for recipe_pdf::PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
        }
    }
}

async fn load_records(path: &Path) -> Result<Vec<RecipeRecord>> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let records = RecipeRecord::many_from_json(&json)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(records)
}

async fn load_options(path: Option<&Path>) -> Result<ExportOptions> {
    match path {
        Some(path) => Ok(ExportOptions::load(path)
            .await
            .with_context(|| format!("Failed to load options from {}", path.display()))?),
        None => Ok(ExportOptions::default()),
    }
}

async fn load_known(path: Option<&Path>) -> Result<KnownIngredients> {
    match path {
        Some(path) => Ok(KnownIngredients::load(path).await?),
        None => Ok(KnownIngredients::default()),
    }
}

fn display_title(record: &RecipeRecord) -> &str {
    record
        .title
        .as_deref()
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .unwrap_or(recipe_pdf::layout::UNTITLED_RECIPE)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            input,
            output,
            options,
            known_ingredients,
            paper,
            no_image,
        } => {
            let records = load_records(&input).await?;
            let mut options = load_options(options.as_deref()).await?;
            if let Some(paper) = paper {
                options.paper_size = paper.into();
            }
            if no_image {
                options.include_image = false;
            }
            options.validate()?;

            let known = load_known(known_ingredients.as_deref()).await?;
            let loader = ImageLoader::from_options(&options)?;
            info!(
                "Exporting {} recipe(s) with {} known ingredient names",
                records.len(),
                known.len()
            );

            let paths = export_recipes(&records, &options, &loader, &known, &output)
                .await
                .with_context(|| format!("Failed to export into {}", output.display()))?;
            for (record, path) in records.iter().zip(&paths) {
                println!("Exported \"{}\" → {}", display_title(record), path.display());
            }
        }

        Commands::Inspect {
            input,
            options,
            known_ingredients,
        } => {
            let records = load_records(&input).await?;
            let options = load_options(options.as_deref()).await?;
            let known = load_known(known_ingredients.as_deref()).await?;

            for record in &records {
                println!("{}", display_title(record));

                let ingredients = normalize_lines(&record.ingredients);
                println!("  Ingredients: {}", ingredients.len());
                for line in &ingredients {
                    let parsed = parse_ingredient_line(line, &known);
                    println!(
                        "    - {:<40} name: {:?}, quantity: {:?}, note: {:?}",
                        line, parsed.name, parsed.quantity_text, parsed.preparation_note
                    );
                }

                let instructions = normalize_lines(&record.instructions);
                println!("  Instructions: {}", instructions.len());
                for (index, step) in instructions.iter().enumerate() {
                    println!("    {}. {}", index + 1, step);
                }

                // Planned without the hero image, which is only known after fetching
                let layout = layout_recipe(record, None, &options, &known);
                println!("  Pages (without image): {}", layout.page_count());
            }
        }
    }

    Ok(())
}
