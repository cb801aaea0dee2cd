pub mod constants;
mod export;
mod fonts;
mod format;
mod image_loader;
mod ingredient;
pub mod layout;
mod normalize;
mod options;
mod record;
pub mod render;
mod types;

pub use export::{GeneratedPdf, export_recipe, export_recipes, generate_recipe_pdf};
pub use format::{
    file_name_for, format_minutes, format_servings, format_time, meta_line, unique_file_name,
};
pub use image_loader::{HeroImage, ImageLoader, ImageUnavailable};
pub use ingredient::{IngredientLookup, KnownIngredients, ParsedIngredientLine, parse_ingredient_line};
pub use layout::layout_recipe;
pub use normalize::{normalize_lines, normalize_value};
pub use options::*;
pub use record::*;
pub use types::*;
