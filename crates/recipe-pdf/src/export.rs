use crate::format::{file_name_for, unique_file_name};
use crate::image_loader::ImageLoader;
use crate::ingredient::IngredientLookup;
use crate::layout::{RecipeLayout, layout_recipe};
use crate::options::ExportOptions;
use crate::record::RecipeRecord;
use crate::render::render_pdf;
use crate::types::*;
use log::{info, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A rendered recipe document
#[derive(Debug, Clone)]
pub struct GeneratedPdf {
    /// Suggested file name, see [`file_name_for`](crate::file_name_for)
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub layout: RecipeLayout,
}

impl GeneratedPdf {
    pub fn page_count(&self) -> usize {
        self.layout.page_count()
    }
}

/// Generate the PDF for one recipe.
///
/// The hero image is loaded first (best effort, bounded by the loader's
/// timeout); layout and encoding follow. Only an encoding failure is
/// returned as an error.
pub async fn generate_recipe_pdf(
    record: &RecipeRecord,
    options: &ExportOptions,
    loader: &ImageLoader,
    lookup: &dyn IngredientLookup,
) -> Result<GeneratedPdf> {
    let hero = match RecipeRecord::present(&record.image_url) {
        Some(location) if options.include_image => loader.load(location).await,
        _ => None,
    };

    let layout = layout_recipe(record, hero.as_ref(), options, lookup);
    let file_name = file_name_for(RecipeRecord::present(&record.title));

    // PDF encoding is CPU-bound, spawn blocking
    let image_quality = options.image_quality;
    let (layout, bytes) = tokio::task::spawn_blocking(move || {
        let bytes = render_pdf(&layout, hero.as_ref(), image_quality)?;
        Ok::<_, RecipePdfError>((layout, bytes))
    })
    .await??;

    info!(
        "Generated {} ({} pages, {} bytes)",
        file_name,
        layout.page_count(),
        bytes.len()
    );

    Ok(GeneratedPdf {
        file_name,
        bytes,
        layout,
    })
}

/// Generate the PDF for one recipe and save it into `output_dir`.
///
/// An existing file of the same name is replaced.
pub async fn export_recipe(
    record: &RecipeRecord,
    options: &ExportOptions,
    loader: &ImageLoader,
    lookup: &dyn IngredientLookup,
    output_dir: impl AsRef<Path>,
) -> Result<PathBuf> {
    let generated = generate_recipe_pdf(record, options, loader, lookup).await?;
    write_pdf(output_dir.as_ref(), &generated.file_name, &generated.bytes).await
}

/// Export several recipes into `output_dir`, returning one path per record
/// in input order.
///
/// Records whose file names collide within the batch get a numeric suffix
/// ("pancakes.pdf", "pancakes-2.pdf") instead of overwriting each other.
pub async fn export_recipes(
    records: &[RecipeRecord],
    options: &ExportOptions,
    loader: &ImageLoader,
    lookup: &dyn IngredientLookup,
    output_dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>> {
    let output_dir = output_dir.as_ref();
    let mut taken = HashSet::new();
    let mut paths = Vec::with_capacity(records.len());

    for record in records {
        let generated = generate_recipe_pdf(record, options, loader, lookup).await?;
        let file_name = unique_file_name(&generated.file_name, &mut taken);
        if file_name != generated.file_name {
            warn!(
                "{} is already used in this batch, saving as {}",
                generated.file_name, file_name
            );
        }
        paths.push(write_pdf(output_dir, &file_name, &generated.bytes).await?);
    }

    Ok(paths)
}

async fn write_pdf(output_dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    tokio::fs::create_dir_all(output_dir).await?;
    let output_path = output_dir.join(file_name);
    tokio::fs::write(&output_path, bytes).await?;
    Ok(output_path)
}
