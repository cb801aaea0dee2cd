use crate::constants::{CARD_GAP_MM, FOOTER_HEIGHT_MM, HEADER_HEIGHT_MM, INSTRUCTION_MIN_ROW_MM};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Colors used by the recipe document
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Header band and footer band fill
    pub header: RgbColor,
    /// Ingredients and instructions section bands, markers
    pub accent: RgbColor,
    /// Notes section band
    pub notes: RgbColor,
    /// Metadata card fill
    pub card: RgbColor,
    /// Body text
    pub text: RgbColor,
    /// Secondary text (meta line, card labels, empty states)
    pub muted: RgbColor,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            header: RgbColor::from_rgb8(234, 88, 12),
            accent: RgbColor::from_rgb8(22, 101, 52),
            notes: RgbColor::from_rgb8(180, 83, 9),
            card: RgbColor::from_rgb8(255, 247, 237),
            text: RgbColor::from_rgb8(31, 41, 55),
            muted: RgbColor::from_rgb8(107, 114, 128),
        }
    }
}

/// Recipe export configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    // Page geometry
    pub paper_size: PaperSize,
    pub margin_mm: f32,

    // Branding
    pub brand_name: String,
    pub tagline: String,
    pub attribution: String,

    pub palette: Palette,

    // Hero image
    pub include_image: bool,
    pub image_timeout_secs: u64,
    pub image_quality: u8,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            margin_mm: 16.0,
            brand_name: "Recipe Share".to_string(),
            tagline: "Cook it, share it, love it".to_string(),
            attribution: "Exported from Recipe Share".to_string(),
            palette: Palette::default(),
            include_image: true,
            image_timeout_secs: 10,
            image_quality: 85,
        }
    }
}

impl ExportOptions {
    /// Load options from JSON file
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: Self = serde_json::from_slice(&bytes)
            .map_err(|e| RecipePdfError::Config(format!("Failed to parse options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to JSON file
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| RecipePdfError::Config(format!("Failed to serialize options: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Page dimensions (width, height) in millimeters
    pub fn page_dimensions_mm(&self) -> (f32, f32) {
        self.paper_size.dimensions_mm()
    }

    /// Usable width between the left and right margins
    pub fn content_width_mm(&self) -> f32 {
        self.page_dimensions_mm().0 - 2.0 * self.margin_mm
    }

    /// Lowest y (from the page top) that content may reach before the footer
    pub fn content_bottom_mm(&self) -> f32 {
        self.page_dimensions_mm().1 - self.margin_mm - FOOTER_HEIGHT_MM
    }

    pub fn image_timeout(&self) -> Duration {
        Duration::from_secs(self.image_timeout_secs)
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.page_dimensions_mm();
        if width <= 0.0 || height <= 0.0 {
            return Err(RecipePdfError::Config(
                "Page dimensions must be positive".to_string(),
            ));
        }

        if self.margin_mm < 0.0 {
            return Err(RecipePdfError::Config(
                "Margin must not be negative".to_string(),
            ));
        }

        // Four cards and three gaps must fit side by side
        let card_width = (self.content_width_mm() - 3.0 * CARD_GAP_MM) / 4.0;
        if card_width <= 0.0 {
            return Err(RecipePdfError::Config(format!(
                "Content width of {:.1}mm leaves no room for the info cards",
                self.content_width_mm()
            )));
        }

        // A fresh page must hold at least one instruction row, otherwise
        // pagination could never make progress
        let fresh_page_space = self.content_bottom_mm() - self.margin_mm;
        if fresh_page_space < INSTRUCTION_MIN_ROW_MM {
            return Err(RecipePdfError::Config(format!(
                "Page height of {:.1}mm leaves no room for content between margins",
                height
            )));
        }

        if self.content_bottom_mm() <= HEADER_HEIGHT_MM {
            return Err(RecipePdfError::Config(
                "Page is too short for the header band".to_string(),
            ));
        }

        if self.image_timeout_secs == 0 {
            return Err(RecipePdfError::Config(
                "Image timeout must be at least 1 second".to_string(),
            ));
        }

        if self.image_quality == 0 || self.image_quality > 100 {
            return Err(RecipePdfError::Config(format!(
                "Image quality must be within 1..=100, got {}",
                self.image_quality
            )));
        }

        Ok(())
    }
}
