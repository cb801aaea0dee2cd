//! Shared constants for recipe document layout
//!
//! Fixed geometry of the recipe page lives here. Anything a caller may want
//! to tune lives in `ExportOptions` instead.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// Convert points to millimeters
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / POINTS_PER_MM
}

// =============================================================================
// Text Metrics
// =============================================================================

/// Average character width as a fraction of the font size, used only when
/// the embedded face cannot be measured
pub const FALLBACK_CHAR_WIDTH_RATIO: f32 = 0.6;

/// Baseline-to-baseline distance as a multiple of the font size
pub const LINE_HEIGHT_FACTOR: f32 = 1.35;

// =============================================================================
// Font Sizes (points)
// =============================================================================

pub const BRAND_FONT_SIZE: f32 = 20.0;
pub const TAGLINE_FONT_SIZE: f32 = 9.0;
pub const TITLE_FONT_SIZE: f32 = 22.0;
pub const META_FONT_SIZE: f32 = 11.0;
pub const CARD_LABEL_FONT_SIZE: f32 = 8.0;
pub const CARD_VALUE_FONT_SIZE: f32 = 12.0;
pub const SECTION_LABEL_FONT_SIZE: f32 = 12.0;
pub const BODY_FONT_SIZE: f32 = 11.0;
pub const MARKER_FONT_SIZE: f32 = 9.0;
pub const FOOTER_FONT_SIZE: f32 = 8.0;

// =============================================================================
// Block Heights (millimeters)
// =============================================================================

/// Height of the colored brand band at the top of the first page
pub const HEADER_HEIGHT_MM: f32 = 30.0;

/// Vertical block reserved for the hero image
pub const HERO_IMAGE_HEIGHT_MM: f32 = 70.0;

/// Height of each metadata card
pub const CARD_HEIGHT_MM: f32 = 18.0;

/// Horizontal gap between metadata cards
pub const CARD_GAP_MM: f32 = 4.0;

/// Height of a section-label band
pub const SECTION_BAND_HEIGHT_MM: f32 = 9.0;

/// Height of the footer band stamped on every page
pub const FOOTER_HEIGHT_MM: f32 = 12.0;

/// Gap between major blocks
pub const BLOCK_GAP_MM: f32 = 6.0;

/// Gap between consecutive rows of a section
pub const ROW_GAP_MM: f32 = 2.0;

// =============================================================================
// Section Rows (millimeters)
// =============================================================================

/// Space that must remain on the page before an ingredient row is placed
pub const INGREDIENT_MIN_ROW_MM: f32 = 8.0;

/// Space that must remain on the page before an instruction row is placed
pub const INSTRUCTION_MIN_ROW_MM: f32 = 16.0;

/// Fixed glyph height of an ingredient bullet row
pub const INGREDIENT_ROW_GLYPH_MM: f32 = 6.0;

/// Fixed glyph height of a numbered instruction row
pub const INSTRUCTION_ROW_GLYPH_MM: f32 = 10.0;

/// Radius of the ingredient bullet disc
pub const BULLET_RADIUS_MM: f32 = 1.2;

/// Radius of the numbered instruction disc
pub const STEP_DISC_RADIUS_MM: f32 = 4.0;

/// Indent of row text past the marker column
pub const ROW_TEXT_INDENT_MM: f32 = 12.0;
