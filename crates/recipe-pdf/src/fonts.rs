//! Embedded typefaces
//!
//! DejaVu Sans is compiled into the crate so accented Latin, Greek,
//! Cyrillic and the vulgar fractions common in recipes render as written.
//! Characters the face lacks (CJK, emoji) render as its missing-glyph box.

use crate::layout::FontStyle;
use crate::types::{RecipePdfError, Result};
use log::warn;
use printpdf::ParsedFont;
use std::collections::HashMap;
use std::sync::OnceLock;

const REGULAR_FONT: &[u8] = include_bytes!("../fonts/DejaVuSans.ttf");
const BOLD_FONT: &[u8] = include_bytes!("../fonts/DejaVuSans-Bold.ttf");
const OBLIQUE_FONT: &[u8] = include_bytes!("../fonts/DejaVuSans-Oblique.ttf");

/// Glyph index of the missing-glyph box
const NOTDEF_GLYPH: u16 = 0;

fn font_bytes(style: FontStyle) -> &'static [u8] {
    match style {
        FontStyle::Regular => REGULAR_FONT,
        FontStyle::Bold => BOLD_FONT,
        FontStyle::Oblique => OBLIQUE_FONT,
    }
}

/// Parse the face used for `style`
pub(crate) fn parse_font(style: FontStyle) -> Result<ParsedFont> {
    let mut warnings = Vec::new();
    ParsedFont::from_bytes(font_bytes(style), 0, &mut warnings)
        .ok_or_else(|| RecipePdfError::Generation(format!("Failed to parse the {:?} font", style)))
}

/// Horizontal advances of one face, keyed by character
#[derive(Debug)]
pub(crate) struct GlyphWidths {
    units_per_em: f32,
    advances: HashMap<char, u16>,
    missing: u16,
}

impl GlyphWidths {
    fn from_font(font: &ParsedFont) -> Self {
        // ParsedFont is not Sync, so the advances of every mapped BMP
        // character are copied out once
        let advances = (0..=0xFFFF_u32)
            .filter_map(char::from_u32)
            .filter_map(|ch| {
                let glyph = font.lookup_glyph_index(ch as u32)?;
                Some((ch, font.get_horizontal_advance(glyph)))
            })
            .collect();

        Self {
            units_per_em: f32::from(font.font_metrics.units_per_em.max(1)),
            advances,
            missing: font.get_horizontal_advance(NOTDEF_GLYPH),
        }
    }

    /// Advance width of `text` set at `size_pt`, in points
    pub(crate) fn text_width_pt(&self, text: &str, size_pt: f32) -> f32 {
        let units: u32 = text
            .chars()
            .map(|ch| u32::from(self.advances.get(&ch).copied().unwrap_or(self.missing)))
            .sum();
        units as f32 / self.units_per_em * size_pt
    }
}

/// Metrics for `style`, parsed on first use.
///
/// `None` only if the embedded face failed to parse, which rendering
/// reports as an error.
pub(crate) fn glyph_widths(style: FontStyle) -> Option<&'static GlyphWidths> {
    static REGULAR: OnceLock<Option<GlyphWidths>> = OnceLock::new();
    static BOLD: OnceLock<Option<GlyphWidths>> = OnceLock::new();
    static OBLIQUE: OnceLock<Option<GlyphWidths>> = OnceLock::new();

    let cell = match style {
        FontStyle::Regular => &REGULAR,
        FontStyle::Bold => &BOLD,
        FontStyle::Oblique => &OBLIQUE,
    };

    cell.get_or_init(|| match parse_font(style) {
        Ok(font) => Some(GlyphWidths::from_font(&font)),
        Err(e) => {
            warn!("{}; falling back to estimated text widths", e);
            None
        }
    })
    .as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_faces_parse() {
        for style in [FontStyle::Regular, FontStyle::Bold, FontStyle::Oblique] {
            assert!(parse_font(style).is_ok());
            assert!(glyph_widths(style).is_some());
        }
    }

    #[test]
    fn test_recipe_characters_are_mapped() {
        let widths = glyph_widths(FontStyle::Regular).unwrap();
        for ch in "éèêëàâîïôûüçñ½¼¾°×–".chars() {
            assert!(widths.advances.contains_key(&ch), "no glyph for {:?}", ch);
        }
    }

    #[test]
    fn test_width_scales_with_size() {
        let widths = glyph_widths(FontStyle::Regular).unwrap();
        let small = widths.text_width_pt("jalapeño", 10.0);
        let large = widths.text_width_pt("jalapeño", 20.0);
        assert!(small > 0.0);
        assert!((large - 2.0 * small).abs() < 1e-3);
    }
}
