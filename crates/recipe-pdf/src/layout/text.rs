//! Text metrics from the embedded faces' glyph advances

use super::types::FontStyle;
use crate::constants::{FALLBACK_CHAR_WIDTH_RATIO, LINE_HEIGHT_FACTOR, pt_to_mm};
use crate::fonts::glyph_widths;

/// Tolerance for widths compared against a limit derived from a measurement
const WIDTH_EPSILON_MM: f32 = 1e-3;

/// Rendered width of `text` in millimeters
pub fn text_width_mm(text: &str, size_pt: f32, style: FontStyle) -> f32 {
    let width_pt = match glyph_widths(style) {
        Some(widths) => widths.text_width_pt(text, size_pt),
        None => text.chars().count() as f32 * size_pt * FALLBACK_CHAR_WIDTH_RATIO,
    };
    pt_to_mm(width_pt)
}

/// Distance between consecutive baselines in millimeters
pub fn line_height_mm(size_pt: f32) -> f32 {
    pt_to_mm(size_pt * LINE_HEIGHT_FACTOR)
}

/// Baseline offset from the top of a line box
pub fn baseline_offset_mm(size_pt: f32) -> f32 {
    line_height_mm(size_pt) * 0.75
}

fn fits(text: &str, max_width_mm: f32, size_pt: f32, style: FontStyle) -> bool {
    text_width_mm(text, size_pt, style) <= max_width_mm + WIDTH_EPSILON_MM
}

/// Greedy word wrap to `max_width_mm`.
///
/// Words wider than a full line are broken at character boundaries. A line
/// always holds at least one character. Blank input yields no lines.
pub fn wrap_text(text: &str, max_width_mm: f32, size_pt: f32, style: FontStyle) -> Vec<String> {
    let fits_line = |candidate: &str| fits(candidate, max_width_mm, size_pt, style);

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() {
            let candidate = format!("{} {}", current, word);
            if fits_line(&candidate) {
                current = candidate;
                continue;
            }
            lines.push(std::mem::take(&mut current));
        }

        if fits_line(word) {
            current.push_str(word);
            continue;
        }

        // Break overlong words into line-sized chunks
        for ch in word.chars() {
            current.push(ch);
            if current.chars().nth(1).is_some() && !fits_line(&current) {
                current.pop();
                lines.push(std::mem::take(&mut current));
                current.push(ch);
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Shorten `text` with a trailing "..." so it fits `max_width_mm`
pub fn truncate_to_width(text: &str, max_width_mm: f32, size_pt: f32, style: FontStyle) -> String {
    if fits(text, max_width_mm, size_pt, style) {
        return text.to_string();
    }

    let ellipsis_width = text_width_mm("...", size_pt, style);
    if ellipsis_width > max_width_mm + WIDTH_EPSILON_MM {
        let mut shortened = String::new();
        for ch in text.chars() {
            shortened.push(ch);
            if !fits(&shortened, max_width_mm, size_pt, style) {
                shortened.pop();
                break;
            }
        }
        return shortened;
    }

    let room = max_width_mm - ellipsis_width;
    let mut shortened = String::new();
    for ch in text.chars() {
        shortened.push(ch);
        if !fits(&shortened, room, size_pt, style) {
            shortened.pop();
            break;
        }
    }
    shortened.truncate(shortened.trim_end().len());
    shortened.push_str("...");
    shortened
}
