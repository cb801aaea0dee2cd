//! Layout data types for the recipe document
//!
//! These types sit between the layout pass and PDF rendering. All
//! coordinates are millimeters measured from the top-left corner of the page;
//! the renderer flips them into PDF space.

use crate::types::RgbColor;

/// A rectangular area in millimeters (y grows downwards)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (top edge)
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Largest rect with the given aspect ratio, centered inside this one
    pub fn fit_aspect(&self, aspect_ratio: f32) -> Rect {
        if aspect_ratio <= 0.0 || !aspect_ratio.is_finite() {
            return *self;
        }

        let own_ratio = self.width / self.height;
        let (width, height) = if aspect_ratio > own_ratio {
            (self.width, self.width / aspect_ratio)
        } else {
            (self.height * aspect_ratio, self.height)
        };

        Rect::new(
            self.x + (self.width - width) / 2.0,
            self.y + (self.height - height) / 2.0,
            width,
            height,
        )
    }
}

/// Embedded DejaVu Sans faces used by the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
    Oblique,
}

/// A single drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: RgbColor,
    },
    FillCircle {
        center_x: f32,
        center_y: f32,
        radius: f32,
        color: RgbColor,
    },
    Text {
        text: String,
        x: f32,
        /// Baseline position from the page top
        baseline: f32,
        size_pt: f32,
        style: FontStyle,
        color: RgbColor,
    },
    /// Placement of the loaded hero image
    Image { rect: Rect },
}

/// All drawing commands of one output page, in paint order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutPage {
    pub commands: Vec<DrawCommand>,
}

impl LayoutPage {
    /// Text runs on this page, in paint order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|text| text.contains(needle))
    }
}

/// Vertical write position during layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutCursor {
    /// Offset from the top of the current page
    pub y: f32,
    /// Zero-based index of the current page
    pub page: usize,
}

impl LayoutCursor {
    pub fn new(y: f32) -> Self {
        Self { y, page: 0 }
    }

    pub fn advance(self, by: f32) -> Self {
        Self {
            y: self.y + by,
            ..self
        }
    }
}

/// Layout states, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Header,
    HeroImage,
    TitleMeta,
    InfoCards,
    Ingredients,
    Instructions,
    Notes,
}

/// Where a section started
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionMark {
    pub section: Section,
    pub page: usize,
    pub y: f32,
}

/// Finished layout of one recipe document
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeLayout {
    /// Title as rendered (with the "Untitled Recipe" fallback applied)
    pub title: String,
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub pages: Vec<LayoutPage>,
    pub marks: Vec<SectionMark>,
    /// Whether an image command was emitted
    pub hero_drawn: bool,
}

impl RecipeLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Start position of a section, if it was entered
    pub fn mark(&self, section: Section) -> Option<&SectionMark> {
        self.marks.iter().find(|mark| mark.section == section)
    }

    /// Whether any page carries a text run containing `needle`
    pub fn contains_text(&self, needle: &str) -> bool {
        self.pages.iter().any(|page| page.contains_text(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_aspect_wide_image() {
        let area = Rect::new(10.0, 20.0, 100.0, 50.0);
        let fitted = area.fit_aspect(4.0);
        assert_eq!(fitted.width, 100.0);
        assert_eq!(fitted.height, 25.0);
        assert_eq!(fitted.x, 10.0);
        assert_eq!(fitted.y, 32.5);
    }

    #[test]
    fn test_fit_aspect_tall_image() {
        let area = Rect::new(0.0, 0.0, 100.0, 50.0);
        let fitted = area.fit_aspect(0.5);
        assert_eq!(fitted.height, 50.0);
        assert_eq!(fitted.width, 25.0);
        assert_eq!(fitted.x, 37.5);
    }

    #[test]
    fn test_fit_aspect_rejects_degenerate_ratio() {
        let area = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(area.fit_aspect(0.0), area);
        assert_eq!(area.fit_aspect(f32::NAN), area);
    }
}
