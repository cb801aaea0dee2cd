//! The recipe layout pass
//!
//! Runs the document states strictly in order, threading a [`LayoutCursor`]
//! through each one. Each state function takes the cursor where the previous
//! state stopped and returns where it stopped itself. Page breaks only happen
//! between items, never inside one.

use super::text::{baseline_offset_mm, line_height_mm, text_width_mm, truncate_to_width, wrap_text};
use super::types::*;
use crate::constants::*;
use crate::format::{NOT_AVAILABLE, format_servings, format_time, meta_line};
use crate::image_loader::HeroImage;
use crate::ingredient::{IngredientLookup, parse_ingredient_line};
use crate::normalize::normalize_lines;
use crate::options::ExportOptions;
use crate::record::RecipeRecord;
use crate::types::RgbColor;
use log::debug;

pub const UNTITLED_RECIPE: &str = "Untitled Recipe";
pub const NO_INGREDIENTS: &str = "No ingredients listed.";
pub const NO_INSTRUCTIONS: &str = "No instructions provided.";
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Lay out one recipe.
///
/// `hero` is the already-loaded hero image; `None` skips the image block
/// entirely and every later section moves up accordingly.
pub fn layout_recipe(
    record: &RecipeRecord,
    hero: Option<&HeroImage>,
    options: &ExportOptions,
    lookup: &dyn IngredientLookup,
) -> RecipeLayout {
    let ingredients = normalize_lines(&record.ingredients);
    let instructions = normalize_lines(&record.instructions);
    let title = RecipeRecord::present(&record.title)
        .unwrap_or(UNTITLED_RECIPE)
        .to_string();

    debug!(
        "Laying out \"{}\": {} ingredients, {} instructions, image: {}",
        title,
        ingredients.len(),
        instructions.len(),
        hero.is_some()
    );

    let mut pager = Pager::new(options);

    let cursor = layout_header(&mut pager, LayoutCursor::new(0.0));
    let cursor = match hero {
        Some(image) => layout_hero(&mut pager, cursor, image),
        None => cursor,
    };
    let cursor = layout_title_meta(&mut pager, cursor, &title, record);
    let cursor = layout_info_cards(&mut pager, cursor, record);
    let cursor = layout_ingredients(&mut pager, cursor, &ingredients, lookup);
    let cursor = layout_instructions(&mut pager, cursor, &instructions);
    if let Some(notes) = RecipeRecord::present(&record.notes) {
        layout_notes(&mut pager, cursor, notes);
    }

    pager.stamp_footers();
    pager.finish(title)
}

/// Page list plus the geometry every state needs
struct Pager<'a> {
    options: &'a ExportOptions,
    page_width: f32,
    page_height: f32,
    pages: Vec<LayoutPage>,
    marks: Vec<SectionMark>,
    hero_drawn: bool,
}

impl<'a> Pager<'a> {
    fn new(options: &'a ExportOptions) -> Self {
        let (page_width, page_height) = options.page_dimensions_mm();
        Self {
            options,
            page_width,
            page_height,
            pages: vec![LayoutPage::default()],
            marks: Vec::new(),
            hero_drawn: false,
        }
    }

    fn left(&self) -> f32 {
        self.options.margin_mm
    }

    fn top(&self) -> f32 {
        self.options.margin_mm
    }

    fn bottom(&self) -> f32 {
        self.options.content_bottom_mm()
    }

    fn content_width(&self) -> f32 {
        self.options.content_width_mm()
    }

    fn palette(&self) -> crate::options::Palette {
        self.options.palette
    }

    fn draw(&mut self, cursor: LayoutCursor, command: DrawCommand) {
        self.pages[cursor.page].commands.push(command);
    }

    /// Write one line of text whose line box starts at `top`
    #[allow(clippy::too_many_arguments)]
    fn write(
        &mut self,
        cursor: LayoutCursor,
        x: f32,
        top: f32,
        text: impl Into<String>,
        size_pt: f32,
        style: FontStyle,
        color: RgbColor,
    ) {
        self.draw(
            cursor,
            DrawCommand::Text {
                text: text.into(),
                x,
                baseline: top + baseline_offset_mm(size_pt),
                size_pt,
                style,
                color,
            },
        );
    }

    fn mark(&mut self, section: Section, cursor: LayoutCursor) {
        self.marks.push(SectionMark {
            section,
            page: cursor.page,
            y: cursor.y,
        });
    }

    /// Start a new page unless `needed` mm still fit above the footer.
    ///
    /// A cursor already at the top of a fresh page is returned unchanged so
    /// that an item taller than a whole page cannot loop forever.
    fn ensure_space(&mut self, cursor: LayoutCursor, needed: f32) -> LayoutCursor {
        if cursor.y + needed <= self.bottom() || cursor.y <= self.top() {
            return cursor;
        }

        self.pages.push(LayoutPage::default());
        let next = LayoutCursor {
            y: self.top(),
            page: self.pages.len() - 1,
        };
        debug!(
            "Page break at {:.1}mm (needed {:.1}mm), continuing on page {}",
            cursor.y,
            needed,
            next.page + 1
        );
        next
    }

    /// Final pass: stamp the footer band and "Page i of N" on every page
    fn stamp_footers(&mut self) {
        let total = self.pages.len();
        let band = Rect::new(
            0.0,
            self.page_height - FOOTER_HEIGHT_MM,
            self.page_width,
            FOOTER_HEIGHT_MM,
        );
        let top = band.y + (FOOTER_HEIGHT_MM - line_height_mm(FOOTER_FONT_SIZE)) / 2.0;
        let baseline = top + baseline_offset_mm(FOOTER_FONT_SIZE);
        let palette = self.palette();
        let left = self.left();
        let right = self.page_width - self.options.margin_mm;
        let attribution = self.options.attribution.clone();

        for (index, page) in self.pages.iter_mut().enumerate() {
            let label = format!("Page {} of {}", index + 1, total);
            let label_width = text_width_mm(&label, FOOTER_FONT_SIZE, FontStyle::Regular);

            page.commands.push(DrawCommand::FillRect {
                rect: band,
                color: palette.header,
            });
            page.commands.push(DrawCommand::Text {
                text: attribution.clone(),
                x: left,
                baseline,
                size_pt: FOOTER_FONT_SIZE,
                style: FontStyle::Regular,
                color: RgbColor::WHITE,
            });
            page.commands.push(DrawCommand::Text {
                text: label,
                x: right - label_width,
                baseline,
                size_pt: FOOTER_FONT_SIZE,
                style: FontStyle::Regular,
                color: RgbColor::WHITE,
            });
        }
    }

    fn finish(self, title: String) -> RecipeLayout {
        RecipeLayout {
            title,
            page_width_mm: self.page_width,
            page_height_mm: self.page_height,
            pages: self.pages,
            marks: self.marks,
            hero_drawn: self.hero_drawn,
        }
    }
}

fn layout_header(pager: &mut Pager, cursor: LayoutCursor) -> LayoutCursor {
    pager.mark(Section::Header, cursor);
    let palette = pager.palette();
    let left = pager.left();

    pager.draw(
        cursor,
        DrawCommand::FillRect {
            rect: Rect::new(0.0, cursor.y, pager.page_width, HEADER_HEIGHT_MM),
            color: palette.header,
        },
    );

    let brand_top = cursor.y + 7.0;
    let brand = pager.options.brand_name.clone();
    let tagline = pager.options.tagline.clone();
    pager.write(
        cursor,
        left,
        brand_top,
        brand,
        BRAND_FONT_SIZE,
        FontStyle::Bold,
        RgbColor::WHITE,
    );
    pager.write(
        cursor,
        left,
        brand_top + line_height_mm(BRAND_FONT_SIZE),
        tagline,
        TAGLINE_FONT_SIZE,
        FontStyle::Regular,
        RgbColor::WHITE,
    );

    cursor.advance(HEADER_HEIGHT_MM + BLOCK_GAP_MM)
}

fn layout_hero(pager: &mut Pager, cursor: LayoutCursor, image: &HeroImage) -> LayoutCursor {
    let cursor = pager.ensure_space(cursor, HERO_IMAGE_HEIGHT_MM);
    pager.mark(Section::HeroImage, cursor);

    let area = Rect::new(
        pager.left(),
        cursor.y,
        pager.content_width(),
        HERO_IMAGE_HEIGHT_MM,
    );
    pager.draw(
        cursor,
        DrawCommand::Image {
            rect: area.fit_aspect(image.aspect_ratio()),
        },
    );
    pager.hero_drawn = true;

    cursor.advance(HERO_IMAGE_HEIGHT_MM + BLOCK_GAP_MM)
}

fn layout_title_meta(
    pager: &mut Pager,
    cursor: LayoutCursor,
    title: &str,
    record: &RecipeRecord,
) -> LayoutCursor {
    pager.mark(Section::TitleMeta, cursor);
    let palette = pager.palette();
    let left = pager.left();

    let mut cursor = cursor;
    let title_height = line_height_mm(TITLE_FONT_SIZE);
    for line in wrap_text(title, pager.content_width(), TITLE_FONT_SIZE, FontStyle::Bold) {
        cursor = pager.ensure_space(cursor, title_height);
        pager.write(
            cursor,
            left,
            cursor.y,
            line,
            TITLE_FONT_SIZE,
            FontStyle::Bold,
            palette.text,
        );
        cursor = cursor.advance(title_height);
    }

    let meta_height = line_height_mm(META_FONT_SIZE);
    let meta = meta_line(
        RecipeRecord::present(&record.cuisine),
        RecipeRecord::present(&record.category),
    );
    if let Some(meta) = meta {
        cursor = pager.ensure_space(cursor, meta_height);
        pager.write(
            cursor,
            left,
            cursor.y,
            meta,
            META_FONT_SIZE,
            FontStyle::Regular,
            palette.muted,
        );
        cursor = cursor.advance(meta_height);
    }

    let author = RecipeRecord::present(&record.owner_name).unwrap_or(ANONYMOUS_AUTHOR);
    cursor = pager.ensure_space(cursor, meta_height);
    pager.write(
        cursor,
        left,
        cursor.y,
        format!("By {}", author),
        META_FONT_SIZE,
        FontStyle::Oblique,
        palette.muted,
    );

    cursor.advance(meta_height + BLOCK_GAP_MM)
}

fn layout_info_cards(pager: &mut Pager, cursor: LayoutCursor, record: &RecipeRecord) -> LayoutCursor {
    let cursor = pager.ensure_space(cursor, CARD_HEIGHT_MM);
    pager.mark(Section::InfoCards, cursor);
    let palette = pager.palette();

    let card_width = (pager.content_width() - 3.0 * CARD_GAP_MM) / 4.0;
    let difficulty = RecipeRecord::present(&record.difficulty).unwrap_or(NOT_AVAILABLE);
    let cards = [
        ("Prep Time", format_time(&record.prep_time)),
        ("Cook Time", format_time(&record.cook_time)),
        ("Servings", format_servings(record.servings)),
        ("Difficulty", difficulty.to_string()),
    ];

    for (index, (label, value)) in cards.into_iter().enumerate() {
        let x = pager.left() + index as f32 * (card_width + CARD_GAP_MM);
        pager.draw(
            cursor,
            DrawCommand::FillRect {
                rect: Rect::new(x, cursor.y, card_width, CARD_HEIGHT_MM),
                color: palette.card,
            },
        );
        pager.write(
            cursor,
            x + 3.0,
            cursor.y + 2.5,
            label.to_uppercase(),
            CARD_LABEL_FONT_SIZE,
            FontStyle::Bold,
            palette.muted,
        );
        let value = truncate_to_width(&value, card_width - 6.0, CARD_VALUE_FONT_SIZE, FontStyle::Bold);
        pager.write(
            cursor,
            x + 3.0,
            cursor.y + 8.5,
            value,
            CARD_VALUE_FONT_SIZE,
            FontStyle::Bold,
            palette.text,
        );
    }

    cursor.advance(CARD_HEIGHT_MM + BLOCK_GAP_MM)
}

/// Filled label band opening a section.
///
/// Space for the band and the first row is reserved together so a band is
/// never left alone at the bottom of a page.
fn section_band(
    pager: &mut Pager,
    cursor: LayoutCursor,
    section: Section,
    label: &str,
    color: RgbColor,
    first_row: f32,
) -> LayoutCursor {
    let cursor = pager.ensure_space(cursor, SECTION_BAND_HEIGHT_MM + ROW_GAP_MM + first_row);
    pager.mark(section, cursor);
    let left = pager.left();

    pager.draw(
        cursor,
        DrawCommand::FillRect {
            rect: Rect::new(left, cursor.y, pager.content_width(), SECTION_BAND_HEIGHT_MM),
            color,
        },
    );
    let label_top =
        cursor.y + (SECTION_BAND_HEIGHT_MM - line_height_mm(SECTION_LABEL_FONT_SIZE)) / 2.0;
    pager.write(
        cursor,
        left + 4.0,
        label_top,
        label.to_uppercase(),
        SECTION_LABEL_FONT_SIZE,
        FontStyle::Bold,
        RgbColor::WHITE,
    );

    cursor.advance(SECTION_BAND_HEIGHT_MM + 2.0 * ROW_GAP_MM)
}

fn empty_state(pager: &mut Pager, cursor: LayoutCursor, message: &str) -> LayoutCursor {
    let palette = pager.palette();
    let left = pager.left();
    pager.write(
        cursor,
        left + 4.0,
        cursor.y,
        message,
        BODY_FONT_SIZE,
        FontStyle::Oblique,
        palette.muted,
    );
    cursor.advance(line_height_mm(BODY_FONT_SIZE) + BLOCK_GAP_MM)
}

fn layout_ingredients(
    pager: &mut Pager,
    cursor: LayoutCursor,
    lines: &[String],
    lookup: &dyn IngredientLookup,
) -> LayoutCursor {
    let palette = pager.palette();
    let mut cursor = section_band(
        pager,
        cursor,
        Section::Ingredients,
        "Ingredients",
        palette.accent,
        INGREDIENT_MIN_ROW_MM,
    );

    if lines.is_empty() {
        return empty_state(pager, cursor, NO_INGREDIENTS);
    }

    let left = pager.left();
    let text_width = pager.content_width() - ROW_TEXT_INDENT_MM;
    let line_height = line_height_mm(BODY_FONT_SIZE);

    for line in lines {
        let parsed = parse_ingredient_line(line, lookup);
        let wrapped = wrap_text(&parsed.display_text(), text_width, BODY_FONT_SIZE, FontStyle::Regular);
        let row_height = (wrapped.len() as f32 * line_height).max(INGREDIENT_ROW_GLYPH_MM);

        cursor = pager.ensure_space(cursor, row_height.max(INGREDIENT_MIN_ROW_MM));
        pager.draw(
            cursor,
            DrawCommand::FillCircle {
                center_x: left + 4.0,
                center_y: cursor.y + line_height / 2.0,
                radius: BULLET_RADIUS_MM,
                color: palette.accent,
            },
        );
        for (index, text) in wrapped.into_iter().enumerate() {
            pager.write(
                cursor,
                left + ROW_TEXT_INDENT_MM,
                cursor.y + index as f32 * line_height,
                text,
                BODY_FONT_SIZE,
                FontStyle::Regular,
                palette.text,
            );
        }
        cursor = cursor.advance(row_height + ROW_GAP_MM);
    }

    cursor.advance(BLOCK_GAP_MM)
}

fn layout_instructions(pager: &mut Pager, cursor: LayoutCursor, steps: &[String]) -> LayoutCursor {
    let palette = pager.palette();
    let mut cursor = section_band(
        pager,
        cursor,
        Section::Instructions,
        "Instructions",
        palette.accent,
        INSTRUCTION_MIN_ROW_MM,
    );

    if steps.is_empty() {
        return empty_state(pager, cursor, NO_INSTRUCTIONS);
    }

    let left = pager.left();
    let text_width = pager.content_width() - ROW_TEXT_INDENT_MM;
    let line_height = line_height_mm(BODY_FONT_SIZE);
    let text_inset = 1.0;

    for (index, step) in steps.iter().enumerate() {
        let wrapped = wrap_text(step, text_width, BODY_FONT_SIZE, FontStyle::Regular);
        let row_height =
            (text_inset + wrapped.len() as f32 * line_height).max(INSTRUCTION_ROW_GLYPH_MM);

        cursor = pager.ensure_space(cursor, row_height.max(INSTRUCTION_MIN_ROW_MM));

        let center_x = left + STEP_DISC_RADIUS_MM;
        let center_y = cursor.y + STEP_DISC_RADIUS_MM;
        pager.draw(
            cursor,
            DrawCommand::FillCircle {
                center_x,
                center_y,
                radius: STEP_DISC_RADIUS_MM,
                color: palette.accent,
            },
        );
        let number = (index + 1).to_string();
        let number_width = text_width_mm(&number, MARKER_FONT_SIZE, FontStyle::Bold);
        pager.draw(
            cursor,
            DrawCommand::Text {
                text: number,
                x: center_x - number_width / 2.0,
                baseline: center_y + pt_to_mm(MARKER_FONT_SIZE) * 0.35,
                size_pt: MARKER_FONT_SIZE,
                style: FontStyle::Bold,
                color: RgbColor::WHITE,
            },
        );

        for (line_index, text) in wrapped.into_iter().enumerate() {
            pager.write(
                cursor,
                left + ROW_TEXT_INDENT_MM,
                cursor.y + text_inset + line_index as f32 * line_height,
                text,
                BODY_FONT_SIZE,
                FontStyle::Regular,
                palette.text,
            );
        }
        cursor = cursor.advance(row_height + ROW_GAP_MM);
    }

    cursor.advance(BLOCK_GAP_MM)
}

fn layout_notes(pager: &mut Pager, cursor: LayoutCursor, notes: &str) -> LayoutCursor {
    let palette = pager.palette();
    let line_height = line_height_mm(BODY_FONT_SIZE);
    let mut cursor = section_band(
        pager,
        cursor,
        Section::Notes,
        "Notes",
        palette.notes,
        line_height,
    );

    let left = pager.left();
    let width = pager.content_width();
    for paragraph in notes.lines().map(str::trim).filter(|p| !p.is_empty()) {
        for line in wrap_text(paragraph, width, BODY_FONT_SIZE, FontStyle::Regular) {
            cursor = pager.ensure_space(cursor, line_height);
            pager.write(
                cursor,
                left,
                cursor.y,
                line,
                BODY_FONT_SIZE,
                FontStyle::Regular,
                palette.text,
            );
            cursor = cursor.advance(line_height);
        }
        cursor = cursor.advance(ROW_GAP_MM);
    }

    cursor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingredient::KnownIngredients;

    fn layout(record: &RecipeRecord) -> RecipeLayout {
        layout_recipe(
            record,
            None,
            &ExportOptions::default(),
            &KnownIngredients::default(),
        )
    }

    #[test]
    fn test_states_run_in_order() {
        let record = RecipeRecord {
            notes: Some("Keeps for a week.".to_string()),
            ..Default::default()
        };
        let sections: Vec<Section> = layout(&record).marks.iter().map(|m| m.section).collect();
        assert_eq!(
            sections,
            vec![
                Section::Header,
                Section::TitleMeta,
                Section::InfoCards,
                Section::Ingredients,
                Section::Instructions,
                Section::Notes,
            ]
        );
    }

    #[test]
    fn test_blank_notes_skip_notes_state() {
        let record = RecipeRecord {
            notes: Some("  \n ".to_string()),
            ..Default::default()
        };
        assert!(layout(&record).mark(Section::Notes).is_none());
    }

    #[test]
    fn test_untitled_fallback() {
        let result = layout(&RecipeRecord::default());
        assert_eq!(result.title, UNTITLED_RECIPE);
        assert!(result.contains_text(UNTITLED_RECIPE));
        assert!(result.contains_text("By Anonymous"));
    }

    #[test]
    fn test_meta_line_skipped_without_cuisine_and_category() {
        let result = layout(&RecipeRecord::default());
        assert!(!result.contains_text(" | "));
    }

    #[test]
    fn test_page_break_resets_to_top_margin() {
        let options = ExportOptions::default();
        let mut pager = Pager::new(&options);
        let cursor = pager.ensure_space(LayoutCursor::new(pager.bottom() - 1.0), 5.0);
        assert_eq!(cursor.page, 1);
        assert_eq!(cursor.y, options.margin_mm);
        assert_eq!(pager.pages.len(), 2);
    }

    #[test]
    fn test_no_break_at_top_of_fresh_page() {
        let options = ExportOptions::default();
        let mut pager = Pager::new(&options);
        let top = LayoutCursor::new(options.margin_mm);
        let cursor = pager.ensure_space(top, 10_000.0);
        assert_eq!(cursor, top);
        assert_eq!(pager.pages.len(), 1);
    }
}
