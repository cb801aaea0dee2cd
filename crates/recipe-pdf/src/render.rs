//! PDF rendering of a finished layout
//!
//! Converts the display list into `printpdf` operations. Layout coordinates
//! are millimeters from the top-left; PDF space starts bottom-left, so every
//! y is flipped against the page height here.

use crate::fonts::parse_font;
use crate::image_loader::HeroImage;
use crate::layout::{DrawCommand, FontStyle, RecipeLayout, Rect};
use crate::types::{RecipePdfError, Result, RgbColor};
use log::debug;
use printpdf::{
    Color, FontId, ImageCompression, ImageOptimizationOptions, LinePoint, Mm, Op, PaintMode,
    PdfDocument, PdfPage, PdfSaveOptions, Point, Polygon, PolygonRing, Pt, RawImage, RawImageData,
    RawImageFormat, Rgb, TextItem, TextMatrix, WindingOrder, XObjectId, XObjectTransform,
};

/// Segments used to approximate marker discs
const CIRCLE_SEGMENTS: usize = 24;

/// Font ids of the embedded faces, one per style
struct DocumentFonts {
    regular: FontId,
    bold: FontId,
    oblique: FontId,
}

impl DocumentFonts {
    fn embed(doc: &mut PdfDocument) -> Result<Self> {
        Ok(Self {
            regular: doc.add_font(&parse_font(FontStyle::Regular)?),
            bold: doc.add_font(&parse_font(FontStyle::Bold)?),
            oblique: doc.add_font(&parse_font(FontStyle::Oblique)?),
        })
    }

    fn get(&self, style: FontStyle) -> &FontId {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Oblique => &self.oblique,
        }
    }
}

/// Render the layout into PDF bytes.
///
/// `hero` must be the image the layout was computed with whenever the layout
/// placed one. It is embedded as a JPEG (`/DCTDecode`) stream at
/// `image_quality` (1-100).
pub fn render_pdf(
    layout: &RecipeLayout,
    hero: Option<&HeroImage>,
    image_quality: u8,
) -> Result<Vec<u8>> {
    let mut doc = PdfDocument::new(&layout.title);
    let fonts = DocumentFonts::embed(&mut doc)?;

    let embedded = match (layout.hero_drawn, hero) {
        (true, Some(hero)) => {
            let id = doc.add_image(&raw_image(hero)?);
            Some((id, hero.width(), hero.height()))
        }
        (true, None) => {
            return Err(RecipePdfError::Generation(
                "layout places a hero image but none was supplied".to_string(),
            ));
        }
        (false, _) => None,
    };

    let page_height = layout.page_height_mm;
    for page in &layout.pages {
        let mut ops = Vec::new();
        for command in &page.commands {
            match command {
                DrawCommand::FillRect { rect, color } => {
                    fill_rect(&mut ops, rect, *color, page_height);
                }
                DrawCommand::FillCircle {
                    center_x,
                    center_y,
                    radius,
                    color,
                } => {
                    fill_circle(&mut ops, *center_x, *center_y, *radius, *color, page_height);
                }
                DrawCommand::Text {
                    text,
                    x,
                    baseline,
                    size_pt,
                    style,
                    color,
                } => {
                    write_text(
                        &mut ops,
                        fonts.get(*style),
                        text,
                        *x,
                        page_height - baseline,
                        *size_pt,
                        *color,
                    );
                }
                DrawCommand::Image { rect } => {
                    let Some((id, width_px, height_px)) = &embedded else {
                        return Err(RecipePdfError::Generation(
                            "image placement without an embedded image".to_string(),
                        ));
                    };
                    place_image(&mut ops, id, *width_px, *height_px, rect, page_height);
                }
            }
        }

        doc.pages.push(PdfPage::new(
            Mm(layout.page_width_mm),
            Mm(layout.page_height_mm),
            ops,
        ));
    }

    let mut warnings = Vec::new();
    let bytes = doc.save(&save_options(image_quality), &mut warnings);
    if !warnings.is_empty() {
        debug!("printpdf reported {} warnings while saving", warnings.len());
    }

    if bytes.is_empty() {
        return Err(RecipePdfError::Generation(
            "PDF serialization produced no output".to_string(),
        ));
    }

    Ok(bytes)
}

fn pdf_color(color: RgbColor) -> Color {
    Color::Rgb(Rgb::new(color.r, color.g, color.b, None))
}

/// Save options that keep images as JPEG at `image_quality`
fn save_options(image_quality: u8) -> PdfSaveOptions {
    PdfSaveOptions {
        image_optimization: Some(ImageOptimizationOptions {
            quality: Some(f32::from(image_quality.clamp(1, 100)) / 100.0),
            max_image_size: None,
            auto_optimize: Some(false),
            format: Some(ImageCompression::Jpeg),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// A point in PDF space from millimeters measured bottom-left
fn point_mm(x: f32, y: f32) -> LinePoint {
    LinePoint {
        p: Point {
            x: Mm(x).into_pt(),
            y: Mm(y).into_pt(),
        },
        bezier: false,
    }
}

fn fill_polygon(ops: &mut Vec<Op>, points: Vec<LinePoint>, color: RgbColor) {
    ops.push(Op::SetFillColor {
        col: pdf_color(color),
    });
    ops.push(Op::DrawPolygon {
        polygon: Polygon {
            rings: vec![PolygonRing { points }],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        },
    });
}

fn fill_rect(ops: &mut Vec<Op>, rect: &Rect, color: RgbColor, page_height: f32) {
    let left = rect.x;
    let right = rect.x + rect.width;
    let top = page_height - rect.y;
    let bottom = page_height - rect.bottom();

    fill_polygon(
        ops,
        vec![
            point_mm(left, bottom),
            point_mm(right, bottom),
            point_mm(right, top),
            point_mm(left, top),
        ],
        color,
    );
}

fn fill_circle(
    ops: &mut Vec<Op>,
    center_x: f32,
    center_y: f32,
    radius: f32,
    color: RgbColor,
    page_height: f32,
) {
    let center_y = page_height - center_y;
    let points = (0..CIRCLE_SEGMENTS)
        .map(|i| {
            let angle = i as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
            point_mm(
                center_x + radius * angle.cos(),
                center_y + radius * angle.sin(),
            )
        })
        .collect();

    fill_polygon(ops, points, color);
}

fn write_text(
    ops: &mut Vec<Op>,
    font: &FontId,
    text: &str,
    x: f32,
    baseline_from_bottom: f32,
    size_pt: f32,
    color: RgbColor,
) {
    ops.push(Op::SetFillColor {
        col: pdf_color(color),
    });
    ops.push(Op::StartTextSection);
    ops.push(Op::SetFontSize {
        font: font.clone(),
        size: Pt(size_pt),
    });
    ops.push(Op::SetTextMatrix {
        matrix: TextMatrix::Translate(Mm(x).into_pt(), Mm(baseline_from_bottom).into_pt()),
    });
    ops.push(Op::WriteText {
        items: vec![TextItem::Text(text.to_string())],
        font: font.clone(),
    });
    ops.push(Op::EndTextSection);
}

fn place_image(
    ops: &mut Vec<Op>,
    id: &XObjectId,
    width_px: u32,
    height_px: u32,
    rect: &Rect,
    page_height: f32,
) {
    // At 72 dpi one pixel maps to one point, so scale is points per pixel
    ops.push(Op::UseXobject {
        id: id.clone(),
        transform: XObjectTransform {
            translate_x: Some(Mm(rect.x).into_pt()),
            translate_y: Some(Mm(page_height - rect.bottom()).into_pt()),
            scale_x: Some(Mm(rect.width).into_pt().0 / width_px as f32),
            scale_y: Some(Mm(rect.height).into_pt().0 / height_px as f32),
            dpi: Some(72.0),
            ..Default::default()
        },
    });
}

fn raw_image(hero: &HeroImage) -> Result<RawImage> {
    let rgb = image::load_from_memory_with_format(hero.jpeg(), image::ImageFormat::Jpeg)
        .map_err(|e| RecipePdfError::Generation(format!("Failed to decode hero image: {}", e)))?
        .to_rgb8();

    Ok(RawImage {
        width: rgb.width() as usize,
        height: rgb.height() as usize,
        data_format: RawImageFormat::RGB8,
        pixels: RawImageData::U8(rgb.into_raw()),
        tag: Vec::new(),
    })
}
