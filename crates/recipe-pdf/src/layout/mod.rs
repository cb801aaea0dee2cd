//! Layout calculation for recipe documents
//!
//! This module turns a recipe record into a backend-neutral display list:
//! - Text metrics and word wrapping for the embedded faces
//! - The paginating layout pass (header, hero image, cards, sections, footer)
//! - Geometry types shared with the PDF renderer

mod document;
mod text;
mod types;

pub use document::*;
pub use text::*;
pub use types::*;
