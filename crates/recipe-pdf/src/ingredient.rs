//! Ingredient line parsing
//!
//! Splits a free-text ingredient line into a name, the quantity text that
//! surrounds it, and an optional trailing preparation note in parentheses.
//! Names are recognised by substring match against an injected
//! [`IngredientLookup`].

use crate::normalize::normalize_lines;
use crate::record::LineSource;
use crate::types::*;
use std::ops::Range;
use std::path::Path;

/// Source of known ingredient names
pub trait IngredientLookup: Send + Sync {
    /// Return the first known name contained in `text_lower`.
    ///
    /// `text_lower` is lower-cased char by char with final sigma folded to
    /// `σ`. Implementations must fold their names the same way and must
    /// resolve overlaps deterministically.
    fn find_in(&self, text_lower: &str) -> Option<&str>;
}

/// In-memory set of known ingredient names.
///
/// Names are matched longest first, ties broken alphabetically, so that
/// "green onion" wins over "onion" regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnownIngredients {
    names: Vec<String>,
}

impl KnownIngredients {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = names
            .into_iter()
            .map(|name| fold_case(name.as_ref().trim()))
            .filter(|name| !name.is_empty())
            .collect();

        names.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then_with(|| a.cmp(b)));
        names.dedup();

        Self { names }
    }

    /// Parse a names list: a JSON array, or one name per line
    pub fn from_text(text: &str) -> Self {
        Self::new(normalize_lines(&LineSource::Text(text.to_string())))
    }

    /// Load a names list from a file (see [`KnownIngredients::from_text`])
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            RecipePdfError::Config(format!(
                "Failed to read known ingredients from {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self::from_text(&text))
    }

    /// Names in match order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl IngredientLookup for KnownIngredients {
    fn find_in(&self, text_lower: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|name| text_lower.contains(name.as_str()))
            .map(String::as_str)
    }
}

/// One ingredient line split into its parts
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedIngredientLine {
    pub raw_text: String,
    pub name: String,
    pub quantity_text: String,
    pub preparation_note: String,
}

impl ParsedIngredientLine {
    /// Single-line rendering: `"<quantity> <name> (<note>)"`, empty parts omitted
    pub fn display_text(&self) -> String {
        let mut text = String::new();
        if !self.quantity_text.is_empty() {
            text.push_str(&self.quantity_text);
            text.push(' ');
        }
        text.push_str(&self.name);
        if !self.preparation_note.is_empty() {
            text.push_str(" (");
            text.push_str(&self.preparation_note);
            text.push(')');
        }
        text.trim().to_string()
    }
}

/// Parse one ingredient line against the known names
pub fn parse_ingredient_line(line: &str, lookup: &dyn IngredientLookup) -> ParsedIngredientLine {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ParsedIngredientLine {
            raw_text: line.to_string(),
            name: line.to_string(),
            ..Default::default()
        };
    }

    let (remaining, preparation_note) = split_trailing_note(trimmed);

    let lowered = fold_case(remaining);
    let Some(known) = lookup.find_in(&lowered) else {
        return ParsedIngredientLine {
            raw_text: line.to_string(),
            name: remaining.to_string(),
            quantity_text: String::new(),
            preparation_note: preparation_note.to_string(),
        };
    };

    let quantity = match find_ignore_case(remaining, known) {
        Some(range) => {
            let mut rest = String::with_capacity(remaining.len());
            rest.push_str(&remaining[..range.start]);
            rest.push(' ');
            rest.push_str(&remaining[range.end..]);
            collapse_whitespace(&rest)
        }
        None => collapse_whitespace(remaining),
    };

    ParsedIngredientLine {
        raw_text: line.to_string(),
        name: capitalize_first(known),
        quantity_text: quantity,
        preparation_note: preparation_note.to_string(),
    }
}

/// Split `"2 cups flour (sifted)"` into `("2 cups flour", "sifted")`
fn split_trailing_note(line: &str) -> (&str, &str) {
    let Some(body) = line.strip_suffix(')') else {
        return (line, "");
    };
    match body.rfind('(') {
        Some(open) if !body[open + 1..].contains(')') => {
            (body[..open].trim_end(), body[open + 1..].trim())
        }
        _ => (line, ""),
    }
}

/// Lower-case char by char, folding final sigma to `σ`.
///
/// `str::to_lowercase` picks `ς` or `σ` by position in the word, which would
/// let the same name fold differently on the two sides of a match.
fn fold_case(text: &str) -> String {
    text.chars().flat_map(fold_char).collect()
}

fn fold_char(ch: char) -> impl Iterator<Item = char> {
    ch.to_lowercase().map(|lower| if lower == 'ς' { 'σ' } else { lower })
}

/// Byte range of the first occurrence of `needle_lower` in `haystack`,
/// comparing `haystack` with [`fold_case`] char by char
fn find_ignore_case(haystack: &str, needle_lower: &str) -> Option<Range<usize>> {
    if needle_lower.is_empty() {
        return None;
    }

    for (start, _) in haystack.char_indices() {
        let mut needle = needle_lower.chars().peekable();
        for (offset, ch) in haystack[start..].char_indices() {
            if !fold_char(ch).all(|lower| needle.next() == Some(lower)) {
                break;
            }
            if needle.peek().is_none() {
                return Some(start..start + offset + ch.len_utf8());
            }
        }
    }
    None
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
