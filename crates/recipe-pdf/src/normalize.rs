//! Reduces ingredients/instructions fields to a normalized line sequence
//!
//! Every shape a `LineSource` can take ends up as an ordered list of trimmed,
//! non-empty strings. Nothing in here returns an error: malformed entries are
//! dropped.

use crate::record::LineSource;
use log::debug;
use serde_json::Value;

/// Normalize a line source into ordered, trimmed, non-empty lines
pub fn normalize_lines(source: &LineSource) -> Vec<String> {
    match source {
        LineSource::Sequence(items) => filter_sequence(items.iter().map(|item| item.as_deref())),
        LineSource::Text(text) => normalize_text(text),
        LineSource::Absent => Vec::new(),
    }
}

/// Normalize an untyped JSON value (see [`LineSource`] for accepted shapes)
pub fn normalize_value(value: &Value) -> Vec<String> {
    normalize_lines(&LineSource::from(value.clone()))
}

fn normalize_text(text: &str) -> Vec<String> {
    if let Ok(value @ Value::Array(_)) = serde_json::from_str::<Value>(text.trim()) {
        debug!("Line field holds a JSON-encoded array");
        return normalize_lines(&LineSource::from(value));
    }

    split_delimited(text)
}

fn filter_sequence<'a>(items: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    items
        .flatten()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split on real newlines and on escaped `\n` sequences, stripping ordinals
fn split_delimited(text: &str) -> Vec<String> {
    text.split('\n')
        .flat_map(|piece| piece.split("\\n"))
        .map(str::trim)
        .map(strip_ordinal_prefix)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Remove a leading `<digits>.` followed by whitespace ("1. Mix" -> "Mix")
pub(crate) fn strip_ordinal_prefix(line: &str) -> &str {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return line;
    }

    let rest = &line[digits..];
    match rest.strip_prefix('.') {
        Some(after_dot) if after_dot.starts_with(char::is_whitespace) => after_dot.trim_start(),
        _ => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ordinal_prefix() {
        assert_eq!(strip_ordinal_prefix("1. Mix flour"), "Mix flour");
        assert_eq!(strip_ordinal_prefix("12.   Bake"), "Bake");
        assert_eq!(strip_ordinal_prefix("1.5 cups milk"), "1.5 cups milk");
        assert_eq!(strip_ordinal_prefix("2 eggs"), "2 eggs");
        assert_eq!(strip_ordinal_prefix("3."), "3.");
        assert_eq!(strip_ordinal_prefix("Step 1. Stir"), "Step 1. Stir");
    }

    #[test]
    fn test_ordinal_only_line_is_kept_verbatim() {
        // "4." has no trailing whitespace, so it is not treated as a prefix
        assert_eq!(split_delimited("4.\nServe"), vec!["4.", "Serve"]);
    }

    #[test]
    fn test_crlf_is_trimmed() {
        assert_eq!(split_delimited("a\r\nb\r\n"), vec!["a", "b"]);
    }
}
