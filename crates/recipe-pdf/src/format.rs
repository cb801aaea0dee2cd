//! Display formatting for recipe scalars and output file names

use crate::record::TimeValue;
use std::collections::HashSet;

pub const NOT_AVAILABLE: &str = "N/A";

/// Format a duration in minutes: "45 min", "2h", "1h 30m"
pub fn format_minutes(minutes: Option<f64>) -> String {
    let Some(minutes) = minutes.filter(|m| m.is_finite() && *m > 0.0) else {
        return NOT_AVAILABLE.to_string();
    };

    let total = minutes.round() as u64;
    if total == 0 {
        return NOT_AVAILABLE.to_string();
    }
    if total < 60 {
        return format!("{} min", total);
    }

    let hours = total / 60;
    let rest = total % 60;
    if rest == 0 {
        format!("{}h", hours)
    } else {
        format!("{}h {}m", hours, rest)
    }
}

/// Format a prep or cook time for an info card.
///
/// Text that parses as a number is treated as minutes; any other non-blank
/// text (typically already formatted, like "20 min") is shown verbatim.
pub fn format_time(value: &TimeValue) -> String {
    match value {
        TimeValue::Minutes(minutes) => format_minutes(Some(*minutes)),
        TimeValue::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                NOT_AVAILABLE.to_string()
            } else if let Ok(minutes) = text.parse::<f64>() {
                format_minutes(Some(minutes))
            } else {
                text.to_string()
            }
        }
        TimeValue::Absent => NOT_AVAILABLE.to_string(),
    }
}

/// Format a servings count; whole numbers drop the fraction
pub fn format_servings(servings: Option<f64>) -> String {
    match servings.filter(|s| s.is_finite() && *s > 0.0) {
        Some(s) if s.fract() == 0.0 => format!("{}", s as u64),
        Some(s) => format!("{}", s),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Join cuisine and category; the separator only appears when both are set
pub fn meta_line(cuisine: Option<&str>, category: Option<&str>) -> Option<String> {
    match (cuisine, category) {
        (Some(cuisine), Some(category)) => Some(format!("{} | {}", cuisine, category)),
        (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
        (None, None) => None,
    }
}

/// Output file name for a recipe title.
///
/// Lower-cases the title and collapses whitespace runs into single hyphens.
/// Path separators become hyphens too so the file always lands in the output
/// directory. A missing or blank title yields `recipe.pdf`.
pub fn file_name_for(title: Option<&str>) -> String {
    let base = title
        .map(|t| {
            t.split_whitespace()
                .collect::<Vec<_>>()
                .join("-")
                .to_lowercase()
                .replace(['/', '\\'], "-")
        })
        .filter(|base| !base.is_empty())
        .unwrap_or_else(|| "recipe".to_string());

    format!("{}.pdf", base)
}

/// Claim `file_name` within `taken`, suffixing `-2`, `-3`, ... before the
/// extension until the name is free.
///
/// Used by batch export so records whose titles differ only in case or
/// spacing do not overwrite each other.
pub fn unique_file_name(file_name: &str, taken: &mut HashSet<String>) -> String {
    if taken.insert(file_name.to_string()) {
        return file_name.to_string();
    }

    let (stem, extension) = match file_name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => (stem, Some(extension)),
        _ => (file_name, None),
    };

    (2..)
        .map(|n| match extension {
            Some(extension) => format!("{}-{}.{}", stem, n, extension),
            None => format!("{}-{}", stem, n),
        })
        .find(|candidate| taken.insert(candidate.clone()))
        .unwrap_or_default()
}
