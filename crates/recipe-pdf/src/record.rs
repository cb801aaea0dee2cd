//! The recipe record as delivered by the data layer
//!
//! Records arrive as loosely typed JSON documents. Field shapes are resolved
//! exactly once, here, into tagged unions; a field with an unexpected shape
//! degrades to "absent" instead of failing the whole record.

use crate::types::RecipePdfError;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Raw shape of an ingredients or instructions field
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LineSource {
    /// An ordered sequence; non-text entries are kept as `None`
    Sequence(Vec<Option<String>>),
    /// A single blob: JSON-encoded array or newline-delimited text
    Text(String),
    #[default]
    Absent,
}

impl From<Value> for LineSource {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => LineSource::Sequence(items.into_iter().map(scalar_text).collect()),
            Value::String(text) => LineSource::Text(text),
            _ => LineSource::Absent,
        }
    }
}

impl From<&str> for LineSource {
    fn from(text: &str) -> Self {
        LineSource::Text(text.to_string())
    }
}

impl<S: AsRef<str>> From<Vec<S>> for LineSource {
    fn from(lines: Vec<S>) -> Self {
        LineSource::Sequence(
            lines
                .into_iter()
                .map(|line| Some(line.as_ref().to_string()))
                .collect(),
        )
    }
}

impl<'de> Deserialize<'de> for LineSource {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Value::deserialize(deserializer)?.into())
    }
}

/// A prep or cook time: minutes, or text that was formatted upstream
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TimeValue {
    Minutes(f64),
    Text(String),
    #[default]
    Absent,
}

impl From<Value> for TimeValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => n.as_f64().map_or(TimeValue::Absent, TimeValue::Minutes),
            Value::String(text) => TimeValue::Text(text),
            _ => TimeValue::Absent,
        }
    }
}

impl From<f64> for TimeValue {
    fn from(minutes: f64) -> Self {
        TimeValue::Minutes(minutes)
    }
}

impl From<&str> for TimeValue {
    fn from(text: &str) -> Self {
        TimeValue::Text(text.to_string())
    }
}

/// One recipe, as received from the data layer
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecipeRecord {
    pub title: Option<String>,
    pub ingredients: LineSource,
    pub instructions: LineSource,
    pub cuisine: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub owner_name: Option<String>,
    pub notes: Option<String>,
    pub prep_time: TimeValue,
    pub cook_time: TimeValue,
    pub servings: Option<f64>,
    pub image_url: Option<String>,
}

impl RecipeRecord {
    /// Build a record from a JSON object, tolerating any field shape
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        let mut take = |keys: &[&str]| -> Value {
            keys.iter()
                .filter_map(|key| map.remove(*key))
                .find(|value| !value.is_null())
                .unwrap_or(Value::Null)
        };

        Self {
            title: scalar_text(take(&["title"])),
            ingredients: take(&["ingredients"]).into(),
            instructions: take(&["instructions"]).into(),
            cuisine: scalar_text(take(&["cuisine"])),
            category: scalar_text(take(&["category"])),
            difficulty: scalar_text(take(&["difficulty"])),
            owner_name: scalar_text(take(&["owner_name", "ownerName"])),
            notes: scalar_text(take(&["notes"])),
            prep_time: take(&["prep_time", "prepTime"]).into(),
            cook_time: take(&["cook_time", "cookTime"]).into(),
            servings: scalar_number(take(&["servings"])),
            image_url: scalar_text(take(&["image_url", "imageUrl"])),
        }
    }

    /// Parse a single record from JSON text
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse JSON holding either one record or an array of records
    pub fn many_from_json(json: &str) -> crate::Result<Vec<Self>> {
        match serde_json::from_str::<Value>(json)? {
            Value::Array(items) => items
                .into_iter()
                .map(|item| serde_json::from_value(item).map_err(RecipePdfError::from))
                .collect(),
            other => Ok(vec![serde_json::from_value(other)?]),
        }
    }

    /// Non-blank trimmed text of an optional field
    pub(crate) fn present(field: &Option<String>) -> Option<&str> {
        field.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

impl<'de> Deserialize<'de> for RecipeRecord {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self::from_map(map))
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn scalar_number(value: Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_camel_case_times() {
        let record = RecipeRecord::from_json(r#"{"prepTime": 15, "cookTime": "1h"}"#).unwrap();
        assert_eq!(record.prep_time, TimeValue::Minutes(15.0));
        assert_eq!(record.cook_time, TimeValue::Text("1h".to_string()));
    }

    #[test]
    fn test_snake_case_wins_over_camel_case() {
        let record =
            RecipeRecord::from_json(r#"{"prep_time": 20, "prepTime": 99}"#).unwrap();
        assert_eq!(record.prep_time, TimeValue::Minutes(20.0));
    }

    #[test]
    fn test_null_snake_case_falls_back_to_camel_case() {
        let record =
            RecipeRecord::from_json(r#"{"cook_time": null, "cookTime": 40}"#).unwrap();
        assert_eq!(record.cook_time, TimeValue::Minutes(40.0));
    }

    #[test]
    fn test_wrong_shapes_degrade_to_absent() {
        let record = RecipeRecord::from_json(
            r#"{"title": ["x"], "ingredients": 5, "instructions": {"a": 1},
                "servings": "abc", "prep_time": true, "notes": 42}"#,
        )
        .unwrap();
        assert_eq!(record.title, None);
        assert_eq!(record.ingredients, LineSource::Absent);
        assert_eq!(record.instructions, LineSource::Absent);
        assert_eq!(record.servings, None);
        assert_eq!(record.prep_time, TimeValue::Absent);
        assert_eq!(record.notes.as_deref(), Some("42"));
    }

    #[test]
    fn test_sequence_keeps_holes() {
        let source: LineSource = serde_json::json!(["a", null, 3, {"x": 1}]).into();
        assert_eq!(
            source,
            LineSource::Sequence(vec![
                Some("a".to_string()),
                None,
                Some("3".to_string()),
                None
            ])
        );
    }

    #[test]
    fn test_numeric_string_servings() {
        let record = RecipeRecord::from_json(r#"{"servings": " 6 "}"#).unwrap();
        assert_eq!(record.servings, Some(6.0));
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(RecipeRecord::from_json("[1, 2]").is_err());
        assert!(RecipeRecord::from_json("\"title\"").is_err());
    }

    #[test]
    fn test_many_from_json_accepts_single_and_array() {
        assert_eq!(RecipeRecord::many_from_json(r#"{"title": "A"}"#).unwrap().len(), 1);
        let records =
            RecipeRecord::many_from_json(r#"[{"title": "A"}, {"title": "B"}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].title.as_deref(), Some("B"));
    }
}
