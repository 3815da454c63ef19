// src/models/form.rs

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// A single loosely-typed form or spreadsheet cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Converts a JSON value; nested arrays/objects and nulls have no field representation.
    pub fn from_json(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::Bool(b) => Some(FieldValue::Bool(*b)),
            JsonValue::Number(n) => Some(FieldValue::Number(n.clone())),
            JsonValue::String(s) => Some(FieldValue::String(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

/// Keyed bag of named fields supplied by a form or one spreadsheet row.
///
/// Known keys (`title`, `name`, `subject`, `lesson`, `content`) have typed accessors;
/// anything else stays available through [`SlideFormData::get`] for `{{key}}` tokens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideFormData {
    fields: IndexMap<String, FieldValue>,
}

impl SlideFormData {
    pub fn new() -> Self {
        Default::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<FieldValue>) {
        self.fields.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// String value of a field, or `""` when absent or not a string.
    pub fn text(&self, key: &str) -> &str {
        self.get(key).and_then(FieldValue::as_str).unwrap_or("")
    }

    pub fn subject(&self) -> &str {
        self.text("subject")
    }

    pub fn lesson(&self) -> &str {
        self.text("lesson")
    }

    pub fn content(&self) -> &str {
        self.text("content")
    }

    /// `title` when it is a non-empty string, otherwise `name`.
    pub fn slide_title(&self) -> &str {
        match self.text("title") {
            "" => self.text("name"),
            title => title,
        }
    }

    /// Copy of this form with `content` replaced, as used for per-slide previews.
    pub fn with_content(&self, content: &str) -> Self {
        self.clone().with("content", content)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    /// Builds form data from a JSON object, keeping scalar fields only.
    pub fn from_json_map(map: &Map<String, JsonValue>) -> Self {
        let fields = map
            .iter()
            .filter_map(|(k, v)| FieldValue::from_json(v).map(|v| (k.clone(), v)))
            .collect();
        SlideFormData { fields }
    }

    /// Parses a JSON object; anything else yields empty form data.
    pub fn from_json_lenient(json: &str) -> Self {
        match serde_json::from_str::<JsonValue>(json) {
            Ok(JsonValue::Object(map)) => SlideFormData::from_json_map(&map),
            _ => SlideFormData::default(),
        }
    }
}
