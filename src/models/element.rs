// src/models/element.rs

use serde::{Deserialize, Serialize};

/// The kind of placeholder box on a slide layout.
/// Serialized in lower case (e.g. `"caption"`), matching the stored layout JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// Slide title. Always filled from the form's `title` (or `name`) field.
    Title,
    /// Body text box.
    Text,
    /// Image box. Holds a URL or the image marker.
    Image,
    /// Caption under an image.
    Caption,
    /// Free placeholder, usually carrying a `{{token}}`.
    Variable,
    /// Date box.
    Date,
}

impl ElementType {
    /// Text-like boxes that receive paragraphs when the content is unstructured.
    pub fn is_text_box(self) -> bool {
        matches!(self, ElementType::Text | ElementType::Caption)
    }
}

/// Horizontal text alignment inside a box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Visual style of a placeholder box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementStyle {
    pub color: String,
    pub font_family: String,
    pub font_size: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub align: TextAlign,
}

impl Default for ElementStyle {
    fn default() -> Self {
        ElementStyle {
            color: "#111827".to_string(),
            font_family: "inherit".to_string(),
            font_size: 16.0,
            bold: false,
            italic: false,
            underline: false,
            align: TextAlign::Left,
        }
    }
}

/// A positioned box on the 800x600 virtual canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderElement {
    /// Unique within one layout.
    pub id: u64,

    #[serde(rename = "type")]
    pub element_type: ElementType,

    /// 1-based ordinal among elements of the same type. Assigned by
    /// `geometry::ensure_slot_indexes` when missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_index: Option<u32>,

    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub w: f64,
    #[serde(default)]
    pub h: f64,

    /// Literal text or a placeholder token such as `{{subject}}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// When true, `text` is an explicit user override rather than an auto-fill target.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub manual_text: bool,

    #[serde(default)]
    pub style: ElementStyle,
}

impl PlaceholderElement {
    /// The stored text with surrounding whitespace removed, or `""`.
    pub fn trimmed_text(&self) -> &str {
        self.text.as_deref().map(str::trim).unwrap_or("")
    }

    /// 0-based index into the parsed slot list for this element's type.
    /// A missing or zero slot index maps to the first slot.
    pub fn slot_position(&self) -> usize {
        self.slot_index.unwrap_or(1).max(1) as usize - 1
    }
}
