// src/models/layout.rs

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::errors::Result;
use crate::geometry::ensure_slot_indexes;
use crate::models::element::PlaceholderElement;

/// One slide's visual template, persisted by the backend as `layoutJson`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    #[serde(default)]
    pub elements: Vec<PlaceholderElement>,
}

impl LayoutDocument {
    pub fn new(elements: Vec<PlaceholderElement>) -> Self {
        LayoutDocument { elements }
    }

    /// Strict parse. Fails on invalid JSON or malformed elements.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses stored layout JSON, degrading to an empty layout when the input is
    /// missing, is not JSON, or has no usable `elements` array.
    pub fn from_json_lenient(json: Option<&str>) -> Self {
        let Some(json) = json.filter(|s| !s.trim().is_empty()) else {
            return LayoutDocument::default();
        };
        match serde_json::from_str::<JsonValue>(json) {
            Ok(value) => LayoutDocument::from_value(value.get("elements")),
            Err(e) => {
                debug!("Ignoring unparsable layout JSON: {}", e);
                LayoutDocument::default()
            }
        }
    }

    /// Builds a layout from an `elements` JSON value, with slot indexes ensured.
    fn from_value(elements: Option<&JsonValue>) -> Self {
        let elements = match elements {
            Some(array @ JsonValue::Array(_)) => {
                match serde_json::from_value::<Vec<PlaceholderElement>>(array.clone()) {
                    Ok(elements) => elements,
                    Err(e) => {
                        debug!("Layout elements did not match the element schema: {}", e);
                        Vec::new()
                    }
                }
            }
            _ => Vec::new(),
        };
        LayoutDocument {
            elements: ensure_slot_indexes(elements),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// The element with the given id, if present.
    pub fn element(&self, id: u64) -> Option<&PlaceholderElement> {
        self.elements.iter().find(|el| el.id == id)
    }

    /// Next free element id (one past the current maximum).
    pub fn next_id(&self) -> u64 {
        self.elements.iter().map(|el| el.id).max().map_or(1, |max| max + 1)
    }
}

/// Where a slide's layout was found inside its stored content envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LayoutKey {
    #[default]
    Layout,
    Template,
}

/// The per-slide `contentJson` envelope: a layout plus the data it was generated from.
///
/// Accepted shapes:
/// * `{ "layout": { "elements": [..] }, "data": { .. } }`
/// * `{ "template": { "elements": [..] }, "data": { .. } }`
/// * `{ "elements": [..], ..data }` (legacy, the object doubles as the data bag)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlideContent {
    pub layout_key: LayoutKey,
    pub layout: LayoutDocument,
    pub data: Map<String, JsonValue>,
}

impl SlideContent {
    /// Parses a slide envelope. Never fails: invalid JSON yields an empty envelope.
    pub fn parse(content_json: Option<&str>) -> Self {
        let Some(raw) = content_json.filter(|s| !s.trim().is_empty()) else {
            return SlideContent::default();
        };
        let parsed = match serde_json::from_str::<JsonValue>(raw) {
            Ok(JsonValue::Object(map)) => map,
            Ok(_) => return SlideContent::default(),
            Err(e) => {
                debug!("Ignoring unparsable slide content JSON: {}", e);
                return SlideContent::default();
            }
        };

        let layout_key = if is_present(parsed.get("layout")) {
            LayoutKey::Layout
        } else if is_present(parsed.get("template")) {
            LayoutKey::Template
        } else {
            LayoutKey::Layout
        };

        let nested = match layout_key {
            LayoutKey::Layout => parsed.get("layout"),
            LayoutKey::Template => parsed.get("template"),
        }
        .and_then(|layout| layout.get("elements"))
        .filter(|v| v.is_array());
        let layout = LayoutDocument::from_value(nested.or_else(|| parsed.get("elements")));

        let data = match parsed.get("data") {
            Some(JsonValue::Object(data)) => data.clone(),
            _ => parsed,
        };

        SlideContent {
            layout_key,
            layout,
            data,
        }
    }

    /// Serializes the envelope back as `{ <layoutKey>: { elements }, data }`.
    pub fn to_json(&self) -> Result<String> {
        let key = match self.layout_key {
            LayoutKey::Layout => "layout",
            LayoutKey::Template => "template",
        };
        let mut out = Map::new();
        out.insert(key.to_string(), serde_json::to_value(&self.layout)?);
        out.insert("data".to_string(), JsonValue::Object(self.data.clone()));
        Ok(serde_json::to_string(&JsonValue::Object(out))?)
    }
}

fn is_present(value: Option<&JsonValue>) -> bool {
    !matches!(value, None | Some(JsonValue::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::element::{ElementStyle, ElementType};

    fn element(id: u64, element_type: ElementType, slot_index: Option<u32>) -> PlaceholderElement {
        PlaceholderElement {
            id,
            element_type,
            slot_index,
            x: 40.0,
            y: 40.0 * id as f64,
            w: 200.0,
            h: 60.0,
            text: Some(format!("box {}", id)),
            manual_text: id % 2 == 0,
            style: ElementStyle::default(),
        }
    }

    #[test]
    fn test_layout_json_round_trip_keeps_slot_indexes() {
        let layout = LayoutDocument::new(vec![
            element(1, ElementType::Title, Some(1)),
            element(2, ElementType::Text, Some(2)),
            element(3, ElementType::Text, Some(1)),
            element(4, ElementType::Caption, Some(1)),
        ]);

        let json = layout.to_json().expect("layout serializes");
        let back = LayoutDocument::from_json(&json).expect("layout parses");

        assert_eq!(back, layout);
        let slots: Vec<_> = back.elements.iter().map(|el| el.slot_index).collect();
        assert_eq!(slots, vec![Some(1), Some(2), Some(1), Some(1)]);
    }

    #[test]
    fn test_lenient_parse_degrades_to_empty() {
        assert!(LayoutDocument::from_json_lenient(None).elements.is_empty());
        assert!(LayoutDocument::from_json_lenient(Some("not json")).elements.is_empty());
        assert!(LayoutDocument::from_json_lenient(Some(r#"{"elements": 3}"#)).elements.is_empty());
        assert!(LayoutDocument::from_json_lenient(Some("[]")).elements.is_empty());
    }

    #[test]
    fn test_lenient_parse_fills_missing_fields_and_slots() {
        let json = r#"{"elements":[
            {"id":1,"type":"text","x":10,"y":20,"w":100,"h":50,"style":{"fontSize":20}},
            {"id":2,"type":"text","x":10,"y":90,"w":100,"h":50}
        ]}"#;
        let layout = LayoutDocument::from_json_lenient(Some(json));

        assert_eq!(layout.elements.len(), 2);
        assert_eq!(layout.elements[0].slot_index, Some(1));
        assert_eq!(layout.elements[1].slot_index, Some(2));
        assert_eq!(layout.elements[0].style.font_size, 20.0);
        assert_eq!(layout.elements[0].style.color, "#111827");
        assert!(!layout.elements[1].manual_text);
        assert_eq!(layout.next_id(), 3);
    }

    #[test]
    fn test_manual_text_omitted_when_false() {
        let layout = LayoutDocument::new(vec![element(1, ElementType::Text, Some(1))]);
        let json = layout.to_json().unwrap();
        assert!(!json.contains("manualText"));
        assert!(json.contains(r#""slotIndex":1"#));
        assert!(json.contains(r#""type":"text""#));
    }

    #[test]
    fn test_slide_content_envelopes() {
        let nested = SlideContent::parse(Some(
            r#"{"template":{"elements":[{"id":7,"type":"title"}]},"data":{"title":"Hi","subject":"Math"}}"#,
        ));
        assert_eq!(nested.layout_key, LayoutKey::Template);
        assert_eq!(nested.layout.elements.len(), 1);
        assert_eq!(nested.layout.elements[0].slot_index, Some(1));
        assert_eq!(nested.data.get("subject").and_then(|v| v.as_str()), Some("Math"));

        let legacy = SlideContent::parse(Some(r#"{"elements":[{"id":1,"type":"text"}],"content":"Body"}"#));
        assert_eq!(legacy.layout_key, LayoutKey::Layout);
        assert_eq!(legacy.layout.elements.len(), 1);
        assert_eq!(legacy.data.get("content").and_then(|v| v.as_str()), Some("Body"));

        let broken = SlideContent::parse(Some("{oops"));
        assert_eq!(broken, SlideContent::default());
    }

    #[test]
    fn test_slide_content_serializes_under_its_key() {
        let content = SlideContent::parse(Some(r#"{"layout":{"elements":[]},"data":{"name":"Row 1"}}"#));
        let json = content.to_json().unwrap();
        let reparsed = SlideContent::parse(Some(&json));
        assert_eq!(reparsed, content);
    }
}
