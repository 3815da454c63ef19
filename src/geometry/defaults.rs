//! Static per-type defaults for newly added placeholder boxes.

use serde::{Deserialize, Serialize};

use super::constants::{DEFAULT_FONT_FAMILY, DEFAULT_TEXT_COLOR};
use crate::models::element::{ElementStyle, ElementType, TextAlign};

/// Pre-filled variable boxes offered by the layout editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariablePreset {
    Subject,
    Lesson,
}

/// Default box size `(w, h)` for a new element of the given type.
pub fn default_box_for(element_type: ElementType) -> (f64, f64) {
    match element_type {
        ElementType::Title => (520.0, 80.0),
        ElementType::Text => (520.0, 160.0),
        ElementType::Image => (360.0, 220.0),
        ElementType::Caption => (360.0, 60.0),
        ElementType::Variable => (320.0, 60.0),
        ElementType::Date => (260.0, 60.0),
    }
}

/// Default placeholder text for a new element.
///
/// Numbered types get a ` #n` suffix when a slot index is known.
pub fn default_text_for(
    element_type: ElementType,
    preset: Option<VariablePreset>,
    slot_index: Option<u32>,
) -> String {
    let suffix = slot_index.map(|n| format!(" #{}", n)).unwrap_or_default();
    match element_type {
        ElementType::Title => "Title".to_string(),
        ElementType::Text => format!("Content{}", suffix),
        ElementType::Image => format!("Image{}", suffix),
        ElementType::Caption => format!("Image caption{}", suffix),
        ElementType::Date => "{{date}}".to_string(),
        ElementType::Variable => match preset {
            Some(VariablePreset::Subject) => "{{subject}}".to_string(),
            Some(VariablePreset::Lesson) => "{{lesson}}".to_string(),
            None => "{{variable}}".to_string(),
        },
    }
}

/// Default style for a new element: titles are large and bold, captions small and
/// italic, images bold and centred.
pub fn default_style_for(element_type: ElementType) -> ElementStyle {
    let mut style = ElementStyle {
        color: DEFAULT_TEXT_COLOR.to_string(),
        font_family: DEFAULT_FONT_FAMILY.to_string(),
        font_size: if element_type == ElementType::Title { 32.0 } else { 18.0 },
        bold: element_type == ElementType::Title,
        italic: false,
        underline: false,
        align: TextAlign::Left,
    };
    match element_type {
        ElementType::Caption => {
            style.font_size = 14.0;
            style.italic = true;
            style.color = "#374151".to_string();
        }
        ElementType::Image => {
            style.bold = true;
            style.align = TextAlign::Center;
        }
        _ => {}
    }
    style
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_boxes() {
        assert_eq!(default_box_for(ElementType::Title), (520.0, 80.0));
        assert_eq!(default_box_for(ElementType::Caption), (360.0, 60.0));
        assert_eq!(default_box_for(ElementType::Date), (260.0, 60.0));
    }

    #[test]
    fn test_default_texts() {
        assert_eq!(default_text_for(ElementType::Text, None, Some(2)), "Content #2");
        assert_eq!(default_text_for(ElementType::Caption, None, None), "Image caption");
        assert_eq!(default_text_for(ElementType::Date, None, Some(1)), "{{date}}");
        assert_eq!(
            default_text_for(ElementType::Variable, Some(VariablePreset::Lesson), None),
            "{{lesson}}"
        );
        assert_eq!(default_text_for(ElementType::Variable, None, None), "{{variable}}");
    }

    #[test]
    fn test_default_styles() {
        let title = default_style_for(ElementType::Title);
        assert!(title.bold);
        assert_eq!(title.font_size, 32.0);

        let caption = default_style_for(ElementType::Caption);
        assert!(caption.italic);
        assert_eq!(caption.font_size, 14.0);

        assert_eq!(default_style_for(ElementType::Image).align, TextAlign::Center);
    }
}
