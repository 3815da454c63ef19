//! Resolves which piece of form content fills which placeholder on a layout.
//!
//! Resolution is a pure function of the layout's elements, the form data and
//! [`ResolveOptions`]: the same inputs always produce the same [`ResolvedSlide`].
//! The current date is part of the options so previews and tests stay deterministic.

use chrono::Local;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::content::{is_structured_content, parse_paragraphs, parse_structured_content};
use crate::models::element::{ElementType, PlaceholderElement};
use crate::models::form::SlideFormData;
use crate::models::layout::LayoutDocument;

/// `chrono` format used for the current date shown in date placeholders.
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";
/// Shown in image placeholders that have no image assigned.
pub const DEFAULT_IMAGE_MARKER: &str = "[image]";

/// Keywords recognised anywhere (case-insensitive) in a placeholder's own text.
const TOKEN_KEYWORDS: [&str; 5] = ["subject", "lesson", "date", "title", "content"];

/// Inputs of a resolution besides the layout and the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveOptions {
    /// Index of the first paragraph this slide consumes when several slides share one
    /// paragraph pool. Ignored for structured content.
    pub offset: usize,
    /// Display string for "today".
    pub today: String,
    pub image_marker: String,
}

impl ResolveOptions {
    /// Options with `today` taken from the local clock.
    pub fn new() -> Self {
        ResolveOptions {
            offset: 0,
            today: Local::now().format(DEFAULT_DATE_FORMAT).to_string(),
            image_marker: DEFAULT_IMAGE_MARKER.to_string(),
        }
    }

    pub fn with_today(mut self, today: impl Into<String>) -> Self {
        self.today = today.into();
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Final display strings for one slide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSlide {
    /// Slide-level title: the form's `title`, or `name` when the title is empty.
    pub title: String,
    /// Element id to display string, in layout order.
    pub values: IndexMap<u64, String>,
}

impl ResolvedSlide {
    pub fn value(&self, id: u64) -> Option<&str> {
        self.values.get(&id).map(String::as_str)
    }
}

/// Image values that should be rendered as a picture instead of text.
pub fn is_image_url(value: &str) -> bool {
    value.starts_with("http")
}

/// Resolves every element of a layout against one form.
pub fn resolve_slide(
    elements: &[PlaceholderElement],
    form: &SlideFormData,
    options: &ResolveOptions,
) -> ResolvedSlide {
    let title = form.slide_title();
    let assigned = assign_content(elements, form.content(), options);

    let values = elements
        .iter()
        .map(|el| (el.id, resolve_element(el, form, title, &assigned, options)))
        .collect();

    ResolvedSlide {
        title: title.to_string(),
        values,
    }
}

/// Resolves a deck of layouts that share one paragraph pool: each slide starts
/// where the previous one's text boxes stopped, on top of `options.offset`.
pub fn resolve_deck(
    layouts: &[LayoutDocument],
    form: &SlideFormData,
    options: &ResolveOptions,
) -> Vec<ResolvedSlide> {
    layouts
        .iter()
        .zip(deck_offsets(layouts))
        .map(|(layout, offset)| {
            let options = options.clone().with_offset(options.offset + offset);
            resolve_slide(&layout.elements, form, &options)
        })
        .collect()
}

/// Number of paragraph-consuming boxes (`text` and `caption`) in a layout.
pub fn count_text_boxes(elements: &[PlaceholderElement]) -> usize {
    elements.iter().filter(|el| el.element_type.is_text_box()).count()
}

/// Starting paragraph index of every slide in a deck sharing one paragraph pool.
pub fn deck_offsets(layouts: &[LayoutDocument]) -> Vec<usize> {
    layouts
        .iter()
        .scan(0, |next, layout| {
            let start = *next;
            *next += count_text_boxes(&layout.elements);
            Some(start)
        })
        .collect()
}

/// True when the text carries a `{{...}}` token or one of the recognised keywords.
pub fn looks_like_placeholder(text: &str) -> bool {
    let raw = text.trim();
    if token_re().is_match(raw) {
        return true;
    }
    let lower = raw.to_lowercase();
    TOKEN_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// The `manualText` flag an editor stores after the user edits a box's text:
/// only non-empty literal text pins the box.
pub fn manual_text_for_edit(text: &str) -> bool {
    !text.trim().is_empty() && !looks_like_placeholder(text)
}

fn token_re() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| Regex::new(r"\{\{\s*([^}]+?)\s*\}\}").unwrap())
}

/// Values poured into elements from `content`, keyed by element id.
fn assign_content(
    elements: &[PlaceholderElement],
    content: &str,
    options: &ResolveOptions,
) -> HashMap<u64, String> {
    let mut assigned = HashMap::new();

    if is_structured_content(content) {
        let structured = parse_structured_content(content);
        for el in elements {
            let idx = el.slot_position();
            let value = match el.element_type {
                ElementType::Text => structured.texts.get(idx).cloned().unwrap_or_default(),
                ElementType::Caption => structured.captions.get(idx).cloned().unwrap_or_default(),
                ElementType::Image => structured
                    .images
                    .get(idx)
                    .cloned()
                    .unwrap_or_else(|| options.image_marker.clone()),
                ElementType::Date => structured
                    .dates
                    .get(idx)
                    .cloned()
                    .unwrap_or_else(|| options.today.clone()),
                ElementType::Title | ElementType::Variable => continue,
            };
            assigned.insert(el.id, value);
        }
        return assigned;
    }

    let paragraphs = parse_paragraphs(content);
    let mut boxes: Vec<&PlaceholderElement> = elements.iter().filter(|el| el.element_type.is_text_box()).collect();
    boxes.sort_by(|a, b| compare_reading_order(a, b));

    for (idx, el) in boxes.into_iter().enumerate() {
        let value = paragraphs.get(options.offset + idx).cloned().unwrap_or_default();
        assigned.insert(el.id, value);
    }
    assigned
}

/// Top-to-bottom, then left-to-right.
fn compare_reading_order(a: &PlaceholderElement, b: &PlaceholderElement) -> Ordering {
    a.y.partial_cmp(&b.y)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
}

fn resolve_element(
    el: &PlaceholderElement,
    form: &SlideFormData,
    title: &str,
    assigned: &HashMap<u64, String>,
    options: &ResolveOptions,
) -> String {
    if el.element_type == ElementType::Title {
        return title.to_string();
    }

    let raw = el.trimmed_text();
    if el.manual_text {
        return substitute_tokens(raw, form, title, options).unwrap_or_else(|| raw.to_string());
    }

    if let Some(value) = assigned.get(&el.id) {
        return value.clone();
    }
    match el.element_type {
        ElementType::Date => options.today.clone(),
        ElementType::Image => options.image_marker.clone(),
        _ => substitute_tokens(raw, form, title, options).unwrap_or_else(|| raw.to_string()),
    }
}

/// The form value a placeholder's own text stands for, if any.
///
/// Keywords are matched as case-insensitive substrings, in a fixed priority order;
/// after that a `{{key}}` token naming any other form field resolves to that field.
fn substitute_tokens(raw: &str, form: &SlideFormData, title: &str, options: &ResolveOptions) -> Option<String> {
    let lower = raw.to_lowercase();
    if lower.contains("subject") {
        return Some(form.subject().to_string());
    }
    if lower.contains("lesson") {
        return Some(form.lesson().to_string());
    }
    if lower.contains("date") {
        return Some(options.today.clone());
    }
    if lower.contains("title") {
        return Some(title.to_string());
    }
    if lower.contains("content") {
        return Some(form.content().to_string());
    }

    let caps = token_re().captures(raw)?;
    let key = caps.get(1)?.as_str();
    form.get(key)
        .or_else(|| {
            form.iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v)
        })
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::element::ElementStyle;

    const TODAY: &str = "15/10/2026";

    fn options() -> ResolveOptions {
        ResolveOptions::new().with_today(TODAY)
    }

    fn element(id: u64, element_type: ElementType, slot: u32, x: f64, y: f64, text: &str) -> PlaceholderElement {
        PlaceholderElement {
            id,
            element_type,
            slot_index: Some(slot),
            x,
            y,
            w: 200.0,
            h: 60.0,
            text: Some(text.to_string()),
            manual_text: false,
            style: ElementStyle::default(),
        }
    }

    fn form(content: &str) -> SlideFormData {
        SlideFormData::new()
            .with("title", "Deck title")
            .with("subject", "Math")
            .with("lesson", "Fractions")
            .with("content", content)
    }

    #[test]
    fn test_text_above_caption_gets_paragraphs_in_order() {
        let elements = vec![
            element(2, ElementType::Caption, 1, 40.0, 400.0, "Caption"),
            element(1, ElementType::Text, 1, 40.0, 150.0, "Body"),
        ];
        let resolved = resolve_slide(&elements, &form("Para one.\n\nPara two."), &options());

        assert_eq!(resolved.value(1), Some("Para one."));
        assert_eq!(resolved.value(2), Some("Para two."));
        let order: Vec<_> = resolved.values.keys().copied().collect();
        assert_eq!(order, vec![2, 1]);
    }

    #[test]
    fn test_reading_order_breaks_ties_left_to_right() {
        let elements = vec![
            element(1, ElementType::Text, 1, 420.0, 100.0, ""),
            element(2, ElementType::Text, 2, 40.0, 100.0, ""),
            element(3, ElementType::Text, 3, 40.0, 300.0, ""),
        ];
        let resolved = resolve_slide(&elements, &form("a\n\nb\n\nc"), &options());
        assert_eq!(resolved.value(2), Some("a"));
        assert_eq!(resolved.value(1), Some("b"));
        assert_eq!(resolved.value(3), Some("c"));
    }

    #[test]
    fn test_title_always_comes_from_form() {
        let mut title = element(1, ElementType::Title, 1, 0.0, 0.0, "{{subject}}");
        title.manual_text = true;
        let resolved = resolve_slide(&[title.clone()], &form("x"), &options());
        assert_eq!(resolved.value(1), Some("Deck title"));
        assert_eq!(resolved.title, "Deck title");

        let named = SlideFormData::new().with("title", "").with("name", "Row 4");
        let resolved = resolve_slide(&[title], &named, &options());
        assert_eq!(resolved.value(1), Some("Row 4"));
    }

    #[test]
    fn test_manual_text_still_substitutes_tokens() {
        let mut el = element(1, ElementType::Text, 1, 0.0, 0.0, "{{subject}}");
        el.manual_text = true;
        let resolved = resolve_slide(&[el], &form("Para"), &options());
        assert_eq!(resolved.value(1), Some("Math"));
    }

    #[test]
    fn test_manual_literal_text_beats_auto_fill() {
        let mut el = element(1, ElementType::Text, 1, 0.0, 0.0, "  Pinned words ");
        el.manual_text = true;
        let resolved = resolve_slide(&[el], &form("Para one"), &options());
        assert_eq!(resolved.value(1), Some("Pinned words"));
    }

    #[test]
    fn test_structured_assignment_by_type_and_slot() {
        let elements = vec![
            element(1, ElementType::Image, 1, 0.0, 0.0, ""),
            element(2, ElementType::Image, 2, 0.0, 0.0, ""),
            element(3, ElementType::Caption, 1, 0.0, 0.0, ""),
            element(4, ElementType::Text, 2, 0.0, 0.0, ""),
            element(5, ElementType::Text, 1, 0.0, 0.0, ""),
            element(6, ElementType::Date, 1, 0.0, 0.0, ""),
            element(7, ElementType::Date, 2, 0.0, 0.0, ""),
            element(8, ElementType::Image, 3, 0.0, 0.0, ""),
        ];
        let content = "https://cdn/a.png\\-https://cdn/b.png\\--Cap A\\--First\\-Second\\--3/4/2025";
        let resolved = resolve_slide(&elements, &form(content), &options());

        assert_eq!(resolved.value(1), Some("https://cdn/a.png"));
        assert!(is_image_url(resolved.value(2).unwrap()));
        assert_eq!(resolved.value(3), Some("Cap A"));
        assert_eq!(resolved.value(4), Some("Second"));
        assert_eq!(resolved.value(5), Some("First"));
        assert_eq!(resolved.value(6), Some("03/04/2025"));
        assert_eq!(resolved.value(7), Some(TODAY));
        assert_eq!(resolved.value(8), Some(DEFAULT_IMAGE_MARKER));
    }

    #[test]
    fn test_structured_empty_slot_skips_placeholder() {
        let elements = vec![
            element(1, ElementType::Text, 1, 0.0, 0.0, "Body"),
            element(2, ElementType::Text, 2, 0.0, 0.0, "Body"),
            element(3, ElementType::Text, 3, 0.0, 0.0, "Body"),
        ];
        let resolved = resolve_slide(&elements, &form("\\--\\--a\\-\\-b"), &options());
        assert_eq!(resolved.value(1), Some("a"));
        assert_eq!(resolved.value(2), Some(""));
        assert_eq!(resolved.value(3), Some("b"));
    }

    #[test]
    fn test_unassigned_fallbacks() {
        let elements = vec![
            element(1, ElementType::Date, 1, 0.0, 0.0, "{{date}}"),
            element(2, ElementType::Image, 1, 0.0, 0.0, "Image #1"),
            element(3, ElementType::Variable, 1, 0.0, 0.0, "{{lesson}}"),
            element(4, ElementType::Variable, 2, 0.0, 0.0, "Fixed label"),
            element(5, ElementType::Variable, 3, 0.0, 0.0, "{{ teacher }}"),
            element(6, ElementType::Variable, 4, 0.0, 0.0, "{{missing}}"),
        ];
        let data = form("").with("teacher", "Ms. Sato");
        let resolved = resolve_slide(&elements, &data, &options());

        assert_eq!(resolved.value(1), Some(TODAY));
        assert_eq!(resolved.value(2), Some(DEFAULT_IMAGE_MARKER));
        assert_eq!(resolved.value(3), Some("Fractions"));
        assert_eq!(resolved.value(4), Some("Fixed label"));
        assert_eq!(resolved.value(5), Some("Ms. Sato"));
        assert_eq!(resolved.value(6), Some("{{missing}}"));
    }

    #[test]
    fn test_keyword_substring_matches_natural_text() {
        // "Meeting date notes" is treated as a date token.
        let el = element(1, ElementType::Variable, 1, 0.0, 0.0, "Meeting date notes");
        let resolved = resolve_slide(&[el], &form(""), &options());
        assert_eq!(resolved.value(1), Some(TODAY));
    }

    #[test]
    fn test_offset_shifts_paragraph_pool() {
        let elements = vec![
            element(1, ElementType::Text, 1, 0.0, 100.0, ""),
            element(2, ElementType::Caption, 1, 0.0, 200.0, ""),
        ];
        let resolved = resolve_slide(&elements, &form("p0\n\np1\n\np2"), &options().with_offset(2));
        assert_eq!(resolved.value(1), Some("p2"));
        assert_eq!(resolved.value(2), Some(""));
    }

    #[test]
    fn test_deck_consumes_paragraphs_sequentially() {
        let first = LayoutDocument::new(vec![
            element(1, ElementType::Title, 1, 0.0, 0.0, ""),
            element(2, ElementType::Text, 1, 0.0, 100.0, ""),
            element(3, ElementType::Text, 2, 0.0, 300.0, ""),
        ]);
        let second = LayoutDocument::new(vec![
            element(1, ElementType::Text, 1, 0.0, 100.0, ""),
            element(2, ElementType::Image, 1, 0.0, 300.0, ""),
        ]);
        let layouts = vec![first, second];
        assert_eq!(deck_offsets(&layouts), vec![0, 2]);

        let slides = resolve_deck(&layouts, &form("one\n\ntwo\n\nthree"), &options());
        assert_eq!(slides[0].value(2), Some("one"));
        assert_eq!(slides[0].value(3), Some("two"));
        assert_eq!(slides[1].value(1), Some("three"));
        assert_eq!(slides[1].value(2), Some(DEFAULT_IMAGE_MARKER));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let elements = vec![
            element(1, ElementType::Text, 1, 0.0, 100.0, ""),
            element(2, ElementType::Date, 1, 0.0, 300.0, ""),
        ];
        let data = form("a\n- b");
        assert_eq!(
            resolve_slide(&elements, &data, &options()),
            resolve_slide(&elements, &data, &options())
        );
    }

    #[test]
    fn test_manual_flag_after_edit() {
        assert!(manual_text_for_edit("Welcome"));
        assert!(!manual_text_for_edit("   "));
        assert!(!manual_text_for_edit("{{anything}}"));
        assert!(!manual_text_for_edit("Lesson plan"));
        assert!(looks_like_placeholder("The TITLE"));
    }
}
