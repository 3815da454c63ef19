//! Geometry helpers for placeholder boxes on the virtual canvas.
//!
//! Everything here is a pure function over element lists: clamping boxes into the
//! canvas, per-type defaults for new boxes, slot index assignment and the
//! auto-layout variants.

mod constants;
mod defaults;
mod variants;

use std::collections::{HashMap, HashSet};

pub use constants::*;
pub use defaults::{default_box_for, default_style_for, default_text_for, VariablePreset};
pub use variants::{apply_layout_variant, LayoutVariant, VARIANT_COUNT};

use crate::models::element::{ElementType, PlaceholderElement};

/// Bounds `value` to `[min, max]`. When `min > max`, `max` wins.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

impl PlaceholderElement {
    /// Clamps size to `[MIN_W, CANVAS_W] x [MIN_H, CANVAS_H]`, then position so the
    /// whole box stays on the canvas.
    pub fn clamp_to_canvas(&mut self) {
        self.w = clamp(self.w, MIN_W, CANVAS_W);
        self.h = clamp(self.h, MIN_H, CANVAS_H);
        self.x = clamp(self.x, 0.0, CANVAS_W - self.w);
        self.y = clamp(self.y, 0.0, CANVAS_H - self.h);
    }

    /// Moves the box, keeping it inside the canvas.
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.x = clamp(x, 0.0, CANVAS_W - self.w);
        self.y = clamp(y, 0.0, CANVAS_H - self.h);
    }

    /// Resizes the box and scales its font with the height change.
    pub fn resize(&mut self, w: f64, h: f64) {
        let start_h = self.h;
        self.w = clamp(w, MIN_W, CANVAS_W);
        self.h = clamp(h, MIN_H, CANVAS_H);
        let scale = if start_h > 0.0 { self.h / start_h } else { 1.0 };
        self.style.font_size = clamp((self.style.font_size * scale).round(), MIN_FONT_SIZE, MAX_FONT_SIZE);
        self.x = clamp(self.x, 0.0, CANVAS_W - self.w);
        self.y = clamp(self.y, 0.0, CANVAS_H - self.h);
    }
}

/// Assigns a slot index to every element that lacks one (or has zero).
///
/// Elements are visited in order with one counter per type; a missing index gets the
/// next counter value not already used by another element of that type. Existing
/// indexes are never renumbered, so the function is idempotent.
pub fn ensure_slot_indexes(elements: Vec<PlaceholderElement>) -> Vec<PlaceholderElement> {
    let taken: HashSet<(ElementType, u32)> = elements
        .iter()
        .filter_map(|el| el.slot_index.filter(|&n| n > 0).map(|n| (el.element_type, n)))
        .collect();
    let mut counters: HashMap<ElementType, u32> = HashMap::new();

    elements
        .into_iter()
        .map(|mut el| {
            if el.slot_index.is_some_and(|n| n > 0) {
                return el;
            }
            let counter = counters.entry(el.element_type).or_insert(0);
            let mut next = *counter + 1;
            while taken.contains(&(el.element_type, next)) {
                next += 1;
            }
            *counter = next;
            el.slot_index = Some(next);
            el
        })
        .collect()
}

/// Builds a new element of `element_type` for a layout that already holds `existing`.
///
/// The id is one past the current maximum, the slot index one past the highest slot
/// of that type (or the count of that type plus one when none are numbered), and the
/// box gets the per-type default size at the canvas margin.
pub fn new_element(
    element_type: ElementType,
    preset: Option<VariablePreset>,
    existing: &[PlaceholderElement],
) -> PlaceholderElement {
    let id = existing.iter().map(|el| el.id).max().map_or(1, |max| max + 1);
    let same_type = existing.iter().filter(|el| el.element_type == element_type);
    let max_slot = same_type.clone().filter_map(|el| el.slot_index).max().unwrap_or(0);
    let slot_index = if max_slot > 0 {
        max_slot + 1
    } else {
        same_type.count() as u32 + 1
    };
    let (w, h) = default_box_for(element_type);

    let mut element = PlaceholderElement {
        id,
        element_type,
        slot_index: Some(slot_index),
        x: MARGIN,
        y: MARGIN,
        w,
        h,
        text: Some(default_text_for(element_type, preset, Some(slot_index))),
        manual_text: false,
        style: default_style_for(element_type),
    };
    element.clamp_to_canvas();
    element
}

/// The deterministic title + text layout offered when nothing else is stored.
pub fn starter_elements() -> Vec<PlaceholderElement> {
    let starter = |id: u64, element_type: ElementType, y: f64, h: f64| PlaceholderElement {
        id,
        element_type,
        slot_index: None,
        x: MARGIN,
        y,
        w: 520.0,
        h,
        text: Some(default_text_for(element_type, None, None)),
        manual_text: false,
        style: default_style_for(element_type),
    };
    ensure_slot_indexes(vec![
        starter(1, ElementType::Title, 40.0, 80.0),
        starter(2, ElementType::Text, 140.0, 180.0),
    ])
}
