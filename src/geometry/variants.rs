//! Auto-layout variants offered by the layout editor.
//!
//! Each variant is a placement table: it positions the first title, date, image and
//! caption, the subject/lesson variables and every text box. Elements a variant does
//! not place keep their geometry. All placements are clamped to the canvas.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::constants::{CANVAS_W, GUTTER, MARGIN};
use crate::models::element::{ElementType, PlaceholderElement};

pub const VARIANT_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutVariant {
    /// Title on top, meta row, single column of image/caption/texts.
    #[default]
    TitleTopSingleColumn,
    /// Texts on the left, image and caption on the right.
    ImageRight,
    /// Image and caption on the left, texts on the right.
    ImageLeft,
    /// Title, meta and image stacked on the left, texts on the right.
    SidebarTitle,
    /// Texts in two columns under the title, image below.
    TwoColumnText,
    /// Full-width image first, title and texts below.
    HeroImage,
}

impl LayoutVariant {
    const ALL: [LayoutVariant; VARIANT_COUNT] = [
        LayoutVariant::TitleTopSingleColumn,
        LayoutVariant::ImageRight,
        LayoutVariant::ImageLeft,
        LayoutVariant::SidebarTitle,
        LayoutVariant::TwoColumnText,
        LayoutVariant::HeroImage,
    ];

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|&v| v == self).unwrap_or(0)
    }

    /// Variant by index, wrapping around.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % VARIANT_COUNT]
    }

    /// The next variant, cycling back to the first.
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Placement {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

/// Element ids picked out of a layout for placement.
struct Roles {
    title: Option<u64>,
    date: Option<u64>,
    image: Option<u64>,
    caption: Option<u64>,
    subject: Option<u64>,
    lesson: Option<u64>,
    texts: Vec<u64>,
}

impl Roles {
    fn from_elements(elements: &[PlaceholderElement]) -> Self {
        fn mentions(el: &PlaceholderElement, key: &str) -> bool {
            el.text.as_deref().is_some_and(|t| t.contains(key))
        }

        let first = |t: ElementType| elements.iter().find(|el| el.element_type == t).map(|el| el.id);
        let vars: Vec<&PlaceholderElement> = elements
            .iter()
            .filter(|el| el.element_type == ElementType::Variable)
            .collect();

        let subject = vars
            .iter()
            .copied()
            .find(|el| mentions(el, "subject"))
            .or_else(|| vars.first().copied())
            .map(|el| el.id);
        let lesson = vars
            .iter()
            .copied()
            .find(|el| mentions(el, "lesson"))
            .or_else(|| vars.iter().copied().find(|el| Some(el.id) != subject))
            .map(|el| el.id);

        Roles {
            title: first(ElementType::Title),
            date: first(ElementType::Date),
            image: first(ElementType::Image),
            caption: first(ElementType::Caption),
            subject,
            lesson,
            texts: elements
                .iter()
                .filter(|el| el.element_type == ElementType::Text)
                .map(|el| el.id)
                .collect(),
        }
    }
}

/// Collects placements; later placements of the same id win.
#[derive(Default)]
struct Plan(HashMap<u64, Placement>);

impl Plan {
    fn place(&mut self, id: Option<u64>, x: f64, y: f64, w: f64, h: f64) {
        if let Some(id) = id {
            self.0.insert(id, Placement { x, y, w, h });
        }
    }

    /// Subject, lesson and date side by side at `y`.
    fn meta_row(&mut self, roles: &Roles, y: f64) {
        self.place(roles.subject, MARGIN, y, 260.0, 50.0);
        self.place(roles.lesson, MARGIN + 280.0, y, 260.0, 50.0);
        self.place(roles.date, MARGIN + 560.0, y, 200.0, 50.0);
    }
}

/// Rearranges `elements` according to `variant`. Element order is preserved.
pub fn apply_layout_variant(elements: &[PlaceholderElement], variant: LayoutVariant) -> Vec<PlaceholderElement> {
    let full_w = CANVAS_W - MARGIN * 2.0;
    let col_w = ((full_w - GUTTER) / 2.0).floor();
    let right_x = MARGIN + col_w + GUTTER;

    let roles = Roles::from_elements(elements);
    let mut plan = Plan::default();

    match variant {
        LayoutVariant::TitleTopSingleColumn => {
            plan.place(roles.title, MARGIN, MARGIN, full_w, 80.0);
            let meta_y = MARGIN + 90.0;
            plan.meta_row(&roles, meta_y);

            let mut y = meta_y + 70.0;
            if roles.image.is_some() {
                plan.place(roles.image, MARGIN, y, full_w, 240.0);
                y += 250.0;
                if roles.caption.is_some() {
                    plan.place(roles.caption, MARGIN, y, full_w, 60.0);
                    y += 80.0;
                }
            }
            for (idx, &id) in roles.texts.iter().enumerate() {
                plan.place(Some(id), MARGIN, y + idx as f64 * 180.0, full_w, 160.0);
            }
        }
        LayoutVariant::ImageRight | LayoutVariant::ImageLeft => {
            plan.place(roles.title, MARGIN, MARGIN, full_w, 80.0);
            let meta_y = MARGIN + 90.0;
            plan.meta_row(&roles, meta_y);
            let content_y = meta_y + 70.0;

            let (image_x, text_x) = if variant == LayoutVariant::ImageRight {
                (right_x, MARGIN)
            } else {
                (MARGIN, right_x)
            };
            plan.place(roles.image, image_x, content_y, col_w, 260.0);
            plan.place(roles.caption, image_x, content_y + 270.0, col_w, 60.0);
            for (idx, &id) in roles.texts.iter().enumerate() {
                plan.place(Some(id), text_x, content_y + idx as f64 * 180.0, col_w, 160.0);
            }
        }
        LayoutVariant::SidebarTitle => {
            plan.place(roles.title, MARGIN, MARGIN, col_w, 120.0);
            let mut y = MARGIN + 130.0;
            for id in [roles.subject, roles.lesson, roles.date] {
                if id.is_some() {
                    plan.place(id, MARGIN, y, col_w, 50.0);
                    y += 60.0;
                }
            }
            plan.place(roles.image, MARGIN, y, col_w, 220.0);
            plan.place(roles.caption, MARGIN, y + 230.0, col_w, 60.0);
            for (idx, &id) in roles.texts.iter().enumerate() {
                plan.place(Some(id), right_x, MARGIN + idx as f64 * 180.0, col_w, 160.0);
            }
        }
        LayoutVariant::TwoColumnText => {
            plan.place(roles.title, MARGIN, MARGIN, full_w, 80.0);
            let meta_y = MARGIN + 90.0;
            plan.meta_row(&roles, meta_y);
            let content_y = meta_y + 70.0;

            for (idx, &id) in roles.texts.iter().enumerate() {
                let x = if idx % 2 == 0 { MARGIN } else { right_x };
                let row = (idx / 2) as f64;
                plan.place(Some(id), x, content_y + row * 180.0, col_w, 160.0);
            }
            let rows = roles.texts.len().div_ceil(2).max(1) as f64;
            let image_y = content_y + rows * 180.0 + 10.0;
            plan.place(roles.image, MARGIN, image_y, full_w, 220.0);
            plan.place(roles.caption, MARGIN, image_y + 230.0, full_w, 60.0);
        }
        LayoutVariant::HeroImage => {
            plan.place(roles.image, MARGIN, MARGIN, full_w, 260.0);
            plan.place(roles.caption, MARGIN, MARGIN + 270.0, full_w, 60.0);
            let title_y = MARGIN + if roles.caption.is_some() { 340.0 } else { 290.0 };
            plan.place(roles.title, MARGIN, title_y, full_w, 80.0);
            let meta_y = title_y + 90.0;
            plan.meta_row(&roles, meta_y);
            let content_y = meta_y + 70.0;
            for (idx, &id) in roles.texts.iter().enumerate() {
                plan.place(Some(id), MARGIN, content_y + idx as f64 * 160.0, full_w, 140.0);
            }
        }
    }

    elements
        .iter()
        .map(|el| {
            let mut el = el.clone();
            if let Some(p) = plan.0.get(&el.id) {
                el.x = p.x;
                el.y = p.y;
                el.w = p.w;
                el.h = p.h;
                el.clamp_to_canvas();
            }
            el
        })
        .collect()
}
