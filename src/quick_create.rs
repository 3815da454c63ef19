//! The quick-create draft: subject, lesson and free-text content turned into a
//! previewable deck and a creation request.

use serde::{Deserialize, Serialize};

use crate::content::{parse_title_and_body, require_title, split_slide_blocks};
use crate::errors::Result;
use crate::models::api::QuickCreateRequest;
use crate::models::form::SlideFormData;
use crate::models::layout::LayoutDocument;
use crate::resolver::{deck_offsets, resolve_slide, ResolveOptions, ResolvedSlide};

/// Which layouts a quick-create request is built on.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutSource {
    /// A stored template deck, one slide per template slide.
    Template(u64),
    /// A custom layout per slide.
    Layouts(Vec<LayoutDocument>),
    /// One layout reused for every slide.
    Single(LayoutDocument),
}

/// What the user typed into the quick-create form.
///
/// `content` may hold several slides separated by `---` lines; the first line of
/// every block is that slide's title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickCreateDraft {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub lesson: String,
    #[serde(default)]
    pub content: String,
}

impl QuickCreateDraft {
    pub fn new(subject: impl Into<String>, lesson: impl Into<String>, content: impl Into<String>) -> Self {
        QuickCreateDraft {
            subject: subject.into(),
            lesson: lesson.into(),
            content: content.into(),
        }
    }

    pub fn from_form(form: &SlideFormData) -> Self {
        QuickCreateDraft::new(form.subject(), form.lesson(), form.content())
    }

    pub fn to_form(&self) -> SlideFormData {
        SlideFormData::new()
            .with("subject", self.subject.as_str())
            .with("lesson", self.lesson.as_str())
            .with("content", self.content.as_str())
    }

    /// Non-empty `---` blocks of the content.
    pub fn blocks(&self) -> Vec<String> {
        split_slide_blocks(&self.content, true)
    }

    /// True when the content was split into one block per slide.
    pub fn has_per_slide_contents(&self) -> bool {
        self.blocks().len() > 1
    }

    /// Number of preview slides: the deck size when a deck is used, else one per block.
    pub fn preview_slide_count(&self, deck_len: usize) -> usize {
        if deck_len > 0 {
            deck_len
        } else {
            self.blocks().len().max(1)
        }
    }

    /// Builds the creation request.
    ///
    /// The title is the first line of the first block and must exist. Split content is
    /// sent whole so each block becomes a slide; otherwise only the body is sent so the
    /// title line is not repeated in the slide text.
    pub fn request_payload(&self, source: &LayoutSource) -> Result<QuickCreateRequest> {
        let first = require_title(&self.content)?;
        let content = if self.has_per_slide_contents() {
            self.content.clone()
        } else {
            first.body
        };

        let mut request = QuickCreateRequest {
            subject: self.subject.clone(),
            lesson: self.lesson.clone(),
            title: first.title,
            content,
            ..Default::default()
        };
        match source {
            LayoutSource::Template(id) => request.template_id = Some(*id),
            LayoutSource::Layouts(layouts) if !layouts.is_empty() => {
                request.layout_jsons = Some(
                    layouts
                        .iter()
                        .map(LayoutDocument::to_json)
                        .collect::<Result<Vec<_>>>()?,
                );
            }
            LayoutSource::Layouts(_) => {}
            LayoutSource::Single(layout) => request.layout_json = Some(layout.to_json()?),
        }
        Ok(request)
    }

    /// Resolves every preview slide.
    ///
    /// With per-slide blocks, slide `i` shows block `i` (its own title, falling back to
    /// the deck title). Otherwise every slide shares the body; on a template deck the
    /// paragraphs are spread over the slides in order.
    pub fn preview(
        &self,
        layouts: &[LayoutDocument],
        from_template_deck: bool,
        options: &ResolveOptions,
    ) -> Vec<ResolvedSlide> {
        let blocks = self.blocks();
        let per_slide = blocks.len() > 1;
        let global = parse_title_and_body(&self.content);
        let offsets = deck_offsets(layouts);
        let empty = LayoutDocument::default();

        (0..self.preview_slide_count(layouts.len()))
            .map(|i| {
                let layout = layouts.get(i).or_else(|| layouts.first()).unwrap_or(&empty);
                let (title, body) = if per_slide {
                    let parsed = parse_title_and_body(blocks.get(i).map(String::as_str).unwrap_or(""));
                    let title = if parsed.title.is_empty() {
                        global.title.clone()
                    } else {
                        parsed.title
                    };
                    (title, parsed.body)
                } else {
                    (global.title.clone(), global.body.clone())
                };

                let offset = if from_template_deck && !per_slide {
                    offsets.get(i).copied().unwrap_or(0)
                } else {
                    0
                };
                let form = self
                    .to_form()
                    .with("title", title)
                    .with_content(&body);
                resolve_slide(&layout.elements, &form, &options.clone().with_offset(options.offset + offset))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::QuickSlideError;
    use crate::geometry::new_element;
    use crate::models::element::{ElementType, PlaceholderElement};

    fn layout(types: &[ElementType]) -> LayoutDocument {
        let mut elements: Vec<PlaceholderElement> = Vec::new();
        for (i, &t) in types.iter().enumerate() {
            let mut el = new_element(t, None, &elements);
            el.y = 100.0 * i as f64;
            elements.push(el);
        }
        LayoutDocument::new(elements)
    }

    fn options() -> ResolveOptions {
        ResolveOptions::new().with_today("01/01/2026")
    }

    #[test]
    fn test_request_sends_body_for_single_block() {
        let draft = QuickCreateDraft::new("Math", "Fractions", "Halves\nCut in two.\n\nShare equally.");
        let request = draft.request_payload(&LayoutSource::Template(7)).unwrap();
        assert_eq!(request.title, "Halves");
        assert_eq!(request.content, "Cut in two.\n\nShare equally.");
        assert_eq!(request.template_id, Some(7));
        assert!(request.layout_json.is_none());
    }

    #[test]
    fn test_request_sends_full_content_for_blocks() {
        let draft = QuickCreateDraft::new("", "", "One\nBody\n---\nTwo\nMore");
        let single = layout(&[ElementType::Title, ElementType::Text]);
        let request = draft.request_payload(&LayoutSource::Single(single)).unwrap();
        assert_eq!(request.title, "One");
        assert_eq!(request.content, draft.content);
        assert!(request.layout_json.is_some());

        let request = draft.request_payload(&LayoutSource::Layouts(vec![])).unwrap();
        assert!(request.layout_json.is_none() && request.layout_jsons.is_none());
    }

    #[test]
    fn test_request_requires_title() {
        let draft = QuickCreateDraft::new("Math", "", "  \n ");
        assert!(matches!(
            draft.request_payload(&LayoutSource::Template(1)),
            Err(QuickSlideError::MissingTitle)
        ));
    }

    #[test]
    fn test_preview_per_slide_blocks() {
        let draft = QuickCreateDraft::new("Math", "L1", "Intro\nHello\n---\nPart two\nWorld");
        let single = layout(&[ElementType::Title, ElementType::Text]);
        let slides = draft.preview(&[single], false, &options());

        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].title, "Intro");
        assert_eq!(slides[0].value(2), Some("Hello"));
        assert_eq!(slides[1].title, "Part two");
        assert_eq!(slides[1].value(2), Some("World"));
    }

    #[test]
    fn test_preview_spreads_body_over_template_deck() {
        let draft = QuickCreateDraft::new("", "", "Deck\np1\n\np2\n\np3");
        let deck = vec![
            layout(&[ElementType::Title, ElementType::Text, ElementType::Caption]),
            layout(&[ElementType::Text]),
        ];
        let slides = draft.preview(&deck, true, &options());
        assert_eq!(slides[0].value(2), Some("p1"));
        assert_eq!(slides[0].value(3), Some("p2"));
        assert_eq!(slides[1].value(1), Some("p3"));
        assert_eq!(slides[1].title, "Deck");

        let custom = draft.preview(&deck, false, &options());
        assert_eq!(custom[1].value(1), Some("p1"));
    }

    #[test]
    fn test_draft_form_round_trip() {
        let draft = QuickCreateDraft::new("Science", "Plants", "Roots");
        assert_eq!(QuickCreateDraft::from_form(&draft.to_form()), draft);
        assert_eq!(draft.preview_slide_count(0), 1);
        assert_eq!(draft.preview_slide_count(3), 3);
    }
}
