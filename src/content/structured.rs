use serde::{Deserialize, Serialize};

use super::date::normalize_date;
use super::delimiters::{normalize_delimiters, SECTION_TOKEN, SLOT_TOKEN};

/// Slot values parsed from structured content.
///
/// Index `n` of each list fills the placeholder of that type whose slot index is `n + 1`.
/// Empty slots are kept so a user can deliberately skip a placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredContent {
    pub images: Vec<String>,
    pub captions: Vec<String>,
    pub texts: Vec<String>,
    pub dates: Vec<String>,
}

/// Parses content written as up to four `\--`-separated sections
/// (images, captions, texts, dates), each holding `\-`-separated slots.
///
/// Sections past the fourth are ignored and missing ones are empty. Every slot is
/// trimmed; dates additionally go through [`normalize_date`].
pub fn parse_structured_content(raw: &str) -> StructuredContent {
    let normalized = normalize_delimiters(raw);
    let mut sections = normalized.split(SECTION_TOKEN).map(str::trim);

    let images = split_slots(sections.next().unwrap_or(""));
    let captions = split_slots(sections.next().unwrap_or(""));
    let texts = split_slots(sections.next().unwrap_or(""));
    let dates = split_slots(sections.next().unwrap_or(""))
        .iter()
        .map(|d| normalize_date(d))
        .collect();

    StructuredContent {
        images,
        captions,
        texts,
        dates,
    }
}

/// Splits one section into trimmed slots. An empty section has no slots; a section
/// without a slot token is a single slot.
fn split_slots(section: &str) -> Vec<String> {
    if section.trim().is_empty() {
        return Vec::new();
    }
    if section.contains(SLOT_TOKEN) {
        section.split(SLOT_TOKEN).map(|s| s.trim().to_string()).collect()
    } else {
        vec![section.trim().to_string()]
    }
}
