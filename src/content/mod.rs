//! Turns free text entered in a form (or read from a spreadsheet cell) into ordered
//! slot values that can be poured into a layout's placeholders.
//!
//! Two input shapes are understood:
//! *   **Structured** content, using the section token `\--` and the slot token `\-`.
//!     Sections are, in order: images, captions, texts, dates.
//! *   **Free** text, split into paragraphs on blank lines, `- ` bullets and `---` rules.
//!
//! Every function here is total: malformed input degrades to the best available
//! fallback instead of failing.

mod blocks;
mod date;
mod delimiters;
mod paragraphs;
mod structured;

pub use blocks::{parse_title_and_body, require_title, split_slide_blocks, TitleAndBody};
pub use date::normalize_date;
pub use delimiters::{is_structured_content, normalize_delimiters, SECTION_TOKEN, SLOT_TOKEN};
pub use paragraphs::parse_paragraphs;
pub use structured::{parse_structured_content, StructuredContent};

/// Converts `\r\n` line endings to `\n`.
pub(crate) fn normalize_line_endings(raw: &str) -> String {
    raw.replace("\r\n", "\n")
}
