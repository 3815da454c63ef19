use regex::Regex;
use std::sync::OnceLock;

use super::normalize_line_endings;
use crate::errors::{QuickSlideError, Result};

/// The first non-blank line of a block and everything after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleAndBody {
    pub title: String,
    pub body: String,
}

/// Splits quick-create content into per-slide blocks on `---` rules.
///
/// A `---` on its own line is preferred; when there is none but the text still
/// contains `---`, inline occurrences split instead. Blocks are trimmed. With
/// `drop_empty`, empty blocks are removed; otherwise they are kept unless every
/// block is empty.
pub fn split_slide_blocks(raw: &str, drop_empty: bool) -> Vec<String> {
    static LINE_RULE_RE: OnceLock<Regex> = OnceLock::new();
    static INLINE_RULE_RE: OnceLock<Regex> = OnceLock::new();
    let line_rule = LINE_RULE_RE.get_or_init(|| Regex::new(r"\n\s*---\s*\n").unwrap());
    let inline_rule = INLINE_RULE_RE.get_or_init(|| Regex::new(r"\s*---\s*").unwrap());

    let normalized = normalize_line_endings(raw);
    if normalized.trim().is_empty() {
        return Vec::new();
    }

    let mut parts: Vec<&str> = line_rule.split(&normalized).collect();
    if parts.len() == 1 && normalized.contains("---") {
        parts = inline_rule.split(&normalized).collect();
    }

    let blocks: Vec<String> = parts.iter().map(|p| p.trim().to_string()).collect();
    if drop_empty {
        blocks.into_iter().filter(|b| !b.is_empty()).collect()
    } else if blocks.iter().any(|b| !b.is_empty()) {
        blocks
    } else {
        Vec::new()
    }
}

/// Takes the first non-blank line of a block as its title; the rest, trimmed, is the body.
pub fn parse_title_and_body(block: &str) -> TitleAndBody {
    let normalized = normalize_line_endings(block);
    let normalized = normalized.trim();
    if normalized.is_empty() {
        return TitleAndBody::default();
    }

    let mut lines = normalized.split('\n').skip_while(|line| line.trim().is_empty());
    let title = lines.next().map(str::trim).unwrap_or("").to_string();
    let body = lines.collect::<Vec<_>>().join("\n").trim().to_string();

    TitleAndBody { title, body }
}

/// Title and body of the first slide block, failing when there is no title line.
///
/// This is the precondition checked before a slide is created from free text.
pub fn require_title(raw: &str) -> Result<TitleAndBody> {
    let blocks = split_slide_blocks(raw, true);
    let first = blocks.first().map(String::as_str).unwrap_or(raw);
    let parsed = parse_title_and_body(first);
    if parsed.title.is_empty() {
        return Err(QuickSlideError::MissingTitle);
    }
    Ok(parsed)
}
