use super::normalize_line_endings;

/// Separates the four sections (images, captions, texts, dates). Literally `\--`.
pub const SECTION_TOKEN: &str = r"\--";
/// Separates slots inside one section. Literally `\-`.
pub const SLOT_TOKEN: &str = r"\-";

const DOUBLED_SECTION_TOKEN: &str = r"\\--";
const DOUBLED_SLOT_TOKEN: &str = r"\\-";

/// Canonicalizes raw content before structural parsing.
///
/// Line endings become `\n`, and doubled-escape tokens (`\\--`, `\\-`), which form
/// inputs may produce, are folded into their single-escape form. Nothing else changes,
/// so the function is idempotent on already-normalized text.
pub fn normalize_delimiters(raw: &str) -> String {
    normalize_line_endings(raw)
        .replace(DOUBLED_SECTION_TOKEN, SECTION_TOKEN)
        .replace(DOUBLED_SLOT_TOKEN, SLOT_TOKEN)
}

/// Returns `true` if the content uses the structured token syntax.
///
/// A lone slot token is enough: such content is a single section with several slots.
pub fn is_structured_content(raw: &str) -> bool {
    let normalized = normalize_delimiters(raw);
    normalized.contains(SECTION_TOKEN) || normalized.contains(SLOT_TOKEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_folds_doubled_tokens_and_crlf() {
        assert_eq!(normalize_delimiters("a\\\\--b\r\nc\\\\-d"), "a\\--b\nc\\-d");
        assert_eq!(normalize_delimiters("plain text"), "plain text");
        assert_eq!(normalize_delimiters(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["a\\--b\\-c", "x\\\\-y", "line\r\nline", "\\\\\\--", "— – -"] {
            let once = normalize_delimiters(raw);
            assert_eq!(normalize_delimiters(&once), once, "input {:?}", raw);
        }
    }

    #[test]
    fn test_detector_matches_normalized_tokens() {
        assert!(is_structured_content("img\\--cap"));
        assert!(is_structured_content("only\\-slots"));
        assert!(is_structured_content("typed\\\\-twice"));
        assert!(!is_structured_content("Hello\n\n- bullet\n---\nWorld"));
        assert!(!is_structured_content(""));
    }

    #[test]
    fn test_detector_agrees_with_normalizer() {
        for raw in ["a\\-b", "a\\\\--b", "a-b", "a\\b", "\\", "---"] {
            let normalized = normalize_delimiters(raw);
            let expected = normalized.contains("\\--") || normalized.contains("\\-");
            assert_eq!(is_structured_content(raw), expected, "input {:?}", raw);
        }
    }
}
