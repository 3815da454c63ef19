//! File naming for exported presentations.

use regex::Regex;
use std::sync::OnceLock;

use crate::models::api::{ExportFormat, ExportRequest, PresentationResponse};

const MAX_FILE_PART_CHARS: usize = 80;

/// One downloaded export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Makes user text safe as part of a file name: reserved characters become `-`,
/// whitespace runs collapse to one space, and the result is cut to 80 characters.
pub fn sanitize_file_part(value: &str) -> String {
    static RESERVED_RE: OnceLock<Regex> = OnceLock::new();
    static SPACE_RE: OnceLock<Regex> = OnceLock::new();
    let reserved = RESERVED_RE.get_or_init(|| Regex::new(r#"[\\/:*?"<>|]"#).unwrap());
    let space = SPACE_RE.get_or_init(|| Regex::new(r"\s+").unwrap());

    let cleaned = reserved.replace_all(value.trim(), "-");
    let collapsed = space.replace_all(&cleaned, " ");
    collapsed.chars().take(MAX_FILE_PART_CHARS).collect()
}

/// Base name (without extension) for item `index` of a batch export:
/// `<base>_<NN>_<title>`, numbered from 01.
pub fn batch_export_stem(base: &str, index: usize, item: &PresentationResponse) -> String {
    let title = match sanitize_file_part(&item.title) {
        t if t.is_empty() => format!("presentation-{}", item.id),
        t => t,
    };
    format!("{}_{:02}_{}", sanitize_file_part(base), index + 1, title)
}

/// The export request for one batch item in one format.
pub fn batch_export_request(
    base: &str,
    index: usize,
    item: &PresentationResponse,
    format: ExportFormat,
    font: Option<&str>,
) -> ExportRequest {
    ExportRequest {
        file_name: batch_export_stem(base, index, item),
        formats: vec![format],
        font: font.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64, title: &str) -> PresentationResponse {
        PresentationResponse {
            id,
            title: title.to_string(),
            owner_username: None,
            edited_date: None,
        }
    }

    #[test]
    fn test_sanitize_file_part() {
        assert_eq!(sanitize_file_part("  a/b:c  d*e "), "a-b-c d-e");
        assert_eq!(sanitize_file_part(&"x".repeat(100)).len(), 80);
        assert_eq!(sanitize_file_part("   "), "");
    }

    #[test]
    fn test_batch_export_names() {
        assert_eq!(batch_export_stem("Week 1", 0, &item(5, "Lesson: One")), "Week 1_01_Lesson- One");
        assert_eq!(batch_export_stem("deck", 11, &item(9, " ")), "deck_12_presentation-9");

        let request = batch_export_request("deck", 0, &item(1, "A"), ExportFormat::Pdf, Some("Noto Sans JP"));
        assert_eq!(request.file_name, "deck_01_A");
        assert_eq!(request.formats, vec![ExportFormat::Pdf]);
        assert_eq!(format!("{}.{}", request.file_name, ExportFormat::Png.download_extension()), "deck_01_A.zip");
    }
}
