//! Batch generation: spreadsheet rows in, one presentation per row out.

use log::debug;

use crate::errors::{QuickSlideError, Result};
use crate::models::api::{BatchGenerateRequest, BatchRow, PresentationResponse, SlideDataDto};
use crate::models::layout::LayoutDocument;
use crate::resolver::{resolve_slide, ResolveOptions, ResolvedSlide};

/// Result of `POST /batch/generate`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub created: Vec<PresentationResponse>,
    /// Set when the backend had to truncate content to fit the template.
    pub warning: Option<String>,
}

/// Columns to show besides the fixed ones, in spreadsheet order, taken from the first row.
pub fn dynamic_columns(rows: &[BatchRow]) -> Vec<String> {
    rows.first()
        .map(|row| row.extra.keys().cloned().collect())
        .unwrap_or_default()
}

/// Rows the backend reported as usable.
pub fn valid_rows(rows: &[BatchRow]) -> impl Iterator<Item = &BatchRow> {
    rows.iter().filter(|row| !row.is_error)
}

/// Builds the generation request for all uploaded rows.
///
/// A template deck wins over a single template slide; with neither, the backend picks
/// its default layout.
pub fn build_generate_request(
    rows: &[BatchRow],
    template_id: Option<u64>,
    template_slide_id: Option<u64>,
) -> Result<BatchGenerateRequest> {
    if rows.is_empty() {
        return Err(QuickSlideError::EmptySelection(
            "upload a spreadsheet before generating".to_string(),
        ));
    }

    let slides = rows
        .iter()
        .map(|row| SlideDataDto {
            name: row.name.clone(),
            content: row.content.clone(),
            is_error: row.is_error,
            error_message: row.error_message.clone(),
        })
        .collect();

    let template_slide_id = if template_id.is_some() {
        if template_slide_id.is_some() {
            debug!("Ignoring template slide selection in favour of template deck");
        }
        None
    } else {
        template_slide_id
    };

    Ok(BatchGenerateRequest {
        slides,
        template_id,
        template_slide_id,
    })
}

/// Titles the created presentations after the rows they came from, falling back to
/// the title the backend chose.
pub fn label_created(rows: &[BatchRow], created: &[PresentationResponse]) -> Vec<PresentationResponse> {
    created
        .iter()
        .enumerate()
        .map(|(i, presentation)| {
            let mut presentation = presentation.clone();
            if let Some(name) = rows.get(i).map(|row| row.name.trim()).filter(|n| !n.is_empty()) {
                presentation.title = name.to_string();
            }
            presentation
        })
        .collect()
}

/// Resolves one row against a layout, as the upload preview shows it.
pub fn preview_row(row: &BatchRow, layout: &LayoutDocument, options: &ResolveOptions) -> ResolvedSlide {
    resolve_slide(&layout.elements, &row.to_form_data(), options)
}
