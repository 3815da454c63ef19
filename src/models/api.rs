// src/models/api.rs
//
// Request/response bodies of the QuickSlide backend REST contract.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::form::{FieldValue, SlideFormData};

/// A deck or project summary as returned by the dashboard and generation endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationResponse {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub owner_username: Option<String>,
    /// ISO-8601 timestamp.
    #[serde(default)]
    pub edited_date: Option<String>,
}

/// Template library entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateResponse {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default)]
    pub owner_username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_image_url: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_owner: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<String>,
}

/// Which template listing to fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateListKind {
    #[default]
    Public,
    Mine,
}

impl TemplateListKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateListKind::Public => "public",
            TemplateListKind::Mine => "mine",
        }
    }
}

/// One slide of a template deck. `layout_json` is a serialized `LayoutDocument`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSlideResponse {
    pub id: u64,
    #[serde(default)]
    pub layout_json: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
}

/// A stored slide of a presentation. `content_json` is a `SlideContent` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideResponse {
    pub id: u64,
    #[serde(default)]
    pub slide_index: i32,
    #[serde(default)]
    pub content_json: Option<String>,
}

/// Body of `PUT /slides/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideUpdateRequest {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_content_json: Option<String>,
}

/// Body of `POST /slides/quick-create`.
///
/// Exactly one of `template_id`, `layout_jsons` or `layout_json` is normally set;
/// a template deck takes precedence over a custom layout list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickCreateRequest {
    pub subject: String,
    pub lesson: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_json: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_jsons: Option<Vec<String>>,
}

/// One spreadsheet row as returned by `POST /batch/upload`.
///
/// Columns other than the known ones are kept in `extra`, in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRow {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, alias = "error")]
    pub is_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, FieldValue>,
}

impl BatchRow {
    /// Form data for resolving this row against a layout. `name` doubles as the title.
    pub fn to_form_data(&self) -> SlideFormData {
        let mut form = SlideFormData::new()
            .with("name", self.name.as_str())
            .with("title", self.name.as_str())
            .with("content", self.content.as_str());
        for (key, value) in &self.extra {
            form.insert(key, value.clone());
        }
        form
    }
}

/// The subset of a row sent back to `POST /batch/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideDataDto {
    pub name: String,
    pub content: String,
    pub is_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Body of `POST /batch/generate`. A template deck is preferred over a single template slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchGenerateRequest {
    pub slides: Vec<SlideDataDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_slide_id: Option<u64>,
}

/// Export file formats supported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExportFormat {
    Pdf,
    Png,
    Pptx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Png => "png",
            ExportFormat::Pptx => "pptx",
        }
    }

    /// Extension of the downloaded file. PNG exports arrive as a zip of slide images.
    pub fn download_extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "zip",
            other => other.extension(),
        }
    }
}

/// Body of `POST /presentations/{id}/export`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub file_name: String,
    pub formats: Vec<ExportFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
}

/// Error body produced by the backend's exception handler.
#[derive(Debug, Clone, Deserialize)]
#[allow(unused)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub status: Option<u16>,
    pub message: String,
    #[serde(default)]
    pub details: Option<String>,
}
