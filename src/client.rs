use crate::batch::BatchOutcome;
use crate::errors::{QuickSlideError, Result};
use crate::export::{batch_export_request, ExportedFile};
use crate::models::api::{
    BatchGenerateRequest, BatchRow, ErrorResponse, ExportFormat, ExportRequest, PresentationResponse,
    QuickCreateRequest, SlideResponse, SlideUpdateRequest, TemplateListKind, TemplateResponse,
    TemplateSlideResponse,
};
use crate::models::layout::LayoutDocument;
use crate::storage::{KeyValueStore, MemoryStore, WizardStore};
use log::{debug, warn};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::env;
use std::path::Path;
use std::time::Duration;

/// Backend root used when `QUICKSLIDE_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
/// Pause between consecutive downloads of a batch export.
pub const EXPORT_PACING: Duration = Duration::from_millis(250);

const BATCH_WARNING_HEADER: &str = "x-batch-warning";

/// Where the backend lives and which token to start with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        ClientConfig {
            base_url: normalize_base_url(base_url),
            token: None,
        }
    }

    /// Reads `QUICKSLIDE_API_URL` and `QUICKSLIDE_TOKEN`.
    ///
    /// Call `dotenvy::dotenv().ok();` beforehand to pick up a `.env` file. A missing
    /// URL falls back to [`DEFAULT_API_URL`]; a value that is not valid unicode is an error.
    pub fn from_env() -> Result<Self> {
        let base_url = match env::var("QUICKSLIDE_API_URL") {
            Ok(url) => url,
            Err(env::VarError::NotPresent) => DEFAULT_API_URL.to_string(),
            Err(e) => return Err(e.into()),
        };
        let token = match env::var("QUICKSLIDE_TOKEN") {
            Ok(token) if !token.trim().is_empty() => Some(token),
            Ok(_) | Err(env::VarError::NotPresent) => None,
            Err(e) => return Err(e.into()),
        };
        Ok(ClientConfig {
            base_url: normalize_base_url(&base_url),
            token,
        })
    }
}

/// Strips trailing slashes and makes sure the URL ends in the `/api` context path.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let base = if trimmed.is_empty() { "http://localhost:8080" } else { trimmed };
    let base = base.trim_end_matches('/');
    if base.ends_with("/api") {
        base.to_string()
    } else {
        format!("{}/api", base)
    }
}

/// Typed client for the QuickSlide REST backend.
///
/// The bearer token is read from the wizard store on every request. A 401 or 403
/// response clears it and surfaces as [`QuickSlideError::SessionExpired`].
#[derive(Debug)]
pub struct QuickSlideClient<S = MemoryStore> {
    http: reqwest::Client,
    base_url: String,
    store: WizardStore<S>,
}

impl QuickSlideClient<MemoryStore> {
    /// Client with an in-memory token store seeded from the config.
    pub fn from_config(config: ClientConfig) -> Self {
        let mut store = WizardStore::new(MemoryStore::new());
        if let Some(token) = &config.token {
            store.set_token(token);
        }
        QuickSlideClient::new(reqwest::Client::new(), &config.base_url, store)
    }
}

impl<S: KeyValueStore> QuickSlideClient<S> {
    pub fn new(http: reqwest::Client, base_url: &str, store: WizardStore<S>) -> Self {
        QuickSlideClient {
            http,
            base_url: normalize_base_url(base_url),
            store,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &WizardStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut WizardStore<S> {
        &mut self.store
    }

    // --- Dashboard & templates ---

    pub async fn recent_presentations(&mut self) -> Result<Vec<PresentationResponse>> {
        let request = self.http.get(self.url("/presentations/recents"));
        self.fetch_json(request).await
    }

    pub async fn templates(&mut self, kind: TemplateListKind) -> Result<Vec<TemplateResponse>> {
        let request = self
            .http
            .get(self.url("/templates"))
            .query(&[("type", kind.as_str())]);
        self.fetch_json(request).await
    }

    /// Slides of a template deck, sorted by their `order` (missing order sorts as 0).
    pub async fn template_slides(&mut self, template_id: u64) -> Result<Vec<TemplateSlideResponse>> {
        let request = self.http.get(self.url(&format!("/templates/{}/slides", template_id)));
        let mut slides: Vec<TemplateSlideResponse> = self.fetch_json(request).await?;
        slides.sort_by_key(|slide| slide.order.unwrap_or(0));
        Ok(slides)
    }

    /// Parsed layouts of a template deck, in slide order.
    pub async fn template_deck_layouts(&mut self, template_id: u64) -> Result<Vec<LayoutDocument>> {
        let slides = self.template_slides(template_id).await?;
        Ok(slides
            .iter()
            .map(|slide| LayoutDocument::from_json_lenient(slide.layout_json.as_deref()))
            .collect())
    }

    // --- Slides ---

    pub async fn quick_create(&mut self, body: &QuickCreateRequest) -> Result<PresentationResponse> {
        if body.title.trim().is_empty() {
            return Err(QuickSlideError::MissingTitle);
        }
        let request = self.http.post(self.url("/slides/quick-create")).json(body);
        self.fetch_json(request).await
    }

    pub async fn project_slides(&mut self, project_id: u64) -> Result<Vec<SlideResponse>> {
        let request = self.http.get(self.url(&format!("/slides/project/{}", project_id)));
        self.fetch_json(request).await
    }

    pub async fn update_slide(&mut self, slide_id: u64, body: &SlideUpdateRequest) -> Result<()> {
        let request = self.http.put(self.url(&format!("/slides/{}", slide_id))).json(body);
        self.send(request).await?;
        Ok(())
    }

    // --- Batch ---

    /// Uploads a spreadsheet from disk and returns the parsed rows.
    pub async fn upload_batch_file(&mut self, path: &Path) -> Result<Vec<BatchRow>> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                QuickSlideError::InvalidInput(format!("'{}' is not a file path", path.display()))
            })?;
        self.upload_batch_bytes(&file_name, bytes).await
    }

    pub async fn upload_batch_bytes(&mut self, file_name: &str, bytes: Vec<u8>) -> Result<Vec<BatchRow>> {
        if bytes.is_empty() {
            return Err(QuickSlideError::InvalidInput(format!("'{}' is empty", file_name)));
        }
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_string()));
        let request = self.http.post(self.url("/batch/upload")).multipart(form);
        self.fetch_json(request).await
    }

    /// Generates one presentation per row. Fails when the backend created nothing.
    pub async fn generate_batch(&mut self, body: &BatchGenerateRequest) -> Result<BatchOutcome> {
        let request = self.http.post(self.url("/batch/generate")).json(body);
        let response = self.send(request).await?;

        let warning = response
            .headers()
            .get(BATCH_WARNING_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        if let Some(warning) = &warning {
            warn!("Batch generation truncated content: {}", warning);
        }

        let bytes = response.bytes().await?;
        let created: Vec<PresentationResponse> = serde_json::from_slice(&bytes)?;
        if created.is_empty() {
            return Err(QuickSlideError::InvalidInput(
                "Backend returned no presentation id".to_string(),
            ));
        }
        Ok(BatchOutcome { created, warning })
    }

    // --- Export ---

    /// Downloads one export. The body is the raw file (a zip for PNG).
    pub async fn export_presentation(&mut self, presentation_id: u64, body: &ExportRequest) -> Result<Vec<u8>> {
        let request = self
            .http
            .post(self.url(&format!("/presentations/{}/export", presentation_id)))
            .json(body);
        let response = self.send(request).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Exports every presentation of a batch in one format, one request at a time,
    /// pausing [`EXPORT_PACING`] between downloads.
    pub async fn export_many(
        &mut self,
        items: &[PresentationResponse],
        base_name: &str,
        format: ExportFormat,
        font: Option<&str>,
    ) -> Result<Vec<ExportedFile>> {
        let mut files = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(EXPORT_PACING).await;
            }
            let body = batch_export_request(base_name, index, item, format, font);
            debug!("Exporting presentation {} as {}", item.id, body.file_name);
            let bytes = self.export_presentation(item.id, &body).await?;
            files.push(ExportedFile {
                file_name: format!("{}.{}", body.file_name, format.download_extension()),
                bytes,
            });
        }
        Ok(files)
    }

    // --- Helpers ---

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request with the bearer token and maps non-2xx responses to errors.
    async fn send(&mut self, request: RequestBuilder) -> Result<Response> {
        let request = match self.store.token() {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        };
        let response = request
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(QuickSlideError::Network)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!("Session rejected with status {}, clearing stored token", status);
            self.store.clear_token();
            return Err(QuickSlideError::SessionExpired { status });
        }

        let error_text = response.text().await.map_err(QuickSlideError::Network)?;
        Err(QuickSlideError::Api {
            status,
            message: error_message(status, &error_text),
        })
    }

    async fn fetch_json<T: DeserializeOwned>(&mut self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await.map_err(QuickSlideError::Network)?;
        serde_json::from_slice::<T>(&bytes).map_err(|e| {
            let snippet = String::from_utf8_lossy(&bytes[..bytes.len().min(500)]);
            debug!("Failed to decode response: {}\n{}", e, snippet);
            QuickSlideError::Json(e)
        })
    }
}

/// The backend's `{ "message": .. }` error text, else the raw body.
fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(error) if !error.message.is_empty() => error.message,
        _ if body.trim().is_empty() => format!("API request failed with status {}", status),
        _ => format!("API request failed with status {}: {}", status, body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("http://host:8080"), "http://host:8080/api");
        assert_eq!(normalize_base_url("http://host:8080/api///"), "http://host:8080/api");
        assert_eq!(normalize_base_url("  "), DEFAULT_API_URL);
    }

    #[test]
    fn test_error_message_prefers_backend_message() {
        let body = r#"{"status":400,"timestamp":"2026-01-01T00:00:00","message":"Title is blank","details":"uri=/api/slides"}"#;
        assert_eq!(error_message(StatusCode::BAD_REQUEST, body), "Title is blank");
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "upstream down"),
            "API request failed with status 502 Bad Gateway: upstream down"
        );
    }

    #[test]
    fn test_client_seeds_token_from_config() {
        let config = ClientConfig {
            base_url: "http://localhost:9000".to_string(),
            token: Some("jwt".to_string()),
        };
        let client = QuickSlideClient::from_config(config);
        assert_eq!(client.base_url(), "http://localhost:9000/api");
        assert_eq!(client.store().token().as_deref(), Some("jwt"));
    }

    #[tokio::test]
    async fn test_quick_create_rejects_blank_title_before_sending() {
        let mut client = QuickSlideClient::from_config(ClientConfig::new("http://127.0.0.1:9"));
        let result = client.quick_create(&QuickCreateRequest::default()).await;
        assert!(matches!(result, Err(QuickSlideError::MissingTitle)));
    }

    #[tokio::test]
    async fn test_empty_upload_is_rejected_locally() {
        let mut client = QuickSlideClient::from_config(ClientConfig::new("http://127.0.0.1:9"));
        let result = client.upload_batch_bytes("rows.xlsx", Vec::new()).await;
        assert!(matches!(result, Err(QuickSlideError::InvalidInput(_))));
    }
}
