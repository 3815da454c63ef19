#[cfg(not(target_arch = "wasm32"))]
pub mod client;

#[cfg(not(target_arch = "wasm32"))]
pub use client::{ClientConfig, QuickSlideClient};

pub mod batch;
pub mod content;
pub mod errors;
pub mod export;
pub mod geometry;
pub mod models;
pub mod quick_create;
pub mod resolver;
pub mod storage;
pub mod wizard;

pub use errors::{QuickSlideError, Result};
pub use models::{LayoutDocument, PlaceholderElement, SlideFormData};
pub use quick_create::{LayoutSource, QuickCreateDraft};
pub use resolver::{resolve_slide, ResolveOptions, ResolvedSlide};

use wasm_bindgen::prelude::*;

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Resolves a stored layout against form JSON and returns the `ResolvedSlide` as JSON.
///
/// `today` overrides the local date shown in date placeholders.
#[wasm_bindgen(js_name = resolveSlideJson)]
pub fn resolve_slide_json(
    layout_json: &str,
    form_json: &str,
    offset: usize,
    today: Option<String>,
) -> std::result::Result<String, JsValue> {
    let layout = LayoutDocument::from_json_lenient(Some(layout_json));
    let form = SlideFormData::from_json_lenient(form_json);
    let mut options = ResolveOptions::new().with_offset(offset);
    if let Some(today) = today.filter(|t| !t.trim().is_empty()) {
        options = options.with_today(today);
    }
    let resolved = resolve_slide(&layout.elements, &form, &options);
    serde_json::to_string(&resolved).map_err(js_error)
}

#[wasm_bindgen(js_name = parseStructuredContentJson)]
pub fn parse_structured_content_json(raw: &str) -> std::result::Result<String, JsValue> {
    serde_json::to_string(&content::parse_structured_content(raw)).map_err(js_error)
}

#[wasm_bindgen(js_name = parseParagraphsJson)]
pub fn parse_paragraphs_json(raw: &str) -> std::result::Result<String, JsValue> {
    serde_json::to_string(&content::parse_paragraphs(raw)).map_err(js_error)
}

#[wasm_bindgen(js_name = isStructuredContent)]
pub fn is_structured_content(raw: &str) -> bool {
    content::is_structured_content(raw)
}

#[wasm_bindgen(js_name = normalizeDate)]
pub fn normalize_date(raw: &str) -> String {
    content::normalize_date(raw)
}

/// Routes `log` output to the browser console (or stderr natively) and installs the
/// panic hook when that feature is enabled. Safe to call more than once.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(target_arch = "wasm32")]
    let _ = console_log::init_with_level(log::Level::Debug);

    #[cfg(not(target_arch = "wasm32"))]
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_slide_json() {
        let layout = r#"{"elements":[
            {"id":1,"type":"title","x":40,"y":40,"w":520,"h":80},
            {"id":2,"type":"text","x":40,"y":140,"w":520,"h":160},
            {"id":3,"type":"date","x":40,"y":320,"w":260,"h":60}
        ]}"#;
        let form = r#"{"title":"Photosynthesis","content":"Light becomes sugar."}"#;
        let json = resolve_slide_json(layout, form, 0, Some("02/03/2026".to_string())).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["title"], "Photosynthesis");
        assert_eq!(value["values"]["2"], "Light becomes sugar.");
        assert_eq!(value["values"]["3"], "02/03/2026");
    }

    #[test]
    fn test_content_exports() {
        assert!(is_structured_content("a\\-b"));
        assert_eq!(normalize_date("1/2/2024"), "01/02/2024");
        assert_eq!(parse_paragraphs_json("a\n\nb").unwrap(), r#"["a","b"]"#);
        assert_eq!(
            parse_structured_content_json("x\\--y").unwrap(),
            r#"{"images":["x"],"captions":["y"],"texts":[],"dates":[]}"#
        );
    }
}
