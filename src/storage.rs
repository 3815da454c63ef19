//! Key-value persistence for wizard state.
//!
//! Callers see an infallible [`KeyValueStore`]. Persistent backends implement the
//! fallible [`StorageProvider`] and are wrapped in a [`FallbackStore`], which keeps
//! working from memory when the provider fails. [`WizardStore`] adds typed accessors
//! for the known keys on top of any store.

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::errors::Result;
use crate::geometry::ensure_slot_indexes;
use crate::models::api::PresentationResponse;
use crate::models::form::SlideFormData;
use crate::models::layout::LayoutDocument;

pub const QC_LAYOUT_KEY: &str = "quickslide_qc_layout_v1";
pub const QC_LAYOUTS_KEY: &str = "quickslide_qc_layouts_v1";
pub const QC_FORM_KEY: &str = "quickslide_qc_form_v1";
pub const QC_TEMPLATE_ID_KEY: &str = "quickslide_qc_template_id_v1";
pub const BG_TEMPLATE_ID_KEY: &str = "quickslide_bg_template_id_v1";
pub const BG_TEMPLATE_SLIDE_ID_KEY: &str = "quickslide_bg_template_slide_id_v1";
pub const BG_CREATED_PRESENTATIONS_KEY: &str = "quickslide_bg_created_presentations_v1";
pub const BG_CREATED_INDEX_KEY: &str = "quickslide_bg_created_presentations_index_v1";
pub const TOKEN_KEY: &str = "quickslide_jwt_token";

/// Failure of a persistent storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but is not a JSON object.
    #[error("Storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// The backend refuses access (quota, permissions, private mode).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// String key-value store that never fails from the caller's point of view.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// A persistent backend that may fail on any access.
pub trait StorageProvider {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> std::result::Result<(), StorageError>;
}

/// Process-local store with no persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Default::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Wraps a provider; every failed access is logged and served from memory instead.
#[derive(Debug)]
pub struct FallbackStore<P> {
    provider: P,
    memory: MemoryStore,
}

impl<P: StorageProvider> FallbackStore<P> {
    pub fn new(provider: P) -> Self {
        FallbackStore {
            provider,
            memory: MemoryStore::new(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P: StorageProvider> KeyValueStore for FallbackStore<P> {
    fn get(&self, key: &str) -> Option<String> {
        match self.provider.get(key) {
            Ok(Some(value)) => Some(value),
            Ok(None) => self.memory.get(key),
            Err(e) => {
                warn!("Storage read of '{}' failed, using memory: {}", key, e);
                self.memory.get(key)
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Err(e) = self.provider.set(key, value) {
            warn!("Storage write of '{}' failed, keeping it in memory: {}", key, e);
            self.memory.set(key, value);
        }
    }

    fn remove(&mut self, key: &str) {
        if let Err(e) = self.provider.remove(key) {
            warn!("Storage removal of '{}' failed: {}", key, e);
        }
        self.memory.remove(key);
    }
}

/// Provider persisting all keys as one JSON object in a file.
///
/// A missing file reads as empty. The whole file is rewritten on every change.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(path: impl AsRef<Path>) -> Self {
        JsonFileProvider {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> std::result::Result<Map<String, JsonValue>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, entries: &Map<String, JsonValue>) -> std::result::Result<(), StorageError> {
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl StorageProvider for JsonFileProvider {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
        let entries = self.load()?;
        Ok(entries.get(key).and_then(JsonValue::as_str).map(str::to_string))
    }

    fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), JsonValue::String(value.to_string()));
        self.save(&entries)
    }

    fn remove(&mut self, key: &str) -> std::result::Result<(), StorageError> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

/// Typed access to the quick-create and batch wizard keys.
///
/// Values that fail to parse read as absent, so a corrupt entry never blocks a wizard.
#[derive(Debug, Default)]
pub struct WizardStore<S> {
    store: S,
}

impl<S: KeyValueStore> WizardStore<S> {
    pub fn new(store: S) -> Self {
        WizardStore { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    // --- Quick create ---

    /// The single saved layout, with slot indexes ensured.
    pub fn layout(&self) -> Option<LayoutDocument> {
        self.read_json::<LayoutDocument>(QC_LAYOUT_KEY)
            .map(|layout| LayoutDocument::new(ensure_slot_indexes(layout.elements)))
    }

    pub fn set_layout(&mut self, layout: &LayoutDocument) -> Result<()> {
        self.write_json(QC_LAYOUT_KEY, layout)
    }

    /// The saved multi-slide layout list, stored as an array of layout JSON strings.
    /// An empty list reads as absent.
    pub fn layouts(&self) -> Option<Vec<LayoutDocument>> {
        let raw = self.read_json::<Vec<String>>(QC_LAYOUTS_KEY)?;
        if raw.is_empty() {
            return None;
        }
        Some(
            raw.iter()
                .map(|json| LayoutDocument::from_json_lenient(Some(json)))
                .collect(),
        )
    }

    pub fn set_layouts(&mut self, layouts: &[LayoutDocument]) -> Result<()> {
        let raw = layouts
            .iter()
            .map(LayoutDocument::to_json)
            .collect::<Result<Vec<_>>>()?;
        self.write_json(QC_LAYOUTS_KEY, &raw)
    }

    pub fn form(&self) -> Option<SlideFormData> {
        self.read_json(QC_FORM_KEY)
    }

    pub fn set_form(&mut self, form: &SlideFormData) -> Result<()> {
        self.write_json(QC_FORM_KEY, form)
    }

    pub fn quick_create_template_id(&self) -> Option<u64> {
        self.read_id(QC_TEMPLATE_ID_KEY)
    }

    pub fn set_quick_create_template_id(&mut self, id: Option<u64>) {
        self.write_id(QC_TEMPLATE_ID_KEY, id);
    }

    /// Forgets the whole quick-create draft.
    pub fn clear_quick_create(&mut self) {
        for key in [QC_LAYOUT_KEY, QC_LAYOUTS_KEY, QC_FORM_KEY, QC_TEMPLATE_ID_KEY] {
            self.store.remove(key);
        }
    }

    // --- Batch generation ---

    pub fn batch_template_id(&self) -> Option<u64> {
        self.read_id(BG_TEMPLATE_ID_KEY)
    }

    pub fn set_batch_template_id(&mut self, id: Option<u64>) {
        self.write_id(BG_TEMPLATE_ID_KEY, id);
    }

    pub fn batch_template_slide_id(&self) -> Option<u64> {
        self.read_id(BG_TEMPLATE_SLIDE_ID_KEY)
    }

    pub fn set_batch_template_slide_id(&mut self, id: Option<u64>) {
        self.write_id(BG_TEMPLATE_SLIDE_ID_KEY, id);
    }

    /// Presentations created by the last batch run.
    pub fn created_presentations(&self) -> Vec<PresentationResponse> {
        self.read_json(BG_CREATED_PRESENTATIONS_KEY).unwrap_or_default()
    }

    pub fn set_created_presentations(&mut self, created: &[PresentationResponse]) -> Result<()> {
        self.write_json(BG_CREATED_PRESENTATIONS_KEY, &created)
    }

    /// Which created presentation is currently previewed, bounded by the stored list.
    pub fn created_presentation_index(&self) -> usize {
        let index = self.read_json::<usize>(BG_CREATED_INDEX_KEY).unwrap_or(0);
        let len = self.created_presentations().len();
        if len == 0 {
            0
        } else {
            index.min(len - 1)
        }
    }

    pub fn set_created_presentation_index(&mut self, index: usize) {
        self.store.set(BG_CREATED_INDEX_KEY, &index.to_string());
    }

    /// Forgets the batch selection and its results.
    pub fn clear_batch(&mut self) {
        for key in [
            BG_TEMPLATE_ID_KEY,
            BG_TEMPLATE_SLIDE_ID_KEY,
            BG_CREATED_PRESENTATIONS_KEY,
            BG_CREATED_INDEX_KEY,
        ] {
            self.store.remove(key);
        }
    }

    // --- Session ---

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|t| !t.trim().is_empty())
    }

    pub fn set_token(&mut self, token: &str) {
        self.store.set(TOKEN_KEY, token);
    }

    pub fn clear_token(&mut self) {
        self.store.remove(TOKEN_KEY);
    }

    // --- Helpers ---

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("Ignoring invalid stored value for '{}': {}", key, e);
                None
            }
        }
    }

    fn write_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.store.set(key, &json);
        Ok(())
    }

    /// Ids are stored as decimal strings and must be positive.
    fn read_id(&self, key: &str) -> Option<u64> {
        self.store
            .get(key)
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|&id| id > 0)
    }

    fn write_id(&mut self, key: &str, id: Option<u64>) {
        match id {
            Some(id) => self.store.set(key, &id.to_string()),
            None => self.store.remove(key),
        }
    }
}
