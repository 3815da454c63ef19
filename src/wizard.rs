//! Step tables for the quick-create and batch wizards.
//!
//! A step can only be entered when the data it needs exists. [`guard`] maps a
//! requested step to the furthest step that is actually reachable, so deep links and
//! reloads land somewhere consistent instead of on a half-empty page.

use serde::{Deserialize, Serialize};

use crate::models::api::BatchRow;
use crate::storage::{KeyValueStore, WizardStore};

/// What the wizards know about the data collected so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WizardState {
    /// A layout, a layout list or a template deck has been chosen.
    pub has_layout: bool,
    /// The quick-create form has been filled in.
    pub has_form: bool,
    /// Rows parsed from the uploaded spreadsheet.
    pub rows: usize,
    /// Parsed rows not flagged as errors.
    pub valid_rows: usize,
}

impl WizardState {
    /// Quick-create state as persisted in a wizard store.
    pub fn from_store<S: KeyValueStore>(store: &WizardStore<S>) -> Self {
        let has_layout = store.layout().is_some()
            || store.layouts().is_some()
            || store.quick_create_template_id().is_some();
        let has_form = store.form().is_some_and(|form| !form.content().trim().is_empty());
        WizardState {
            has_layout,
            has_form,
            ..Default::default()
        }
    }

    /// Batch state for a set of uploaded rows.
    pub fn from_rows(rows: &[BatchRow]) -> Self {
        WizardState {
            rows: rows.len(),
            valid_rows: rows.iter().filter(|row| !row.is_error).count(),
            ..Default::default()
        }
    }
}

/// An ordered wizard step.
pub trait WizardStep: Copy + Ord + Sized {
    /// Whether everything this step displays is available.
    fn is_reachable(self, state: &WizardState) -> bool;

    fn previous(self) -> Option<Self>;

    /// The following step. There is no way back except through [`guard`].
    fn next(self) -> Option<Self>;
}

/// The furthest reachable step at or before `requested`.
pub fn guard<T: WizardStep>(requested: T, state: &WizardState) -> T {
    let mut step = requested;
    while !step.is_reachable(state) {
        match step.previous() {
            Some(previous) => step = previous,
            None => break,
        }
    }
    step
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuickCreateStep {
    Layout,
    Form,
    Preview,
}

impl WizardStep for QuickCreateStep {
    fn is_reachable(self, state: &WizardState) -> bool {
        match self {
            QuickCreateStep::Layout => true,
            QuickCreateStep::Form => state.has_layout,
            QuickCreateStep::Preview => state.has_layout && state.has_form,
        }
    }

    fn previous(self) -> Option<Self> {
        match self {
            QuickCreateStep::Layout => None,
            QuickCreateStep::Form => Some(QuickCreateStep::Layout),
            QuickCreateStep::Preview => Some(QuickCreateStep::Form),
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            QuickCreateStep::Layout => Some(QuickCreateStep::Form),
            QuickCreateStep::Form => Some(QuickCreateStep::Preview),
            QuickCreateStep::Preview => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStep {
    Upload,
    Preview,
    Generate,
}

impl WizardStep for BatchStep {
    fn is_reachable(self, state: &WizardState) -> bool {
        match self {
            BatchStep::Upload => true,
            BatchStep::Preview => state.rows > 0,
            BatchStep::Generate => state.valid_rows > 0,
        }
    }

    fn previous(self) -> Option<Self> {
        match self {
            BatchStep::Upload => None,
            BatchStep::Preview => Some(BatchStep::Upload),
            BatchStep::Generate => Some(BatchStep::Preview),
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            BatchStep::Upload => Some(BatchStep::Preview),
            BatchStep::Preview => Some(BatchStep::Generate),
            BatchStep::Generate => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::starter_elements;
    use crate::models::form::SlideFormData;
    use crate::models::layout::LayoutDocument;
    use crate::storage::MemoryStore;

    #[test]
    fn test_quick_create_guard_never_skips_missing_data() {
        let empty = WizardState::default();
        assert_eq!(guard(QuickCreateStep::Preview, &empty), QuickCreateStep::Layout);
        assert_eq!(guard(QuickCreateStep::Form, &empty), QuickCreateStep::Layout);

        let layout_only = WizardState {
            has_layout: true,
            ..Default::default()
        };
        assert_eq!(guard(QuickCreateStep::Preview, &layout_only), QuickCreateStep::Form);

        let form_without_layout = WizardState {
            has_form: true,
            ..Default::default()
        };
        assert_eq!(guard(QuickCreateStep::Preview, &form_without_layout), QuickCreateStep::Layout);
    }

    #[test]
    fn test_guard_keeps_requested_step_when_reachable() {
        let complete = WizardState {
            has_layout: true,
            has_form: true,
            ..Default::default()
        };
        assert_eq!(guard(QuickCreateStep::Form, &complete), QuickCreateStep::Form);
        assert_eq!(guard(QuickCreateStep::Preview, &complete), QuickCreateStep::Preview);
    }

    #[test]
    fn test_state_from_store() {
        let mut store = WizardStore::new(MemoryStore::new());
        assert_eq!(WizardState::from_store(&store), WizardState::default());

        store.set_layout(&LayoutDocument::new(starter_elements())).unwrap();
        store.set_form(&SlideFormData::new().with("content", "  ")).unwrap();
        let state = WizardState::from_store(&store);
        assert!(state.has_layout);
        assert!(!state.has_form);

        store.set_form(&SlideFormData::new().with("content", "Title\nBody")).unwrap();
        assert_eq!(guard(QuickCreateStep::Preview, &WizardState::from_store(&store)), QuickCreateStep::Preview);
    }

    #[test]
    fn test_batch_guard_requires_valid_rows() {
        let rows = vec![BatchRow {
            name: "Broken".to_string(),
            is_error: true,
            ..Default::default()
        }];
        let state = WizardState::from_rows(&rows);
        assert_eq!(guard(BatchStep::Generate, &state), BatchStep::Preview);
        assert_eq!(guard(BatchStep::Generate, &WizardState::from_rows(&[])), BatchStep::Upload);
    }

    #[test]
    fn test_next_is_one_way() {
        assert_eq!(QuickCreateStep::Layout.next(), Some(QuickCreateStep::Form));
        assert_eq!(QuickCreateStep::Preview.next(), None);
        assert_eq!(BatchStep::Preview.next(), Some(BatchStep::Generate));
        assert!(BatchStep::Upload < BatchStep::Generate);
    }
}
