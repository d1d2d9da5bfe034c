use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::document::sanitize::sanitize_document;
use crate::models::resume::ResumeDocument;

use super::{KeyValueStore, StorageError};

/// The single key the document is stored under.
pub const STORAGE_KEY: &str = "resumeFlowData";

/// Bridges the document to a key-value store under [`STORAGE_KEY`].
///
/// Constructed once per session and handed to whoever needs it; nothing else
/// touches the store directly.
#[derive(Clone)]
pub struct PersistenceAdapter {
    store: Arc<dyn KeyValueStore>,
}

impl PersistenceAdapter {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Loads the stored document. Never fails.
    ///
    /// - nothing stored → default document
    /// - stored text is not JSON → key cleared, default document
    /// - otherwise → sanitized document
    pub fn load(&self) -> ResumeDocument {
        let raw = match self.store.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored document; starting from default");
                return ResumeDocument::default();
            }
            Err(e) => {
                warn!("Failed to read stored document, starting from default: {e}");
                return ResumeDocument::default();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => sanitize_document(&value),
            Err(e) => {
                warn!("Discarding malformed stored document: {e}");
                if let Err(e) = self.store.remove(STORAGE_KEY) {
                    warn!("Failed to clear malformed stored document: {e}");
                }
                ResumeDocument::default()
            }
        }
    }

    /// Writes the full document, replacing whatever was stored.
    pub fn save(&self, doc: &ResumeDocument) -> Result<(), StorageError> {
        let text = serde_json::to_string(doc)?;
        self.store.set(STORAGE_KEY, &text)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(STORAGE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{Template, WorkExperienceEntry};
    use crate::storage::MemoryStore;

    fn adapter_with(raw: Option<&str>) -> (PersistenceAdapter, Arc<MemoryStore>) {
        let store = Arc::new(match raw {
            Some(raw) => MemoryStore::with_entry(STORAGE_KEY, raw),
            None => MemoryStore::default(),
        });
        (PersistenceAdapter::new(store.clone()), store)
    }

    #[test]
    fn test_load_missing_returns_default() {
        let (adapter, _) = adapter_with(None);
        assert_eq!(adapter.load(), ResumeDocument::default());
    }

    #[test]
    fn test_load_malformed_clears_key() {
        let (adapter, store) = adapter_with(Some("{not json"));
        assert_eq!(adapter.load(), ResumeDocument::default());
        assert_eq!(store.get(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_load_sanitizes_wrong_shapes() {
        let (adapter, store) = adapter_with(Some(
            r#"{"skills": 3, "workExperience": [{"id": "w1", "responsibilities": []}],
                "additionalOptions": {"template": "Retro"}}"#,
        ));
        let doc = adapter.load();
        assert_eq!(doc.skills, "");
        assert_eq!(doc.work_experience[0].id, "w1");
        assert_eq!(doc.work_experience[0].responsibilities, vec![""]);
        assert_eq!(doc.additional_options.template, Template::Modern);
        // Well-formed JSON is kept even when its shape is wrong.
        assert!(store.get(STORAGE_KEY).unwrap().is_some());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let (adapter, _) = adapter_with(None);
        let mut doc = ResumeDocument::default();
        doc.personal_info.full_name = "Grace Hopper".to_string();
        doc.work_experience.push(WorkExperienceEntry {
            job_title: "Rear Admiral".to_string(),
            responsibilities: vec!["COBOL".to_string()],
            ..Default::default()
        });
        adapter.save(&doc).unwrap();
        assert_eq!(adapter.load(), doc);
    }

    #[test]
    fn test_last_write_wins() {
        let (adapter, _) = adapter_with(None);
        let mut doc = ResumeDocument::default();
        doc.skills = "first".to_string();
        adapter.save(&doc).unwrap();
        doc.skills = "second".to_string();
        adapter.save(&doc).unwrap();
        assert_eq!(adapter.load().skills, "second");
    }

    #[test]
    fn test_clear_removes_document() {
        let (adapter, store) = adapter_with(None);
        adapter.save(&ResumeDocument::default()).unwrap();
        adapter.clear().unwrap();
        assert_eq!(store.get(STORAGE_KEY).unwrap(), None);
    }
}
