use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tracing::{error, info};

use crate::export::PreviewSurface;
use crate::models::resume::ResumeDocument;
use crate::render::project_selected;
use crate::storage::persistence::PersistenceAdapter;
use crate::storage::StorageError;

use super::edit::{apply_edit, Edit, EditError};
use super::sanitize::sanitize_document;

struct Current {
    document: Arc<ResumeDocument>,
    preview: Option<Arc<PreviewSurface>>,
}

/// The single live document plus the preview rendered from it.
///
/// Mutations are serialized by an async writer lock: each one builds a new
/// document from a copy, swaps it in, then persists it on the blocking pool
/// before the next mutation starts, so stored writes follow the order
/// mutations were issued. The swap itself happens under a short std lock that
/// is never held across store I/O, so readers get `Arc` snapshots without
/// waiting on a slow store.
pub struct ResumeSession {
    current: Mutex<Current>,
    writer: tokio::sync::Mutex<()>,
    persistence: PersistenceAdapter,
}

impl ResumeSession {
    /// Loads the stored document (or the default) and renders its preview.
    ///
    /// Blocks on the store; call it at startup or from the blocking pool.
    pub fn open(persistence: PersistenceAdapter) -> Self {
        let document = persistence.load();
        info!(
            entries = document.entry_ids().len(),
            template = document.additional_options.template.name(),
            "Resume session opened"
        );
        Self {
            current: Mutex::new(Current::rendered(document)),
            writer: tokio::sync::Mutex::new(()),
            persistence,
        }
    }

    pub fn snapshot(&self) -> Arc<ResumeDocument> {
        Arc::clone(&self.lock().document)
    }

    /// The surface a PDF export captures. `None` until something is rendered.
    pub fn preview(&self) -> Option<Arc<PreviewSurface>> {
        self.lock().preview.clone()
    }

    /// Applies one edit. Invalid edits leave the document untouched.
    pub async fn apply(&self, edit: &Edit) -> Result<Arc<ResumeDocument>, EditError> {
        let _writer = self.writer.lock().await;
        let next = apply_edit(&self.snapshot(), edit)?;
        Ok(self.commit(next).await)
    }

    /// Runs `f` against the current document and commits what it returns.
    /// `Ok(None)` leaves the document untouched.
    pub async fn update<T, E>(
        &self,
        f: impl FnOnce(&ResumeDocument) -> Result<Option<(ResumeDocument, T)>, E>,
    ) -> Result<Option<(Arc<ResumeDocument>, T)>, E> {
        let _writer = self.writer.lock().await;
        let current = self.snapshot();
        match f(&current)? {
            Some((next, extra)) => Ok(Some((self.commit(next).await, extra))),
            None => Ok(None),
        }
    }

    /// Replaces the whole document with a sanitized client-supplied value.
    pub async fn import(&self, raw: &Value) -> Arc<ResumeDocument> {
        let next = sanitize_document(raw);
        let _writer = self.writer.lock().await;
        self.commit(next).await
    }

    /// Restores the default document and removes the stored copy.
    pub async fn reset(&self) -> Arc<ResumeDocument> {
        let _writer = self.writer.lock().await;
        let document = self.swap(ResumeDocument::default());
        let persistence = self.persistence.clone();
        if let Err(e) = blocking(move || persistence.clear()).await {
            error!("Failed to clear stored document: {e}");
        }
        info!("Resume session reset to default document");
        document
    }

    /// Swaps `next` in, then writes it. Callers hold the writer lock.
    async fn commit(&self, next: ResumeDocument) -> Arc<ResumeDocument> {
        let document = self.swap(next);
        let persistence = self.persistence.clone();
        let stored = Arc::clone(&document);
        // The in-memory document stays authoritative when the write fails.
        if let Err(e) = blocking(move || persistence.save(&stored)).await {
            error!("Failed to persist document: {e}");
        }
        document
    }

    fn swap(&self, next: ResumeDocument) -> Arc<ResumeDocument> {
        let mut current = self.lock();
        *current = Current::rendered(next);
        Arc::clone(&current.document)
    }

    fn lock(&self) -> MutexGuard<'_, Current> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Runs a store call on the blocking pool.
async fn blocking(
    f: impl FnOnce() -> Result<(), StorageError> + Send + 'static,
) -> Result<(), String> {
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(|e| e.to_string()),
        Err(e) => Err(format!("store task failed: {e}")),
    }
}

impl Current {
    fn rendered(document: ResumeDocument) -> Self {
        let preview = PreviewSurface::new(project_selected(&document));
        Self {
            document: Arc::new(document),
            preview: Some(Arc::new(preview)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{Section, Template};
    use crate::storage::persistence::STORAGE_KEY;
    use crate::storage::{KeyValueStore, MemoryStore};
    use serde_json::json;

    fn session() -> (ResumeSession, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        let session = ResumeSession::open(PersistenceAdapter::new(store.clone()));
        (session, store)
    }

    fn set(path: &str, value: Value) -> Edit {
        Edit::Set {
            path: path.to_string(),
            value,
        }
    }

    #[test]
    fn test_open_renders_preview() {
        let (session, _) = session();
        let preview = session.preview().unwrap();
        assert_eq!(preview.resume().template, Template::Modern);
        assert_eq!(*session.snapshot(), ResumeDocument::default());
    }

    #[tokio::test]
    async fn test_apply_persists_and_rerenders() {
        let (session, store) = session();
        session
            .apply(&set("personalInfo.fullName", json!("Ada")))
            .await
            .unwrap();
        session
            .apply(&set("additionalOptions.template", json!("Classic")))
            .await
            .unwrap();

        let stored: Value = serde_json::from_str(&store.get(STORAGE_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored["personalInfo"]["fullName"], "Ada");
        let preview = session.preview().unwrap();
        assert_eq!(preview.resume().header.name, "Ada");
        assert_eq!(preview.resume().template, Template::Classic);
    }

    #[tokio::test]
    async fn test_invalid_edit_leaves_document_and_store_untouched() {
        let (session, store) = session();
        let before = session.snapshot();
        let err = session
            .apply(&Edit::RemoveEntry {
                section: Section::Education,
                id: "missing".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EditError::EntryNotFound { .. }));
        assert_eq!(session.snapshot(), before);
        assert_eq!(store.get(STORAGE_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_snapshots_are_stable() {
        let (session, _) = session();
        let old = session.snapshot();
        session.apply(&set("skills", json!("Rust"))).await.unwrap();
        assert_eq!(old.skills, "");
        assert_eq!(session.snapshot().skills, "Rust");
    }

    #[tokio::test]
    async fn test_import_sanitizes() {
        let (session, _) = session();
        let doc = session.import(&json!({
            "skills": "Go",
            "options": {"template": "Minimal", "exportFormat": "DOCX"},
            "education": [1, {"degreeTitle": "BSc"}]
        }))
        .await;
        assert_eq!(doc.skills, "Go");
        assert_eq!(doc.additional_options.template, Template::Minimal);
        assert_eq!(doc.education.len(), 1);
        assert!(!doc.education[0].id.is_empty());
    }

    #[tokio::test]
    async fn test_reset_clears_stored_key() {
        let (session, store) = session();
        session.apply(&set("skills", json!("Rust"))).await.unwrap();
        assert!(store.get(STORAGE_KEY).unwrap().is_some());

        let doc = session.reset().await;
        assert_eq!(*doc, ResumeDocument::default());
        assert_eq!(store.get(STORAGE_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_none_is_a_no_op() {
        let (session, store) = session();
        let result: Result<Option<(Arc<ResumeDocument>, ())>, EditError> =
            session.update(|_| Ok(None)).await;
        assert!(result.unwrap().is_none());
        assert_eq!(store.get(STORAGE_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_reopen_restores_saved_document() {
        let store = Arc::new(MemoryStore::default());
        {
            let session = ResumeSession::open(PersistenceAdapter::new(store.clone()));
            session
                .apply(&Edit::AddEntry { section: Section::Projects })
                .await
                .unwrap();
        }
        let reopened = ResumeSession::open(PersistenceAdapter::new(store));
        assert_eq!(reopened.snapshot().projects.len(), 1);
    }

    #[tokio::test]
    async fn test_writes_are_stored_in_edit_order() {
        let (session, store) = session();
        let session = Arc::new(session);
        let mut tasks = Vec::new();
        for i in 0..20 {
            let session = Arc::clone(&session);
            tasks.push(tokio::spawn(async move {
                session.apply(&set("skills", json!(i.to_string()))).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }
        let stored: Value = serde_json::from_str(&store.get(STORAGE_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored["skills"], json!(session.snapshot().skills));
    }
}
