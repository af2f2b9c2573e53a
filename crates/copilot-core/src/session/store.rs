//! The session store.
//!
//! `SessionStore` owns one [`SessionState`] and is the only way to change it.
//! Mutations are synchronous, cannot fail, and notify subscribed listeners
//! once they have run.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::processing::{
    ProcessedDocument, ProcessingBatch, ProcessingConfig, ProcessingStatus,
};
use crate::session::state::{PersistedSession, SessionState};
use crate::session::view;
use crate::upload::{FileUpload, UploadStatus};
use crate::workpaper::WorkpaperMetadata;

/// Callback invoked with the new state after every mutation.
pub type StateListener = Arc<dyn Fn(&SessionState) + Send + Sync>;

/// Handle returned by [`SessionStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Single source of truth for one client session.
///
/// # Example
///
/// ```
/// use copilot_core::session::SessionStore;
/// use copilot_core::upload::FileUpload;
///
/// let mut store = SessionStore::new();
/// store.add_uploaded_files(vec![FileUpload::new("w2.pdf", 2048)]);
/// assert!(store.has_uploaded_files());
/// ```
#[derive(Default)]
pub struct SessionStore {
    state: SessionState,
    listeners: Vec<(SubscriptionId, StateListener)>,
    next_subscription: u64,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl SessionStore {
    /// Creates a store holding the initial state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose fresh sessions start with `config`.
    pub fn with_processing_config(config: ProcessingConfig) -> Self {
        Self::from_state(SessionState::with_processing_config(config))
    }

    /// Creates a store around an existing state.
    pub fn from_state(state: SessionState) -> Self {
        Self {
            state,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    // ============================================================================
    // Subscriptions
    // ============================================================================

    /// Registers a listener called after every mutation.
    pub fn subscribe(&mut self, listener: StateListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener(&self.state);
        }
    }

    // ============================================================================
    // Uploads
    // ============================================================================

    /// Replaces the upload list.
    pub fn set_uploaded_files(&mut self, files: Vec<FileUpload>) {
        self.state.uploaded_files = files;
        self.notify();
    }

    /// Appends uploads. Ids are not deduplicated.
    pub fn add_uploaded_files(&mut self, files: Vec<FileUpload>) {
        self.state.uploaded_files.extend(files);
        self.notify();
    }

    /// Removes the first upload with `id`. Returns whether one was removed.
    pub fn remove_uploaded_file(&mut self, id: &str) -> bool {
        let Some(index) = self.state.uploaded_files.iter().position(|f| f.id == id) else {
            return false;
        };
        self.state.uploaded_files.remove(index);
        self.notify();
        true
    }

    /// Sets the status of the first upload with `id`. Returns whether one matched.
    pub fn update_upload_status(&mut self, id: &str, status: UploadStatus) -> bool {
        let Some(upload) = self.state.uploaded_files.iter_mut().find(|f| f.id == id) else {
            return false;
        };
        upload.status = status;
        self.notify();
        true
    }

    /// Removes every upload.
    pub fn clear_uploaded_files(&mut self) {
        self.state.uploaded_files.clear();
        self.notify();
    }

    // ============================================================================
    // Processing
    // ============================================================================

    /// Replaces the processing configuration.
    pub fn set_processing_config(&mut self, config: ProcessingConfig) {
        self.state.processing_config = config;
        self.notify();
    }

    /// Sets or clears the active batch.
    ///
    /// `Some` puts the session into the running state with that batch.
    /// `None` ends an active run and discards its batch; it does nothing when
    /// no run is active.
    pub fn set_current_batch(&mut self, batch: Option<ProcessingBatch>) {
        self.state.processing = match (batch, &self.state.processing) {
            (Some(batch), _) => ProcessingStatus::Running { batch: Some(batch) },
            (None, ProcessingStatus::Running { .. }) => ProcessingStatus::Completed { batch: None },
            (None, current) => current.clone(),
        };
        self.notify();
    }

    /// Starts or ends a run without touching batch counts.
    ///
    /// `true` enters the running state, keeping any batch already reported.
    /// `false` ends an active run; the batch is kept so final progress stays
    /// readable.
    pub fn set_is_processing(&mut self, processing: bool) {
        let next = match (processing, &self.state.processing) {
            (true, ProcessingStatus::Running { .. }) => None,
            (true, current) => Some(ProcessingStatus::Running {
                batch: current.batch().cloned(),
            }),
            (false, ProcessingStatus::Running { batch }) => Some(ProcessingStatus::Completed {
                batch: batch.clone(),
            }),
            (false, _) => None,
        };
        if let Some(next) = next {
            self.state.processing = next;
        }
        self.notify();
    }

    /// Updates the processed count of the active batch.
    ///
    /// Returns `false` and does nothing when no batch is active.
    pub fn record_batch_progress(&mut self, processed_documents: u32) -> bool {
        let Some(batch) = self.state.processing.batch_mut() else {
            return false;
        };
        batch.record_progress(processed_documents);
        self.notify();
        true
    }

    /// Replaces the processed documents.
    ///
    /// Selected ids that no longer match a document are dropped.
    pub fn set_processed_documents(&mut self, documents: Vec<ProcessedDocument>) {
        self.state.processed_documents = documents;
        self.prune_selection();
        self.notify();
    }

    fn prune_selection(&mut self) {
        let SessionState {
            processed_documents,
            selected_document_ids,
            ..
        } = &mut self.state;
        let before = selected_document_ids.len();
        selected_document_ids.retain(|id| processed_documents.iter().any(|d| &d.id == id));
        let pruned = before - selected_document_ids.len();
        if pruned > 0 {
            debug!(pruned, "Dropped stale document selections");
        }
    }

    // ============================================================================
    // Selection
    // ============================================================================

    /// Adds `id` to the selection if absent, removes it if present.
    pub fn toggle_document_selection(&mut self, id: &str) {
        if !self.state.selected_document_ids.remove(id) {
            self.state.selected_document_ids.insert(id.to_string());
        }
        self.notify();
    }

    /// Empties the selection.
    pub fn clear_document_selection(&mut self) {
        self.state.selected_document_ids.clear();
        self.notify();
    }

    /// Selects every current document. Documents added later are not selected.
    pub fn select_all_documents(&mut self) {
        self.state.selected_document_ids = self
            .state
            .processed_documents
            .iter()
            .map(|d| d.id.clone())
            .collect();
        self.notify();
    }

    // ============================================================================
    // Workpaper & navigation
    // ============================================================================

    /// Sets or clears the workpaper metadata.
    pub fn set_workpaper_metadata(&mut self, metadata: Option<WorkpaperMetadata>) {
        self.state.workpaper_metadata = metadata;
        self.notify();
    }

    /// Records the page the user is on. The path is not validated.
    pub fn set_active_page(&mut self, path: impl Into<String>) {
        self.state.active_page = path.into();
        self.notify();
    }

    // ============================================================================
    // Lifecycle
    // ============================================================================

    /// Resets the session to its initial state.
    ///
    /// The processing configuration is a user preference and is kept.
    pub fn clear_session(&mut self) {
        self.state = SessionState::with_processing_config(self.state.processing_config);
        self.notify();
    }

    /// Reconciles state restored after a restart.
    ///
    /// No run survives a restart, so a running status is reset to idle.
    /// Returns whether a correction was made.
    pub fn initialize_session(&mut self) -> bool {
        if !self.state.processing.is_running() {
            return false;
        }
        info!("Resetting stale processing status left by an interrupted session");
        self.state.processing = ProcessingStatus::Idle;
        self.notify();
        true
    }

    /// Merges a persisted record into the current state.
    ///
    /// Session-local fields (processing status, active page) are left as they are.
    pub fn hydrate(&mut self, persisted: PersistedSession) {
        let PersistedSession {
            uploaded_files,
            processing_config,
            processed_documents,
            workpaper_metadata,
        } = persisted;
        self.state.uploaded_files = uploaded_files;
        self.state.processing_config = processing_config;
        self.state.processed_documents = processed_documents;
        self.state.workpaper_metadata = workpaper_metadata;
        self.prune_selection();
        self.notify();
    }

    /// Returns the persisted projection of the current state.
    pub fn snapshot_persisted(&self) -> PersistedSession {
        self.state.to_persisted()
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn uploaded_files(&self) -> &[FileUpload] {
        &self.state.uploaded_files
    }

    pub fn processing_config(&self) -> &ProcessingConfig {
        &self.state.processing_config
    }

    pub fn processing_status(&self) -> &ProcessingStatus {
        &self.state.processing
    }

    pub fn current_batch(&self) -> Option<&ProcessingBatch> {
        self.state.processing.batch()
    }

    pub fn is_processing(&self) -> bool {
        self.state.processing.is_running()
    }

    pub fn processed_documents(&self) -> &[ProcessedDocument] {
        &self.state.processed_documents
    }

    pub fn selected_document_ids(&self) -> &BTreeSet<String> {
        &self.state.selected_document_ids
    }

    pub fn workpaper_metadata(&self) -> Option<&WorkpaperMetadata> {
        self.state.workpaper_metadata.as_ref()
    }

    pub fn active_page(&self) -> &str {
        &self.state.active_page
    }

    // ============================================================================
    // Derived queries
    // ============================================================================

    pub fn has_uploaded_files(&self) -> bool {
        view::has_uploaded_files(&self.state)
    }

    pub fn has_processed_documents(&self) -> bool {
        view::has_processed_documents(&self.state)
    }

    pub fn selected_documents(&self) -> Vec<&ProcessedDocument> {
        view::selected_documents(&self.state)
    }

    pub fn processing_progress(&self) -> f64 {
        view::processing_progress(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn doc(id: &str) -> ProcessedDocument {
        ProcessedDocument::new(id, format!("{id}.pdf"), "1099-INT")
    }

    #[test]
    fn test_add_uploaded_files_does_not_dedup() {
        let mut store = SessionStore::new();
        let upload = FileUpload::with_id("dup", "a.pdf", 1);
        store.add_uploaded_files(vec![upload.clone()]);
        store.add_uploaded_files(vec![upload.clone(), upload]);
        assert_eq!(store.uploaded_files().len(), 3);
    }

    #[test]
    fn test_remove_uploaded_file_removes_first_match_only() {
        let mut store = SessionStore::new();
        store.set_uploaded_files(vec![
            FileUpload::with_id("dup", "first.pdf", 1),
            FileUpload::with_id("dup", "second.pdf", 2),
        ]);
        assert!(store.remove_uploaded_file("dup"));
        assert_eq!(store.uploaded_files().len(), 1);
        assert_eq!(store.uploaded_files()[0].name, "second.pdf");
    }

    #[test]
    fn test_remove_missing_upload_is_noop() {
        let mut store = SessionStore::new();
        store.set_uploaded_files(vec![FileUpload::with_id("a", "a.pdf", 1)]);
        assert!(!store.remove_uploaded_file("b"));
        assert_eq!(store.uploaded_files().len(), 1);
    }

    #[test]
    fn test_update_upload_status() {
        let mut store = SessionStore::new();
        store.set_uploaded_files(vec![FileUpload::with_id("a", "a.pdf", 1)]);
        assert!(store.update_upload_status("a", UploadStatus::Uploaded));
        assert_eq!(store.uploaded_files()[0].status, UploadStatus::Uploaded);
        assert!(!store.update_upload_status("zzz", UploadStatus::Failed));
    }

    #[test]
    fn test_set_current_batch_drives_processing_status() {
        let mut store = SessionStore::new();
        assert!(!store.is_processing());

        store.set_current_batch(Some(ProcessingBatch::new(4, 1)));
        assert!(store.is_processing());
        assert_eq!(store.processing_progress(), 25.0);

        store.set_current_batch(None);
        assert!(!store.is_processing());
        assert!(store.current_batch().is_none());
        assert_eq!(
            store.processing_status(),
            &ProcessingStatus::Completed { batch: None }
        );
    }

    #[test]
    fn test_clearing_batch_when_idle_stays_idle() {
        let mut store = SessionStore::new();
        store.set_current_batch(None);
        assert_eq!(store.processing_status(), &ProcessingStatus::Idle);
    }

    #[test]
    fn test_set_is_processing_keeps_batch() {
        let mut store = SessionStore::new();
        store.set_is_processing(true);
        assert!(store.is_processing());
        assert!(store.current_batch().is_none());

        store.set_current_batch(Some(ProcessingBatch::new(2, 0)));
        store.set_is_processing(true);
        assert_eq!(store.current_batch().map(|b| b.total_documents), Some(2));

        store.set_is_processing(false);
        assert_eq!(store.processing_status().label(), "completed");
        assert_eq!(store.current_batch().map(|b| b.total_documents), Some(2));
    }

    #[test]
    fn test_ending_run_keeps_final_progress() {
        let mut store = SessionStore::new();
        store.set_current_batch(Some(ProcessingBatch::new(4, 4)));
        store.set_is_processing(false);

        assert!(!store.is_processing());
        assert_eq!(store.processing_progress(), 100.0);
        assert!(!store.record_batch_progress(1));

        // restarting keeps the counts until a new batch is reported
        store.set_is_processing(true);
        assert_eq!(store.current_batch().map(|b| b.processed_documents), Some(4));
    }

    #[test]
    fn test_record_batch_progress() {
        let mut store = SessionStore::new();
        assert!(!store.record_batch_progress(1));

        store.set_current_batch(Some(ProcessingBatch::new(4, 0)));
        assert!(store.record_batch_progress(2));
        assert_eq!(store.processing_progress(), 50.0);
        assert!(store.record_batch_progress(99));
        assert_eq!(store.processing_progress(), 100.0);
    }

    #[test]
    fn test_toggle_selection_is_involution() {
        let mut store = SessionStore::new();
        store.set_processed_documents(vec![doc("a"), doc("b")]);
        store.toggle_document_selection("a");
        let before = store.selected_document_ids().clone();

        store.toggle_document_selection("b");
        store.toggle_document_selection("b");
        assert_eq!(store.selected_document_ids(), &before);
    }

    #[test]
    fn test_select_all_then_selected_documents() {
        let mut store = SessionStore::new();
        let docs = vec![doc("z"), doc("a"), doc("m")];
        store.set_processed_documents(docs.clone());
        store.select_all_documents();

        let selected: Vec<ProcessedDocument> =
            store.selected_documents().into_iter().cloned().collect();
        assert_eq!(selected, docs);
    }

    #[test]
    fn test_replacing_documents_prunes_stale_selection() {
        let mut store = SessionStore::new();
        store.set_processed_documents(vec![doc("a"), doc("b")]);
        store.select_all_documents();

        store.set_processed_documents(vec![doc("b"), doc("c")]);
        let ids: Vec<&str> = store
            .selected_document_ids()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[test]
    fn test_clear_session_resets_everything_but_config() {
        let config = ProcessingConfig {
            enable_azure: false,
            enable_gemini: true,
            pii_mode: crate::processing::PiiMode::Redact,
        };
        let mut store = SessionStore::new();
        store.set_processing_config(config);
        store.add_uploaded_files(vec![FileUpload::new("a.pdf", 1)]);
        store.set_current_batch(Some(ProcessingBatch::new(2, 1)));
        store.set_processed_documents(vec![doc("a")]);
        store.select_all_documents();
        store.set_active_page("/results");

        store.clear_session();
        assert_eq!(store.state(), &SessionState::with_processing_config(config));

        store.clear_session();
        assert_eq!(store.state(), &SessionState::with_processing_config(config));
    }

    #[test]
    fn test_initialize_session_resets_stale_run() {
        let mut store = SessionStore::new();
        store.set_is_processing(true);
        assert!(store.initialize_session());
        assert!(!store.is_processing());
        assert_eq!(store.processing_status(), &ProcessingStatus::Idle);
        assert!(!store.initialize_session());
    }

    #[test]
    fn test_hydrate_leaves_session_local_fields() {
        let mut store = SessionStore::new();
        store.set_active_page("/upload");
        store.hydrate(PersistedSession {
            uploaded_files: vec![FileUpload::with_id("a", "a.pdf", 1)],
            processed_documents: vec![doc("d1")],
            ..PersistedSession::default()
        });
        assert_eq!(store.active_page(), "/upload");
        assert_eq!(store.uploaded_files().len(), 1);
        assert!(store.has_processed_documents());
        assert!(store.selected_document_ids().is_empty());
    }

    #[test]
    fn test_listeners_are_notified_until_unsubscribed() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut store = SessionStore::new();
        let counter = Arc::clone(&calls);
        let id = store.subscribe(Arc::new(move |_state: &SessionState| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        store.set_active_page("/a");
        store.clear_document_selection();
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        assert!(store.unsubscribe(id));
        store.set_active_page("/b");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!store.unsubscribe(id));
    }

    #[test]
    fn test_listener_sees_new_state() {
        let seen = Arc::new(std::sync::Mutex::new(String::new()));
        let mut store = SessionStore::new();
        let sink = Arc::clone(&seen);
        store.subscribe(Arc::new(move |state: &SessionState| {
            *sink.lock().unwrap() = state.active_page.clone();
        }));
        store.set_active_page("/review");
        assert_eq!(*seen.lock().unwrap(), "/review");
    }
}
