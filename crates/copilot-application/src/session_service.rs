//! Session service implementation.
//!
//! `SessionService` owns one `SessionStore` for the lifetime of the process.
//! Start-up follows a fixed order: rehydrate the persisted record, reconcile
//! stale state, then persist every later change.

use std::sync::Arc;

use copilot_core::config::CopilotConfig;
use copilot_core::error::{CopilotError, Result};
use copilot_core::processing::ProcessingConfig;
use copilot_core::session::{
    PersistedSession, SessionState, SessionStateRepository, SessionStore,
};
use copilot_infrastructure::{CopilotPaths, StoredSessionRepository};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Last record written to storage, shared with the auto-persist listener.
type LastSaved = Arc<std::sync::Mutex<Option<PersistedSession>>>;

/// Loads the persisted record, falling back to nothing on any failure.
///
/// Missing records are normal. Unreadable or unmigratable ones are logged
/// and ignored so the session starts from defaults.
pub fn rehydrate(repository: &dyn SessionStateRepository) -> Option<PersistedSession> {
    match repository.load() {
        Ok(Some(session)) => {
            debug!(
                uploads = session.uploaded_files.len(),
                documents = session.processed_documents.len(),
                "Rehydrated persisted session"
            );
            Some(session)
        }
        Ok(None) => None,
        Err(e) => {
            warn!(error = %e, "Discarding unreadable persisted session, starting from defaults");
            None
        }
    }
}

/// Shared, async-safe owner of the session store.
///
/// Clones share the same store, so a processing task can report progress
/// while request handlers read derived views.
///
/// Storage writes are synchronous and run inside `update` while the store
/// lock is held. Records are small and there is a single writer per storage
/// directory; callers on a latency-sensitive runtime should wrap mutations in
/// `tokio::task::spawn_blocking` or use an in-memory repository.
///
/// # Example
///
/// ```ignore
/// let service = SessionService::start(Arc::new(StoredSessionRepository::in_memory()), ProcessingConfig::default());
/// service.update(|store| store.set_active_page("/upload")).await;
/// let progress = service.read(|store| store.processing_progress()).await;
/// ```
#[derive(Clone)]
pub struct SessionService {
    store: Arc<Mutex<SessionStore>>,
    repository: Arc<dyn SessionStateRepository>,
    last_saved: LastSaved,
}

impl SessionService {
    /// Builds a service over the file storage described by `config`.
    pub fn open(config: &CopilotConfig) -> Result<Self> {
        let dir = CopilotPaths::storage_dir(config)?;
        info!(storage_dir = %dir.display(), key = %config.storage_key, "Opening session storage");
        let repository = StoredSessionRepository::in_dir(dir, config.storage_key.clone());
        Ok(Self::start(Arc::new(repository), config.processing))
    }

    /// Rehydrates, reconciles and starts auto-persisting a session.
    ///
    /// `defaults` is the processing configuration used when nothing is stored.
    pub fn start(repository: Arc<dyn SessionStateRepository>, defaults: ProcessingConfig) -> Self {
        let mut store = SessionStore::with_processing_config(defaults);

        let restored = rehydrate(repository.as_ref());
        if let Some(persisted) = restored.clone() {
            store.hydrate(persisted);
        }
        store.initialize_session();

        let last_saved: LastSaved = Arc::new(std::sync::Mutex::new(restored));
        store.subscribe(Self::auto_persist_listener(
            Arc::clone(&repository),
            Arc::clone(&last_saved),
        ));

        Self {
            store: Arc::new(Mutex::new(store)),
            repository,
            last_saved,
        }
    }

    fn auto_persist_listener(
        repository: Arc<dyn SessionStateRepository>,
        last_saved: LastSaved,
    ) -> copilot_core::session::StateListener {
        Arc::new(move |state: &SessionState| {
            let persisted = state.to_persisted();
            let Ok(mut last) = last_saved.lock() else {
                warn!("Auto-persist state lock poisoned, skipping save");
                return;
            };
            if last.as_ref() == Some(&persisted) {
                return;
            }
            match repository.save(&persisted) {
                Ok(()) => *last = Some(persisted),
                Err(e) => warn!(error = %e, "Failed to persist session"),
            }
        })
    }

    /// Runs `f` against the store for reading.
    pub async fn read<R>(&self, f: impl FnOnce(&SessionStore) -> R) -> R {
        let store = self.store.lock().await;
        f(&store)
    }

    /// Runs `f` against the store for mutation.
    ///
    /// Changes to persisted fields are saved on a best-effort basis before
    /// this returns: a failed save is only logged. Call [`Self::flush`] to
    /// get storage errors back.
    pub async fn update<R>(&self, f: impl FnOnce(&mut SessionStore) -> R) -> R {
        let mut store = self.store.lock().await;
        f(&mut store)
    }

    /// Returns a copy of the current state.
    pub async fn snapshot(&self) -> SessionState {
        self.store.lock().await.state().clone()
    }

    /// Saves the current persisted projection unless it is already stored,
    /// reporting any storage error.
    pub async fn flush(&self) -> Result<()> {
        let persisted = self.store.lock().await.snapshot_persisted();
        let mut last = self
            .last_saved
            .lock()
            .map_err(|_| CopilotError::internal("Auto-persist state lock poisoned"))?;
        if last.as_ref() == Some(&persisted) {
            return Ok(());
        }
        self.repository.save(&persisted)?;
        *last = Some(persisted);
        Ok(())
    }

    /// Clears the session and stores the cleared record.
    ///
    /// The processing configuration survives, in memory and on disk.
    pub async fn reset(&self) -> Result<()> {
        self.store.lock().await.clear_session();
        self.flush().await?;
        info!("Session reset");
        Ok(())
    }
}
