//! Key-value backed implementation of `SessionStateRepository`.

use copilot_core::config::DEFAULT_STORAGE_KEY;
use copilot_core::error::{CopilotError, Result};
use copilot_core::session::{PersistedSession, SessionStateRepository};
use tracing::debug;

use crate::dto::{PERSISTED_SESSION_ENTITY, create_persisted_session_migrator};
use crate::storage::{FileKeyValueStorage, KeyValueStorage, MemoryKeyValueStorage};

/// Persists the session record as versioned JSON under one storage key.
///
/// # Example
///
/// ```ignore
/// use copilot_infrastructure::{FileKeyValueStorage, StoredSessionRepository};
///
/// let repo = StoredSessionRepository::new(FileKeyValueStorage::new(dir));
/// repo.save(&store.snapshot_persisted())?;
/// ```
pub struct StoredSessionRepository<S> {
    storage: S,
    key: String,
    migrator: version_migrate::Migrator,
}

impl<S: KeyValueStorage> StoredSessionRepository<S> {
    /// Creates a repository using the default `cpa-copilot-storage` key.
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_STORAGE_KEY)
    }

    /// Creates a repository using a custom storage key.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            migrator: create_persisted_session_migrator(),
        }
    }

    /// Storage key of the session record.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

impl StoredSessionRepository<MemoryKeyValueStorage> {
    /// Creates a repository over a fresh in-memory backend.
    pub fn in_memory() -> Self {
        Self::new(MemoryKeyValueStorage::new())
    }
}

impl StoredSessionRepository<FileKeyValueStorage> {
    /// Creates a repository storing its record under `dir`.
    pub fn in_dir(dir: impl Into<std::path::PathBuf>, key: impl Into<String>) -> Self {
        Self::with_key(FileKeyValueStorage::new(dir), key)
    }
}

impl<S: KeyValueStorage> SessionStateRepository for StoredSessionRepository<S> {
    fn load(&self) -> Result<Option<PersistedSession>> {
        let Some(raw) = self.storage.get_item(&self.key)? else {
            return Ok(None);
        };

        let json_value: serde_json::Value = serde_json::from_str(&raw).map_err(|e| {
            CopilotError::json(format!("Failed to parse stored session '{}': {}", self.key, e))
        })?;

        let session: PersistedSession = self
            .migrator
            .load_flat_from(PERSISTED_SESSION_ENTITY, json_value)
            .map_err(|e| {
                CopilotError::migration(format!(
                    "Failed to migrate stored session '{}': {}",
                    self.key, e
                ))
            })?;

        Ok(Some(session))
    }

    fn save(&self, session: &PersistedSession) -> Result<()> {
        let serialized = self
            .migrator
            .save_domain_flat(PERSISTED_SESSION_ENTITY, session.clone())
            .map_err(|e| CopilotError::json(format!("Failed to serialize session: {}", e)))?;

        self.storage.set_item(&self.key, &serialized)?;
        debug!(
            key = %self.key,
            uploads = session.uploaded_files.len(),
            documents = session.processed_documents.len(),
            "Persisted session"
        );
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.storage.remove_item(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copilot_core::processing::{PiiMode, ProcessedDocument, ProcessingConfig};
    use copilot_core::upload::FileUpload;

    fn sample() -> PersistedSession {
        PersistedSession {
            uploaded_files: vec![FileUpload::with_id("up-1", "w2.pdf", 2048)],
            processing_config: ProcessingConfig {
                enable_azure: true,
                enable_gemini: false,
                pii_mode: PiiMode::None,
            },
            processed_documents: vec![
                ProcessedDocument::new("doc-1", "w2.pdf", "W-2")
                    .with_confidence(0.5)
                    .with_field("wages", serde_json::json!(52000.25)),
            ],
            workpaper_metadata: None,
        }
    }

    #[test]
    fn test_load_empty_storage() {
        let repo = StoredSessionRepository::in_memory();
        assert_eq!(repo.load().unwrap(), None);
    }

    #[test]
    fn test_save_then_load() {
        let repo = StoredSessionRepository::in_memory();
        let session = sample();
        repo.save(&session).unwrap();
        assert_eq!(repo.load().unwrap(), Some(session));
    }

    #[test]
    fn test_uses_namespace_key() {
        let repo = StoredSessionRepository::in_memory();
        repo.save(&sample()).unwrap();
        let raw = repo.storage().get_item("cpa-copilot-storage").unwrap();
        assert!(raw.unwrap().contains("\"version\":\"1.0.0\""));
    }

    #[test]
    fn test_garbage_is_an_error() {
        let repo = StoredSessionRepository::in_memory();
        repo.storage().set_item(repo.key(), "not json").unwrap();
        assert!(repo.load().unwrap_err().is_serialization());
    }

    #[test]
    fn test_unversioned_record_is_a_migration_error() {
        let repo = StoredSessionRepository::in_memory();
        repo.storage()
            .set_item(repo.key(), r#"{"uploadedFiles":[]}"#)
            .unwrap();
        let err = repo.load().unwrap_err();
        assert!(matches!(err, CopilotError::Migration(_)), "got {err:?}");
    }

    #[test]
    fn test_clear_removes_record() {
        let repo = StoredSessionRepository::in_memory();
        repo.save(&sample()).unwrap();
        repo.clear().unwrap();
        assert_eq!(repo.load().unwrap(), None);
    }
}
