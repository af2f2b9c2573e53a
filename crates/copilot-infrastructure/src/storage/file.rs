//! File-backed key-value storage with atomic writes.

use std::fs::{self, File};
use std::io::{ErrorKind, Write as IoWrite};
use std::path::{Path, PathBuf};

use copilot_core::error::{CopilotError, Result};

use super::KeyValueStorage;

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a temporary file in the same directory, are synced, then
/// renamed over the target so a crash never leaves a half-written value.
#[derive(Debug, Clone)]
pub struct FileKeyValueStorage {
    dir: PathBuf,
}

impl FileKeyValueStorage {
    /// Creates a storage rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the stored values.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty()
            || key.starts_with('.')
            || key.contains(['/', '\\'])
        {
            return Err(CopilotError::config(format!(
                "Invalid storage key '{}'",
                key
            )));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }

    fn temp_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{}.json.tmp", key))
    }
}

impl KeyValueStorage for FileKeyValueStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CopilotError::io(format!(
                "Failed to read '{}': {}",
                path.display(),
                e
            ))),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| {
            CopilotError::io(format!(
                "Failed to create storage directory '{}': {}",
                self.dir.display(),
                e
            ))
        })?;

        let tmp_path = self.temp_path_for(key);
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(value.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &path).map_err(|e| {
            CopilotError::io(format!("Failed to replace '{}': {}", path.display(), e))
        })
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
