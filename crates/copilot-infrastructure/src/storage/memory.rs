use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use copilot_core::error::{CopilotError, Result};

use super::KeyValueStorage;

/// In-memory storage. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryKeyValueStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.items
            .lock()
            .map_err(|e| CopilotError::internal(format!("Storage lock poisoned: {}", e)))
    }
}

impl KeyValueStorage for MemoryKeyValueStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
