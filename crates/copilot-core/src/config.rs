use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::processing::ProcessingConfig;

/// Storage key (namespace) of the persisted session record.
pub const DEFAULT_STORAGE_KEY: &str = "cpa-copilot-storage";

/// Application configuration, read from `config.toml`.
///
/// Every field is optional in the file; missing fields take their defaults.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CopilotConfig {
    /// Directory holding persisted session records. Defaults to
    /// `<config_dir>/storage` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
    /// Key the session record is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Processing options a fresh session starts with.
    #[serde(default)]
    pub processing: ProcessingConfig,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for CopilotConfig {
    fn default() -> Self {
        Self {
            storage_dir: None,
            storage_key: default_storage_key(),
            processing: ProcessingConfig::default(),
        }
    }
}
