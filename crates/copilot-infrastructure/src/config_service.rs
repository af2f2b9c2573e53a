//! Loads `CopilotConfig` from TOML.

use std::fs;
use std::path::Path;

use copilot_core::config::CopilotConfig;
use copilot_core::error::{CopilotError, Result};
use tracing::debug;

use crate::paths::CopilotPaths;

pub struct ConfigService;

impl ConfigService {
    /// Loads the config from the default location.
    pub fn load_default() -> Result<CopilotConfig> {
        Self::load_from(&CopilotPaths::config_file()?)
    }

    /// Loads the config from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<CopilotConfig> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(CopilotConfig::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            CopilotError::io(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            CopilotError::config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
