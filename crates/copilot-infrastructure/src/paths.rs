//! Path resolution for CPA Copilot files.
//!
//! Platform directories come from `AppPaths` in the version-migrate crate.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/cpa-copilot/            # Config directory (AppPaths default)
//! ├── config.toml                   # Application configuration
//! └── storage/                      # Key-value session storage
//!     └── cpa-copilot-storage.json
//! ```

use std::path::PathBuf;

use copilot_core::config::CopilotConfig;
use copilot_core::error::{CopilotError, Result};
use version_migrate::AppPaths;

/// Application name used for platform directories.
pub const APP_NAME: &str = "cpa-copilot";

pub struct CopilotPaths;

impl CopilotPaths {
    fn app_paths() -> AppPaths {
        AppPaths::new(APP_NAME)
    }

    /// Returns the configuration directory (e.g. `~/.config/cpa-copilot/`).
    pub fn config_dir() -> Result<PathBuf> {
        Self::app_paths()
            .config_dir()
            .map_err(|_| CopilotError::config("Cannot find home directory"))
    }

    /// Returns the path of `config.toml`.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the storage directory, honoring `storage_dir` from the config.
    pub fn storage_dir(config: &CopilotConfig) -> Result<PathBuf> {
        match &config.storage_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::config_dir()?.join("storage")),
        }
    }
}
