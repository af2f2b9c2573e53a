//! Error types for CPA Copilot.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the whole workspace.
///
/// Session store mutations never fail; this type covers the storage,
/// configuration and migration edges around the store.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum CopilotError {
    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", "TOML"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Persisted record could not be migrated to the current schema
    #[error("Migration error: {0}")]
    Migration(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CopilotError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a JSON serialization error
    pub fn json(message: impl Into<String>) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Migration error
    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an IO error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for CopilotError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for CopilotError {
    fn from(err: serde_json::Error) -> Self {
        Self::json(err.to_string())
    }
}

/// A type alias for `Result<T, CopilotError>`.
pub type Result<T> = std::result::Result<T, CopilotError>;
