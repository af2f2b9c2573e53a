//! File upload domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a single upload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    /// Selected by the user, not yet sent.
    #[default]
    Pending,
    /// Transfer in progress.
    Uploading,
    /// Transfer finished.
    Uploaded,
    /// Transfer failed.
    Failed,
}

impl UploadStatus {
    /// Returns the lowercase wire name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Pending => "pending",
            UploadStatus::Uploading => "uploading",
            UploadStatus::Uploaded => "uploaded",
            UploadStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file the user selected for processing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileUpload {
    /// Unique identifier (UUID format)
    pub id: String,
    /// Original filename
    pub name: String,
    /// File size in bytes
    pub size: u64,
    /// Current upload status
    pub status: UploadStatus,
    /// When the file was selected
    pub uploaded_at: DateTime<Utc>,
}

impl FileUpload {
    /// Creates a pending upload with a fresh UUID.
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), name, size)
    }

    /// Creates a pending upload with a caller-supplied id.
    pub fn with_id(id: impl Into<String>, name: impl Into<String>, size: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size,
            status: UploadStatus::Pending,
            uploaded_at: Utc::now(),
        }
    }

    /// Returns a copy of this upload with a different status.
    pub fn with_status(mut self, status: UploadStatus) -> Self {
        self.status = status;
        self
    }
}
