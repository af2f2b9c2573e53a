//! Session state models.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::processing::{ProcessedDocument, ProcessingConfig, ProcessingStatus};
use crate::upload::FileUpload;
use crate::workpaper::WorkpaperMetadata;

/// Page shown when a session starts or is cleared.
pub const DEFAULT_ACTIVE_PAGE: &str = "/";

/// Everything the client keeps about the current session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// Files selected for processing, in selection order.
    pub uploaded_files: Vec<FileUpload>,
    /// Options for the next processing run.
    pub processing_config: ProcessingConfig,
    /// Whether a run is active, and its batch.
    pub processing: ProcessingStatus,
    /// Results of the last run.
    pub processed_documents: Vec<ProcessedDocument>,
    /// Ids of documents the user has selected.
    pub selected_document_ids: BTreeSet<String>,
    /// The generated workpaper, if any.
    pub workpaper_metadata: Option<WorkpaperMetadata>,
    /// Route of the page the user is on.
    pub active_page: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::with_processing_config(ProcessingConfig::default())
    }
}

impl SessionState {
    /// Creates the initial state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the initial state with a specific processing configuration.
    pub fn with_processing_config(processing_config: ProcessingConfig) -> Self {
        Self {
            uploaded_files: Vec::new(),
            processing_config,
            processing: ProcessingStatus::Idle,
            processed_documents: Vec::new(),
            selected_document_ids: BTreeSet::new(),
            workpaper_metadata: None,
            active_page: DEFAULT_ACTIVE_PAGE.to_string(),
        }
    }

    /// Returns the persisted projection of this state.
    pub fn to_persisted(&self) -> PersistedSession {
        PersistedSession {
            uploaded_files: self.uploaded_files.clone(),
            processing_config: self.processing_config,
            processed_documents: self.processed_documents.clone(),
            workpaper_metadata: self.workpaper_metadata.clone(),
        }
    }
}

/// The part of [`SessionState`] that survives a restart.
///
/// Processing status, the active batch, the selection and the active page
/// are session-local and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    #[serde(default)]
    pub uploaded_files: Vec<FileUpload>,
    #[serde(default)]
    pub processing_config: ProcessingConfig,
    #[serde(default)]
    pub processed_documents: Vec<ProcessedDocument>,
    #[serde(default)]
    pub workpaper_metadata: Option<WorkpaperMetadata>,
}

impl PersistedSession {
    /// Whether this record holds nothing beyond defaults.
    pub fn is_empty(&self) -> bool {
        self == &PersistedSession::default()
    }
}
