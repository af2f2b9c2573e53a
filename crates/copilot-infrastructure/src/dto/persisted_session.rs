//! PersistedSession DTOs and migrations
//!
//! ## Version History
//! - **1.0.0**: uploads, processing config, processed documents and workpaper metadata

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

use copilot_core::processing::{PiiMode, ProcessedDocument, ProcessingConfig};
use copilot_core::session::PersistedSession;
use copilot_core::upload::{FileUpload, UploadStatus};
use copilot_core::workpaper::WorkpaperMetadata;

/// Entity name the migration path is registered under.
pub const PERSISTED_SESSION_ENTITY: &str = "persisted_session";

// ============================================================================
// Nested DTOs
// ============================================================================

/// Upload status DTO matching domain model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatusDTO {
    Pending,
    Uploading,
    Uploaded,
    Failed,
}

impl From<UploadStatusDTO> for UploadStatus {
    fn from(dto: UploadStatusDTO) -> Self {
        match dto {
            UploadStatusDTO::Pending => UploadStatus::Pending,
            UploadStatusDTO::Uploading => UploadStatus::Uploading,
            UploadStatusDTO::Uploaded => UploadStatus::Uploaded,
            UploadStatusDTO::Failed => UploadStatus::Failed,
        }
    }
}

impl From<UploadStatus> for UploadStatusDTO {
    fn from(status: UploadStatus) -> Self {
        match status {
            UploadStatus::Pending => UploadStatusDTO::Pending,
            UploadStatus::Uploading => UploadStatusDTO::Uploading,
            UploadStatus::Uploaded => UploadStatusDTO::Uploaded,
            UploadStatus::Failed => UploadStatusDTO::Failed,
        }
    }
}

/// PII mode DTO matching domain model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiModeDTO {
    Mask,
    Redact,
    None,
}

impl From<PiiModeDTO> for PiiMode {
    fn from(dto: PiiModeDTO) -> Self {
        match dto {
            PiiModeDTO::Mask => PiiMode::Mask,
            PiiModeDTO::Redact => PiiMode::Redact,
            PiiModeDTO::None => PiiMode::None,
        }
    }
}

impl From<PiiMode> for PiiModeDTO {
    fn from(mode: PiiMode) -> Self {
        match mode {
            PiiMode::Mask => PiiModeDTO::Mask,
            PiiMode::Redact => PiiModeDTO::Redact,
            PiiMode::None => PiiModeDTO::None,
        }
    }
}

/// File upload DTO V1.0.0
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadV1_0_0 {
    pub id: String,
    pub name: String,
    pub size: u64,
    pub status: UploadStatusDTO,
    pub uploaded_at: DateTime<Utc>,
}

impl From<FileUploadV1_0_0> for FileUpload {
    fn from(dto: FileUploadV1_0_0) -> Self {
        FileUpload {
            id: dto.id,
            name: dto.name,
            size: dto.size,
            status: dto.status.into(),
            uploaded_at: dto.uploaded_at,
        }
    }
}

impl From<FileUpload> for FileUploadV1_0_0 {
    fn from(upload: FileUpload) -> Self {
        FileUploadV1_0_0 {
            id: upload.id,
            name: upload.name,
            size: upload.size,
            status: upload.status.into(),
            uploaded_at: upload.uploaded_at,
        }
    }
}

/// Processing config DTO V1.0.0
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingConfigV1_0_0 {
    pub enable_azure: bool,
    pub enable_gemini: bool,
    pub pii_mode: PiiModeDTO,
}

impl Default for ProcessingConfigV1_0_0 {
    fn default() -> Self {
        ProcessingConfig::default().into()
    }
}

impl From<ProcessingConfigV1_0_0> for ProcessingConfig {
    fn from(dto: ProcessingConfigV1_0_0) -> Self {
        ProcessingConfig {
            enable_azure: dto.enable_azure,
            enable_gemini: dto.enable_gemini,
            pii_mode: dto.pii_mode.into(),
        }
    }
}

impl From<ProcessingConfig> for ProcessingConfigV1_0_0 {
    fn from(config: ProcessingConfig) -> Self {
        ProcessingConfigV1_0_0 {
            enable_azure: config.enable_azure,
            enable_gemini: config.enable_gemini,
            pii_mode: config.pii_mode.into(),
        }
    }
}

/// Processed document DTO V1.0.0
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedDocumentV1_0_0 {
    pub id: String,
    pub file_name: String,
    pub document_type: String,
    pub confidence: f32,
    #[serde(default)]
    pub extracted_fields: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub pii_detected: bool,
    pub processed_at: DateTime<Utc>,
}

impl From<ProcessedDocumentV1_0_0> for ProcessedDocument {
    fn from(dto: ProcessedDocumentV1_0_0) -> Self {
        ProcessedDocument {
            id: dto.id,
            file_name: dto.file_name,
            document_type: dto.document_type,
            confidence: dto.confidence,
            extracted_fields: dto.extracted_fields,
            pii_detected: dto.pii_detected,
            processed_at: dto.processed_at,
        }
    }
}

impl From<ProcessedDocument> for ProcessedDocumentV1_0_0 {
    fn from(doc: ProcessedDocument) -> Self {
        ProcessedDocumentV1_0_0 {
            id: doc.id,
            file_name: doc.file_name,
            document_type: doc.document_type,
            confidence: doc.confidence,
            extracted_fields: doc.extracted_fields,
            pii_detected: doc.pii_detected,
            processed_at: doc.processed_at,
        }
    }
}

/// Workpaper metadata DTO V1.0.0
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkpaperMetadataV1_0_0 {
    pub workpaper_id: String,
    pub client_name: String,
    pub tax_year: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparer: Option<String>,
    pub document_count: u32,
    pub created_at: DateTime<Utc>,
}

impl From<WorkpaperMetadataV1_0_0> for WorkpaperMetadata {
    fn from(dto: WorkpaperMetadataV1_0_0) -> Self {
        WorkpaperMetadata {
            workpaper_id: dto.workpaper_id,
            client_name: dto.client_name,
            tax_year: dto.tax_year,
            preparer: dto.preparer,
            document_count: dto.document_count,
            created_at: dto.created_at,
        }
    }
}

impl From<WorkpaperMetadata> for WorkpaperMetadataV1_0_0 {
    fn from(meta: WorkpaperMetadata) -> Self {
        WorkpaperMetadataV1_0_0 {
            workpaper_id: meta.workpaper_id,
            client_name: meta.client_name,
            tax_year: meta.tax_year,
            preparer: meta.preparer,
            document_count: meta.document_count,
            created_at: meta.created_at,
        }
    }
}

// ============================================================================
// PersistedSession DTOs
// ============================================================================

/// Persisted session record V1.0.0 (initial version).
///
/// Only the four long-lived fields are stored; processing status, the
/// active batch and the document selection never reach storage.
#[derive(Debug, Clone, Serialize, Deserialize, Versioned, Default)]
#[versioned(version = "1.0.0")]
#[serde(rename_all = "camelCase")]
pub struct PersistedSessionV1_0_0 {
    #[serde(default)]
    pub uploaded_files: Vec<FileUploadV1_0_0>,
    #[serde(default)]
    pub processing_config: ProcessingConfigV1_0_0,
    #[serde(default)]
    pub processed_documents: Vec<ProcessedDocumentV1_0_0>,
    #[serde(default)]
    pub workpaper_metadata: Option<WorkpaperMetadataV1_0_0>,
}

/// Type alias for the latest PersistedSession version.
pub type PersistedSessionDTO = PersistedSessionV1_0_0;

/// Convert PersistedSessionV1_0_0 DTO to domain model
impl IntoDomain<PersistedSession> for PersistedSessionV1_0_0 {
    fn into_domain(self) -> PersistedSession {
        PersistedSession {
            uploaded_files: self.uploaded_files.into_iter().map(Into::into).collect(),
            processing_config: self.processing_config.into(),
            processed_documents: self.processed_documents.into_iter().map(Into::into).collect(),
            workpaper_metadata: self.workpaper_metadata.map(Into::into),
        }
    }
}

/// Convert domain model to PersistedSessionV1_0_0 DTO for persistence
impl FromDomain<PersistedSession> for PersistedSessionV1_0_0 {
    fn from_domain(session: PersistedSession) -> Self {
        PersistedSessionV1_0_0 {
            uploaded_files: session.uploaded_files.into_iter().map(Into::into).collect(),
            processing_config: session.processing_config.into(),
            processed_documents: session
                .processed_documents
                .into_iter()
                .map(Into::into)
                .collect(),
            workpaper_metadata: session.workpaper_metadata.map(Into::into),
        }
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates and configures a Migrator instance for PersistedSession records.
///
/// # Migration Path
///
/// - V1.0.0 → PersistedSession: Converts DTO to domain model
///
/// # Example
///
/// ```ignore
/// let migrator = create_persisted_session_migrator();
/// let session: PersistedSession = migrator.load_flat_from("persisted_session", json_value)?;
/// ```
pub fn create_persisted_session_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    let session_path = version_migrate::Migrator::define(PERSISTED_SESSION_ENTITY)
        .from::<PersistedSessionV1_0_0>()
        .into_with_save::<PersistedSession>();

    migrator
        .register(session_path)
        .expect("Failed to register persisted_session migration path");

    migrator
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persisted_session_migrator_creation() {
        let _migrator = create_persisted_session_migrator();
    }

    #[test]
    fn test_load_v1_0_0_record() {
        let migrator = create_persisted_session_migrator();
        let json = serde_json::json!({
            "version": "1.0.0",
            "uploadedFiles": [{
                "id": "up-1",
                "name": "w2.pdf",
                "size": 2048,
                "status": "uploaded",
                "uploadedAt": "2024-02-01T10:00:00Z"
            }],
            "processingConfig": {
                "enableAzure": false,
                "enableGemini": true,
                "piiMode": "redact"
            },
            "processedDocuments": [],
            "workpaperMetadata": null
        });

        let result: Result<PersistedSession, _> =
            migrator.load_flat_from(PERSISTED_SESSION_ENTITY, json);
        assert!(result.is_ok(), "Migration failed: {:?}", result.err());
        let session = result.unwrap();
        assert_eq!(session.uploaded_files.len(), 1);
        assert_eq!(session.uploaded_files[0].status, UploadStatus::Uploaded);
        assert!(!session.processing_config.enable_azure);
        assert_eq!(session.processing_config.pii_mode, PiiMode::Redact);
        assert!(session.workpaper_metadata.is_none());
    }

    #[test]
    fn test_save_embeds_version() {
        let migrator = create_persisted_session_migrator();
        let session = PersistedSession {
            uploaded_files: vec![FileUpload::with_id("up-9", "1099.pdf", 10)],
            ..PersistedSession::default()
        };

        let json_str = migrator
            .save_domain_flat(PERSISTED_SESSION_ENTITY, session)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json_str).unwrap();
        assert_eq!(value["version"], "1.0.0");
        assert_eq!(value["uploadedFiles"][0]["id"], "up-9");
        assert!(value.get("currentBatch").is_none());
        assert!(value.get("isProcessing").is_none());
        assert!(value.get("selectedDocumentIds").is_none());
    }

    #[test]
    fn test_unversioned_record_is_rejected() {
        let migrator = create_persisted_session_migrator();
        let json = serde_json::json!({
            "uploadedFiles": [],
            "processedDocuments": []
        });
        let result: Result<PersistedSession, _> =
            migrator.load_flat_from(PERSISTED_SESSION_ENTITY, json);
        assert!(result.is_err());
    }
}
