//! Read-only projections over [`SessionState`].
//!
//! Every function here is pure; views call them on read instead of storing
//! the results.

use crate::processing::ProcessedDocument;
use crate::session::state::SessionState;
use crate::upload::{FileUpload, UploadStatus};

/// Whether any files are selected for upload.
pub fn has_uploaded_files(state: &SessionState) -> bool {
    !state.uploaded_files.is_empty()
}

/// Whether the last run produced any documents.
pub fn has_processed_documents(state: &SessionState) -> bool {
    !state.processed_documents.is_empty()
}

/// Selected documents, in the order of `processed_documents`.
///
/// Selected ids without a matching document are skipped.
pub fn selected_documents(state: &SessionState) -> Vec<&ProcessedDocument> {
    state
        .processed_documents
        .iter()
        .filter(|doc| state.selected_document_ids.contains(&doc.id))
        .collect()
}

/// Progress of the current or last batch as a percentage in `[0, 100]`.
///
/// Returns `0.0` when no batch was reported or the batch is empty.
pub fn processing_progress(state: &SessionState) -> f64 {
    state
        .processing
        .batch()
        .map(|batch| batch.progress_percent())
        .unwrap_or(0.0)
}

/// Total size of all uploads in bytes.
pub fn uploaded_bytes(state: &SessionState) -> u64 {
    state.uploaded_files.iter().map(|f| f.size).sum()
}

/// Uploads whose transfer failed.
pub fn failed_uploads(state: &SessionState) -> Vec<&FileUpload> {
    state
        .uploaded_files
        .iter()
        .filter(|f| f.status == UploadStatus::Failed)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::{ProcessingBatch, ProcessingStatus};

    fn doc(id: &str) -> ProcessedDocument {
        ProcessedDocument::new(id, format!("{id}.pdf"), "W-2")
    }

    #[test]
    fn test_selected_documents_keeps_document_order() {
        let mut state = SessionState::new();
        state.processed_documents = vec![doc("a"), doc("b"), doc("c")];
        state.selected_document_ids.insert("c".to_string());
        state.selected_document_ids.insert("a".to_string());
        state.selected_document_ids.insert("ghost".to_string());

        let ids: Vec<&str> = selected_documents(&state)
            .iter()
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_processing_progress() {
        let mut state = SessionState::new();
        assert_eq!(processing_progress(&state), 0.0);

        state.processing = ProcessingStatus::Running {
            batch: Some(ProcessingBatch::new(4, 2)),
        };
        assert_eq!(processing_progress(&state), 50.0);

        state.processing = ProcessingStatus::Running {
            batch: Some(ProcessingBatch::new(0, 0)),
        };
        let progress = processing_progress(&state);
        assert!(progress.is_finite());
        assert_eq!(progress, 0.0);
    }

    #[test]
    fn test_upload_aggregates() {
        let mut state = SessionState::new();
        assert!(!has_uploaded_files(&state));
        state.uploaded_files = vec![
            FileUpload::with_id("1", "a.pdf", 100),
            FileUpload::with_id("2", "b.pdf", 50).with_status(UploadStatus::Failed),
        ];
        assert!(has_uploaded_files(&state));
        assert_eq!(uploaded_bytes(&state), 150);
        assert_eq!(failed_uploads(&state).len(), 1);
        assert_eq!(failed_uploads(&state)[0].id, "2");
    }
}
