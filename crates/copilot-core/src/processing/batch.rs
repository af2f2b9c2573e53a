use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One in-flight processing run.
///
/// `processed_documents` never exceeds `total_documents`; both the
/// constructor and [`ProcessingBatch::record_progress`] clamp to the total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingBatch {
    /// Batch identifier (UUID format)
    pub id: String,
    /// Number of documents in the run
    pub total_documents: u32,
    /// Number of documents finished so far
    pub processed_documents: u32,
    /// When the run started
    pub started_at: DateTime<Utc>,
}

impl ProcessingBatch {
    /// Creates a batch with the given counts; `processed` is clamped to `total`.
    pub fn new(total_documents: u32, processed_documents: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            total_documents,
            processed_documents: processed_documents.min(total_documents),
            started_at: Utc::now(),
        }
    }

    /// Updates the processed count, clamped to the total.
    pub fn record_progress(&mut self, processed_documents: u32) {
        self.processed_documents = processed_documents.min(self.total_documents);
    }

    /// Completion percentage in `[0, 100]`. An empty batch reports `0`.
    pub fn progress_percent(&self) -> f64 {
        if self.total_documents == 0 {
            return 0.0;
        }
        100.0 * f64::from(self.processed_documents) / f64::from(self.total_documents)
    }

    /// Whether every document in the batch has been processed.
    pub fn is_finished(&self) -> bool {
        self.processed_documents >= self.total_documents
    }
}

/// Whether a processing run is active.
///
/// A single tagged value replaces the separate "is processing" flag and
/// "current batch" field, which could disagree with each other.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProcessingStatus {
    /// Nothing has run in this session.
    #[default]
    Idle,
    /// A run is active. The batch is absent until the pipeline reports counts.
    Running { batch: Option<ProcessingBatch> },
    /// The last run ended. Keeps the final batch counts when the run ended
    /// through `set_is_processing(false)`.
    Completed { batch: Option<ProcessingBatch> },
}

impl ProcessingStatus {
    /// Whether a run is active.
    pub fn is_running(&self) -> bool {
        matches!(self, ProcessingStatus::Running { .. })
    }

    /// The batch of the current or last run, if one was reported.
    pub fn batch(&self) -> Option<&ProcessingBatch> {
        match self {
            ProcessingStatus::Running { batch } | ProcessingStatus::Completed { batch } => {
                batch.as_ref()
            }
            ProcessingStatus::Idle => None,
        }
    }

    pub(crate) fn batch_mut(&mut self) -> Option<&mut ProcessingBatch> {
        match self {
            ProcessingStatus::Running { batch } => batch.as_mut(),
            _ => None,
        }
    }

    /// Short label used in logs and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            ProcessingStatus::Idle => "idle",
            ProcessingStatus::Running { .. } => "running",
            ProcessingStatus::Completed { .. } => "completed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_processed() {
        let batch = ProcessingBatch::new(3, 10);
        assert_eq!(batch.processed_documents, 3);
        assert!(batch.is_finished());
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(ProcessingBatch::new(4, 2).progress_percent(), 50.0);
        assert_eq!(ProcessingBatch::new(0, 0).progress_percent(), 0.0);
        assert_eq!(ProcessingBatch::new(3, 3).progress_percent(), 100.0);
    }

    #[test]
    fn test_record_progress_clamps() {
        let mut batch = ProcessingBatch::new(5, 0);
        batch.record_progress(7);
        assert_eq!(batch.processed_documents, 5);
    }

    #[test]
    fn test_status_batch_accessor() {
        assert!(ProcessingStatus::Idle.batch().is_none());
        assert!(ProcessingStatus::Running { batch: None }.is_running());
        let running = ProcessingStatus::Running {
            batch: Some(ProcessingBatch::new(2, 1)),
        };
        assert_eq!(running.batch().map(|b| b.total_documents), Some(2));
        assert!(!ProcessingStatus::Completed { batch: None }.is_running());

        let finished = ProcessingStatus::Completed {
            batch: Some(ProcessingBatch::new(3, 3)),
        };
        assert_eq!(finished.batch().map(|b| b.progress_percent()), Some(100.0));
    }
}
