use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A document produced by the processing pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedDocument {
    /// Unique identifier
    pub id: String,
    /// Source file name
    pub file_name: String,
    /// Detected form type (e.g. "W-2", "1099-INT")
    pub document_type: String,
    /// Classification confidence in `[0, 1]`
    pub confidence: f32,
    /// Extracted key/value fields
    #[serde(default)]
    pub extracted_fields: BTreeMap<String, serde_json::Value>,
    /// Whether PII was found in the source
    #[serde(default)]
    pub pii_detected: bool,
    /// When processing finished
    pub processed_at: DateTime<Utc>,
}

impl ProcessedDocument {
    /// Creates a document with no extracted fields.
    pub fn new(
        id: impl Into<String>,
        file_name: impl Into<String>,
        document_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
            document_type: document_type.into(),
            confidence: 0.0,
            extracted_fields: BTreeMap::new(),
            pii_detected: false,
            processed_at: Utc::now(),
        }
    }

    /// Adds an extracted field.
    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extracted_fields.insert(key.into(), value);
        self
    }

    /// Sets the classification confidence.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }
}
