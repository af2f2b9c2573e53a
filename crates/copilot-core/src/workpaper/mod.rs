//! Workpaper output metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Describes the generated workpaper artifact. At most one exists per session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkpaperMetadata {
    /// Workpaper identifier
    pub workpaper_id: String,
    /// Client the workpaper was prepared for
    pub client_name: String,
    /// Tax year covered
    pub tax_year: u16,
    /// Preparer name or initials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparer: Option<String>,
    /// Number of source documents included
    pub document_count: u32,
    /// When the workpaper was generated
    pub created_at: DateTime<Utc>,
}
