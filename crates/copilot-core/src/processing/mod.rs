//! Document processing domain models.
//!
//! The processing pipeline itself lives outside this workspace. These types
//! describe what it reports back into the session: the active batch, its
//! status and the documents it produced.

mod batch;
mod config;
mod document;

pub use batch::{ProcessingBatch, ProcessingStatus};
pub use config::{PiiMode, ProcessingConfig};
pub use document::ProcessedDocument;
