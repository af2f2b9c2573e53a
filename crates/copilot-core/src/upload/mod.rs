//! File upload domain models.
//!
//! Uploads are created when the user selects files and are owned by the
//! session store. Only their status changes after creation.

mod model;

pub use model::{FileUpload, UploadStatus};
