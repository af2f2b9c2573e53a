//! Domain layer for CPA Copilot: session state, its derived views and the
//! persistence contract the infrastructure layer implements.

pub mod config;
pub mod error;
pub mod processing;
pub mod session;
pub mod upload;
pub mod workpaper;

// Re-export common error type
pub use error::CopilotError;
pub use session::{SessionState, SessionStore};
