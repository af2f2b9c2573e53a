//! Storage, configuration and path handling for CPA Copilot.

pub mod config_service;
pub mod dto;
pub mod paths;
pub mod session_repository;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::paths::CopilotPaths;
pub use crate::session_repository::StoredSessionRepository;
pub use crate::storage::{FileKeyValueStorage, KeyValueStorage, MemoryKeyValueStorage};
