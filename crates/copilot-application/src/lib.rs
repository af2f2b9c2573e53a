//! Application layer for CPA Copilot.
//!
//! Wires the session store to its persistence adapter and shares it across
//! async tasks.

pub mod session_service;

pub use session_service::{SessionService, rehydrate};
