//! Versioned data-transfer objects for persisted records.
//!
//! Domain types never hit storage directly: each record is written through a
//! versioned DTO so that future schema changes migrate instead of breaking
//! rehydration.

pub mod persisted_session;

pub use persisted_session::{
    PERSISTED_SESSION_ENTITY, PersistedSessionDTO, create_persisted_session_migrator,
};
