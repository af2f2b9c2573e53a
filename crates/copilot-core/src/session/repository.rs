//! Session persistence contract.

use crate::error::Result;
use crate::session::state::PersistedSession;

/// Durable storage for the persisted part of a session.
///
/// Implementations serialize the whole record on every save; there are no
/// partial updates.
pub trait SessionStateRepository: Send + Sync {
    /// Loads the stored record. `Ok(None)` means nothing has been stored yet.
    fn load(&self) -> Result<Option<PersistedSession>>;

    /// Replaces the stored record.
    fn save(&self, session: &PersistedSession) -> Result<()>;

    /// Removes the stored record.
    fn clear(&self) -> Result<()>;
}
