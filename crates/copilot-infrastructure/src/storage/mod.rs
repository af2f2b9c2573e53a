//! Durable key-value storage backends.
//!
//! The session record is stored as a single string value under a fixed key,
//! the same shape browser local storage offers.

mod file;
mod memory;

pub use file::FileKeyValueStorage;
pub use memory::MemoryKeyValueStorage;

use copilot_core::error::Result;

/// A string-to-string store with whole-value reads and writes.
pub trait KeyValueStorage: Send + Sync {
    /// Returns the value under `key`, or `None` if nothing is stored.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the value under `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;
}
