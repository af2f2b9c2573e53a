//! Session state: the store, its derived views and its persistence contract.

pub mod repository;
pub mod state;
pub mod store;
pub mod view;

pub use repository::SessionStateRepository;
pub use state::{DEFAULT_ACTIVE_PAGE, PersistedSession, SessionState};
pub use store::{SessionStore, StateListener, SubscriptionId};
