//! Error types for state store operations.

use minibus_types::{ElementId, StateKey};
use thiserror::Error;

/// Errors returned by [`StateStore`](crate::StateStore) operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requester neither owns the key nor holds a grant for it.
    #[error("component {requester} is not allowed to modify {key}")]
    Forbidden { requester: ElementId, key: StateKey },

    /// A lock guarding store data was poisoned.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Failure reported by a fallible watcher.
///
/// Watcher failures are logged and counted; they never undo a commit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("watcher failed: {0}")]
pub struct WatcherError(pub String);

impl WatcherError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Convenience type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
