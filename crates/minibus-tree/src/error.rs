//! Error types for element tree operations.

use minibus_types::ElementId;
use thiserror::Error;

/// Errors that can occur while reading or writing the host tree.
#[derive(Debug, Error)]
pub enum TreeError {
    /// No element with this id exists in the tree.
    #[error("element not found: {id}")]
    ElementNotFound { id: ElementId },

    /// An element with this id is already present.
    #[error("element already exists: {id}")]
    DuplicateElement { id: ElementId },

    /// A lock guarding tree data was poisoned by a panicking thread.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Convenience type alias for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;
