use minibus_types::{ElementId, StateKey};

/// Errors produced by the permission registry.
#[derive(Debug, thiserror::Error)]
pub enum PermissionError {
    /// The grantee is not an ancestor-or-self of the key's owner.
    #[error("permission denied: {grantee} cannot modify {key} as it is not within its hierarchy")]
    OutOfHierarchy { grantee: ElementId, key: StateKey },

    /// The grant table lock was poisoned.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Convenience alias used throughout the permissions crate.
pub type Result<T> = std::result::Result<T, PermissionError>;
