use thiserror::Error;

/// Errors produced when constructing or parsing MiniBus identifiers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid element id {id:?}: {reason}")]
    InvalidElementId { id: String, reason: String },

    #[error("invalid attribute name {name:?}: {reason}")]
    InvalidAttributeName { name: String, reason: String },

    #[error("invalid state key {key:?}: {reason}")]
    InvalidStateKey { key: String, reason: String },
}
