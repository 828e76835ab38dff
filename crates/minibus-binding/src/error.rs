use minibus_tree::TreeError;
use minibus_types::ElementId;

/// Errors produced while binding host elements to state.
#[derive(Debug, thiserror::Error)]
pub enum BindingError {
    /// The element to bind does not exist in the host tree.
    #[error("element with id \"{id}\" not found")]
    ElementNotFound { id: ElementId },

    /// The host tree refused the operation.
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),
}

pub type Result<T> = std::result::Result<T, BindingError>;
