use thiserror::Error;

#[derive(Debug, Error)]
pub enum BusError {
    #[error("invalid identifier: {0}")]
    Type(#[from] minibus_types::TypeError),

    #[error("permission error: {0}")]
    Permission(#[from] minibus_permissions::PermissionError),

    #[error("store error: {0}")]
    Store(#[from] minibus_store::StoreError),

    #[error("binding error: {0}")]
    Binding(#[from] minibus_binding::BindingError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl BusError {
    /// Returns `true` if a change request was rejected for lack of permission.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Store(minibus_store::StoreError::Forbidden { .. }))
    }

    /// Returns `true` if a grant was refused by the hierarchy gate.
    pub fn is_out_of_hierarchy(&self) -> bool {
        matches!(
            self,
            Self::Permission(minibus_permissions::PermissionError::OutOfHierarchy { .. })
        )
    }
}

pub type BusResult<T> = Result<T, BusError>;
