//! Binding adapter for MiniBus.
//!
//! The adapter is the thin layer between the state store and the host tree.
//! It reads declared `data-*` attributes once at start-up to seed state,
//! writes committed values back through one [`AttributeHandler`] per
//! [`AttributeKind`](minibus_types::AttributeKind), and wires input events to
//! boolean toggles.

pub mod adapter;
pub mod error;
pub mod handlers;
pub mod toggle;

pub use adapter::BindingAdapter;
pub use error::{BindingError, Result};
pub use handlers::{
    class_tokens, AttributeHandler, ClassListHandler, GenericAttributeHandler, TextContentHandler,
};
pub use toggle::toggled;
