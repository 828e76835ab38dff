//! Foundation types for MiniBus.
//!
//! MiniBus is a permission-gated state bus for a tree of named UI elements.
//! Every other MiniBus crate depends on `minibus-types`.
//!
//! # Key Types
//!
//! - [`ElementId`] — Unique identifier of an element in the host tree
//! - [`AttributeName`] — Name of a declared attribute (e.g. `data-class`)
//! - [`StateKey`] — `owner.attribute` composite key of one state entry
//! - [`AttributeKind`] — Closed set of attribute kinds with special apply behavior

pub mod attribute;
pub mod error;
pub mod key;

pub use attribute::{AttributeKind, AttributeName};
pub use error::TypeError;
pub use key::{ElementId, StateKey};

/// Separator between the owner element and the attribute in a serialized key.
pub const KEY_SEPARATOR: char = '.';

/// Prefix that marks an element attribute as declared state.
pub const DATA_ATTRIBUTE_PREFIX: &str = "data-";

/// Attribute whose value becomes the element's visible text.
pub const TEXT_ATTRIBUTE: &str = "data-text";

/// Attribute whose value replaces the element's class tokens.
pub const CLASS_ATTRIBUTE: &str = "data-class";

/// Literal "on" value used by toggle bindings.
pub const TOGGLE_TRUE: &str = "true";

/// Literal "off" value used by toggle bindings. Absent state reads as this.
pub const TOGGLE_FALSE: &str = "false";
