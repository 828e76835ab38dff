//! Per-kind handlers that write a committed value onto a host element.

use minibus_tree::{ElementTree, Result};
use minibus_types::{AttributeName, ElementId};

/// Writes one kind of attribute back onto the host tree.
///
/// Handlers are stored as `Arc<dyn AttributeHandler>`, one per
/// [`AttributeKind`](minibus_types::AttributeKind), so a host can replace
/// how a kind is rendered without touching the store.
pub trait AttributeHandler: Send + Sync {
    /// Human-readable handler name, used in logs.
    fn name(&self) -> &str;

    fn apply(
        &self,
        tree: &dyn ElementTree,
        element: &ElementId,
        attribute: &AttributeName,
        value: &str,
    ) -> Result<()>;
}

/// Sets the element's visible text.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextContentHandler;

impl AttributeHandler for TextContentHandler {
    fn name(&self) -> &str {
        "text-content"
    }

    fn apply(
        &self,
        tree: &dyn ElementTree,
        element: &ElementId,
        _attribute: &AttributeName,
        value: &str,
    ) -> Result<()> {
        tree.set_text(element, value)
    }
}

/// Replaces the element's class tokens with the whitespace-separated tokens
/// of the value.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClassListHandler;

impl AttributeHandler for ClassListHandler {
    fn name(&self) -> &str {
        "class-list"
    }

    fn apply(
        &self,
        tree: &dyn ElementTree,
        element: &ElementId,
        _attribute: &AttributeName,
        value: &str,
    ) -> Result<()> {
        tree.set_class_list(element, class_tokens(value))
    }
}

/// Sets the attribute itself, under its own name.
#[derive(Clone, Copy, Debug, Default)]
pub struct GenericAttributeHandler;

impl AttributeHandler for GenericAttributeHandler {
    fn name(&self) -> &str {
        "generic"
    }

    fn apply(
        &self,
        tree: &dyn ElementTree,
        element: &ElementId,
        attribute: &AttributeName,
        value: &str,
    ) -> Result<()> {
        tree.set_attribute(element, attribute.as_str(), value)
    }
}

/// Split a class value on whitespace, dropping empty tokens.
pub fn class_tokens(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}
