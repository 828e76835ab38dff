//! The [`ElementTree`] trait defining the host interface.
//!
//! Any host (a DOM bridge, a retained-mode widget tree, a headless test
//! double) implements this trait to let MiniBus read and drive it.

use std::sync::Arc;

use minibus_types::ElementId;

use crate::error::Result;

/// Callback invoked when a subscribed input event fires. Takes no arguments.
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// A live tree of uniquely named elements.
///
/// Mutating methods take `&self`; implementations are expected to use
/// interior mutability so the tree can be shared between the resolver, the
/// binding adapter and event listeners.
pub trait ElementTree: Send + Sync {
    /// Returns `true` if an element with this id exists.
    fn contains(&self, id: &ElementId) -> bool;

    /// Parent of `id`, or `None` for roots and unknown ids.
    fn parent(&self, id: &ElementId) -> Option<ElementId>;

    /// All element ids in document order.
    fn element_ids(&self) -> Vec<ElementId>;

    /// Raw `(name, value)` attributes currently declared on `id`.
    ///
    /// Returns an empty list for unknown ids.
    fn declared_attributes(&self, id: &ElementId) -> Vec<(String, String)>;

    /// Set a generic named attribute.
    fn set_attribute(&self, id: &ElementId, name: &str, value: &str) -> Result<()>;

    /// Set the element's visible text content.
    fn set_text(&self, id: &ElementId, text: &str) -> Result<()>;

    /// Replace the element's class tokens with `tokens`.
    fn set_class_list(&self, id: &ElementId, tokens: Vec<String>) -> Result<()>;

    /// Subscribe `listener` to events of `event_type` on `id`.
    fn add_listener(&self, id: &ElementId, event_type: &str, listener: Listener) -> Result<()>;
}
