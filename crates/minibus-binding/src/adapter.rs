//! The [`BindingAdapter`]: host tree <-> state store glue.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use minibus_store::{ChangeSink, StateStore};
use minibus_tree::{ElementTree, Listener, TreeError};
use minibus_types::{AttributeKind, AttributeName, ElementId, StateKey, DATA_ATTRIBUTE_PREFIX};
use tracing::{debug, trace, warn};

use crate::error::{BindingError, Result};
use crate::handlers::{
    AttributeHandler, ClassListHandler, GenericAttributeHandler, TextContentHandler,
};
use crate::toggle::toggled;

/// Connects a [`StateStore`] to a host [`ElementTree`].
///
/// As a [`ChangeSink`] it renders committed values through the handler
/// registered for the attribute's kind, falling back to
/// [`GenericAttributeHandler`]. Writes to elements that no longer exist are
/// silently dropped.
pub struct BindingAdapter {
    tree: Arc<dyn ElementTree>,
    handlers: HashMap<AttributeKind, Arc<dyn AttributeHandler>>,
    fallback: GenericAttributeHandler,
    attribute_prefix: String,
}

impl BindingAdapter {
    /// Create an adapter with the built-in text and class-list handlers and
    /// the default `data-` attribute prefix.
    pub fn new(tree: Arc<dyn ElementTree>) -> Self {
        let mut handlers: HashMap<AttributeKind, Arc<dyn AttributeHandler>> = HashMap::new();
        handlers.insert(AttributeKind::Text, Arc::new(TextContentHandler));
        handlers.insert(AttributeKind::ClassList, Arc::new(ClassListHandler));
        Self {
            tree,
            handlers,
            fallback: GenericAttributeHandler,
            attribute_prefix: DATA_ATTRIBUTE_PREFIX.to_string(),
        }
    }

    /// Only attributes starting with `prefix` are seeded as state.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.attribute_prefix = prefix.into();
        self
    }

    /// Replace the handler used for `kind`.
    pub fn with_handler(mut self, kind: AttributeKind, handler: Arc<dyn AttributeHandler>) -> Self {
        self.handlers.insert(kind, handler);
        self
    }

    pub fn tree(&self) -> &Arc<dyn ElementTree> {
        &self.tree
    }

    pub fn attribute_prefix(&self) -> &str {
        &self.attribute_prefix
    }

    fn handler_for(&self, kind: AttributeKind) -> &dyn AttributeHandler {
        match self.handlers.get(&kind) {
            Some(handler) => &**handler,
            None => &self.fallback,
        }
    }

    /// Scan the tree once for prefixed attributes and return them as initial
    /// state, keyed `element.attribute`.
    ///
    /// Attributes whose names cannot form a valid key are skipped with a
    /// warning.
    pub fn declare_initial(&self) -> BTreeMap<StateKey, String> {
        let mut initial = BTreeMap::new();
        for element in self.tree.element_ids() {
            for (name, value) in self.tree.declared_attributes(&element) {
                if !name.starts_with(&self.attribute_prefix) {
                    continue;
                }
                match AttributeName::new(name.as_str()) {
                    Ok(attribute) => {
                        initial.insert(StateKey::new(element.clone(), attribute), value);
                    }
                    Err(e) => warn!(element = %element, attribute = %name, error = %e, "skipping attribute"),
                }
            }
        }
        debug!(entries = initial.len(), "declared initial state");
        initial
    }

    /// Flip `key` between `"true"` and `"false"` whenever `event_type` fires
    /// on `component`.
    ///
    /// The change is requested as `component`, so it must own `key` or hold a
    /// grant for it; rejections are logged when the event fires. The listener
    /// keeps only a weak reference to `store`.
    pub fn bind_toggle(
        &self,
        store: &Arc<StateStore>,
        component: &ElementId,
        event_type: &str,
        key: StateKey,
    ) -> Result<()> {
        if !self.tree.contains(component) {
            let err = BindingError::ElementNotFound {
                id: component.clone(),
            };
            warn!(component = %component, "{err}");
            return Err(err);
        }

        let store = Arc::downgrade(store);
        let requester = component.clone();
        let listener: Listener = Arc::new(move || {
            let Some(store) = store.upgrade() else {
                trace!(component = %requester, "store dropped; ignoring event");
                return;
            };
            let next = toggled(store.current_value(&key).as_deref());
            if let Err(e) = store.request_change(&requester, &key, next) {
                warn!(component = %requester, key = %key, error = %e, "toggle rejected");
            }
        });

        self.tree.add_listener(component, event_type, listener)?;
        debug!(component = %component, event_type, "toggle bound");
        Ok(())
    }
}

impl ChangeSink for BindingAdapter {
    fn apply(&self, element: &ElementId, attribute: &AttributeName, value: &str) {
        let handler = self.handler_for(attribute.kind());
        match handler.apply(self.tree.as_ref(), element, attribute, value) {
            Ok(()) => trace!(element = %element, attribute = %attribute, handler = handler.name(), "applied"),
            Err(TreeError::ElementNotFound { .. }) => {}
            Err(e) => warn!(element = %element, attribute = %attribute, error = %e, "apply failed"),
        }
    }
}

impl fmt::Debug for BindingAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.handlers.keys().copied().collect();
        kinds.sort();
        f.debug_struct("BindingAdapter")
            .field("handlers", &kinds)
            .field("attribute_prefix", &self.attribute_prefix)
            .finish_non_exhaustive()
    }
}
