//! In-memory element tree for tests and headless hosts.
//!
//! [`InMemoryElementTree`] keeps every element in a `HashMap` behind a
//! `RwLock`, plus a `Vec` recording insertion (document) order. It implements
//! the full [`ElementTree`] trait and adds setup helpers, readers for the
//! rendered text/class/attribute values, and [`InMemoryElementTree::dispatch`]
//! to fire input events.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use minibus_types::ElementId;
use tracing::trace;

use crate::error::{Result, TreeError};
use crate::traits::{ElementTree, Listener};

#[derive(Default)]
struct ElementNode {
    parent: Option<ElementId>,
    attributes: BTreeMap<String, String>,
    text: String,
    classes: Vec<String>,
    listeners: HashMap<String, Vec<Listener>>,
}

#[derive(Default)]
struct TreeData {
    nodes: HashMap<ElementId, ElementNode>,
    order: Vec<ElementId>,
}

/// An in-memory implementation of [`ElementTree`].
///
/// Data is lost when the tree is dropped.
#[derive(Default)]
pub struct InMemoryElementTree {
    data: RwLock<TreeData>,
}

impl InMemoryElementTree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, TreeData>> {
        self.data
            .read()
            .map_err(|e| TreeError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, TreeData>> {
        self.data
            .write()
            .map_err(|e| TreeError::LockPoisoned(e.to_string()))
    }

    /// Insert a parentless element.
    pub fn insert_root(&self, id: ElementId) -> Result<()> {
        self.insert(None, id)
    }

    /// Insert `id` as the last child of `parent`.
    pub fn insert_child(&self, parent: &ElementId, id: ElementId) -> Result<()> {
        self.insert(Some(parent.clone()), id)
    }

    fn insert(&self, parent: Option<ElementId>, id: ElementId) -> Result<()> {
        let mut data = self.write()?;
        if let Some(parent) = &parent {
            if !data.nodes.contains_key(parent) {
                return Err(TreeError::ElementNotFound { id: parent.clone() });
            }
        }
        if data.nodes.contains_key(&id) {
            return Err(TreeError::DuplicateElement { id });
        }
        data.nodes.insert(
            id.clone(),
            ElementNode {
                parent,
                ..ElementNode::default()
            },
        );
        data.order.push(id);
        Ok(())
    }

    /// Current visible text of `id`.
    pub fn text(&self, id: &ElementId) -> Option<String> {
        let data = self.read().ok()?;
        data.nodes.get(id).map(|node| node.text.clone())
    }

    /// Current class tokens of `id`, in the order they were set.
    pub fn class_list(&self, id: &ElementId) -> Option<Vec<String>> {
        let data = self.read().ok()?;
        data.nodes.get(id).map(|node| node.classes.clone())
    }

    /// Current value of the named attribute on `id`.
    pub fn attribute(&self, id: &ElementId, name: &str) -> Option<String> {
        let data = self.read().ok()?;
        data.nodes.get(id)?.attributes.get(name).cloned()
    }

    /// Number of listeners subscribed to `event_type` on `id`.
    pub fn listener_count(&self, id: &ElementId, event_type: &str) -> usize {
        self.read()
            .ok()
            .and_then(|data| {
                data.nodes
                    .get(id)
                    .and_then(|node| node.listeners.get(event_type).map(Vec::len))
            })
            .unwrap_or(0)
    }

    /// Fire an input event on `id`, running its listeners in subscription
    /// order. Returns the number of listeners invoked.
    ///
    /// Listeners run with no lock held, so they may read or write the tree.
    pub fn dispatch(&self, id: &ElementId, event_type: &str) -> Result<usize> {
        let listeners: Vec<Listener> = {
            let data = self.read()?;
            let node = data
                .nodes
                .get(id)
                .ok_or_else(|| TreeError::ElementNotFound { id: id.clone() })?;
            node.listeners.get(event_type).cloned().unwrap_or_default()
        };
        trace!(element = %id, event_type, listeners = listeners.len(), "dispatching event");
        for listener in &listeners {
            listener();
        }
        Ok(listeners.len())
    }

    fn with_node_mut<F>(&self, id: &ElementId, f: F) -> Result<()>
    where
        F: FnOnce(&mut ElementNode),
    {
        let mut data = self.write()?;
        let node = data
            .nodes
            .get_mut(id)
            .ok_or_else(|| TreeError::ElementNotFound { id: id.clone() })?;
        f(node);
        Ok(())
    }
}

impl fmt::Debug for InMemoryElementTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids = self.element_ids();
        f.debug_struct("InMemoryElementTree")
            .field("elements", &ids)
            .finish()
    }
}

impl ElementTree for InMemoryElementTree {
    fn contains(&self, id: &ElementId) -> bool {
        self.read()
            .map(|data| data.nodes.contains_key(id))
            .unwrap_or(false)
    }

    fn parent(&self, id: &ElementId) -> Option<ElementId> {
        let data = self.read().ok()?;
        data.nodes.get(id)?.parent.clone()
    }

    fn element_ids(&self) -> Vec<ElementId> {
        self.read()
            .map(|data| data.order.clone())
            .unwrap_or_default()
    }

    fn declared_attributes(&self, id: &ElementId) -> Vec<(String, String)> {
        self.read()
            .ok()
            .and_then(|data| {
                data.nodes.get(id).map(|node| {
                    node.attributes
                        .iter()
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect()
                })
            })
            .unwrap_or_default()
    }

    fn set_attribute(&self, id: &ElementId, name: &str, value: &str) -> Result<()> {
        self.with_node_mut(id, |node| {
            node.attributes.insert(name.to_string(), value.to_string());
        })
    }

    fn set_text(&self, id: &ElementId, text: &str) -> Result<()> {
        self.with_node_mut(id, |node| node.text = text.to_string())
    }

    fn set_class_list(&self, id: &ElementId, tokens: Vec<String>) -> Result<()> {
        self.with_node_mut(id, |node| node.classes = tokens)
    }

    fn add_listener(&self, id: &ElementId, event_type: &str, listener: Listener) -> Result<()> {
        self.with_node_mut(id, |node| {
            node.listeners
                .entry(event_type.to_string())
                .or_default()
                .push(listener);
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    fn id(s: &str) -> ElementId {
        ElementId::new(s).unwrap()
    }

    fn panel_tree() -> InMemoryElementTree {
        let tree = InMemoryElementTree::new();
        tree.insert_root(id("panel")).unwrap();
        tree.insert_child(&id("panel"), id("toggle")).unwrap();
        tree
    }

    #[test]
    fn insert_and_navigate() {
        let tree = panel_tree();
        assert!(tree.contains(&id("panel")));
        assert!(tree.contains(&id("toggle")));
        assert_eq!(tree.parent(&id("toggle")), Some(id("panel")));
        assert_eq!(tree.parent(&id("panel")), None);
        assert_eq!(tree.element_ids(), vec![id("panel"), id("toggle")]);
    }

    #[test]
    fn insert_child_of_missing_parent_fails() {
        let tree = InMemoryElementTree::new();
        let err = tree.insert_child(&id("ghost"), id("child")).unwrap_err();
        assert!(matches!(err, TreeError::ElementNotFound { .. }));
        assert!(!tree.contains(&id("child")));
    }

    #[test]
    fn duplicate_insert_fails() {
        let tree = panel_tree();
        let err = tree.insert_root(id("toggle")).unwrap_err();
        assert!(matches!(err, TreeError::DuplicateElement { .. }));
    }

    #[test]
    fn attributes_text_and_classes() {
        let tree = panel_tree();
        tree.set_attribute(&id("toggle"), "data-open", "false").unwrap();
        tree.set_text(&id("toggle"), "Hello").unwrap();
        tree.set_class_list(&id("toggle"), vec!["a".into(), "b".into()])
            .unwrap();

        assert_eq!(tree.attribute(&id("toggle"), "data-open").as_deref(), Some("false"));
        assert_eq!(tree.text(&id("toggle")).as_deref(), Some("Hello"));
        assert_eq!(tree.class_list(&id("toggle")).unwrap(), vec!["a", "b"]);
        assert_eq!(
            tree.declared_attributes(&id("toggle")),
            vec![("data-open".to_string(), "false".to_string())]
        );
    }

    #[test]
    fn writes_to_missing_element_fail() {
        let tree = panel_tree();
        assert!(matches!(
            tree.set_text(&id("ghost"), "x"),
            Err(TreeError::ElementNotFound { .. })
        ));
        assert!(tree.declared_attributes(&id("ghost")).is_empty());
    }

    #[test]
    fn dispatch_runs_listeners_in_order() {
        let tree = panel_tree();
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        for n in 0..3 {
            let order = Arc::clone(&order);
            tree.add_listener(&id("toggle"), "click", Arc::new(move || {
                order.lock().unwrap().push(n);
            }))
            .unwrap();
        }

        assert_eq!(tree.listener_count(&id("toggle"), "click"), 3);
        assert_eq!(tree.dispatch(&id("toggle"), "click").unwrap(), 3);
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
        assert_eq!(tree.dispatch(&id("toggle"), "keydown").unwrap(), 0);
    }

    #[test]
    fn listener_may_write_to_tree() {
        let tree = Arc::new(panel_tree());
        let hits = Arc::new(AtomicUsize::new(0));
        let weak = Arc::downgrade(&tree);
        let counter = Arc::clone(&hits);
        tree.add_listener(&id("toggle"), "click", Arc::new(move || {
            if let Some(tree) = weak.upgrade() {
                tree.set_text(&ElementId::new("toggle").unwrap(), "clicked").unwrap();
            }
            counter.fetch_add(1, Ordering::SeqCst);
        }))
        .unwrap();

        tree.dispatch(&id("toggle"), "click").unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(tree.text(&id("toggle")).as_deref(), Some("clicked"));
    }
}
