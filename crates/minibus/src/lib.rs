//! MiniBus: a permission-gated shared-state bus for trees of named UI
//! elements.
//!
//! Each element's `data-*` attributes become observable state entries keyed
//! `element.attribute`. Elements may always change their own state; an
//! ancestor may be granted the right to change a descendant's state; nobody
//! else may. Committed values are written back onto the host tree and then
//! announced to watchers, in registration order.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use minibus::{BusConfig, ElementId, InMemoryElementTree, MiniBus};
//! use minibus::tree::ElementTree;
//!
//! let tree = Arc::new(InMemoryElementTree::new());
//! let panel = ElementId::new("panel").unwrap();
//! let toggle = ElementId::new("toggle").unwrap();
//! tree.insert_root(panel.clone()).unwrap();
//! tree.insert_child(&panel, toggle.clone()).unwrap();
//! tree.set_attribute(&toggle, "data-class", "idle").unwrap();
//!
//! let bus = MiniBus::init(tree.clone(), BusConfig::default()).unwrap();
//! bus.grant("panel", "toggle.data-class").unwrap();
//! bus.request_change("panel", "toggle.data-class", "active visible").unwrap();
//!
//! assert_eq!(tree.class_list(&toggle).unwrap(), vec!["active", "visible"]);
//! assert!(bus.request_change("outsider", "toggle.data-class", "hidden").is_err());
//! ```

pub mod bus;
pub mod config;
pub mod error;
pub mod logging;

pub use bus::MiniBus;
pub use config::BusConfig;
pub use error::{BusError, BusResult};
pub use logging::init_tracing;

pub use minibus_binding::{AttributeHandler, BindingAdapter, BindingError};
pub use minibus_permissions::{AccessDecision, GrantOutcome, PermissionError, PermissionRegistry};
pub use minibus_store::{ChangeOutcome, StateSnapshot, StateStore, StoreError, WatcherError};
pub use minibus_tree::{HierarchyResolver, InMemoryElementTree};
pub use minibus_types::{AttributeKind, AttributeName, ElementId, StateKey, TypeError};

/// The host tree boundary, for implementing custom hosts.
pub mod tree {
    pub use minibus_tree::{ElementTree, Listener, TreeError};
}
