//! Element tree boundary for MiniBus.
//!
//! MiniBus never owns the UI. It talks to a host tree of named elements
//! through the [`ElementTree`] trait: reading parent links and declared
//! attributes, writing attributes, text and class tokens back, and
//! subscribing to input events.
//!
//! # Modules
//!
//! - [`error`] — Error types for tree operations
//! - [`traits`] — The [`ElementTree`] trait defining the host interface
//! - [`memory`] — In-memory [`InMemoryElementTree`] for tests and headless hosts
//! - [`resolver`] — [`HierarchyResolver`], the ancestor-or-self check

pub mod error;
pub mod memory;
pub mod resolver;
pub mod traits;

pub use error::{Result, TreeError};
pub use memory::InMemoryElementTree;
pub use resolver::HierarchyResolver;
pub use traits::{ElementTree, Listener};
