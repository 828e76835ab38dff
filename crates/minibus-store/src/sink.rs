//! The store's outbound effect interface.

use minibus_types::{AttributeName, ElementId};

/// Reflects committed values onto the host.
///
/// Called exactly once per value-changing commit, after the new snapshot is
/// installed and before any watcher runs. Implementations must treat a
/// missing target element as a no-op.
pub trait ChangeSink: Send + Sync {
    fn apply(&self, element: &ElementId, attribute: &AttributeName, value: &str);
}

/// A sink that discards every change. Used by stores with no host attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl ChangeSink for NullSink {
    fn apply(&self, _element: &ElementId, _attribute: &AttributeName, _value: &str) {}
}
