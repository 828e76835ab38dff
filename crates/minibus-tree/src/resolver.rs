//! Ancestor-or-self checks over the host tree.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use minibus_types::ElementId;
use tracing::warn;

use crate::traits::ElementTree;

/// Answers "is element A within the hierarchy of element B?".
///
/// Holds only a handle to the tree; every query walks the live parent links.
#[derive(Clone)]
pub struct HierarchyResolver {
    tree: Arc<dyn ElementTree>,
}

impl HierarchyResolver {
    pub fn new(tree: Arc<dyn ElementTree>) -> Self {
        Self { tree }
    }

    pub fn tree(&self) -> &Arc<dyn ElementTree> {
        &self.tree
    }

    /// Returns `true` if `candidate` is reachable from `ancestor` by following
    /// parent links zero or more times. An element is its own descendant.
    ///
    /// Fails closed: an unknown id on either side yields `false`. A parent
    /// chain that loops back on itself also yields `false`.
    pub fn is_descendant(&self, candidate: &ElementId, ancestor: &ElementId) -> bool {
        if !self.tree.contains(candidate) || !self.tree.contains(ancestor) {
            return false;
        }

        let mut visited = HashSet::new();
        let mut node = Some(candidate.clone());
        while let Some(current) = node {
            if current == *ancestor {
                return true;
            }
            if !visited.insert(current.clone()) {
                warn!(element = %current, "cycle in parent links");
                return false;
            }
            node = self.tree.parent(&current);
        }
        false
    }
}

impl fmt::Debug for HierarchyResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HierarchyResolver").finish_non_exhaustive()
    }
}
