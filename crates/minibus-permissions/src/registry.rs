//! The grant table and the authorization check.

use std::collections::{BTreeSet, HashMap};
use std::sync::{RwLock, RwLockReadGuard};

use minibus_tree::HierarchyResolver;
use minibus_types::{ElementId, StateKey};
use tracing::{debug, warn};

use crate::decision::{AccessDecision, GrantOutcome};
use crate::error::{PermissionError, Result};

/// Maps each state key to the set of non-owner elements allowed to mutate it.
///
/// Grants are additive: once recorded they live as long as the registry.
#[derive(Debug)]
pub struct PermissionRegistry {
    resolver: HierarchyResolver,
    grants: RwLock<HashMap<StateKey, BTreeSet<ElementId>>>,
}

impl PermissionRegistry {
    pub fn new(resolver: HierarchyResolver) -> Self {
        Self {
            resolver,
            grants: RwLock::new(HashMap::new()),
        }
    }

    pub fn resolver(&self) -> &HierarchyResolver {
        &self.resolver
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<StateKey, BTreeSet<ElementId>>>> {
        self.grants
            .read()
            .map_err(|e| PermissionError::LockPoisoned(e.to_string()))
    }

    /// Allow `grantee` to request changes to `key`.
    ///
    /// The grant is recorded only if the key's owner lies within the
    /// grantee's hierarchy (ancestor-or-self). Otherwise nothing is recorded
    /// and [`PermissionError::OutOfHierarchy`] is returned. Unknown elements
    /// on either side are treated as out of hierarchy.
    pub fn grant(&self, grantee: &ElementId, key: &StateKey) -> Result<GrantOutcome> {
        if !self.resolver.is_descendant(key.owner(), grantee) {
            let err = PermissionError::OutOfHierarchy {
                grantee: grantee.clone(),
                key: key.clone(),
            };
            warn!(grantee = %grantee, key = %key, "{err}");
            return Err(err);
        }

        let mut grants = self
            .grants
            .write()
            .map_err(|e| PermissionError::LockPoisoned(e.to_string()))?;
        let newly_added = grants
            .entry(key.clone())
            .or_default()
            .insert(grantee.clone());

        if newly_added {
            debug!(grantee = %grantee, key = %key, "permission granted");
            Ok(GrantOutcome::Recorded)
        } else {
            Ok(GrantOutcome::AlreadyGranted)
        }
    }

    /// Decide whether `requester` may mutate `key`.
    ///
    /// Ownership is checked first and needs no grant.
    pub fn check(&self, requester: &ElementId, key: &StateKey) -> Result<AccessDecision> {
        if key.is_owned_by(requester) {
            return Ok(AccessDecision::SelfOwned);
        }
        let grants = self.read()?;
        let granted = grants
            .get(key)
            .is_some_and(|grantees| grantees.contains(requester));
        Ok(if granted {
            AccessDecision::Granted
        } else {
            AccessDecision::Denied
        })
    }

    /// Boolean view of [`Self::check`]. Fails closed on a poisoned lock.
    pub fn is_authorized(&self, requester: &ElementId, key: &StateKey) -> bool {
        match self.check(requester, key) {
            Ok(decision) => decision.is_allowed(),
            Err(e) => {
                warn!(requester = %requester, key = %key, error = %e, "authorization check failed");
                false
            }
        }
    }

    /// Elements holding an explicit grant for `key`, sorted by id.
    pub fn grantees(&self, key: &StateKey) -> Result<Vec<ElementId>> {
        let grants = self.read()?;
        Ok(grants
            .get(key)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }

    /// Total number of recorded `(key, grantee)` pairs.
    pub fn grant_count(&self) -> Result<usize> {
        Ok(self.read()?.values().map(BTreeSet::len).sum())
    }
}
