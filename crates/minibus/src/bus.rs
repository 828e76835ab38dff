use std::sync::Arc;

use minibus_binding::BindingAdapter;
use minibus_permissions::{GrantOutcome, PermissionRegistry};
use minibus_store::{ChangeOutcome, StateSnapshot, StateStore, WatcherError};
use minibus_tree::{ElementTree, HierarchyResolver};
use minibus_types::{ElementId, StateKey};
use tracing::info;

use crate::config::BusConfig;
use crate::error::BusResult;

/// One self-contained state bus over a host element tree.
///
/// Owns the permission registry, the state store and the binding adapter.
/// Several buses can run side by side over different trees.
pub struct MiniBus {
    config: BusConfig,
    tree: Arc<dyn ElementTree>,
    permissions: Arc<PermissionRegistry>,
    binding: Arc<BindingAdapter>,
    store: Arc<StateStore>,
}

impl MiniBus {
    /// Build a bus over `tree` and seed it from the tree's declared
    /// attributes.
    pub fn init(tree: Arc<dyn ElementTree>, config: BusConfig) -> BusResult<Self> {
        let binding = BindingAdapter::new(tree);
        Self::init_with_binding(binding, config)
    }

    /// Like [`Self::init`], with a pre-configured adapter (custom handlers).
    /// The adapter's prefix is overridden by `config.attribute_prefix`.
    pub fn init_with_binding(binding: BindingAdapter, config: BusConfig) -> BusResult<Self> {
        config.validate()?;

        let binding = Arc::new(binding.with_prefix(config.attribute_prefix.clone()));
        let tree = Arc::clone(binding.tree());
        let permissions = Arc::new(PermissionRegistry::new(HierarchyResolver::new(Arc::clone(
            &tree,
        ))));
        let store = Arc::new(
            StateStore::new(Arc::clone(&permissions), binding.clone())
                .with_snapshot_logging(config.log_snapshots),
        );

        store.seed(binding.declare_initial())?;
        let initial = store.snapshot();
        info!(entries = initial.len(), state = %initial.to_json(), "initial state");

        Ok(Self {
            config,
            tree,
            permissions,
            binding,
            store,
        })
    }

    /// Allow `owner_id` to change `state_key`. Refused unless `owner_id` is
    /// the key's owner or one of its ancestors.
    pub fn grant(&self, owner_id: &str, state_key: &str) -> BusResult<GrantOutcome> {
        let grantee = ElementId::new(owner_id)?;
        let key = StateKey::parse(state_key)?;
        Ok(self.permissions.grant(&grantee, &key)?)
    }

    /// Request `state_key = value` on behalf of `requester_id`.
    pub fn request_change(
        &self,
        requester_id: &str,
        state_key: &str,
        value: &str,
    ) -> BusResult<ChangeOutcome> {
        let requester = ElementId::new(requester_id)?;
        let key = StateKey::parse(state_key)?;
        Ok(self.store.request_change(&requester, &key, value)?)
    }

    pub fn watch<F>(&self, state_key: &str, callback: F) -> BusResult<()>
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let key = StateKey::parse(state_key)?;
        Ok(self.store.watch(key, callback)?)
    }

    pub fn try_watch<F>(&self, state_key: &str, callback: F) -> BusResult<()>
    where
        F: Fn(&str) -> Result<(), WatcherError> + Send + Sync + 'static,
    {
        let key = StateKey::parse(state_key)?;
        Ok(self.store.try_watch(key, callback)?)
    }

    /// Current value of `state_key`; `None` if absent or malformed.
    pub fn current_value(&self, state_key: &str) -> Option<String> {
        let key = StateKey::parse(state_key).ok()?;
        self.store.current_value(&key)
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.store.snapshot()
    }

    /// Flip `state_key` between `"true"` and `"false"` each time
    /// `event_type` fires on `component_id`.
    pub fn bind_toggle(&self, component_id: &str, event_type: &str, state_key: &str) -> BusResult<()> {
        let component = ElementId::new(component_id)?;
        let key = StateKey::parse(state_key)?;
        Ok(self
            .binding
            .bind_toggle(&self.store, &component, event_type, key)?)
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    pub fn tree(&self) -> &Arc<dyn ElementTree> {
        &self.tree
    }

    pub fn permissions(&self) -> &Arc<PermissionRegistry> {
        &self.permissions
    }

    pub fn binding(&self) -> &Arc<BindingAdapter> {
        &self.binding
    }

    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }
}
