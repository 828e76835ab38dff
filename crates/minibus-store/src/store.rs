//! The state store: authorized, idempotent, copy-on-write mutation with
//! ordered watcher notification.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, RwLock};

use minibus_permissions::PermissionRegistry;
use minibus_types::{ElementId, StateKey};
use tracing::{debug, warn};

use crate::error::{Result, StoreError, WatcherError};
use crate::sink::ChangeSink;
use crate::snapshot::StateSnapshot;

type WatcherFn = Arc<dyn Fn(&str) -> std::result::Result<(), WatcherError> + Send + Sync>;

/// What a successful [`StateStore::request_change`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// The key already held the requested value. Nothing was committed,
    /// applied or notified.
    Unchanged,
    /// The value was committed and applied.
    Committed {
        /// Watchers invoked, in registration order.
        notified: usize,
        /// How many of those reported a failure.
        failed: usize,
    },
}

impl ChangeOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// Holds the current value of every state key.
///
/// The store is the sole writer of the mapping. Grants and watcher
/// registrations are append-only. No lock is held while the sink or a
/// watcher runs, so a watcher may call [`Self::request_change`] again; the
/// nested call sees the fully committed outer snapshot.
pub struct StateStore {
    permissions: Arc<PermissionRegistry>,
    sink: Arc<dyn ChangeSink>,
    state: RwLock<StateSnapshot>,
    watchers: RwLock<HashMap<StateKey, Vec<WatcherFn>>>,
    log_snapshots: bool,
}

impl StateStore {
    /// Create an empty store that authorizes through `permissions` and
    /// reflects commits through `sink`.
    pub fn new(permissions: Arc<PermissionRegistry>, sink: Arc<dyn ChangeSink>) -> Self {
        Self {
            permissions,
            sink,
            state: RwLock::new(StateSnapshot::default()),
            watchers: RwLock::new(HashMap::new()),
            log_snapshots: false,
        }
    }

    /// Log the full state as JSON at `debug` after every commit.
    pub fn with_snapshot_logging(mut self, enabled: bool) -> Self {
        self.log_snapshots = enabled;
        self
    }

    pub fn permissions(&self) -> &Arc<PermissionRegistry> {
        &self.permissions
    }

    /// Install initial values without authorization, sink calls or watcher
    /// notification. Existing entries with the same key are overwritten.
    pub fn seed(&self, entries: BTreeMap<StateKey, String>) -> Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        let mut merged: BTreeMap<StateKey, String> = state
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect();
        merged.extend(entries);
        *state = StateSnapshot::new(merged);
        Ok(())
    }

    /// Request that `key` take `value` on behalf of `requester`.
    ///
    /// Unauthorized requests are logged and rejected with
    /// [`StoreError::Forbidden`], leaving state untouched. A request for the
    /// value already stored returns [`ChangeOutcome::Unchanged`]. Otherwise
    /// the new snapshot is committed, the sink applies the value, and every
    /// watcher on `key` runs in registration order. A failing or panicking
    /// watcher does not stop the ones after it and does not undo the commit.
    pub fn request_change(
        &self,
        requester: &ElementId,
        key: &StateKey,
        value: impl Into<String>,
    ) -> Result<ChangeOutcome> {
        if !self.permissions.is_authorized(requester, key) {
            let err = StoreError::Forbidden {
                requester: requester.clone(),
                key: key.clone(),
            };
            warn!(requester = %requester, key = %key, "{err}");
            return Err(err);
        }

        let value = value.into();
        let committed = {
            let mut state = self
                .state
                .write()
                .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
            if state.get(key) == Some(value.as_str()) {
                debug!(key = %key, "value unchanged; skipping");
                return Ok(ChangeOutcome::Unchanged);
            }
            let next = state.with_entry(key.clone(), value.clone());
            *state = next.clone();
            next
        };

        debug!(requester = %requester, key = %key, value = %value, "state change");
        if self.log_snapshots {
            debug!(state = %committed.to_json(), "updated state");
        }

        self.sink.apply(key.owner(), key.attribute(), &value);

        let watchers: Vec<WatcherFn> = self
            .watchers
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?
            .get(key)
            .cloned()
            .unwrap_or_default();

        let mut failed = 0;
        for (index, watcher) in watchers.iter().enumerate() {
            match catch_unwind(AssertUnwindSafe(|| watcher(&value))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    failed += 1;
                    warn!(key = %key, index, error = %e, "watcher failed");
                }
                Err(_) => {
                    failed += 1;
                    warn!(key = %key, index, "watcher panicked");
                }
            }
        }

        Ok(ChangeOutcome::Committed {
            notified: watchers.len(),
            failed,
        })
    }

    /// Run `callback` with the new value after every value-changing commit
    /// to `key`. Registration does not invoke the callback.
    ///
    /// A panic inside `callback` is caught at the notification boundary and
    /// counted as a failure in [`ChangeOutcome::Committed`]; later watchers
    /// still run.
    pub fn watch<F>(&self, key: StateKey, callback: F) -> Result<()>
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.try_watch(key, move |value| {
            callback(value);
            Ok(())
        })
    }

    /// Like [`Self::watch`], for callbacks that can report failure.
    pub fn try_watch<F>(&self, key: StateKey, callback: F) -> Result<()>
    where
        F: Fn(&str) -> std::result::Result<(), WatcherError> + Send + Sync + 'static,
    {
        let mut watchers = self
            .watchers
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        watchers.entry(key).or_default().push(Arc::new(callback));
        Ok(())
    }

    /// Number of watchers registered on `key`.
    pub fn watcher_count(&self, key: &StateKey) -> usize {
        self.watchers
            .read()
            .map(|w| w.get(key).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    /// Current value of `key`, if any.
    pub fn current_value(&self, key: &StateKey) -> Option<String> {
        self.snapshot().get(key).map(str::to_string)
    }

    /// The current snapshot. Later commits never show through it.
    ///
    /// Unlike the mutating paths, reads survive a poisoned lock: the last
    /// installed snapshot is always complete, so it is returned with a
    /// warning.
    pub fn snapshot(&self) -> StateSnapshot {
        match self.state.read() {
            Ok(state) => state.clone(),
            Err(poisoned) => {
                warn!("state lock poisoned; reading last committed snapshot");
                poisoned.into_inner().clone()
            }
        }
    }
}

impl fmt::Debug for StateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateStore")
            .field("state", &self.snapshot())
            .field("log_snapshots", &self.log_snapshots)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use minibus_tree::{HierarchyResolver, InMemoryElementTree};
    use minibus_types::AttributeName;

    use super::*;

    fn id(s: &str) -> ElementId {
        ElementId::new(s).unwrap()
    }

    fn key(s: &str) -> StateKey {
        StateKey::parse(s).unwrap()
    }

    /// Records every apply call as `element.attribute=value`.
    #[derive(Default)]
    struct RecordingSink {
        calls: Mutex<Vec<String>>,
    }

    impl RecordingSink {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ChangeSink for RecordingSink {
        fn apply(&self, element: &ElementId, attribute: &AttributeName, value: &str) {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{element}.{attribute}={value}"));
        }
    }

    /// panel > toggle, outsider at root
    fn store() -> (Arc<StateStore>, Arc<RecordingSink>) {
        let tree = InMemoryElementTree::new();
        tree.insert_root(id("panel")).unwrap();
        tree.insert_child(&id("panel"), id("toggle")).unwrap();
        tree.insert_root(id("outsider")).unwrap();
        let permissions = Arc::new(PermissionRegistry::new(HierarchyResolver::new(Arc::new(tree))));
        let sink = Arc::new(RecordingSink::default());
        let store = Arc::new(StateStore::new(permissions, sink.clone()));
        (store, sink)
    }

    fn recorder(store: &StateStore, k: &str) -> Arc<Mutex<Vec<String>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store
            .watch(key(k), move |v| sink.lock().unwrap().push(v.to_string()))
            .unwrap();
        seen
    }

    #[test]
    fn owner_change_commits_applies_and_notifies() {
        let (store, sink) = store();
        let seen = recorder(&store, "toggle.data-open");

        let outcome = store
            .request_change(&id("toggle"), &key("toggle.data-open"), "true")
            .unwrap();

        assert_eq!(outcome, ChangeOutcome::Committed { notified: 1, failed: 0 });
        assert_eq!(store.current_value(&key("toggle.data-open")).as_deref(), Some("true"));
        assert_eq!(sink.calls(), vec!["toggle.data-open=true"]);
        assert_eq!(*seen.lock().unwrap(), vec!["true"]);
    }

    #[test]
    fn unauthorized_request_is_rejected_without_effects() {
        let (store, sink) = store();
        let seen = recorder(&store, "toggle.data-open");

        let err = store
            .request_change(&id("outsider"), &key("toggle.data-open"), "true")
            .unwrap_err();

        assert!(matches!(err, StoreError::Forbidden { .. }));
        assert!(store.current_value(&key("toggle.data-open")).is_none());
        assert!(sink.calls().is_empty());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn granted_requester_may_change() {
        let (store, _sink) = store();
        store
            .permissions()
            .grant(&id("panel"), &key("toggle.data-open"))
            .unwrap();
        let outcome = store
            .request_change(&id("panel"), &key("toggle.data-open"), "true")
            .unwrap();
        assert!(outcome.is_committed());
    }

    #[test]
    fn repeated_identical_request_is_idempotent() {
        let (store, sink) = store();
        let seen = recorder(&store, "toggle.data-open");

        let first = store
            .request_change(&id("toggle"), &key("toggle.data-open"), "true")
            .unwrap();
        let second = store
            .request_change(&id("toggle"), &key("toggle.data-open"), "true")
            .unwrap();

        assert!(first.is_committed());
        assert_eq!(second, ChangeOutcome::Unchanged);
        assert_eq!(sink.calls().len(), 1);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn seeded_value_counts_for_equality() {
        let (store, sink) = store();
        store
            .seed(BTreeMap::from([(key("toggle.data-open"), "false".to_string())]))
            .unwrap();
        let outcome = store
            .request_change(&id("toggle"), &key("toggle.data-open"), "false")
            .unwrap();
        assert_eq!(outcome, ChangeOutcome::Unchanged);
        assert!(sink.calls().is_empty());
    }

    #[test]
    fn watchers_fire_in_registration_order() {
        let (store, _sink) = store();
        let order = Arc::new(Mutex::new(Vec::new()));
        for n in 0..4 {
            let order = Arc::clone(&order);
            store
                .watch(key("toggle.data-text"), move |_| order.lock().unwrap().push(n))
                .unwrap();
        }
        assert_eq!(store.watcher_count(&key("toggle.data-text")), 4);

        store
            .request_change(&id("toggle"), &key("toggle.data-text"), "hi")
            .unwrap();
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn registering_a_watcher_does_not_fire_it() {
        let (store, _sink) = store();
        store
            .seed(BTreeMap::from([(key("toggle.data-text"), "x".to_string())]))
            .unwrap();
        let seen = recorder(&store, "toggle.data-text");
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn failing_watcher_does_not_stop_later_watchers_or_roll_back() {
        let (store, _sink) = store();
        store
            .try_watch(key("toggle.data-text"), |_| Err(WatcherError::new("boom")))
            .unwrap();
        let seen = recorder(&store, "toggle.data-text");

        let outcome = store
            .request_change(&id("toggle"), &key("toggle.data-text"), "hi")
            .unwrap();

        assert_eq!(outcome, ChangeOutcome::Committed { notified: 2, failed: 1 });
        assert_eq!(*seen.lock().unwrap(), vec!["hi"]);
        assert_eq!(store.current_value(&key("toggle.data-text")).as_deref(), Some("hi"));
    }

    #[test]
    fn panicking_watcher_does_not_stop_later_watchers() {
        let (store, _sink) = store();
        store
            .watch(key("toggle.data-text"), |_| panic!("watcher blew up"))
            .unwrap();
        let seen = recorder(&store, "toggle.data-text");

        let outcome = store
            .request_change(&id("toggle"), &key("toggle.data-text"), "1")
            .unwrap();

        assert_eq!(outcome, ChangeOutcome::Committed { notified: 2, failed: 1 });
        assert_eq!(*seen.lock().unwrap(), vec!["1"]);
        assert_eq!(store.current_value(&key("toggle.data-text")).as_deref(), Some("1"));
    }

    #[test]
    fn poisoned_state_lock_fails_writes_but_not_reads() {
        let (store, _sink) = store();
        store
            .request_change(&id("toggle"), &key("toggle.data-text"), "kept")
            .unwrap();

        let poisoner = Arc::clone(&store);
        let joined = std::thread::spawn(move || {
            let _guard = poisoner.state.write().unwrap();
            panic!("poison the state lock");
        })
        .join();
        assert!(joined.is_err());

        assert_eq!(store.snapshot().get(&key("toggle.data-text")), Some("kept"));
        assert_eq!(store.current_value(&key("toggle.data-text")).as_deref(), Some("kept"));
        let err = store
            .request_change(&id("toggle"), &key("toggle.data-text"), "lost")
            .unwrap_err();
        assert!(matches!(err, StoreError::LockPoisoned(_)));
    }

    #[test]
    fn snapshot_is_isolated_from_later_commits() {
        let (store, _sink) = store();
        store
            .request_change(&id("toggle"), &key("toggle.data-text"), "one")
            .unwrap();
        let before = store.snapshot();

        store
            .request_change(&id("toggle"), &key("toggle.data-text"), "two")
            .unwrap();
        store
            .request_change(&id("toggle"), &key("toggle.data-open"), "true")
            .unwrap();

        assert_eq!(before.get(&key("toggle.data-text")), Some("one"));
        assert!(!before.contains_key(&key("toggle.data-open")));
        assert_eq!(store.snapshot().get(&key("toggle.data-text")), Some("two"));
    }

    #[test]
    fn unseen_key_is_created_lazily() {
        let (store, _sink) = store();
        let k = key("toggle.data-brand-new");
        assert!(store.current_value(&k).is_none());
        store.request_change(&id("toggle"), &k, "v").unwrap();
        assert_eq!(store.current_value(&k).as_deref(), Some("v"));
    }

    #[test]
    fn watcher_may_request_another_change() {
        let (store, sink) = store();
        let weak = Arc::downgrade(&store);
        store
            .watch(key("toggle.data-open"), move |v| {
                let store = weak.upgrade().unwrap();
                // The outer commit is already visible to the nested call.
                assert_eq!(
                    store.current_value(&StateKey::parse("toggle.data-open").unwrap()).as_deref(),
                    Some(v)
                );
                let label = if v == "true" { "Close" } else { "Open" };
                store
                    .request_change(
                        &ElementId::new("toggle").unwrap(),
                        &StateKey::parse("toggle.data-text").unwrap(),
                        label,
                    )
                    .unwrap();
            })
            .unwrap();

        store
            .request_change(&id("toggle"), &key("toggle.data-open"), "true")
            .unwrap();

        assert_eq!(store.current_value(&key("toggle.data-text")).as_deref(), Some("Close"));
        assert_eq!(
            sink.calls(),
            vec!["toggle.data-open=true", "toggle.data-text=Close"]
        );
    }

    #[test]
    fn watcher_may_rewrite_its_own_key() {
        let (store, _sink) = store();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let weak = Arc::downgrade(&store);
        let log = Arc::clone(&seen);
        store
            .watch(key("toggle.data-count"), move |v| {
                log.lock().unwrap().push(v.to_string());
                if v == "1" {
                    weak.upgrade()
                        .unwrap()
                        .request_change(
                            &ElementId::new("toggle").unwrap(),
                            &StateKey::parse("toggle.data-count").unwrap(),
                            "2",
                        )
                        .unwrap();
                }
            })
            .unwrap();

        store
            .request_change(&id("toggle"), &key("toggle.data-count"), "1")
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["1", "2"]);
        assert_eq!(store.current_value(&key("toggle.data-count")).as_deref(), Some("2"));
    }
}
