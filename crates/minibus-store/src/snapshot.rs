//! Immutable views of the full state mapping.

use std::collections::BTreeMap;
use std::sync::Arc;

use minibus_types::StateKey;
use serde::{Serialize, Serializer};

/// The full `StateKey -> value` mapping at one point in time.
///
/// Snapshots are never mutated. A commit builds a new mapping and swaps it
/// in, so a snapshot taken before the commit keeps its old values. Cloning
/// only bumps a reference count.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateSnapshot {
    entries: Arc<BTreeMap<StateKey, String>>,
}

impl StateSnapshot {
    pub fn new(entries: BTreeMap<StateKey, String>) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }

    pub fn get(&self, key: &StateKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &StateKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// A new snapshot equal to this one except for `key -> value`.
    pub fn with_entry(&self, key: StateKey, value: String) -> Self {
        let mut entries = (*self.entries).clone();
        entries.insert(key, value);
        Self::new(entries)
    }

    /// Pretty-printed JSON object keyed by `owner.attribute`.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("<unserializable: {e}>"))
    }
}

impl Serialize for StateSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.entries.as_ref().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> StateKey {
        StateKey::parse(s).unwrap()
    }

    #[test]
    fn with_entry_leaves_original_untouched() {
        let before = StateSnapshot::default().with_entry(key("a.data-x"), "1".into());
        let after = before.with_entry(key("a.data-x"), "2".into());

        assert_eq!(before.get(&key("a.data-x")), Some("1"));
        assert_eq!(after.get(&key("a.data-x")), Some("2"));
        assert_eq!(after.len(), 1);
    }

    #[test]
    fn json_export_uses_string_keys() {
        let snap = StateSnapshot::default()
            .with_entry(key("panel.data-text"), "Hi".into())
            .with_entry(key("toggle.data-open"), "false".into());
        let value: serde_json::Value = serde_json::from_str(&snap.to_json()).unwrap();
        assert_eq!(value["panel.data-text"], "Hi");
        assert_eq!(value["toggle.data-open"], "false");
    }

    #[test]
    fn empty_snapshot() {
        let snap = StateSnapshot::default();
        assert!(snap.is_empty());
        assert_eq!(snap.iter().count(), 0);
        assert!(!snap.contains_key(&key("a.b")));
    }
}
