//! Suspect registry.
//!
//! # Responsibilities
//! - Track pods currently believed to exceed the restart threshold
//! - Key every entry by (namespace, name) so scopes spanning all
//!   namespaces cannot collide on bare pod names
//!
//! # Design Decisions
//! - Backed by a BTreeMap so iteration order (and therefore the order of
//!   reported reasons) is deterministic
//! - Built only during the scan phase, shrunk only during reconciliation

use std::collections::BTreeMap;
use std::fmt;

/// Identity of a namespaced pod.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PodKey {
    pub namespace: String,
    pub name: String,
}

impl PodKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for PodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Pods exceeding the restart threshold, each with its diagnostic message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuspectRegistry {
    suspects: BTreeMap<PodKey, String>,
}

impl SuspectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry for `key`. Repeated events for the
    /// same pod restate the same count, so last-write-wins is fine.
    pub fn insert(&mut self, key: PodKey, message: String) {
        self.suspects.insert(key, message);
    }

    /// Remove the entry for `key`, returning its message if present.
    pub fn remove(&mut self, key: &PodKey) -> Option<String> {
        self.suspects.remove(key)
    }

    pub fn contains(&self, key: &PodKey) -> bool {
        self.suspects.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.suspects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suspects.is_empty()
    }

    /// Snapshot of the current keys, for iteration that mutates the
    /// registry as it goes.
    pub fn keys(&self) -> Vec<PodKey> {
        self.suspects.keys().cloned().collect()
    }

    /// Consume the registry, yielding its messages in key order.
    pub fn into_messages(self) -> Vec<String> {
        self.suspects.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_overwrites_same_key() {
        let mut registry = SuspectRegistry::new();
        registry.insert(PodKey::new("ns1", "p1"), "first".into());
        registry.insert(PodKey::new("ns1", "p1"), "second".into());

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.into_messages(), vec!["second".to_string()]);
    }

    #[test]
    fn test_same_name_different_namespace_do_not_collide() {
        let mut registry = SuspectRegistry::new();
        registry.insert(PodKey::new("ns1", "p1"), "a".into());
        registry.insert(PodKey::new("ns2", "p1"), "b".into());

        assert_eq!(registry.len(), 2);
        registry.remove(&PodKey::new("ns2", "p1"));
        assert!(registry.contains(&PodKey::new("ns1", "p1")));
    }

    #[test]
    fn test_messages_in_key_order() {
        let mut registry = SuspectRegistry::new();
        registry.insert(PodKey::new("ns2", "b"), "second".into());
        registry.insert(PodKey::new("ns1", "a"), "first".into());

        assert_eq!(
            registry.into_messages(),
            vec!["first".to_string(), "second".to_string()]
        );
    }
}
