use serde_json::Value;
use tokio::sync::broadcast;
use tracing::debug;

use super::{StateError, StateStore};

/// Mutation observed on a [`NotifyingStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    Stored { key: String },
    Deleted { key: String },
}

/// Wraps any backend and broadcasts a [`StateChange`] after each successful mutation
pub struct NotifyingStore<S> {
    inner: S,
    changes: broadcast::Sender<StateChange>,
}

impl<S: StateStore> NotifyingStore<S> {
    pub fn new(inner: S) -> Self {
        let (changes, _) = broadcast::channel(64);
        Self { inner, changes }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.changes.subscribe()
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn notify(&self, change: StateChange) {
        debug!(?change, "State changed");
        // No subscribers is fine
        let _ = self.changes.send(change);
    }
}

impl<S: StateStore> StateStore for NotifyingStore<S> {
    fn get(&self, key: &str) -> Result<Option<Value>, StateError> {
        self.inner.get(key)
    }

    fn store(&self, key: &str, value: Value) -> Result<(), StateError> {
        self.inner.store(key, value)?;
        self.notify(StateChange::Stored {
            key: key.to_string(),
        });
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, StateError> {
        let existed = self.inner.delete(key)?;
        if existed {
            self.notify(StateChange::Deleted {
                key: key.to_string(),
            });
        }
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MemoryStore;
    use serde_json::json;

    struct FailingStore;

    impl StateStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<Value>, StateError> {
            Ok(None)
        }
        fn store(&self, _key: &str, _value: Value) -> Result<(), StateError> {
            Err(StateError::Backend("disk full".into()))
        }
        fn delete(&self, _key: &str) -> Result<bool, StateError> {
            Err(StateError::Backend("disk full".into()))
        }
    }

    #[test]
    fn test_notifies_after_mutation() {
        let store = NotifyingStore::new(MemoryStore::new());
        let mut rx = store.subscribe();

        store.store("k", json!(1)).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(json!(1)));
        store.delete("k").unwrap();
        // Deleting a missing key changes nothing
        store.delete("k").unwrap();

        assert_eq!(rx.try_recv().unwrap(), StateChange::Stored { key: "k".into() });
        assert_eq!(rx.try_recv().unwrap(), StateChange::Deleted { key: "k".into() });
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_failed_mutation_is_silent() {
        let store = NotifyingStore::new(FailingStore);
        let mut rx = store.subscribe();

        assert!(store.store("k", json!(1)).is_err());
        assert!(store.delete("k").is_err());
        assert!(rx.try_recv().is_err());
    }
}
