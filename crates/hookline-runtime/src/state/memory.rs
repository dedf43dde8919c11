use dashmap::DashMap;
use serde_json::Value;

use super::{StateError, StateStore};

/// In-process backend, mostly for tests and ephemeral runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StateError> {
        Ok(self.entries.get(key).map(|v| v.clone()))
    }

    fn store(&self, key: &str, value: Value) -> Result<(), StateError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, StateError> {
        Ok(self.entries.remove(key).is_some())
    }
}
