//! Key/value state consumed by hook discovery (e.g. the global hooks root).

pub mod memory;
pub mod notifying;
pub mod redb_store;

pub use memory::MemoryStore;
pub use notifying::{NotifyingStore, StateChange};
pub use redb_store::RedbStore;

use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Failed to encode value for key '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Corrupt value stored under key '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Capability interface every state backend implements
pub trait StateStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, StateError>;

    fn store(&self, key: &str, value: Value) -> Result<(), StateError>;

    /// Remove `key`; returns whether it was present
    fn delete(&self, key: &str) -> Result<bool, StateError>;
}
