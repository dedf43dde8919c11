use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition};
use serde_json::Value;

use super::{StateError, StateStore};

const STATE_TABLE: TableDefinition<&str, &str> = TableDefinition::new("state");

/// Persistent backend: one redb table of JSON-encoded values
pub struct RedbStore {
    db: Database,
}

fn backend<E: std::fmt::Display>(e: E) -> StateError {
    StateError::Backend(e.to_string())
}

impl RedbStore {
    /// Open or create the database file
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StateError> {
        let db = Database::create(path.as_ref()).map_err(backend)?;

        // Create table if not exists
        let write_txn = db.begin_write().map_err(backend)?;
        {
            let _ = write_txn.open_table(STATE_TABLE).map_err(backend)?;
        }
        write_txn.commit().map_err(backend)?;

        Ok(Self { db })
    }

    /// All stored keys, in key order
    pub fn keys(&self) -> Result<Vec<String>, StateError> {
        let read_txn = self.db.begin_read().map_err(backend)?;
        let table = read_txn.open_table(STATE_TABLE).map_err(backend)?;
        let mut keys = Vec::new();
        for entry in table.iter().map_err(backend)? {
            let (key, _) = entry.map_err(backend)?;
            keys.push(key.value().to_string());
        }
        Ok(keys)
    }
}

impl StateStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StateError> {
        let read_txn = self.db.begin_read().map_err(backend)?;
        let table = read_txn.open_table(STATE_TABLE).map_err(backend)?;

        match table.get(key).map_err(backend)? {
            Some(raw) => {
                let value = serde_json::from_str(raw.value()).map_err(|source| StateError::Decode {
                    key: key.to_string(),
                    source,
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn store(&self, key: &str, value: Value) -> Result<(), StateError> {
        let encoded = serde_json::to_string(&value).map_err(|source| StateError::Encode {
            key: key.to_string(),
            source,
        })?;

        let write_txn = self.db.begin_write().map_err(backend)?;
        {
            let mut table = write_txn.open_table(STATE_TABLE).map_err(backend)?;
            table.insert(key, encoded.as_str()).map_err(backend)?;
        }
        write_txn.commit().map_err(backend)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, StateError> {
        let write_txn = self.db.begin_write().map_err(backend)?;
        let existed = {
            let mut table = write_txn.open_table(STATE_TABLE).map_err(backend)?;
            let removed = table.remove(key).map_err(backend)?;
            removed.is_some()
        };
        write_txn.commit().map_err(backend)?;
        Ok(existed)
    }
}
