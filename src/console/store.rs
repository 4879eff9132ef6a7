//! Persisted console settings.
//!
//! The console keeps exactly one setting of its own, the address infix, per
//! console owner. Everything else lives in the host's object model.
//!
//! # Schema
//!
//! ```text
//! console_nv: "infix:<user>" -> infix
//! ```

use crate::error::StoreError;
use crate::state::User;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

const CONSOLE_NV: TableDefinition<&str, &str> = TableDefinition::new("console_nv");

/// Simple key/value persistence.
pub trait NvStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Volatile store used when no database path is configured.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Redb-backed store.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open (or create) the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let db = Database::create(path).map_err(|e| StoreError::Database(e.to_string()))?;

        // Ensure the table exists so reads never hit a missing table.
        let write_txn = db
            .begin_write()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        {
            let _ = write_txn
                .open_table(CONSOLE_NV)
                .map_err(|e| StoreError::Database(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        info!(path = %path.display(), "Console store opened");
        Ok(Self { db })
    }
}

impl NvStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        let table = read_txn
            .open_table(CONSOLE_NV)
            .map_err(|e| StoreError::Database(e.to_string()))?;
        let value = table
            .get(key)
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(value.map(|guard| guard.value().to_string()))
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(CONSOLE_NV)
                .map_err(|e| StoreError::Database(e.to_string()))?;
            table
                .insert(key, value)
                .map_err(|e| StoreError::Database(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }
}

fn infix_key(user: &str) -> String {
    format!("infix:{}", user)
}

/// The address infix of `owner`'s console, falling back to their status prefix.
pub fn load_infix(store: &dyn NvStore, owner: &User) -> String {
    match store.get(&infix_key(&owner.name)) {
        Ok(Some(infix)) if !infix.is_empty() => infix,
        Ok(_) => owner.status_prefix.clone(),
        Err(e) => {
            warn!(user = %owner.name, error = %e, "Failed to read console infix");
            owner.status_prefix.clone()
        }
    }
}

pub fn save_infix(store: &mut dyn NvStore, owner: &str, infix: &str) -> Result<(), StoreError> {
    store.put(&infix_key(owner), infix)
}
