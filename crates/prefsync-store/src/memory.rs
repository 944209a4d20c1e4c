use std::{collections::HashMap, sync::RwLock};

use crate::{RawValue, Store, StoreError};

/// A process-local [`Store`] backed by a hash map.
///
/// Nothing is written to disk, so entries are lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, RawValue>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .expect("RwLock should not be poisoned")
            .len()
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries
            .write()
            .expect("RwLock should not be poisoned")
            .clear();
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<RawValue>, StoreError> {
        Ok(self
            .entries
            .read()
            .expect("RwLock should not be poisoned")
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: RawValue) -> Result<(), StoreError> {
        self.entries
            .write()
            .expect("RwLock should not be poisoned")
            .insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .expect("RwLock should not be poisoned")
            .remove(key);
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self
            .entries
            .read()
            .expect("RwLock should not be poisoned")
            .contains_key(key))
    }
}
