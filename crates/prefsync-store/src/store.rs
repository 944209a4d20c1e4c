use thiserror::Error;

use crate::RawValue;

/// An error resulting from operations on a [`Store`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// A stored entry could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An internal database error.
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// A flat key-value store holding [`RawValue`]s.
///
/// Implementations must make a single `get`, `set` or `remove` atomic with respect to other
/// calls on the same key. No coordination across keys or across processes is expected.
pub trait Store: Send + Sync {
    /// Retrieves the raw value stored under `key`, or `None` if unset.
    fn get(&self, key: &str) -> Result<Option<RawValue>, StoreError>;

    /// Creates or overwrites the entry under `key`.
    fn set(&self, key: &str, value: RawValue) -> Result<(), StoreError>;

    /// Deletes the entry under `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Returns `true` if an entry exists under `key`.
    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}
