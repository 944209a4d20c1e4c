use std::{path::PathBuf, sync::Arc};

use crate::{MemoryStore, SqliteStore, Store, StoreError};

/// Selects the backend returned by [`open_store`].
#[derive(Debug, Clone)]
pub enum StoreConfiguration {
    /// A [`MemoryStore`]; nothing outlives the process.
    Memory,

    /// A [`SqliteStore`] at the given path. Different users or profiles should use different
    /// files.
    Sqlite {
        /// The file path to the SQLite database.
        file_path: PathBuf,
    },
}

/// Opens the store described by `configuration`.
pub fn open_store(configuration: StoreConfiguration) -> Result<Arc<dyn Store>, StoreError> {
    match configuration {
        StoreConfiguration::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreConfiguration::Sqlite { file_path } => Ok(Arc::new(SqliteStore::open(file_path)?)),
    }
}
