#![doc = include_str!("../README.md")]

mod configuration;
mod memory;
mod raw;
mod sqlite;
mod store;

pub use configuration::{open_store, StoreConfiguration};
pub use memory::MemoryStore;
pub use raw::RawValue;
pub use sqlite::SqliteStore;
pub use store::{Store, StoreError};
