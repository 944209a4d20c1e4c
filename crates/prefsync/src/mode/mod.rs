//! Encoding modes: how a value is translated to and from a [`RawValue`].

use prefsync_store::{RawValue, Store, StoreError};
use thiserror::Error;

use crate::CodecError;

mod optional;
mod primitive;
mod structured;

pub use optional::OptionalStructured;
pub use primitive::{Primitive, PrimitiveValue};
pub use structured::Structured;

/// Runtime tag of an [`EncodingMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingModeKind {
    /// Stored directly as a scalar [`RawValue`].
    Primitive,
    /// Encoded with a codec and stored as [`RawValue::Bytes`].
    StructuredCodable,
    /// Like `StructuredCodable`, with `None` represented by a missing entry.
    OptionalStructuredCodable,
}

/// Errors that can occur while loading or persisting a value.
///
/// These never reach users of [`PersistedObservable`](crate::PersistedObservable), which logs
/// them and carries on.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The value could not be encoded, or the stored bytes could not be decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// The store operation failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Strategy binding a value type to the raw representation kept in a [`Store`].
///
/// Implemented by the marker types [`Primitive`], [`Structured`] and [`OptionalStructured`]; the
/// mode is part of a [`Key`](crate::Key)'s type, so picking the wrong one is a compile error
/// rather than a runtime cast.
pub trait EncodingMode: Send + Sync + 'static {
    /// The in-memory value type.
    type Value: Clone + Send + Sync + 'static;

    /// Runtime tag of this mode.
    const KIND: EncodingModeKind;

    /// Reads the value stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing usable is stored and the caller's default should be used.
    fn load(store: &dyn Store, key: &str) -> Result<Option<Self::Value>, PersistError>;

    /// Writes `value` under `key`, replacing or removing the existing entry.
    fn persist(store: &dyn Store, key: &str, value: &Self::Value) -> Result<(), PersistError>;
}

pub(crate) fn log_mismatch(key: &str, expected: &str, raw: &RawValue) {
    log::debug!(
        "Ignoring stored value for '{}': expected {}, found {}",
        key,
        expected,
        raw.kind()
    );
}
