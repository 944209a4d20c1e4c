use std::marker::PhantomData;

use prefsync_store::{RawValue, Store};
use serde::{de::DeserializeOwned, Serialize};

use super::{log_mismatch, EncodingMode, EncodingModeKind, PersistError};
use crate::{Codec, JsonCodec};

/// Stores an `Option<T>`: `Some` as the encoded payload of `T`, `None` as a missing entry.
///
/// A missing entry, or one that cannot be decoded as `T`, leaves the caller's default in place.
pub struct OptionalStructured<T, C = JsonCodec>(PhantomData<fn() -> (T, C)>);

impl<T, C> EncodingMode for OptionalStructured<T, C>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
    C: Codec,
{
    type Value = Option<T>;

    const KIND: EncodingModeKind = EncodingModeKind::OptionalStructuredCodable;

    fn load(store: &dyn Store, key: &str) -> Result<Option<Option<T>>, PersistError> {
        match store.get(key)? {
            Some(RawValue::Bytes(bytes)) => Ok(Some(Some(C::decode(&bytes)?))),
            Some(raw) => {
                log_mismatch(key, "bytes", &raw);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn persist(store: &dyn Store, key: &str, value: &Option<T>) -> Result<(), PersistError> {
        match value {
            Some(value) => {
                let bytes = C::encode(value)?;
                Ok(store.set(key, RawValue::Bytes(bytes))?)
            }
            None => Ok(store.remove(key)?),
        }
    }
}
