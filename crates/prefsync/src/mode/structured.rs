use std::marker::PhantomData;

use prefsync_store::{RawValue, Store};
use serde::{de::DeserializeOwned, Serialize};

use super::{log_mismatch, EncodingMode, EncodingModeKind, PersistError};
use crate::{Codec, JsonCodec};

/// Stores any `serde` type as bytes produced by codec `C`.
///
/// Suitable for records, sequences and maps. Stored data that is not a byte payload, or that
/// fails to decode as `T`, is not used.
pub struct Structured<T, C = JsonCodec>(PhantomData<fn() -> (T, C)>);

impl<T, C> EncodingMode for Structured<T, C>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
    C: Codec,
{
    type Value = T;

    const KIND: EncodingModeKind = EncodingModeKind::StructuredCodable;

    fn load(store: &dyn Store, key: &str) -> Result<Option<T>, PersistError> {
        match store.get(key)? {
            Some(RawValue::Bytes(bytes)) => Ok(Some(C::decode(&bytes)?)),
            Some(raw) => {
                log_mismatch(key, "bytes", &raw);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn persist(store: &dyn Store, key: &str, value: &T) -> Result<(), PersistError> {
        let bytes = C::encode(value)?;
        Ok(store.set(key, RawValue::Bytes(bytes))?)
    }
}
