use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Errors produced by a [`Codec`].
#[derive(Debug, Error)]
pub enum CodecError {
    /// Failed to serialize/deserialize a value as JSON
    #[error("Failed to serialize/deserialize value: {0}")]
    Json(#[from] serde_json::Error),
}

/// Turns structured values into bytes and back.
///
/// A codec must be able to decode whatever it encoded. It is used as a type parameter of the
/// structured encoding modes, so its functions take no receiver.
pub trait Codec: Send + Sync + 'static {
    /// Encodes `value` into bytes.
    fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError>;

    /// Decodes a value previously produced by [`Codec::encode`].
    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError>;
}

/// UTF-8 JSON, via `serde_json`.
///
/// Maps with integer keys are written as JSON objects with stringified keys and read back as
/// integers.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(value)?)
    }

    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
