use serde::{Deserialize, Serialize};

/// The representation a [`Store`](crate::Store) holds for each key.
///
/// Scalars are kept as-is so that simple settings stay readable by other tools. Anything else is
/// expected to arrive already encoded as [`RawValue::Bytes`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum RawValue {
    #[allow(missing_docs)]
    Bool(bool),
    #[allow(missing_docs)]
    Int(i64),
    #[allow(missing_docs)]
    Float(f64),
    #[allow(missing_docs)]
    String(String),
    /// An opaque, already-encoded payload.
    Bytes(Vec<u8>),
}

impl RawValue {
    /// Name of the variant, used in log messages.
    pub fn kind(&self) -> &'static str {
        match self {
            RawValue::Bool(_) => "bool",
            RawValue::Int(_) => "int",
            RawValue::Float(_) => "float",
            RawValue::String(_) => "string",
            RawValue::Bytes(_) => "bytes",
        }
    }

    /// Returns the payload if this is a [`RawValue::Bytes`].
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            RawValue::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Consumes the value, returning the payload if this is a [`RawValue::Bytes`].
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            RawValue::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Int(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::String(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::String(value.to_owned())
    }
}

impl From<Vec<u8>> for RawValue {
    fn from(value: Vec<u8>) -> Self {
        RawValue::Bytes(value)
    }
}
