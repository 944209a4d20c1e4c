use std::marker::PhantomData;

use prefsync_store::{RawValue, Store};

use super::{log_mismatch, EncodingMode, EncodingModeKind, PersistError};

/// Scalar types that map directly onto a [`RawValue`] without a codec.
pub trait PrimitiveValue: Clone + Send + Sync + 'static {
    /// Human-readable name for log messages.
    const NAME: &'static str;

    /// Converts the value into its raw form.
    fn to_raw(&self) -> RawValue;

    /// Converts a raw value back, or returns `None` if it holds another type or does not fit.
    fn from_raw(raw: RawValue) -> Option<Self>;
}

/// Stores a [`PrimitiveValue`] as-is.
///
/// A stored value of another type, or an integer out of range for `T`, is treated as absent.
pub struct Primitive<T>(PhantomData<fn() -> T>);

impl<T: PrimitiveValue> EncodingMode for Primitive<T> {
    type Value = T;

    const KIND: EncodingModeKind = EncodingModeKind::Primitive;

    fn load(store: &dyn Store, key: &str) -> Result<Option<T>, PersistError> {
        let Some(raw) = store.get(key)? else {
            return Ok(None);
        };

        match T::from_raw(raw.clone()) {
            Some(value) => Ok(Some(value)),
            None => {
                log_mismatch(key, T::NAME, &raw);
                Ok(None)
            }
        }
    }

    fn persist(store: &dyn Store, key: &str, value: &T) -> Result<(), PersistError> {
        Ok(store.set(key, value.to_raw())?)
    }
}

impl PrimitiveValue for bool {
    const NAME: &'static str = "bool";

    fn to_raw(&self) -> RawValue {
        RawValue::Bool(*self)
    }

    fn from_raw(raw: RawValue) -> Option<Self> {
        match raw {
            RawValue::Bool(value) => Some(value),
            _ => None,
        }
    }
}

/// Returns `value` as an integer if it has no fractional part. NaN and infinities are rejected.
fn integral(value: f64) -> Option<i128> {
    let whole = value as i128;
    (whole as f64 == value).then_some(whole)
}

/// Returns `value` as a float if it converts without rounding.
fn exact_float(value: i64) -> Option<f64> {
    let converted = value as f64;
    (converted as i128 == i128::from(value)).then_some(converted)
}

macro_rules! impl_integer {
    ($($ty:ty),+) => {
        $(
            impl PrimitiveValue for $ty {
                const NAME: &'static str = stringify!($ty);

                fn to_raw(&self) -> RawValue {
                    RawValue::Int(i64::from(*self))
                }

                fn from_raw(raw: RawValue) -> Option<Self> {
                    match raw {
                        RawValue::Int(value) => <$ty>::try_from(value).ok(),
                        RawValue::Float(value) => integral(value).and_then(|v| <$ty>::try_from(v).ok()),
                        _ => None,
                    }
                }
            }
        )+
    };
}

impl_integer!(i8, i16, i32, i64, u8, u16, u32);

impl PrimitiveValue for f64 {
    const NAME: &'static str = "f64";

    fn to_raw(&self) -> RawValue {
        RawValue::Float(*self)
    }

    fn from_raw(raw: RawValue) -> Option<Self> {
        match raw {
            RawValue::Float(value) => Some(value),
            RawValue::Int(value) => exact_float(value),
            _ => None,
        }
    }
}

impl PrimitiveValue for f32 {
    const NAME: &'static str = "f32";

    fn to_raw(&self) -> RawValue {
        RawValue::Float(f64::from(*self))
    }

    /// Stored floats are narrowed like any `f64` to `f32` cast; stored integers must convert
    /// exactly.
    fn from_raw(raw: RawValue) -> Option<Self> {
        match raw {
            RawValue::Float(value) => Some(value as f32),
            RawValue::Int(value) => {
                let converted = value as f32;
                (converted as i128 == i128::from(value)).then_some(converted)
            }
            _ => None,
        }
    }
}

impl PrimitiveValue for String {
    const NAME: &'static str = "string";

    fn to_raw(&self) -> RawValue {
        RawValue::String(self.clone())
    }

    fn from_raw(raw: RawValue) -> Option<Self> {
        match raw {
            RawValue::String(value) => Some(value),
            _ => None,
        }
    }
}

impl PrimitiveValue for Vec<u8> {
    const NAME: &'static str = "bytes";

    fn to_raw(&self) -> RawValue {
        RawValue::Bytes(self.clone())
    }

    fn from_raw(raw: RawValue) -> Option<Self> {
        raw.into_bytes()
    }
}
