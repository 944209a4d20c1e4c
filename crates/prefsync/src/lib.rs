#![doc = include_str!("../README.md")]

/// Encoding used for structured values.
pub mod codec;

mod key;
mod mode;
mod persisted;

pub use codec::{Codec, CodecError, JsonCodec};
pub use key::Key;
pub use mode::{
    EncodingMode, EncodingModeKind, OptionalStructured, PersistError, Primitive, PrimitiveValue,
    Structured,
};
pub use persisted::{BindingOptions, PersistedObservable};
pub use prefsync_observable::{Observable, Subscription};
pub use prefsync_store::{RawValue, Store};
