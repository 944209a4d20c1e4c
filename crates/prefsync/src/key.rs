//! Type-safe keys for persisted values.

use std::{borrow::Cow, marker::PhantomData};

/// Register a type-safe persisted key.
///
/// This is the primary way to create keys. It ties a store key to an encoding mode, and through
/// it to the value type, at compile time. Empty names are rejected at compile time.
///
/// # Example
/// ```rust
/// use prefsync::{register_persisted_key, OptionalStructured, Primitive};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Serialize, Deserialize)]
/// struct Account {
///     email: String,
/// }
///
/// register_persisted_key!(pub const THEME: Primitive<String> = "theme");
/// register_persisted_key!(pub const ACCOUNT: OptionalStructured<Account> = "account");
/// ```
#[macro_export]
macro_rules! register_persisted_key {
    ($vis:vis const $name:ident: $mode:ty = $key:literal) => {
        $vis const $name: $crate::Key<$mode> = $crate::Key::new($key);
        const _: () = assert!(
            !$key.is_empty(),
            concat!("Persisted key '", stringify!($name), "' must not be empty")
        );
    };
}

/// Name of a slot in a [`Store`](crate::Store), typed by the [`EncodingMode`](crate::EncodingMode)
/// used to read and write it.
///
/// Use the [`register_persisted_key!`](crate::register_persisted_key) macro for keys known at
/// compile time and [`Key::owned`] for keys built at runtime.
pub struct Key<M> {
    name: Cow<'static, str>,
    _marker: PhantomData<fn() -> M>,
}

impl<M> Key<M> {
    /// Create a new type-safe key with the given storage name.
    #[doc(hidden)]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            _marker: PhantomData,
        }
    }

    /// Create a key from a name only known at runtime, such as one derived from a user id.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty.
    pub fn owned(name: impl Into<String>) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "persisted keys must not be empty");
        Self {
            name: Cow::Owned(name),
            _marker: PhantomData,
        }
    }

    /// Get the string key name used for storage.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<M> Clone for Key<M> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            _marker: PhantomData,
        }
    }
}

impl<M> std::fmt::Debug for Key<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Key").field(&self.name).finish()
    }
}

impl<M> std::fmt::Display for Key<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
