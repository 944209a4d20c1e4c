use std::sync::Arc;

use prefsync_observable::{Observable, Subscription};
use prefsync_store::Store;
use tokio::sync::watch;

use crate::{EncodingMode, EncodingModeKind, Key};

/// Per-binding behaviour of a [`PersistedObservable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BindingOptions {
    /// Write the resolved initial value to the store during construction.
    ///
    /// Off by default: the store is left untouched until the first write.
    pub persist_initial: bool,
}

/// An observable value bound to one key of a [`Store`].
///
/// On construction the stored entry is loaded through the key's [`EncodingMode`]; if nothing
/// usable is stored the default is used instead. Afterwards every write updates the in-memory
/// value and then persists it, synchronously, before the write returns. Reads never touch the
/// store.
///
/// Failures are not reported: a stored entry that cannot be read yields the default, and a value
/// that cannot be encoded is simply not written, leaving the previous entry in place. Both are
/// logged at `warn`.
///
/// The persisting subscription belongs to this instance and is released when it is dropped.
/// Instances sharing a key are not coordinated; the last write wins.
///
/// # Example
/// ```rust
/// use std::sync::Arc;
///
/// use prefsync::{register_persisted_key, OptionalStructured, PersistedObservable, Store};
/// use prefsync_store::MemoryStore;
///
/// register_persisted_key!(const NICKNAME: OptionalStructured<String> = "nickname");
///
/// let store = Arc::new(MemoryStore::new());
/// let nickname = PersistedObservable::new(store.clone(), NICKNAME, None);
///
/// nickname.set(Some("bill".to_owned()));
/// assert!(store.contains("nickname").unwrap());
///
/// nickname.set(None);
/// assert!(!store.contains("nickname").unwrap());
/// ```
pub struct PersistedObservable<M: EncodingMode> {
    key: Key<M>,
    store: Arc<dyn Store>,
    observable: Observable<M::Value>,
    _persistence: Subscription,
}

impl<M: EncodingMode> std::fmt::Debug for PersistedObservable<M>
where
    M::Value: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedObservable")
            .field("key", &self.key.name())
            .field("mode", &M::KIND)
            .field("value", &self.observable)
            .finish()
    }
}

impl<M: EncodingMode> PersistedObservable<M> {
    /// Binds `key` in `store`, starting from the stored value or `default`.
    pub fn new(store: Arc<dyn Store>, key: Key<M>, default: M::Value) -> Self {
        Self::with_options(store, key, default, BindingOptions::default())
    }

    /// Like [`new`](Self::new), with explicit [`BindingOptions`].
    pub fn with_options(
        store: Arc<dyn Store>,
        key: Key<M>,
        default: M::Value,
        options: BindingOptions,
    ) -> Self {
        let initial = load::<M>(store.as_ref(), key.name()).unwrap_or(default);
        let observable = Observable::new(initial);

        if options.persist_initial {
            observable.with(|value| persist::<M>(store.as_ref(), key.name(), value));
        }

        let persistence = {
            let store = Arc::clone(&store);
            let name = key.name().to_owned();
            observable.subscribe(move |value| persist::<M>(store.as_ref(), &name, value))
        };

        Self {
            key,
            store,
            observable,
            _persistence: persistence,
        }
    }

    /// The storage key this value is bound to.
    pub fn key(&self) -> &str {
        self.key.name()
    }

    /// The encoding mode used for this value.
    pub fn encoding_mode(&self) -> EncodingModeKind {
        M::KIND
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Returns a copy of the current value.
    pub fn get(&self) -> M::Value {
        self.observable.get()
    }

    /// Runs `f` with a reference to the current value.
    pub fn with<R>(&self, f: impl FnOnce(&M::Value) -> R) -> R {
        self.observable.with(f)
    }

    /// Replaces the value and persists it.
    pub fn set(&self, value: M::Value) {
        self.observable.set(value);
    }

    /// Replaces the value, persists it and returns the previous value.
    pub fn replace(&self, value: M::Value) -> M::Value {
        self.observable.replace(value)
    }

    /// Mutates the value in place, then persists the result.
    pub fn update<R>(&self, f: impl FnOnce(&mut M::Value) -> R) -> R {
        self.observable.update(f)
    }

    /// Registers an additional callback that runs after each write, once the value is persisted.
    #[must_use = "dropping the subscription immediately unregisters the callback"]
    pub fn subscribe(
        &self,
        callback: impl Fn(&M::Value) + Send + Sync + 'static,
    ) -> Subscription {
        self.observable.subscribe(callback)
    }

    /// Returns a receiver that observes the value from async code.
    pub fn changes(&self) -> watch::Receiver<M::Value> {
        self.observable.changes()
    }

    /// The underlying observable.
    ///
    /// Writes made through it, or through clones of it, are persisted only while this
    /// `PersistedObservable` is alive.
    pub fn observable(&self) -> &Observable<M::Value> {
        &self.observable
    }
}

fn load<M: EncodingMode>(store: &dyn Store, key: &str) -> Option<M::Value> {
    match M::load(store, key) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Failed to load persisted value '{}': {:?}", key, e);
            None
        }
    }
}

fn persist<M: EncodingMode>(store: &dyn Store, key: &str, value: &M::Value) {
    if let Err(e) = M::persist(store, key, value) {
        log::warn!("Failed to persist value '{}': {:?}", key, e);
    }
}
