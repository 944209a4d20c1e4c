use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};

use tokio::sync::watch;

use crate::subscription::{Registration, Subscription};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

pub(crate) struct Shared<T> {
    cell: watch::Sender<T>,
    subscribers: Mutex<Vec<(u64, Callback<T>)>>,
    next_id: AtomicU64,
    // Held for the whole write + notify sequence so notifications keep write order.
    write_lock: Mutex<()>,
}

impl<T> Shared<T> {
    // The lock guards no data, so a panic in a user closure or callback leaves nothing to repair.
    fn write_guard(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn unsubscribe(&self, id: u64) -> bool {
        let mut subscribers = self
            .subscribers
            .lock()
            .expect("Mutex should not be poisoned");
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    pub(crate) fn is_subscribed(&self, id: u64) -> bool {
        self.subscribers
            .lock()
            .expect("Mutex should not be poisoned")
            .iter()
            .any(|(existing, _)| *existing == id)
    }
}

/// A shared, observable value.
///
/// Every write replaces the value and then runs each subscribed callback on the writing thread,
/// in registration order, before the write returns. Writes through any handle of the same
/// observable are serialized.
///
/// Callbacks must not write to the observable that is notifying them; doing so deadlocks.
///
/// Cloning an `Observable` produces another handle to the same value.
pub struct Observable<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("value", &*self.shared.cell.borrow())
            .finish()
    }
}

impl<T: Default + Clone + Send + Sync + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + Send + Sync + 'static> Observable<T> {
    /// Creates an observable holding `value`. No callbacks run.
    pub fn new(value: T) -> Self {
        let (cell, _) = watch::channel(value);
        Self {
            shared: Arc::new(Shared {
                cell,
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// Returns a copy of the current value.
    pub fn get(&self) -> T {
        self.shared.cell.borrow().clone()
    }

    /// Runs `f` with a reference to the current value.
    ///
    /// The value is read-locked while `f` runs, so `f` must not write to this observable.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.shared.cell.borrow())
    }

    /// Replaces the value and notifies subscribers.
    pub fn set(&self, value: T) {
        self.replace(value);
    }

    /// Replaces the value, notifies subscribers and returns the previous value.
    pub fn replace(&self, value: T) -> T {
        let _guard = self.shared.write_guard();

        let previous = self.shared.cell.send_replace(value.clone());
        self.notify(&value);
        previous
    }

    /// Mutates the value in place and notifies subscribers with the result.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let _guard = self.shared.write_guard();

        let mut value = self.get();
        let result = f(&mut value);
        self.shared.cell.send_replace(value.clone());
        self.notify(&value);
        result
    }

    /// Registers `callback` to run after every subsequent write.
    ///
    /// The callback is not invoked with the current value. It stays registered until the
    /// returned [`Subscription`] is dropped.
    #[must_use = "dropping the subscription immediately unregisters the callback"]
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        self.shared
            .subscribers
            .lock()
            .expect("Mutex should not be poisoned")
            .push((id, Arc::new(callback)));

        Subscription::new(Registration::new(Arc::downgrade(&self.shared), id))
    }

    /// Number of callbacks currently registered.
    pub fn subscriber_count(&self) -> usize {
        self.shared
            .subscribers
            .lock()
            .expect("Mutex should not be poisoned")
            .len()
    }

    /// Returns a receiver that observes the value from async code.
    ///
    /// Unlike [`subscribe`](Self::subscribe), a receiver only sees the latest value: writes that
    /// happen between two reads are coalesced.
    pub fn changes(&self) -> watch::Receiver<T> {
        self.shared.cell.subscribe()
    }

    fn notify(&self, value: &T) {
        // Snapshot so callbacks may subscribe or unsubscribe without deadlocking.
        let callbacks: Vec<Callback<T>> = self
            .shared
            .subscribers
            .lock()
            .expect("Mutex should not be poisoned")
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in callbacks {
            callback(value);
        }
    }
}
