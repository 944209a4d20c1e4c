use std::sync::Weak;

use crate::observable::Shared;

trait Unsubscribe: Send + Sync {
    fn is_subscribed(&self) -> bool;
    fn unsubscribe(&self);
}

pub(crate) struct Registration<T> {
    shared: Weak<Shared<T>>,
    id: u64,
}

impl<T> Registration<T> {
    pub(crate) fn new(shared: Weak<Shared<T>>, id: u64) -> Self {
        Self { shared, id }
    }
}

impl<T: Send + Sync> Unsubscribe for Registration<T> {
    fn is_subscribed(&self) -> bool {
        self.shared
            .upgrade()
            .is_some_and(|shared| shared.is_subscribed(self.id))
    }

    fn unsubscribe(&self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.unsubscribe(self.id);
        }
    }
}

/// Keeps a callback registered with an [`Observable`](crate::Observable).
///
/// Dropping the subscription unregisters the callback. It does not keep the observable alive.
#[must_use = "dropping the subscription immediately unregisters the callback"]
pub struct Subscription {
    registration: Option<Box<dyn Unsubscribe>>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

impl Subscription {
    pub(crate) fn new<T: Send + Sync + 'static>(registration: Registration<T>) -> Self {
        Self {
            registration: Some(Box::new(registration)),
        }
    }

    /// Returns `true` while the callback is still registered with a live observable.
    pub fn is_active(&self) -> bool {
        self.registration
            .as_ref()
            .is_some_and(|registration| registration.is_subscribed())
    }

    /// Unregisters the callback now instead of on drop.
    pub fn unsubscribe(mut self) {
        if let Some(registration) = self.registration.take() {
            registration.unsubscribe();
        }
    }

    /// Leaves the callback registered for as long as the observable lives.
    pub fn detach(mut self) {
        self.registration = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registration) = self.registration.take() {
            registration.unsubscribe();
        }
    }
}
