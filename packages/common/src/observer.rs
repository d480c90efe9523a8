//! # Observer registry
//!
//! Callback list used by the document session and the palette stores to
//! announce committed changes. Subscribing hands back a [`Subscription`];
//! the owner releases it with [`Observers::unsubscribe`] at teardown.
//! Dropping a subscription does not unsubscribe.

use std::fmt;

/// Handle identifying one registered callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use = "keep the subscription to unsubscribe later"]
pub struct Subscription(u64);

type Callback<E> = Box<dyn FnMut(&E) + Send>;

/// Ordered list of callbacks notified with `&E`
pub struct Observers<E> {
    next_id: u64,
    callbacks: Vec<(Subscription, Callback<E>)>,
}

impl<E> Observers<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            callbacks: Vec::new(),
        }
    }

    /// Register a callback, invoked after every notification in registration order
    pub fn subscribe<F>(&mut self, callback: F) -> Subscription
    where
        F: FnMut(&E) + Send + 'static,
    {
        self.next_id += 1;
        let subscription = Subscription(self.next_id);
        self.callbacks.push((subscription, Box::new(callback)));
        subscription
    }

    /// Remove a callback. Returns false if it was already removed.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(s, _)| *s != subscription);
        self.callbacks.len() != before
    }

    pub fn notify(&mut self, event: &E) {
        for (_, callback) in &mut self.callbacks {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Observers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.callbacks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_notify_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut observers = Observers::new();

        let a = seen.clone();
        let _s1 = observers.subscribe(move |e: &u32| a.lock().unwrap().push(("a", *e)));
        let b = seen.clone();
        let _s2 = observers.subscribe(move |e: &u32| b.lock().unwrap().push(("b", *e)));

        observers.notify(&7);

        assert_eq!(*seen.lock().unwrap(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let count = Arc::new(Mutex::new(0));
        let mut observers = Observers::new();

        let c = count.clone();
        let sub = observers.subscribe(move |_: &()| *c.lock().unwrap() += 1);
        observers.notify(&());

        assert!(observers.unsubscribe(sub));
        assert!(!observers.unsubscribe(sub));
        observers.notify(&());

        assert_eq!(*count.lock().unwrap(), 1);
        assert!(observers.is_empty());
    }
}
