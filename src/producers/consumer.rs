//! # The consumer callback triple.
//!
//! A [`Consumer`] is what a generator emits through: `on_next` for values,
//! `on_error` / `on_done` for the terminal notification. It is handed to the
//! generator by [`Producer::start*`](crate::Producer::start) and may be cloned
//! freely — clones share one subscription, so a generator can move a copy
//! onto another thread or task for deferred emission.
//!
//! ## Rules
//! - **Terminal at most once**: the first `on_error` or `on_done` wins;
//!   anything after a terminal is silently dropped. Well-behaved generators
//!   never notify after a terminal; this is defensive tolerance, not a
//!   supported pattern.
//! - **Terminal ends the subscription**: after delivering the terminal
//!   callback the consumer unsubscribes its lifetime, which runs the
//!   generator's teardown and detaches any registrations.
//! - **State release**: terminal delivery clears all stored callbacks, so
//!   captured state is dropped even while clones of the consumer remain.
//! - **No re-entrant self-notification**: a callback must not synchronously
//!   notify the consumer it is running under (single-logical-thread
//!   contract). Completing a *different* consumer, or this consumer's whole
//!   stream, is fine — locks are never held around user callbacks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::Fault;
use crate::lifetime::LifetimeHandle;

struct Callbacks<V> {
    next: Option<Box<dyn FnMut(V) + Send>>,
    error: Option<Box<dyn FnOnce(Fault) + Send>>,
    done: Option<Box<dyn FnOnce() + Send>>,
}

struct Inner<V> {
    terminated: AtomicBool,
    callbacks: Mutex<Callbacks<V>>,
    alive: LifetimeHandle,
}

/// Forwarding endpoint for one subscription.
///
/// Clones share the subscription: the terminal-at-most-once rule and the
/// lifetime are common to all of them.
pub struct Consumer<V> {
    inner: Arc<Inner<V>>,
}

impl<V> Clone for Consumer<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> Consumer<V> {
    pub(crate) fn new(
        next: Box<dyn FnMut(V) + Send>,
        error: Box<dyn FnOnce(Fault) + Send>,
        done: Box<dyn FnOnce() + Send>,
        alive: LifetimeHandle,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                terminated: AtomicBool::new(false),
                callbacks: Mutex::new(Callbacks {
                    next: Some(next),
                    error: Some(error),
                    done: Some(done),
                }),
                alive,
            }),
        }
    }

    /// Delivers a value. Dropped silently after a terminal notification.
    pub fn on_next(&self, value: V) {
        if self.inner.terminated.load(Ordering::SeqCst) {
            return;
        }
        // The callback is taken out for the duration of the call so no lock
        // is held around user code.
        let mut next = {
            let mut callbacks = self.inner.callbacks.lock().unwrap();
            match callbacks.next.take() {
                Some(next) => next,
                None => return,
            }
        };
        next(value);
        let mut callbacks = self.inner.callbacks.lock().unwrap();
        if !self.inner.terminated.load(Ordering::SeqCst) {
            callbacks.next = Some(next);
        }
    }

    /// Delivers the error terminal, then ends the subscription lifetime.
    pub fn on_error(&self, fault: Fault) {
        if self.inner.terminated.swap(true, Ordering::SeqCst) {
            return;
        }
        let error = {
            let mut callbacks = self.inner.callbacks.lock().unwrap();
            callbacks.next = None;
            callbacks.done = None;
            callbacks.error.take()
        };
        if let Some(error) = error {
            error(fault);
        }
        self.inner.alive.unsubscribe();
    }

    /// Delivers the completion terminal, then ends the subscription lifetime.
    pub fn on_done(&self) {
        if self.inner.terminated.swap(true, Ordering::SeqCst) {
            return;
        }
        let done = {
            let mut callbacks = self.inner.callbacks.lock().unwrap();
            callbacks.next = None;
            callbacks.error = None;
            callbacks.done.take()
        };
        if let Some(done) = done {
            done();
        }
        self.inner.alive.unsubscribe();
    }

    /// Returns `true` once a terminal notification has been delivered.
    pub fn is_terminated(&self) -> bool {
        self.inner.terminated.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifetime::Lifetime;
    use std::sync::atomic::AtomicUsize;

    fn collecting_consumer(
        seen: Arc<Mutex<Vec<i32>>>,
        done_count: Arc<AtomicUsize>,
        alive: &Lifetime,
    ) -> Consumer<i32> {
        let sink = Arc::clone(&seen);
        Consumer::new(
            Box::new(move |value| sink.lock().unwrap().push(value)),
            Box::new(|_fault| {}),
            Box::new(move || {
                done_count.fetch_add(1, Ordering::SeqCst);
            }),
            alive.handle(),
        )
    }

    #[test]
    fn test_values_flow_until_done() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let dones = Arc::new(AtomicUsize::new(0));
        let alive = Lifetime::new();
        let consumer = collecting_consumer(Arc::clone(&seen), Arc::clone(&dones), &alive);

        consumer.on_next(1);
        consumer.on_next(2);
        consumer.on_done();
        consumer.on_next(3); // after terminal: dropped
        consumer.on_done(); // second terminal: dropped

        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
        assert_eq!(dones.load(Ordering::SeqCst), 1);
        assert!(consumer.is_terminated());
    }

    #[test]
    fn test_error_preempts_done() {
        let errors = Arc::new(AtomicUsize::new(0));
        let dones = Arc::new(AtomicUsize::new(0));
        let alive = Lifetime::new();
        let error_count = Arc::clone(&errors);
        let done_count = Arc::clone(&dones);
        let consumer: Consumer<i32> = Consumer::new(
            Box::new(|_| {}),
            Box::new(move |_fault| {
                error_count.fetch_add(1, Ordering::SeqCst);
            }),
            Box::new(move || {
                done_count.fetch_add(1, Ordering::SeqCst);
            }),
            alive.handle(),
        );

        consumer.on_error(Fault::message("boom"));
        consumer.on_done();
        assert_eq!(errors.load(Ordering::SeqCst), 1);
        assert_eq!(dones.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_terminal_ends_lifetime() {
        let alive = Lifetime::new();
        let torn_down = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&torn_down);
        alive.add(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let consumer: Consumer<i32> = Consumer::new(
            Box::new(|_| {}),
            Box::new(|_| {}),
            Box::new(|| {}),
            alive.handle(),
        );
        consumer.on_done();
        assert_eq!(torn_down.load(Ordering::SeqCst), 1);
        assert!(!alive.is_active());
    }

    #[test]
    fn test_terminal_releases_captured_state() {
        let captured = Arc::new(());
        let alive = Lifetime::new();
        let in_next = Arc::clone(&captured);
        let in_done = Arc::clone(&captured);
        let consumer: Consumer<i32> = Consumer::new(
            Box::new(move |_| {
                let _ = &in_next;
            }),
            Box::new(|_| {}),
            Box::new(move || {
                let _ = &in_done;
            }),
            alive.handle(),
        );
        assert_eq!(Arc::strong_count(&captured), 3);
        consumer.on_done();
        // consumer is still held, but its callbacks (and their captures) are gone
        assert_eq!(Arc::strong_count(&captured), 1);
    }

    #[test]
    fn test_clones_share_terminal_state() {
        let dones = Arc::new(AtomicUsize::new(0));
        let alive = Lifetime::new();
        let done_count = Arc::clone(&dones);
        let consumer: Consumer<i32> = Consumer::new(
            Box::new(|_| {}),
            Box::new(|_| {}),
            Box::new(move || {
                done_count.fetch_add(1, Ordering::SeqCst);
            }),
            alive.handle(),
        );
        let clone = consumer.clone();
        clone.on_done();
        consumer.on_done();
        assert_eq!(dones.load(Ordering::SeqCst), 1);
    }
}
