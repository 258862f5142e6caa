//! # The multicast hub.
//!
//! A [`Subject`] is one broadcast epoch: a registry of subscriber entries
//! fed by the owning [`EventStream`](crate::EventStream). It is internal —
//! external code only ever reaches a subject through weak capabilities.
//!
//! ## Rules
//! - **Subscription order**: delivery iterates entries in the order they
//!   subscribed.
//! - **Snapshot delivery**: each broadcast iterates a snapshot of the
//!   registry; entries added mid-broadcast are not notified for the value in
//!   flight, entries cancelled mid-broadcast are skipped via their active
//!   flag — even from the same call stack.
//! - **Finished is forever**: `finish` notifies every current subscriber of
//!   completion, clears the registry and marks the epoch finished; a
//!   finished subject accepts no new subscribers (they become inert) and
//!   drops everything fired into it.

use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::Fault;
use crate::lifetime::Teardown;
use crate::producers::Consumer;

struct Entry<V> {
    active: AtomicBool,
    consumer: Consumer<V>,
}

pub(crate) struct Subject<V> {
    entries: Mutex<Vec<Arc<Entry<V>>>>,
    finished: AtomicBool,
}

impl<V> Subject<V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            finished: AtomicBool::new(false),
        }
    }

    /// Completes the epoch: done to every current subscriber, registry
    /// cleared, finished flag set. Idempotent.
    pub(crate) fn finish(&self) {
        if self.finished.swap(true, Ordering::SeqCst) {
            return;
        }
        let entries = mem::take(&mut *self.entries.lock().unwrap());
        for entry in entries {
            if entry.active.swap(false, Ordering::SeqCst) {
                entry.consumer.on_done();
            }
        }
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    pub(crate) fn has_subscribers(&self) -> bool {
        !self.is_finished()
            && self
                .entries
                .lock()
                .unwrap()
                .iter()
                .any(|entry| entry.active.load(Ordering::SeqCst))
    }

    fn snapshot(&self) -> Vec<Arc<Entry<V>>> {
        self.entries.lock().unwrap().clone()
    }
}

impl<V: Send + 'static> Subject<V> {
    /// Inserts a consumer into the registry and returns the teardown that
    /// removes exactly this registration. Subscribing to a finished epoch is
    /// inert: no registration, no notifications, nothing to tear down.
    ///
    /// The teardown holds the subject weakly, so a subscriber's lifetime
    /// never keeps a dead epoch alive.
    pub(crate) fn subscribe(self: &Arc<Self>, consumer: Consumer<V>) -> Teardown {
        if self.finished.load(Ordering::SeqCst) {
            return Teardown::none();
        }
        let entry = Arc::new(Entry {
            active: AtomicBool::new(true),
            consumer,
        });
        self.entries.lock().unwrap().push(Arc::clone(&entry));

        let subject = Arc::downgrade(self);
        Teardown::call(move || {
            if entry.active.swap(false, Ordering::SeqCst) {
                if let Some(subject) = subject.upgrade() {
                    subject
                        .entries
                        .lock()
                        .unwrap()
                        .retain(|existing| !Arc::ptr_eq(existing, &entry));
                }
            }
        })
    }
}

impl<V: Clone + Send + 'static> Subject<V> {
    /// Delivers a value to every active subscriber, in subscription order.
    pub(crate) fn broadcast(&self, value: &V) {
        for entry in self.snapshot() {
            if entry.active.load(Ordering::SeqCst) {
                entry.consumer.on_next(value.clone());
            }
        }
    }

    /// Delivers an error to every active subscriber. The epoch itself stays
    /// live: errors are terminal per subscription, not per subject.
    pub(crate) fn broadcast_error(&self, fault: &Fault) {
        for entry in self.snapshot() {
            if entry.active.load(Ordering::SeqCst) {
                entry.consumer.on_error(fault.clone());
            }
        }
    }
}
