//! # Lazily-materialized multicast broadcaster.
//!
//! An [`EventStream`] owns at most one live [`Subject`] epoch and exposes the
//! two halves of a hot broadcast:
//!
//! ```text
//! writer side                      reader side
//! ───────────                      ───────────
//! fire(value)        ──►  Subject  ◄── events() ── Producer<V>
//! fire_error(fault)        epoch          │
//! fire_done()               │             └─ each start inserts one
//!      │                    │                subscriber; cancelling that
//!      │                    │                subscriber's lifetime removes
//!      └─ finishes and      │                exactly that registration
//!         releases the      └─ subscribers hold the epoch weakly and can
//!         current epoch        never keep it alive on their own
//! ```
//!
//! ## Rules
//! - The subject is created on first access (`fire*` or `events()`), and
//!   torn down exactly once per epoch: on `fire_done()` or on drop.
//! - Firing into a stream whose epoch is gone or finished silently drops the
//!   value; there are no delivery errors.
//! - After teardown the stream is empty again: the next access starts a
//!   fresh epoch, invisible to subscribers of the old one.
//! - Dropping the stream (including overwriting it by assignment) implies
//!   `fire_done`, so attached subscribers are never left dangling.
//! - All `fire*` / `events()` / subscribe traffic belongs to one logical
//!   thread or an external serialization layer; registry mutation is
//!   lock-guarded so misuse cannot corrupt memory, but cross-thread delivery
//!   ordering is not guaranteed.
//!
//! ## Example
//! ```rust
//! use eventcast::EventStream;
//! use std::sync::{Arc, Mutex};
//!
//! let stream = EventStream::<i32>::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink = Arc::clone(&seen);
//! let alive = stream.events().start(
//!     move |value| sink.lock().unwrap().push(value),
//!     |_fault| {},
//!     || {},
//! );
//!
//! stream.fire(1);
//! stream.fire(2);
//! alive.unsubscribe();
//! stream.fire(3); // no subscriber left: dropped
//!
//! assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
//! ```

use std::sync::{Arc, Mutex, Weak};

use crate::error::Fault;
use crate::lifetime::Teardown;
use crate::producers::{make_producer, Producer};
use crate::streams::subject::Subject;

/// Hot multicast broadcaster with explicit writer-side operations.
pub struct EventStream<V> {
    epoch: Mutex<Option<Arc<Subject<V>>>>,
}

impl<V: Clone + Send + 'static> EventStream<V> {
    /// Creates an empty stream; no subject exists until first access.
    pub fn new() -> Self {
        Self {
            epoch: Mutex::new(None),
        }
    }

    /// Resolves the current epoch, lazily creating one if the stream holds
    /// none (or only a finished one). Returns a weak reference: callers that
    /// outlive the stream must not prolong the subject.
    fn subject(&self) -> Weak<Subject<V>> {
        let mut slot = self.epoch.lock().unwrap();
        match slot.as_ref() {
            Some(subject) if !subject.is_finished() => Arc::downgrade(subject),
            _ => {
                let fresh = Arc::new(Subject::new());
                let weak = Arc::downgrade(&fresh);
                *slot = Some(fresh);
                weak
            }
        }
    }

    /// Multicasts a value to every current subscriber, synchronously, in
    /// subscription order.
    pub fn fire(&self, value: V) {
        self.fire_copy(&value);
    }

    /// Borrowing variant of [`fire`](EventStream::fire).
    pub fn fire_copy(&self, value: &V) {
        if let Some(subject) = self.subject().upgrade() {
            subject.broadcast(value);
        }
    }

    /// Multicasts an error. Terminal for each receiving subscription, but
    /// the epoch itself stays live for later subscribers.
    pub fn fire_error(&self, fault: Fault) {
        self.fire_error_copy(&fault);
    }

    /// Borrowing variant of [`fire_error`](EventStream::fire_error).
    pub fn fire_error_copy(&self, fault: &Fault) {
        if let Some(subject) = self.subject().upgrade() {
            subject.broadcast_error(fault);
        }
    }

    /// Completes the current epoch: every subscriber is told done, the
    /// registry is cleared, and the stream releases its subject. The next
    /// `fire*`/`events()` call starts a fresh epoch.
    pub fn fire_done(&self) {
        let taken = self.epoch.lock().unwrap().take();
        if let Some(subject) = taken {
            subject.finish();
        }
    }

    /// Returns the reader-side producer for the current epoch.
    ///
    /// Each start of the returned producer registers one subscriber; the
    /// registration's teardown lands in that subscriber's lifetime, so
    /// cancelling it detaches exactly that subscriber. The producer holds
    /// the epoch weakly: started after the epoch died, it is silently inert.
    pub fn events(&self) -> Producer<V> {
        let weak = self.subject();
        make_producer(move |consumer| match weak.upgrade() {
            Some(subject) => subject.subscribe(consumer),
            None => Teardown::none(),
        })
    }

    /// Returns `true` while the current epoch has at least one subscriber.
    pub fn has_consumers(&self) -> bool {
        self.epoch
            .lock()
            .unwrap()
            .as_ref()
            .map(|subject| subject.has_subscribers())
            .unwrap_or(false)
    }

    /// Writer capability bound to the current epoch, for bridges.
    pub(crate) fn sink(&self) -> StreamSink<V> {
        StreamSink {
            subject: self.subject(),
        }
    }
}

impl<V: Clone + Send + Sync + 'static> EventStream<V> {
    /// Like [`events`](EventStream::events), prepending one value delivered
    /// synchronously to each new subscriber before live delivery begins.
    pub fn events_starting_with(&self, value: V) -> Producer<V> {
        let live = self.events();
        make_producer(move |consumer| {
            consumer.on_next(value.clone());
            live.clone().feed(&consumer)
        })
    }
}

impl<V: Clone + Send + 'static> Default for EventStream<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Drop for EventStream<V> {
    fn drop(&mut self) {
        // same contract as fire_done: subscribers are never left dangling
        let taken = self.epoch.lock().unwrap().take();
        if let Some(subject) = taken {
            subject.finish();
        }
    }
}

/// Weak writer capability used by [`start_to_stream`](crate::start_to_stream).
///
/// Bound to the epoch captured at bridge time; once that epoch is gone or
/// finished every call is a silent no-op.
pub(crate) struct StreamSink<V> {
    subject: Weak<Subject<V>>,
}

impl<V> Clone for StreamSink<V> {
    fn clone(&self) -> Self {
        Self {
            subject: Weak::clone(&self.subject),
        }
    }
}

impl<V: Clone + Send + 'static> StreamSink<V> {
    pub(crate) fn next(&self, value: V) {
        if let Some(subject) = self.subject.upgrade() {
            subject.broadcast(&value);
        }
    }

    pub(crate) fn error(&self, fault: Fault) {
        if let Some(subject) = self.subject.upgrade() {
            subject.broadcast_error(&fault);
        }
    }

    pub(crate) fn done(&self) {
        if let Some(subject) = self.subject.upgrade() {
            subject.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifetime::Lifetime;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    fn subscribe_collecting(
        stream: &EventStream<i32>,
        seen: &Arc<Mutex<Vec<i32>>>,
        done: &Arc<AtomicBool>,
    ) -> Lifetime {
        let sink = Arc::clone(seen);
        let done_flag = Arc::clone(done);
        stream.events().start(
            move |value| sink.lock().unwrap().push(value),
            |_fault| {},
            move || done_flag.store(true, Ordering::SeqCst),
        )
    }

    #[test]
    fn test_multicast_preserves_order_for_every_subscriber() {
        let stream = EventStream::<i32>::new();
        let first = Arc::new(Mutex::new(Vec::new()));
        let second = Arc::new(Mutex::new(Vec::new()));
        let done = Arc::new(AtomicBool::new(false));
        let _a = subscribe_collecting(&stream, &first, &done);
        let _b = subscribe_collecting(&stream, &second, &done);

        for value in [1, 2, 3] {
            stream.fire(value);
        }
        assert_eq!(*first.lock().unwrap(), vec![1, 2, 3]);
        assert_eq!(*second.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_firing_without_subscribers_is_silent() {
        let stream = EventStream::<i32>::new();
        stream.fire(1);
        stream.fire_error(Fault::message("nobody listening"));
        stream.fire_done();
        stream.fire(2); // fresh epoch, still nobody
        assert!(!stream.has_consumers());
    }

    #[test]
    fn test_done_starts_a_fresh_epoch() {
        let stream = EventStream::<i32>::new();
        let before = Arc::new(Mutex::new(Vec::new()));
        let done = Arc::new(AtomicBool::new(false));
        let _old = subscribe_collecting(&stream, &before, &done);

        stream.fire(1);
        stream.fire_done();
        assert!(done.load(Ordering::SeqCst));

        // values of the next epoch never reach the completed subscriber
        stream.fire(99);
        assert_eq!(*before.lock().unwrap(), vec![1]);

        let after = Arc::new(Mutex::new(Vec::new()));
        let fresh_done = Arc::new(AtomicBool::new(false));
        let _new = subscribe_collecting(&stream, &after, &fresh_done);
        stream.fire(2);
        assert_eq!(*after.lock().unwrap(), vec![2]);
    }

    #[test]
    fn test_events_producer_from_dead_epoch_is_inert() {
        let stream = EventStream::<i32>::new();
        let stale = stream.events();
        stream.fire_done();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let done = Arc::new(AtomicBool::new(false));
        let sink = Arc::clone(&seen);
        let done_flag = Arc::clone(&done);
        let _alive = stale.start(
            move |value| sink.lock().unwrap().push(value),
            |_fault| {},
            move || done_flag.store(true, Ordering::SeqCst),
        );
        stream.fire(1); // goes to the fresh epoch, not the stale producer
        assert!(seen.lock().unwrap().is_empty());
        assert!(!done.load(Ordering::SeqCst));
    }

    #[test]
    fn test_unsubscribing_detaches_exactly_one_subscriber() {
        let stream = EventStream::<i32>::new();
        let kept = Arc::new(Mutex::new(Vec::new()));
        let dropped = Arc::new(Mutex::new(Vec::new()));
        let done = Arc::new(AtomicBool::new(false));
        let keep = subscribe_collecting(&stream, &kept, &done);
        let cancel = subscribe_collecting(&stream, &dropped, &done);

        stream.fire(1);
        cancel.unsubscribe();
        stream.fire(2);
        keep.unsubscribe();
        stream.fire(3);

        assert_eq!(*kept.lock().unwrap(), vec![1, 2]);
        assert_eq!(*dropped.lock().unwrap(), vec![1]);
    }

    #[test]
    fn test_subscriber_cancelled_mid_broadcast_is_skipped() {
        let stream = EventStream::<i32>::new();
        let cancel_slot: Arc<Mutex<Option<Lifetime>>> = Arc::new(Mutex::new(None));
        let victim_seen = Arc::new(Mutex::new(Vec::new()));

        // first subscriber cancels the second while a value is in flight
        let slot = Arc::clone(&cancel_slot);
        let _canceller = stream.events().start(
            move |_value| {
                if let Some(victim) = slot.lock().unwrap().take() {
                    victim.unsubscribe();
                }
            },
            |_fault| {},
            || {},
        );
        let sink = Arc::clone(&victim_seen);
        let victim = stream.events().start(
            move |value| sink.lock().unwrap().push(value),
            |_fault| {},
            || {},
        );
        *cancel_slot.lock().unwrap() = Some(victim);

        stream.fire(1);
        assert!(
            victim_seen.lock().unwrap().is_empty(),
            "value already in flight must not reach a just-cancelled subscriber"
        );
    }

    #[test]
    fn test_error_is_terminal_per_subscription_not_per_epoch() {
        let stream = EventStream::<i32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let failed = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&seen);
        let fail_count = Arc::clone(&failed);
        let _first = stream.events().start(
            move |value| sink.lock().unwrap().push(value),
            move |_fault| {
                fail_count.fetch_add(1, Ordering::SeqCst);
            },
            || {},
        );

        stream.fire(1);
        stream.fire_error(Fault::message("wire broke"));
        stream.fire(2); // first subscriber already terminated

        assert_eq!(*seen.lock().unwrap(), vec![1]);
        assert_eq!(failed.load(Ordering::SeqCst), 1);

        // the epoch survived: a later subscriber hears later values
        let late = Arc::new(Mutex::new(Vec::new()));
        let done = Arc::new(AtomicBool::new(false));
        let _second = subscribe_collecting(&stream, &late, &done);
        stream.fire(3);
        assert_eq!(*late.lock().unwrap(), vec![3]);
    }

    #[test]
    fn test_drop_delivers_done_to_attached_subscribers() {
        let done = Arc::new(AtomicBool::new(false));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let alive;
        {
            let stream = EventStream::<i32>::new();
            alive = subscribe_collecting(&stream, &seen, &done);
            stream.fire(5);
        }
        assert_eq!(*seen.lock().unwrap(), vec![5]);
        assert!(done.load(Ordering::SeqCst));
        assert!(!alive.is_active());
    }

    #[test]
    fn test_reassignment_completes_the_old_stream() {
        let done = Arc::new(AtomicBool::new(false));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut stream = EventStream::<i32>::new();
        let _alive = subscribe_collecting(&stream, &seen, &done);
        stream = EventStream::new();
        assert!(done.load(Ordering::SeqCst));
        stream.fire(1); // the replacement has its own fresh epoch
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_has_consumers_tracks_registrations() {
        let stream = EventStream::<i32>::new();
        assert!(!stream.has_consumers());
        let alive = subscribe_collecting(
            &stream,
            &Arc::new(Mutex::new(Vec::new())),
            &Arc::new(AtomicBool::new(false)),
        );
        assert!(stream.has_consumers());
        alive.unsubscribe();
        assert!(!stream.has_consumers());
    }

    #[test]
    fn test_events_starting_with_prepends_before_live_values() {
        let stream = EventStream::<i32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _alive = stream.events_starting_with(0).start(
            move |value| sink.lock().unwrap().push(value),
            |_fault| {},
            || {},
        );
        stream.fire(1);
        stream.fire(2);
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_completing_stream_from_value_handler() {
        // a handler may complete the very stream it listens to
        let stream = Arc::new(EventStream::<i32>::new());
        let done = Arc::new(AtomicBool::new(false));
        let from_handler = Arc::clone(&stream);
        let done_flag = Arc::clone(&done);
        let _alive = stream.events().start(
            move |_value| from_handler.fire_done(),
            |_fault| {},
            move || done_flag.store(true, Ordering::SeqCst),
        );
        stream.fire(1);
        assert!(done.load(Ordering::SeqCst));
        assert!(!stream.has_consumers());
    }
}
