//! # Cold sequence descriptions and their activation.
//!
//! A [`Producer`] is an immutable description of how to produce a sequence of
//! values: a generator function invoked once per start with a fresh
//! [`Consumer`]. The description itself is stateless and shared behind an
//! [`Arc`], so producers clone cheaply and every activation is independent.
//!
//! ## Start contract
//! ```text
//! producer.start(next, error, done)          ──► fresh Lifetime, returned
//! producer.start_in(next, error, done, &lt)  ──► registers into caller's Lifetime
//! producer.start_copy / start_copy_in        ──► same, non-consuming
//!
//! start*:
//!   1. build a Consumer forwarding to the three callbacks
//!   2. run the generator synchronously with that Consumer
//!   3. attach the generator's Teardown to the lifetime
//!      (runs immediately if the generator already completed the
//!       subscription — the lifetime is closed by then)
//! ```
//!
//! All of a start's synchronous emissions happen inside the `start*` call
//! itself; only generators that explicitly defer work (threads, tasks,
//! timers) notify later.
//!
//! ## Example
//! ```rust
//! use eventcast::{make_producer, Teardown};
//! use std::sync::{Arc, Mutex};
//!
//! let counter = make_producer(|consumer| {
//!     consumer.on_next(1);
//!     consumer.on_next(2);
//!     consumer.on_done();
//!     Teardown::none()
//! });
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! let _alive = counter.start(
//!     move |value: i32| sink.lock().unwrap().push(value),
//!     |_fault| {},
//!     || {},
//! );
//! assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
//! ```

use std::sync::Arc;

use crate::error::Fault;
use crate::lifetime::{Lifetime, Teardown};
use crate::producers::consumer::Consumer;

type Generator<V> = dyn Fn(Consumer<V>) -> Teardown + Send + Sync;

/// Cold, restartable description of a value sequence.
///
/// `Clone` shares the description, not any activation state; that is what
/// the `start_copy*` methods rely on.
pub struct Producer<V> {
    generator: Arc<Generator<V>>,
}

impl<V> Clone for Producer<V> {
    fn clone(&self) -> Self {
        Self {
            generator: Arc::clone(&self.generator),
        }
    }
}

impl<V: Send + 'static> Producer<V> {
    /// Wraps a generator into a producer description.
    pub fn new<G>(generator: G) -> Self
    where
        G: Fn(Consumer<V>) -> Teardown + Send + Sync + 'static,
    {
        Self {
            generator: Arc::new(generator),
        }
    }

    /// Starts the producer and returns a fresh lifetime wired to the
    /// subscription. Dropping (or unsubscribing) the returned lifetime
    /// cancels the activation.
    #[must_use = "dropping the returned Lifetime cancels the subscription"]
    pub fn start<N, E, D>(self, next: N, error: E, done: D) -> Lifetime
    where
        N: FnMut(V) + Send + 'static,
        E: FnOnce(Fault) + Send + 'static,
        D: FnOnce() + Send + 'static,
    {
        let alive = Lifetime::new();
        self.start_in(next, error, done, &alive);
        alive
    }

    /// Starts the producer, registering its teardown into `alive`.
    pub fn start_in<N, E, D>(self, next: N, error: E, done: D, alive: &Lifetime)
    where
        N: FnMut(V) + Send + 'static,
        E: FnOnce(Fault) + Send + 'static,
        D: FnOnce() + Send + 'static,
    {
        let consumer = Consumer::new(
            Box::new(next),
            Box::new(error),
            Box::new(done),
            alive.handle(),
        );
        let teardown = (self.generator)(consumer);
        alive.attach(teardown);
    }

    /// Like [`start`](Producer::start), without consuming the description.
    #[must_use = "dropping the returned Lifetime cancels the subscription"]
    pub fn start_copy<N, E, D>(&self, next: N, error: E, done: D) -> Lifetime
    where
        N: FnMut(V) + Send + 'static,
        E: FnOnce(Fault) + Send + 'static,
        D: FnOnce() + Send + 'static,
    {
        self.clone().start(next, error, done)
    }

    /// Like [`start_in`](Producer::start_in), without consuming the description.
    pub fn start_copy_in<N, E, D>(&self, next: N, error: E, done: D, alive: &Lifetime)
    where
        N: FnMut(V) + Send + 'static,
        E: FnOnce(Fault) + Send + 'static,
        D: FnOnce() + Send + 'static,
    {
        self.clone().start_in(next, error, done, alive);
    }

    /// Feeds this producer's notifications into an existing consumer.
    ///
    /// Used where a generator continues another sequence on behalf of its
    /// own subscriber (replay hand-off, `events_starting_with`). The inner
    /// subscription lives in a child lifetime returned as the teardown.
    pub(crate) fn feed(self, consumer: &Consumer<V>) -> Teardown {
        let sub = Lifetime::new();
        let on_next = {
            let consumer = consumer.clone();
            move |value| consumer.on_next(value)
        };
        let on_error = {
            let consumer = consumer.clone();
            move |fault| consumer.on_error(fault)
        };
        let on_done = {
            let consumer = consumer.clone();
            move || consumer.on_done()
        };
        self.start_in(on_next, on_error, on_done, &sub);
        Teardown::from(sub)
    }
}

/// Builds a [`Producer`] from a generator function.
///
/// The generator runs once per start, emits through the given
/// [`Consumer`], and returns the [`Teardown`] releasing whatever the
/// activation holds.
pub fn make_producer<V, G>(generator: G) -> Producer<V>
where
    V: Send + 'static,
    G: Fn(Consumer<V>) -> Teardown + Send + Sync + 'static,
{
    Producer::new(generator)
}
