//! # Capture-then-relay: turning a cold burst into a replayable hot producer.
//!
//! `start_spawning` starts a producer once, records everything it emits
//! during that synchronous subscription window, and returns a new producer
//! that replays the recording to each of its own subscribers before handing
//! them over to the still-live relay.
//!
//! ## Algorithm
//! ```text
//! 1. relay   = fresh EventStream
//!    buffer  = []        error = None      done = false
//! 2. collector subscribes to relay.events()
//!      on_next  → buffer.push(value)
//!      on_error → error = Some(fault)
//!      on_done  → done = true
//! 3. start_to_stream(producer, relay, outer_lifetime)
//!      └─ the producer's synchronous burst lands in the buffer
//! 4. collector unsubscribes (it only existed to watch step 3)
//! 5. returned producer, per subscriber:
//!      error?          → deliver it, nothing else (terminal error wins)
//!      replay buffer   → in original order
//!      done?           → complete immediately
//!      otherwise       → continue live from the relay epoch
//! ```
//!
//! A subscriber of the spawned producer sees the same total, ordered
//! notification sequence as one attached to the original producer from the
//! beginning — never duplicated, dropped or reordered; only the delivery
//! moment differs (replayed vs. live).
//!
//! Completion observed during the synchronous window is buffered like the
//! values are, so late subscribers of an already-completed burst get
//! `values + done` instead of a stream that merely went quiet.

use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::Fault;
use crate::lifetime::{Lifetime, Teardown};
use crate::producers::{make_producer, Producer};
use crate::streams::bridge::start_to_stream;
use crate::streams::event_stream::EventStream;

/// Converts a cold, possibly synchronously-emitting producer into a
/// replayable hot one.
///
/// The original producer is started immediately, scoped to `alive`; the
/// relay carrying its ongoing emissions lives until `alive` ends. The
/// returned producer can be started any number of times; each start replays
/// the captured burst to its own subscriber.
pub fn start_spawning<V>(producer: Producer<V>, alive: &Lifetime) -> Producer<V>
where
    V: Clone + Send + Sync + 'static,
{
    let relay = EventStream::new();
    let collected = Arc::new(Mutex::new(Vec::new()));
    let pending_error: Arc<Mutex<Option<Fault>>> = Arc::new(Mutex::new(None));
    let sync_done = Arc::new(AtomicBool::new(false));

    let collecting = {
        let collected = Arc::clone(&collected);
        let pending_error = Arc::clone(&pending_error);
        let sync_done = Arc::clone(&sync_done);
        relay.events().start(
            move |value| collected.lock().unwrap().push(value),
            move |fault| *pending_error.lock().unwrap() = Some(fault),
            move || sync_done.store(true, Ordering::SeqCst),
        )
    };
    start_to_stream(producer, &relay, alive);
    collecting.unsubscribe();

    // terminal error wins: buffered values are not replayed
    if let Some(fault) = pending_error.lock().unwrap().take() {
        return make_producer(move |consumer| {
            consumer.on_error(fault.clone());
            Teardown::none()
        });
    }

    let replay = Arc::new(mem::take(&mut *collected.lock().unwrap()));

    if sync_done.load(Ordering::SeqCst) {
        return make_producer(move |consumer| {
            for value in replay.iter() {
                consumer.on_next(value.clone());
            }
            consumer.on_done();
            Teardown::none()
        });
    }

    let live = relay.events();
    // the relay must outlive this call so the producer's ongoing activity
    // keeps flowing; it is torn down (completing attached subscribers)
    // together with the outer lifetime
    alive.add(move || drop(relay));

    make_producer(move |consumer| {
        for value in replay.iter() {
            consumer.on_next(value.clone());
        }
        live.clone().feed(&consumer)
    })
}
