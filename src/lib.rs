//! # eventcast
//!
//! **Eventcast** is a single-process, in-memory event-notification core.
//!
//! It provides three tightly coupled primitives — cancellable lifetimes,
//! cold producers, and lazily-materialized multicast event streams — plus
//! the bridges that turn one into the other. The crate is designed as a
//! building block for reactive plumbing inside one logical thread of a
//! larger application.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!      ┌──────────────┐         ┌───────────────────────────────┐
//!      │ Producer<V>  │         │ EventStream<V>                │
//!      │ (cold: runs  │ start_  │  ┌─────────────────────────┐  │
//!      │  a generator │ to_     │  │ Subject (one epoch)     │  │
//!      │  per start)  │─stream──►  │  subscriber registry    │  │
//!      └──────┬───────┘         │  └─────┬───────────────────┘  │
//!             │                 │        │ events()             │
//!             │ start /         │        ▼                      │
//!             │ start_copy      │   Producer<V> (weak           │
//!             ▼                 │   capability per epoch)       │
//!      ┌──────────────┐         └───────────────────────────────┘
//!      │ Consumer<V>  │                  │
//!      │ on_next      │◄─────────────────┘ each start = one
//!      │ on_error     │                    subscriber, detached by
//!      │ on_done      │                    its own Lifetime
//!      └──────┬───────┘
//!             │ terminal
//!             ▼
//!      ┌──────────────┐   teardown actions, in order, exactly once
//!      │   Lifetime   │──► generator cleanup, registry removal,
//!      └──────────────┘    nested child lifetimes
//! ```
//!
//! ### Spawning
//! [`start_spawning`] converts a cold producer that bursts synchronously
//! into a replayable hot producer: the burst is captured through an internal
//! relay stream, replayed to every later subscriber, and followed by live
//! forwarding with no gap and no duplication.
//!
//! ## Features
//! | Area           | Description                                              | Key items                                |
//! |----------------|----------------------------------------------------------|------------------------------------------|
//! | **Lifetimes**  | Ordered, re-entrant-safe teardown registries.            | [`Lifetime`], [`LifetimeHandle`], [`Teardown`] |
//! | **Producers**  | Cold sequences started per-subscriber.                   | [`Producer`], [`make_producer`], [`sources`] |
//! | **Streams**    | Hot multicast with lazy epochs and weak capabilities.    | [`EventStream`]                          |
//! | **Bridges**    | Cold→hot forwarding and capture/replay spawning.         | [`start_to_stream`], [`start_spawning`]  |
//! | **Errors**     | Opaque fault capsule forwarded through chains.           | [`Fault`]                                |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogProbe`] _(demo/reference only)_.
//! - `tokio`: exports `Lifetime::bind_token` for `CancellationToken` interop.
//!
//! ## Example
//! ```rust
//! use eventcast::{start_spawning, EventStream, Lifetime};
//! use std::sync::{Arc, Mutex};
//!
//! // a hot stream someone else fires into
//! let clicks = EventStream::<u32>::new();
//!
//! // spawn its reader so late subscribers replay the initial burst
//! let alive = Lifetime::new();
//! clicks.fire(1); // nobody listening yet: dropped by design
//! let replayable = start_spawning(clicks.events(), &alive);
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! replayable.start_copy_in(
//!     move |value| sink.lock().unwrap().push(value),
//!     |_fault| {},
//!     || {},
//!     &alive,
//! );
//!
//! clicks.fire(2);
//! clicks.fire(3);
//! assert_eq!(*seen.lock().unwrap(), vec![2, 3]);
//! ```

mod error;
mod lifetime;
mod producers;
mod streams;

// ---- Public re-exports ----

pub use error::Fault;
pub use lifetime::{Lifetime, LifetimeHandle, Teardown};
pub use producers::{make_producer, sources, Consumer, Producer};
pub use streams::{start_spawning, start_to_stream, EventStream};

// Optional: expose a simple built-in notification logger (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
mod log;
#[cfg(feature = "logging")]
pub use log::LogProbe;
