//! Cold sequences: descriptions, activation, and the consumer callback triple.
//!
//! This module groups the producer **data model** and its activation path:
//!
//! ## Contents
//! - [`Producer`], [`make_producer`] — immutable "how to produce" descriptions
//! - [`Consumer`] — the `on_next` / `on_error` / `on_done` callback triple
//! - [`sources`] — trivial ready-made producers (`single`, `vector`, ...)
//!
//! A producer performs no work until started; each start is an independent
//! activation that runs the generator against a fresh [`Consumer`] and wires
//! the generator's teardown into the subscription's [`Lifetime`](crate::Lifetime).

mod consumer;
mod producer;
pub mod sources;

pub use consumer::Consumer;
pub use producer::{make_producer, Producer};
