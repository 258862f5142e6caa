//! Ready-made producers for common trivial sequences.
//!
//! These are constructors, not operators: each one is a complete generator
//! with no upstream. Used by the crate's own machinery (replay hand-off)
//! and handy as test fixtures.

use crate::error::Fault;
use crate::lifetime::Teardown;
use crate::producers::producer::{make_producer, Producer};

/// Emits one value, then completes.
pub fn single<V>(value: V) -> Producer<V>
where
    V: Clone + Send + Sync + 'static,
{
    make_producer(move |consumer| {
        consumer.on_next(value.clone());
        consumer.on_done();
        Teardown::none()
    })
}

/// Emits every element of `values` in order, then completes.
pub fn vector<V>(values: Vec<V>) -> Producer<V>
where
    V: Clone + Send + Sync + 'static,
{
    make_producer(move |consumer| {
        for value in &values {
            consumer.on_next(value.clone());
        }
        consumer.on_done();
        Teardown::none()
    })
}

/// Completes immediately without emitting.
pub fn complete<V: Send + 'static>() -> Producer<V> {
    make_producer(|consumer| {
        consumer.on_done();
        Teardown::none()
    })
}

/// Fails immediately with the given fault.
pub fn fail<V: Send + 'static>(fault: Fault) -> Producer<V> {
    make_producer(move |consumer| {
        consumer.on_error(fault.clone());
        Teardown::none()
    })
}

/// Never emits and never terminates; ends only with its lifetime.
pub fn never<V: Send + 'static>() -> Producer<V> {
    make_producer(|_consumer| Teardown::none())
}
