//! Cold→hot bridge: forward one producer into a stream's writer side.

use crate::lifetime::Lifetime;
use crate::producers::Producer;
use crate::streams::event_stream::EventStream;

/// Starts `producer` and forwards every notification into `target`:
/// values to `fire`, errors to `fire_error`, completion to `fire_done`.
///
/// Pure forwarding with no buffering, scoped to `alive`: unsubscribing the
/// lifetime stops the producer and with it the forwarding. The writer
/// capability is bound to the target's epoch as of this call; if that epoch
/// is torn down first, later notifications are silently dropped.
pub fn start_to_stream<V>(producer: Producer<V>, target: &EventStream<V>, alive: &Lifetime)
where
    V: Clone + Send + 'static,
{
    let values = target.sink();
    let errors = values.clone();
    let completion = values.clone();
    producer.start_in(
        move |value| values.next(value),
        move |fault| errors.error(fault),
        move || completion.done(),
        alive,
    );
}
