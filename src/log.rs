//! # Simple notification logger for debugging and demos.
//!
//! [`LogProbe`] prints every notification of a producer to stdout in a
//! human-readable format. This is primarily useful for development,
//! debugging, and examples.
//!
//! ## Output format
//! ```text
//! [next] tag=clicks value=42
//! [error] tag=clicks fault="connection refused"
//! [done] tag=clicks
//! ```

use std::fmt::Debug;

use crate::lifetime::Lifetime;
use crate::producers::Producer;

/// Stdout notification logger.
///
/// Enabled via the `logging` feature. Not intended for production use —
/// attach your own consumer for structured logging or metrics collection.
pub struct LogProbe {
    tag: &'static str,
}

impl LogProbe {
    /// Creates a probe labelling its output with `tag`.
    pub fn new(tag: &'static str) -> Self {
        Self { tag }
    }

    /// Subscribes to `producer` under `alive` and logs each notification.
    pub fn attach<V>(&self, producer: Producer<V>, alive: &Lifetime)
    where
        V: Debug + Send + 'static,
    {
        let tag = self.tag;
        producer.start_in(
            move |value| println!("[next] tag={tag} value={value:?}"),
            move |fault| println!("[error] tag={tag} fault={fault:?}"),
            move || println!("[done] tag={tag}"),
            alive,
        );
    }
}
