//! Hot broadcasting: the multicast subject, its owning stream, and the
//! cold→hot bridges.
//!
//! ## Contents
//! - [`EventStream`] — lazily-materialized multicast broadcaster
//! - [`start_to_stream`] — forward a cold producer into a stream's writer side
//! - [`start_spawning`] — capture a producer's synchronous burst, replay it,
//!   then continue live
//!
//! The subject (the hub actually holding subscriber entries) stays internal;
//! everything outside this module talks to it through an [`EventStream`] or
//! through weak capabilities handed out by one.

mod bridge;
mod event_stream;
mod spawn;
mod subject;

pub use bridge::start_to_stream;
pub use event_stream::EventStream;
pub use spawn::start_spawning;
