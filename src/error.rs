//! Error capsule forwarded through notification chains.
//!
//! This module defines [`Fault`] — an opaque, cheaply clonable wrapper around
//! any [`std::error::Error`]. The core never inspects a fault's contents:
//! relays, bridges and spawned producers forward it verbatim to the nearest
//! `on_error` callback. Code that does know the concrete type can recover it
//! with [`Fault::downcast_ref`].
//!
//! ## Example
//! ```rust
//! use eventcast::Fault;
//!
//! let fault = Fault::message("connection refused");
//! assert_eq!(fault.to_string(), "connection refused");
//!
//! let cloned = fault.clone(); // shares the same capsule
//! assert_eq!(cloned.to_string(), fault.to_string());
//! ```

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Plain-text fault payload used by [`Fault::message`].
#[derive(Debug, Error)]
#[error("{0}")]
struct TextFault(String);

/// # Opaque, clonable error capsule.
///
/// A `Fault` is how producers signal failure: it travels through `on_error`
/// callbacks, is terminal for the subscription that receives it, and is only
/// ever forwarded — never interpreted — by the core.
///
/// Cloning is cheap (the payload is shared behind an [`Arc`]), which is what
/// multicast delivery to several subscribers relies on.
#[derive(Clone)]
pub struct Fault {
    inner: Arc<dyn Error + Send + Sync + 'static>,
}

impl Fault {
    /// Wraps any error value into a capsule.
    pub fn new<E>(source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(source),
        }
    }

    /// Builds a capsule from a plain text message.
    pub fn message(text: impl Into<String>) -> Self {
        Self::new(TextFault(text.into()))
    }

    /// Returns a reference to the wrapped error.
    pub fn as_error(&self) -> &(dyn Error + 'static) {
        self.inner.as_ref()
    }

    /// Attempts to view the wrapped error as a concrete type.
    ///
    /// # Example
    /// ```
    /// use eventcast::Fault;
    ///
    /// let fault = Fault::new(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
    /// assert!(fault.downcast_ref::<std::io::Error>().is_some());
    /// assert!(fault.downcast_ref::<std::fmt::Error>().is_none());
    /// ```
    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl fmt::Debug for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl From<&str> for Fault {
    fn from(text: &str) -> Self {
        Self::message(text)
    }
}

impl From<String> for Fault {
    fn from(text: String) -> Self {
        Self::message(text)
    }
}
