//! # Cancellable registry of teardown actions.
//!
//! [`Lifetime`] is the unit of cleanup scheduling for everything else in the
//! crate: every subscription, relay and bridge registers the work needed to
//! undo itself into a lifetime, and unsubscribing (or dropping) the lifetime
//! runs that work exactly once, in registration order.
//!
//! ## Architecture
//! ```text
//! Lifetime (owning guard, unsubscribes on drop)
//!     │
//!     ├── add(action)        push into the pending queue
//!     ├── attach(Teardown)   closure, child lifetime, or nothing
//!     ├── unsubscribe()      drain the queue front-to-back
//!     └── handle()           LifetimeHandle (weak observer)
//!                                │
//!                                └── resolved against the owner; a handle
//!                                    whose owner is gone treats the
//!                                    registry as closed
//! ```
//!
//! ## Rules
//! - **At most once**: each registered action runs exactly once.
//! - **Order**: actions run in registration order.
//! - **Idempotent**: a second `unsubscribe()` (including a re-entrant one
//!   from inside a teardown action) is a no-op.
//! - **Re-entrant adds drain**: actions registered while the drain loop is
//!   running are appended and consumed before `unsubscribe()` returns.
//! - **Closed registry**: registering on a closed lifetime executes the
//!   action immediately — there is nothing left to defer to.
//! - **No failure channel**: teardown actions must not panic; a panic here
//!   is a fatal programming error, not a recoverable condition.
//!
//! ## Example
//! ```rust
//! use eventcast::Lifetime;
//! use std::sync::{Arc, Mutex};
//!
//! let order = Arc::new(Mutex::new(Vec::new()));
//! let alive = Lifetime::new();
//!
//! let first = Arc::clone(&order);
//! alive.add(move || first.lock().unwrap().push(1));
//! let second = Arc::clone(&order);
//! alive.add(move || second.lock().unwrap().push(2));
//!
//! alive.unsubscribe();
//! assert_eq!(*order.lock().unwrap(), vec![1, 2]);
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Weak};

#[cfg(feature = "tokio")]
use tokio_util::sync::CancellationToken;

type Action = Box<dyn FnOnce() + Send>;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Phase {
    Open,
    Draining,
    Closed,
}

struct Registry {
    phase: Phase,
    pending: VecDeque<Action>,
}

struct State {
    registry: Mutex<Registry>,
}

impl State {
    fn new() -> Self {
        Self {
            registry: Mutex::new(Registry {
                phase: Phase::Open,
                pending: VecDeque::new(),
            }),
        }
    }

    /// Queues the action, or runs it immediately if the registry is closed.
    fn register(&self, action: Action) {
        let run_now = {
            let mut registry = self.registry.lock().unwrap();
            match registry.phase {
                Phase::Open | Phase::Draining => {
                    registry.pending.push_back(action);
                    None
                }
                Phase::Closed => Some(action),
            }
        };
        if let Some(run) = run_now {
            run();
        }
    }

    /// Drains pending actions front-to-back, then marks the registry closed.
    ///
    /// Actions run outside the registry lock, so they may register further
    /// actions (consumed by the same loop) or call `close` again (no-op).
    fn close(&self) {
        {
            let mut registry = self.registry.lock().unwrap();
            if registry.phase != Phase::Open {
                return;
            }
            registry.phase = Phase::Draining;
        }
        loop {
            let action = {
                let mut registry = self.registry.lock().unwrap();
                match registry.pending.pop_front() {
                    Some(action) => Some(action),
                    None => {
                        registry.phase = Phase::Closed;
                        None
                    }
                }
            };
            match action {
                Some(run) => run(),
                None => break,
            }
        }
    }

    fn is_active(&self) -> bool {
        self.registry.lock().unwrap().phase == Phase::Open
    }
}

/// # Owning handle over a registry of teardown actions.
///
/// Dropping the guard unsubscribes it, so a subscription bound to a
/// `Lifetime` ends when its owning scope ends.
///
/// ### Responsibilities
/// - Collects teardown work from generators, subjects and bridges.
/// - Runs that work exactly once, in order, on [`unsubscribe`](Lifetime::unsubscribe).
/// - Nests: a whole child lifetime can be attached as a single teardown on a
///   parent via [`attach`](Lifetime::attach).
#[must_use = "dropping a Lifetime immediately runs its teardown actions"]
pub struct Lifetime {
    state: Arc<State>,
}

impl Lifetime {
    /// Creates a fresh, open lifetime with no pending actions.
    pub fn new() -> Self {
        Self {
            state: Arc::new(State::new()),
        }
    }

    /// Registers a teardown action.
    ///
    /// If the lifetime is already closed the action executes immediately.
    pub fn add<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.state.register(Box::new(action));
    }

    /// Registers a [`Teardown`] value: a closure, a child lifetime, or nothing.
    pub fn attach(&self, teardown: Teardown) {
        match teardown.kind {
            None => {}
            Some(TeardownKind::Call(action)) => self.state.register(action),
            Some(TeardownKind::Scope(child)) => self.add(move || child.unsubscribe()),
        }
    }

    /// Runs every pending teardown action in registration order and closes
    /// the registry. Idempotent; safe to call re-entrantly from a teardown
    /// action (the nested call is a no-op, the outer drain keeps going).
    pub fn unsubscribe(&self) {
        self.state.close();
    }

    /// Returns `true` until the first `unsubscribe` (or drop) begins.
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Returns a weak observer handle onto this lifetime.
    pub fn handle(&self) -> LifetimeHandle {
        LifetimeHandle {
            state: Arc::downgrade(&self.state),
        }
    }

    /// Cancels the token when this lifetime ends.
    ///
    /// Bridges teardown into async collaborators: a task driving deferred
    /// emissions can select on the token and stop promptly once the
    /// subscription is gone.
    #[cfg(feature = "tokio")]
    pub fn bind_token(&self, token: CancellationToken) {
        self.add(move || token.cancel());
    }
}

impl Default for Lifetime {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Lifetime {
    fn drop(&mut self) {
        self.state.close();
    }
}

/// Weak observer handle onto a [`Lifetime`].
///
/// Handles never keep the registry alive. A handle whose owner is gone
/// treats the registry as closed: `add` executes immediately, `unsubscribe`
/// is a no-op, `is_active` is `false`.
#[derive(Clone)]
pub struct LifetimeHandle {
    state: Weak<State>,
}

impl LifetimeHandle {
    /// Registers a teardown action, or runs it immediately if the owner is gone.
    pub fn add<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        match self.state.upgrade() {
            Some(state) => state.register(Box::new(action)),
            None => action(),
        }
    }

    /// Unsubscribes the owning lifetime, if it still exists.
    pub fn unsubscribe(&self) {
        if let Some(state) = self.state.upgrade() {
            state.close();
        }
    }

    /// Returns `true` while the owner exists and has not begun unsubscribing.
    pub fn is_active(&self) -> bool {
        self.state
            .upgrade()
            .map(|state| state.is_active())
            .unwrap_or(false)
    }
}

/// What a producer generator hands back for later cleanup.
///
/// A teardown is either nothing ([`Teardown::none`]), a single closure
/// ([`Teardown::call`]), or a whole child [`Lifetime`] (`Teardown::from`),
/// closed when the subscription it belongs to ends.
#[derive(Default)]
pub struct Teardown {
    kind: Option<TeardownKind>,
}

enum TeardownKind {
    Call(Action),
    Scope(Lifetime),
}

impl Teardown {
    /// No cleanup required.
    pub fn none() -> Self {
        Self { kind: None }
    }

    /// Cleanup backed by a single closure.
    pub fn call<F>(action: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            kind: Some(TeardownKind::Call(Box::new(action))),
        }
    }
}

impl From<Lifetime> for Teardown {
    fn from(child: Lifetime) -> Self {
        Self {
            kind: Some(TeardownKind::Scope(child)),
        }
    }
}
