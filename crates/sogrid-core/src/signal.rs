//! Signal/listener system for SO-Grid.
//!
//! A [`Signal<Args>`] is an ordered list of listeners. Emitting a signal runs
//! every connected listener synchronously, in registration order, on the
//! emitting thread.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The signal type for emitting notifications
//! - [`ConnectionId`] - Unique identifier returned when connecting a listener
//! - [`Subscription`] - Handle whose `unsubscribe` removes the listener
//! - [`ConnectionGuard`] - RAII guard that disconnects when dropped
//!
//! # Failure Isolation
//!
//! A listener that panics does not stop delivery: the panic is caught, logged
//! at `error` level, and the remaining listeners still run.
//!
//! # Re-entrancy
//!
//! The connection list is snapshotted before listeners run and no lock is
//! held while they execute, so a listener may connect, disconnect, or emit
//! again without deadlocking. Connections added during an emit are first
//! invoked by the next emit.
//!
//! # Example
//!
//! ```
//! use sogrid_core::Signal;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let signal = Signal::<u32>::new();
//! let total = Arc::new(AtomicUsize::new(0));
//!
//! let total_clone = total.clone();
//! let id = signal.connect(move |&n| {
//!     total_clone.fetch_add(n as usize, Ordering::SeqCst);
//! });
//!
//! signal.emit(40);
//! signal.emit(2);
//! assert_eq!(total.load(Ordering::SeqCst), 42);
//!
//! signal.disconnect(id);
//! ```

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::{panic_message, targets};

new_key_type! {
    /// A unique identifier for a signal-listener connection.
    ///
    /// Use this ID to disconnect a specific connection via [`Signal::disconnect`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// Connection storage. `order` keeps registration order, since slot keys are
/// reused after removal.
struct Connections<Args> {
    slots: SlotMap<ConnectionId, Slot<Args>>,
    order: Vec<ConnectionId>,
}

impl<Args> Connections<Args> {
    fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    fn insert(&mut self, slot: Slot<Args>) -> ConnectionId {
        let id = self.slots.insert(slot);
        self.order.push(id);
        id
    }

    fn remove(&mut self, id: ConnectionId) -> bool {
        if self.slots.remove(id).is_some() {
            self.order.retain(|existing| *existing != id);
            true
        } else {
            false
        }
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.order.clear();
    }

    fn snapshot(&self) -> Vec<(ConnectionId, Slot<Args>)> {
        self.order
            .iter()
            .filter_map(|id| self.slots.get(*id).map(|slot| (*id, Arc::clone(slot))))
            .collect()
    }
}

/// A type-safe signal that can have multiple connected listeners.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to listeners. Use `()` for plain
///   change notifications.
pub struct Signal<Args> {
    connections: Arc<Mutex<Connections<Args>>>,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Arc::new(Mutex::new(Connections::new())),
        }
    }

    /// Connect a listener to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect it later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Connect a listener and return a [`Subscription`] handle.
    ///
    /// The listener stays connected until [`Subscription::unsubscribe`] is
    /// called; dropping the handle does not disconnect it.
    pub fn subscribe<F>(&self, slot: F) -> Subscription
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connect(slot);
        let connections: Weak<Mutex<Connections<Args>>> = Arc::downgrade(&self.connections);
        Subscription {
            id,
            disconnect: Some(Box::new(move || {
                connections
                    .upgrade()
                    .is_some_and(|connections| connections.lock().remove(id))
            })),
        }
    }

    /// Connect a listener that is disconnected when the guard is dropped.
    pub fn connect_scoped<F>(&self, slot: F) -> ConnectionGuard<Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connect(slot);
        ConnectionGuard {
            connections: Arc::downgrade(&self.connections),
            id,
        }
    }

    /// Disconnect a specific listener by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id)
    }

    /// Disconnect all listeners from this signal.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Get the number of connected listeners.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().slots.len()
    }

    /// Emit the signal, invoking all connected listeners in registration order.
    ///
    /// Returns the number of listeners that panicked.
    #[tracing::instrument(skip_all, target = "sogrid_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) -> usize {
        let snapshot = self.connections.lock().snapshot();
        tracing::trace!(target: targets::SIGNAL, connection_count = snapshot.len(), "emitting signal");

        let mut failures = 0;
        for (id, slot) in snapshot {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| slot(&args))) {
                failures += 1;
                tracing::error!(
                    target: targets::SIGNAL,
                    connection = ?id,
                    panic = panic_message(payload.as_ref()),
                    "listener panicked; continuing with remaining listeners"
                );
            }
        }
        failures
    }
}

/// Handle returned by [`Signal::subscribe`].
///
/// Calling [`unsubscribe`](Self::unsubscribe) removes the listener. The handle
/// does not disconnect on drop.
pub struct Subscription {
    id: ConnectionId,
    disconnect: Option<Box<dyn FnOnce() -> bool + Send + Sync>>,
}

impl Subscription {
    /// Returns the underlying connection ID.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Removes the listener.
    ///
    /// Returns `false` if it was already removed or the signal is gone.
    pub fn unsubscribe(mut self) -> bool {
        self.disconnect.take().is_some_and(|disconnect| disconnect())
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// A connection guard that automatically disconnects when dropped.
///
/// Created via [`Signal::connect_scoped`]. The guard only holds a weak
/// reference, so it may outlive the signal.
pub struct ConnectionGuard<Args> {
    connections: Weak<Mutex<Connections<Args>>>,
    id: ConnectionId,
}

impl<Args> ConnectionGuard<Args> {
    /// Returns the underlying connection ID.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl<Args> Drop for ConnectionGuard<Args> {
    fn drop(&mut self) {
        if let Some(connections) = self.connections.upgrade() {
            connections.lock().remove(self.id);
        }
    }
}
