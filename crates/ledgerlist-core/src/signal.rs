//! Signal/slot system for LedgerList.
//!
//! Signals are the change-notification backbone of the library: tracked
//! items emit one when a property changes, and the collection model emits
//! them when rows move or counters shift. Slots are plain closures connected
//! at runtime.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The main signal type for emitting notifications
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//! - [`ConnectionGuard`] - RAII guard that disconnects when dropped
//!
//! # Invocation Model
//!
//! LedgerList is a single-threaded, cooperative library: every slot is
//! invoked directly on the emitting thread, in connection order. There is no
//! event loop and no queued delivery — if you need to marshal a notification
//! to another thread, do so inside the slot.
//!
//! # Emission Blocking
//!
//! A signal can be temporarily blocked with [`Signal::set_blocked`]. While
//! blocked, `emit` does nothing. The tracked-collection batch guard uses this
//! to coalesce a burst of mutations into a single notification.
//!
//! # Example
//!
//! ```
//! use ledgerlist_core::Signal;
//!
//! // A signal carrying the name of the property that changed.
//! let changed = Signal::<&'static str>::new();
//!
//! let id = changed.connect(|&name| {
//!     println!("property changed: {name}");
//! });
//!
//! changed.emit("title");
//! changed.disconnect(id);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Handed out by [`Signal::connect`] and consumed by
    /// [`Signal::disconnect`]. Stays valid until the connection is removed
    /// or the signal is dropped.
    pub struct ConnectionId;
}

/// A type-safe signal that can have multiple connected slots.
///
/// Emitting a signal invokes every connected slot with a reference to the
/// argument value.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for
///   signals with no arguments, or a tuple like `(usize, usize)` for multiple
///   arguments.
///
/// # Thread Safety
///
/// `Signal<Args>` is `Send + Sync` and can be shared between threads, but the
/// library's mutation model is single-threaded: slots run on whichever thread
/// emits.
pub struct Signal<Args> {
    /// All active connections.
    connections: Mutex<SlotMap<ConnectionId, Arc<dyn Fn(&Args) + Send + Sync>>>,
    /// Whether signal emission is temporarily blocked.
    blocked: AtomicBool,
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns the [`ConnectionId`] used to disconnect it later; for
    /// scope-bound connections prefer
    /// [`connect_scoped`](Signal::connect_scoped).
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Remove the connection `id`.
    ///
    /// Returns whether the connection was still registered.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Drop every connection at once.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Number of currently connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Swallow emissions until unblocked.
    ///
    /// While blocked, [`emit`](Signal::emit) is a no-op — the emission is
    /// dropped, not queued. Batch operations block their row signals and
    /// emit a single coalesced notification afterwards.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Whether emissions are currently swallowed.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots.
    ///
    /// If the signal is blocked, this does nothing. Slots are invoked
    /// directly on the emitting thread. Slots connected while an emission is
    /// in progress are not invoked for that emission.
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: "ledgerlist_core::signal", "signal blocked, skipping emit");
            return;
        }

        // Snapshot the slots so a slot may connect/disconnect reentrantly
        // without deadlocking on the connection table.
        let slots: Vec<Arc<dyn Fn(&Args) + Send + Sync>> =
            self.connections.lock().values().cloned().collect();

        tracing::trace!(
            target: "ledgerlist_core::signal",
            connection_count = slots.len(),
            "emitting signal"
        );

        for slot in slots {
            slot(&args);
        }
    }
}

static_assertions::assert_impl_all!(Signal<usize>: Send, Sync);

/// A connection that lives exactly as long as its guard.
///
/// Created by [`Signal::connect_scoped`]; dropping the guard disconnects
/// the slot, so an observer cannot outlive the scope that registered it.
///
/// # Example
///
/// ```
/// use ledgerlist_core::Signal;
/// use parking_lot::Mutex;
/// use std::sync::Arc;
///
/// let changed = Signal::<&'static str>::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// {
///     let seen = seen.clone();
///     let _guard = changed.connect_scoped(move |&name| {
///         seen.lock().push(name);
///     });
///     changed.emit("title");
/// } // guard dropped, slot disconnected
/// changed.emit("body");
/// assert_eq!(*seen.lock(), vec!["title"]);
/// ```
pub struct ConnectionGuard<'a, Args> {
    signal: &'a Signal<Args>,
    id: ConnectionId,
}

impl<Args> Signal<Args> {
    /// Connect a slot with automatic disconnection when the guard is
    /// dropped.
    pub fn connect_scoped<F>(&self, slot: F) -> ConnectionGuard<'_, Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connect(slot);
        ConnectionGuard { signal: self, id }
    }
}

impl<Args> Drop for ConnectionGuard<'_, Args> {
    fn drop(&mut self) {
        let _ = self.signal.disconnect(self.id);
    }
}
