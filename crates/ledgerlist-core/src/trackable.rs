//! The trackable-item capability.
//!
//! Items stored in a tracked collection may opt into change tracking by
//! exposing a mutable lifecycle state plus named property-change
//! notifications. This module defines that contract:
//!
//! - [`ItemState`] - the four-value lifecycle classification
//! - [`Trackable`] - the capability trait (state + change signal)
//! - [`AsTrackable`] - the opt-in hook the collection queries per item
//! - [`TrackState`] - a reusable embeddable cell that implements the
//!   plumbing, analogous to embedding a base object
//!
//! Item types that do not opt in are stored and ordered like any other item;
//! they are simply never classified.
//!
//! # Example
//!
//! ```
//! use ledgerlist_core::{AsTrackable, ItemState, Property, Signal, TrackState, Trackable};
//!
//! struct Contact {
//!     track_state: TrackState,
//!     name: Property<String>,
//! }
//!
//! impl Contact {
//!     fn set_name(&self, name: &str) {
//!         if self.name.set(name.to_string()) {
//!             self.track_state.notify("name");
//!         }
//!     }
//! }
//!
//! impl Trackable for Contact {
//!     fn item_state(&self) -> ItemState {
//!         self.track_state.item_state()
//!     }
//!     fn set_item_state(&self, state: ItemState) {
//!         self.track_state.set_item_state(state);
//!     }
//!     fn changed(&self) -> &Signal<&'static str> {
//!         self.track_state.changed()
//!     }
//! }
//!
//! impl AsTrackable for Contact {
//!     fn as_trackable(&self) -> Option<&dyn Trackable> {
//!         Some(self)
//!     }
//! }
//! ```
//!
//! The `ledgerlist-macros` crate generates the two impls above from a
//! `#[derive(Trackable)]` on any struct with a `track_state: TrackState`
//! field.

use std::fmt;

use crate::property::Property;
use crate::signal::Signal;

/// The property name a [`TrackState`] emits when the item state itself
/// changes.
///
/// The tracked collection compares incoming notification names against this
/// constant to distinguish "the classification changed" from "some content
/// property changed".
pub const ITEM_STATE_PROPERTY: &str = "item_state";

/// Change-tracking classification of an item.
///
/// Every trackable item carries exactly one `ItemState` at a time. The
/// tracked collection drives the transitions; see the `ledgerlist` crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ItemState {
    /// The item matches its persisted form.
    #[default]
    Unchanged,
    /// The item was inserted and has never been persisted.
    Added,
    /// A non-ignored content property changed while the item was unchanged.
    Modified,
    /// The item was removed (or soft-removed) from the collection.
    Deleted,
}

/// The capability contract for items that participate in change tracking.
///
/// Implementations must emit [`changed`](Trackable::changed) with
/// [`ITEM_STATE_PROPERTY`] whenever the state actually changes, and with the
/// property's name whenever a content property changes. Embedding a
/// [`TrackState`] provides both behaviors.
pub trait Trackable: Send + Sync {
    /// Current change-tracking classification.
    fn item_state(&self) -> ItemState;

    /// Reclassify the item.
    ///
    /// A no-op when `state` equals the current classification (no
    /// notification is emitted in that case).
    fn set_item_state(&self, state: ItemState);

    /// Signal emitted with the property name whenever a property of the item
    /// changes.
    fn changed(&self) -> &Signal<&'static str>;
}

/// Opt-in hook queried by the tracked collection for every stored item.
///
/// The default implementation opts out: the item is stored but never
/// classified or subscribed to. Types that implement [`Trackable`] override
/// [`as_trackable`](AsTrackable::as_trackable) to return `Some(self)`; the
/// `#[derive(Trackable)]` macro does this for you.
///
/// This replaces a runtime type test with a statically-checked capability
/// accessor.
pub trait AsTrackable: Send + Sync {
    /// Returns the trackable capability if this item opts into change
    /// tracking.
    fn as_trackable(&self) -> Option<&dyn Trackable> {
        None
    }
}

/// Plain strings are storable but never tracked.
impl AsTrackable for String {}

/// An embeddable change-tracking cell.
///
/// `TrackState` bundles the item-state property with the change signal so
/// item types do not hand-roll the notification plumbing. Setters on the
/// owning type call [`notify`](TrackState::notify) after a content property
/// actually changes.
pub struct TrackState {
    state: Property<ItemState>,
    changed: Signal<&'static str>,
}

impl TrackState {
    /// Create a cell classified [`ItemState::Unchanged`].
    pub fn new() -> Self {
        Self::with_state(ItemState::Unchanged)
    }

    /// Create a cell with an explicit initial classification.
    ///
    /// Useful when reloading items that were persisted mid-edit.
    pub fn with_state(state: ItemState) -> Self {
        Self {
            state: Property::new(state),
            changed: Signal::new(),
        }
    }

    /// Current classification.
    pub fn item_state(&self) -> ItemState {
        self.state.get()
    }

    /// Reclassify, emitting [`ITEM_STATE_PROPERTY`] if the value changed.
    pub fn set_item_state(&self, state: ItemState) {
        if self.state.set(state) {
            tracing::trace!(
                target: "ledgerlist_core::trackable",
                ?state,
                "item state changed"
            );
            self.changed.emit(ITEM_STATE_PROPERTY);
        }
    }

    /// Emit a content-property change notification.
    ///
    /// Call this after the named property actually changed; the tracked
    /// collection decides whether the change flips the item to
    /// [`ItemState::Modified`].
    pub fn notify(&self, property: &'static str) {
        self.changed.emit(property);
    }

    /// The change signal observers subscribe to.
    pub fn changed(&self) -> &Signal<&'static str> {
        &self.changed
    }
}

impl Default for TrackState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TrackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackState")
            .field("state", &self.item_state())
            .field("observers", &self.changed.connection_count())
            .finish()
    }
}

static_assertions::assert_impl_all!(TrackState: Send, Sync);
