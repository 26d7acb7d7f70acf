//! Prelude module for LedgerList.
//!
//! This module re-exports the most commonly used types for convenient
//! importing:
//!
//! ```ignore
//! use ledgerlist::prelude::*;
//! ```
//!
//! This provides access to:
//! - The tracked collection (`TrackedModel`, `TrackingConfig`, `ItemCounts`)
//! - The trackable capability (`Trackable`, `TrackState`, `ItemState`)
//! - The signal/slot and property system (`Signal`, `Property`)

// ============================================================================
// Tracked Collection
// ============================================================================

pub use crate::{ItemCounts, ModelSignals, TrackedModel, TrackingConfig};

// ============================================================================
// Trackable Capability
// ============================================================================

pub use ledgerlist_core::trackable::{
    AsTrackable, ITEM_STATE_PROPERTY, ItemState, TrackState, Trackable,
};
pub use ledgerlist_macros::Trackable;

// ============================================================================
// Signal/Slot and Property System
// ============================================================================

pub use ledgerlist_core::property::Property;
pub use ledgerlist_core::signal::{ConnectionGuard, ConnectionId, Signal};
