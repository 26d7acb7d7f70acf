//! LedgerList - a change-tracking collection model.
//!
//! `TrackedModel<T>` wraps an ordered sequence of shared items and keeps a
//! running ledger of what changed: every item that opts into the
//! [`Trackable`] capability is classified as unchanged, added, modified or
//! deleted as the sequence and the item contents mutate. Delta views and
//! counters are maintained incrementally, bulk operations coalesce their
//! notifications, and [`TrackedModel::accept_changes`] commits the lot —
//! the shape of a lightweight client-side change log for data-entry and
//! sync scenarios.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use ledgerlist::prelude::*;
//!
//! #[derive(Trackable)]
//! struct Contact {
//!     track_state: TrackState,
//!     name: Property<String>,
//! }
//!
//! impl Contact {
//!     fn new(name: &str) -> Arc<Self> {
//!         Arc::new(Self {
//!             track_state: TrackState::new(),
//!             name: Property::new(name.to_string()),
//!         })
//!     }
//!
//!     fn set_name(&self, name: &str) {
//!         if self.name.set(name.to_string()) {
//!             self.track_state.notify("name");
//!         }
//!     }
//! }
//!
//! // Bulk-loaded items keep the state they carry (unchanged here).
//! let ada = Contact::new("Ada");
//! let model = TrackedModel::new(vec![ada.clone()]);
//! assert_eq!(model.count_unchanged(), 1);
//!
//! // Content changes dirty the item...
//! ada.set_name("Ada Lovelace");
//! assert_eq!(ada.item_state(), ItemState::Modified);
//! assert_eq!(model.modified_items().len(), 1);
//!
//! // ...new items are classified as added...
//! model.push(Contact::new("Grace"));
//! assert_eq!(model.count_added(), 1);
//!
//! // ...and committing resets the ledger.
//! model.accept_changes();
//! assert_eq!(model.count_unchanged(), 2);
//! assert!(model.modified_items().is_empty());
//! ```
//!
//! # Observing the model
//!
//! Consumers connect to [`ModelSignals`] to re-render on change; bulk
//! operations and the [`TrackedModel::begin_batch`] guard coalesce a burst
//! of mutations into a single reset notification.

pub use ledgerlist_core::*;
pub use ledgerlist_macros::*;

mod config;
mod model;
mod signals;

pub mod prelude;

pub use config::TrackingConfig;
pub use model::{BatchGuard, TrackedModel};
pub use signals::{ItemCounts, ModelSignals};
