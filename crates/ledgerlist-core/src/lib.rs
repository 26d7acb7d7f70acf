//! Core systems for LedgerList.
//!
//! This crate provides the foundational components of the LedgerList
//! change-tracking collection library:
//!
//! - **Signal/Slot System**: Type-safe change notification
//! - **Property System**: Reactive values with change detection
//! - **Trackable Capability**: The lifecycle-state contract items opt into
//!
//! The tracked collection itself lives in the `ledgerlist` crate; this crate
//! is the substrate it (and trackable item types) are built on.
//!
//! # Signal/Slot Example
//!
//! ```
//! use ledgerlist_core::Signal;
//!
//! // A signal carrying the name of the property that changed.
//! let changed = Signal::<&'static str>::new();
//!
//! let conn_id = changed.connect(|&name| {
//!     println!("property changed: {name}");
//! });
//!
//! changed.emit("title");
//! changed.disconnect(conn_id);
//! ```
//!
//! # Trackable Item Example
//!
//! ```
//! use ledgerlist_core::{ItemState, Property, TrackState};
//!
//! // A data row with change-tracking plumbing embedded
//! struct Task {
//!     track_state: TrackState,
//!     title: Property<String>,
//! }
//!
//! impl Task {
//!     fn set_title(&self, title: &str) {
//!         if self.title.set(title.to_string()) {
//!             self.track_state.notify("title");
//!         }
//!     }
//! }
//!
//! let task = Task {
//!     track_state: TrackState::new(),
//!     title: Property::new("Write docs".to_string()),
//! };
//! assert_eq!(task.track_state.item_state(), ItemState::Unchanged);
//! task.set_title("Write more docs");
//! ```

pub mod logging;
pub mod property;
pub mod signal;
pub mod trackable;

pub use logging::PerfSpan;
pub use property::Property;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use trackable::{AsTrackable, ITEM_STATE_PROPERTY, ItemState, TrackState, Trackable};
