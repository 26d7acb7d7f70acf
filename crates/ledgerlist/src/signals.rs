//! Change-notification surface of the tracked collection.
//!
//! Consumers (typically a view layer) connect to these signals to stay
//! synchronized with the model. Bulk operations coalesce their individual
//! mutations into a single [`model_reset`](ModelSignals::model_reset)
//! emission via the batch guard.

use ledgerlist_core::Signal;

/// Snapshot of the per-state item counters.
///
/// Emitted as the payload of [`ModelSignals::counts_changed`] and returned
/// by the model's counter accessors. Counter maintenance is lazily enabled
/// the first time any counter is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemCounts {
    /// Items matching their persisted form (including items that never
    /// opted into tracking).
    pub unchanged: usize,
    /// Items inserted since the last commit.
    pub added: usize,
    /// Items whose content changed since the last commit.
    pub modified: usize,
    /// Items removed since the last commit (a deletion log: physically
    /// removed items remain counted until the next commit).
    pub deleted: usize,
}

/// Collection of signals emitted by a tracked model.
///
/// # Signal Usage
///
/// - **Row changes**: `rows_inserted` / `rows_removed` carry the affected
///   `(first, last)` range; `data_changed` carries the row whose
///   classification or content changed.
/// - **Bulk changes**: `model_reset` is emitted once per coalesced batch.
/// - **Counters and configuration**: `counts_changed`,
///   `track_items_changed` and `show_removed_changed` notify property
///   observers.
pub struct ModelSignals {
    /// Emitted after rows have been inserted. Args: (first row, last row).
    pub rows_inserted: Signal<(usize, usize)>,

    /// Emitted after rows have been removed. Args: (first row, last row).
    pub rows_removed: Signal<(usize, usize)>,

    /// Emitted when an existing row's classification or content changed.
    pub data_changed: Signal<usize>,

    /// Emitted after a bulk restructuring (batched operations, clear).
    pub model_reset: Signal<()>,

    /// Emitted when the lazily-enabled counters change.
    pub counts_changed: Signal<ItemCounts>,

    /// Emitted when tracking is toggled.
    pub track_items_changed: Signal<bool>,

    /// Emitted when soft-delete mode is toggled.
    pub show_removed_changed: Signal<bool>,
}

impl Default for ModelSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelSignals {
    /// Creates a new set of model signals.
    pub fn new() -> Self {
        Self {
            rows_inserted: Signal::new(),
            rows_removed: Signal::new(),
            data_changed: Signal::new(),
            model_reset: Signal::new(),
            counts_changed: Signal::new(),
            track_items_changed: Signal::new(),
            show_removed_changed: Signal::new(),
        }
    }
}
