//! The tracked collection model.
//!
//! [`TrackedModel<T>`] owns an ordered sequence of shared item handles and
//! classifies each trackable item into one of the four
//! [`ItemState`] buckets as the sequence or the item contents change. The
//! three delta buckets (added / modified / deleted) are maintained
//! incrementally; the unchanged view is filtered live on access.

use std::collections::HashSet;
use std::ops::Deref;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};

use ledgerlist_core::signal::ConnectionId;
use ledgerlist_core::trackable::{AsTrackable, ITEM_STATE_PROPERTY, ItemState};
use ledgerlist_core::{PerfSpan, Property};

use crate::config::TrackingConfig;
use crate::signals::{ItemCounts, ModelSignals};

/// An ordered collection that classifies its items as they change.
///
/// Items are stored as shared handles (`Arc<T>`): ownership is shared with
/// the caller, who keeps mutating item contents through their own handle
/// while the model observes the items' change notifications. Identity is
/// reference identity (`Arc::ptr_eq`) throughout — the derived buckets, the
/// duplicate suppression in the range operations and the subscription
/// bookkeeping all compare by pointer.
///
/// Items that do not opt into the [`Trackable`](ledgerlist_core::Trackable)
/// capability are stored and ordered like any other item but are never
/// classified; they count as unchanged.
///
/// # Lifecycle
///
/// - Inserting an item forces its state to [`ItemState::Added`] (bulk
///   loading at construction and [`append`](TrackedModel::append) instead
///   respect the state the item already carries).
/// - The first non-ignored content change of an unchanged item flips it to
///   [`ItemState::Modified`]; further content changes do not re-classify an
///   already-dirty item.
/// - Removing an added item drops it entirely — it was never persisted, so
///   there is nothing to report as deleted. Removing any other tracked item
///   marks it [`ItemState::Deleted`]; in soft-delete mode it stays visible
///   in the sequence, otherwise it is physically removed and survives only
///   in the deletion log.
/// - [`accept_changes`](TrackedModel::accept_changes) commits: every item
///   returns to [`ItemState::Unchanged`] and the delta buckets empty.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use ledgerlist::TrackedModel;
///
/// let model = TrackedModel::empty();
/// model.push(Arc::new("first".to_string()));
/// assert_eq!(model.len(), 1);
///
/// // Plain strings never opt into tracking, so nothing is classified.
/// assert!(model.added_items().is_empty());
/// ```
///
/// See the crate-level docs for a tracked item type in action.
pub struct TrackedModel<T: AsTrackable + 'static> {
    shared: Arc<Shared<T>>,
}

/// Interior state, shared with the per-item subscription closures through a
/// weak handle.
struct Shared<T: AsTrackable + 'static> {
    items: RwLock<Vec<Arc<T>>>,
    added: RwLock<Vec<Arc<T>>>,
    modified: RwLock<Vec<Arc<T>>>,
    deleted: RwLock<Vec<Arc<T>>>,
    /// Connection bookkeeping; invariant: an entry exists iff the item is in
    /// `items`, opts into tracking and `track_items` is enabled.
    subscriptions: Mutex<Vec<(Weak<T>, ConnectionId)>>,
    track_items: Property<bool>,
    show_removed: Property<bool>,
    ignored: RwLock<HashSet<&'static str>>,
    /// `None` until the first counter read enables maintenance.
    counts: RwLock<Option<ItemCounts>>,
    batch: Mutex<BatchState>,
    signals: ModelSignals,
}

#[derive(Default)]
struct BatchState {
    depth: usize,
    rows_dirty: bool,
    counts_dirty: bool,
}

impl<T: AsTrackable + 'static> TrackedModel<T> {
    /// Creates an empty model with the default configuration.
    pub fn empty() -> Self {
        Self::with_config(Vec::new(), TrackingConfig::default())
    }

    /// Creates a model pre-populated with `items`, default configuration.
    ///
    /// This is a bulk load: items are not classified as added; each keeps
    /// whatever state it already carries (typically unchanged for freshly
    /// loaded persisted data), and the delta buckets are rebuilt from those
    /// states.
    pub fn new(items: Vec<Arc<T>>) -> Self {
        Self::with_config(items, TrackingConfig::default())
    }

    /// Creates a model pre-populated with `items` under `config`.
    pub fn with_config(items: Vec<Arc<T>>, config: TrackingConfig) -> Self {
        let shared = Arc::new(Shared {
            items: RwLock::new(items),
            added: RwLock::new(Vec::new()),
            modified: RwLock::new(Vec::new()),
            deleted: RwLock::new(Vec::new()),
            subscriptions: Mutex::new(Vec::new()),
            track_items: Property::new(config.track_items),
            show_removed: Property::new(config.show_removed_items),
            ignored: RwLock::new(config.ignored_properties),
            counts: RwLock::new(None),
            batch: Mutex::new(BatchState::default()),
            signals: ModelSignals::new(),
        });

        if shared.is_tracking() {
            let items = shared.items.read().clone();
            for item in &items {
                Shared::track(&shared, item);
            }
            shared.rebuild_buckets();
        }

        Self { shared }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Returns the number of items in the sequence.
    pub fn len(&self) -> usize {
        self.shared.items.read().len()
    }

    /// Returns `true` if the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.shared.items.read().is_empty()
    }

    /// Returns a reference to the items (read-only access).
    pub fn items(&self) -> impl Deref<Target = Vec<Arc<T>>> + '_ {
        self.shared.items.read()
    }

    /// Returns the item at `index`, if any.
    pub fn get(&self, index: usize) -> Option<Arc<T>> {
        self.shared.items.read().get(index).cloned()
    }

    /// Returns `true` if `item` (by reference identity) is in the sequence.
    pub fn contains(&self, item: &Arc<T>) -> bool {
        self.shared.position(item).is_some()
    }

    /// Returns the signals for this model.
    pub fn signals(&self) -> &ModelSignals {
        &self.shared.signals
    }

    /// Whether items are currently classified.
    pub fn track_items(&self) -> bool {
        self.shared.is_tracking()
    }

    /// Whether soft-delete mode is active.
    pub fn show_removed_items(&self) -> bool {
        self.shared.show_removed.get()
    }

    /// The property names whose changes never dirty an item.
    pub fn ignored_properties(&self) -> HashSet<&'static str> {
        self.shared.ignored.read().clone()
    }

    // -------------------------------------------------------------------------
    // Derived views
    // -------------------------------------------------------------------------

    /// Items inserted since the last commit, in insertion order.
    pub fn added_items(&self) -> Vec<Arc<T>> {
        self.shared.added.read().clone()
    }

    /// Items whose content changed since the last commit.
    pub fn modified_items(&self) -> Vec<Arc<T>> {
        self.shared.modified.read().clone()
    }

    /// The deletion log since the last commit.
    ///
    /// Contains soft-deleted items still visible in the sequence as well as
    /// items already physically removed.
    pub fn deleted_items(&self) -> Vec<Arc<T>> {
        self.shared.deleted.read().clone()
    }

    /// Items matching their persisted form, filtered live from the
    /// sequence.
    ///
    /// Unlike the delta buckets this view is not maintained incrementally.
    /// With tracking disabled every item is unchanged.
    pub fn unchanged_items(&self) -> Vec<Arc<T>> {
        let items = self.shared.items.read();
        if !self.shared.is_tracking() {
            return items.clone();
        }
        items
            .iter()
            .filter(|item| {
                item.as_trackable()
                    .is_none_or(|t| t.item_state() == ItemState::Unchanged)
            })
            .cloned()
            .collect()
    }

    // -------------------------------------------------------------------------
    // Counters
    // -------------------------------------------------------------------------

    /// Snapshot of the per-state counters.
    ///
    /// The first read enables incremental maintenance; from then on every
    /// mutation refreshes the counters from the sequence length and the
    /// bucket sizes and emits
    /// [`counts_changed`](ModelSignals::counts_changed) when they move.
    pub fn counts(&self) -> ItemCounts {
        self.shared.ensure_counts()
    }

    /// Number of unchanged items.
    pub fn count_unchanged(&self) -> usize {
        self.counts().unchanged
    }

    /// Number of items added since the last commit.
    pub fn count_added(&self) -> usize {
        self.counts().added
    }

    /// Number of items modified since the last commit.
    pub fn count_modified(&self) -> usize {
        self.counts().modified
    }

    /// Number of items deleted since the last commit.
    pub fn count_deleted(&self) -> usize {
        self.counts().deleted
    }

    // -------------------------------------------------------------------------
    // Mutating operations
    // -------------------------------------------------------------------------

    /// Appends an item to the end of the sequence.
    ///
    /// With tracking enabled, a trackable item is subscribed and forced to
    /// [`ItemState::Added`].
    pub fn push(&self, item: Arc<T>) {
        let index = self.shared.items.read().len();
        self.insert(index, item);
    }

    /// Inserts an item at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    pub fn insert(&self, index: usize, item: Arc<T>) {
        tracing::trace!(target: "ledgerlist::model", index, "inserting item");
        self.shared.items.write().insert(index, Arc::clone(&item));
        if self.shared.is_tracking() {
            Shared::track(&self.shared, &item);
            self.shared.force_state(&item, ItemState::Added);
        }
        self.shared.refresh_counts();
        self.shared.emit_rows_inserted(index, index);
    }

    /// Removes the item at `index` and returns it.
    ///
    /// An added item is dropped entirely. Any other tracked item is marked
    /// deleted; in soft-delete mode it stays in the sequence, otherwise it
    /// is physically removed and remains only in the deletion log.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn remove(&self, index: usize) -> Arc<T> {
        let item = Arc::clone(&self.shared.items.read()[index]);
        let state = if self.shared.is_tracking() {
            item.as_trackable().map(|t| t.item_state())
        } else {
            None
        };
        tracing::trace!(target: "ledgerlist::model", index, ?state, "removing item");

        match state {
            None => {
                self.shared.untrack(&item);
                self.shared.items.write().remove(index);
                self.shared.refresh_counts();
                self.shared.emit_rows_removed(index, index);
            }
            Some(ItemState::Added) => {
                // Never persisted: nothing to report as deleted.
                self.shared.untrack(&item);
                self.shared.drop_from(&self.shared.added, &item);
                self.shared.items.write().remove(index);
                self.shared.refresh_counts();
                self.shared.emit_rows_removed(index, index);
            }
            Some(_) => {
                // The classifier files it into the deletion log and
                // refreshes the counters.
                self.shared.force_state(&item, ItemState::Deleted);
                if !self.shared.show_removed.get() {
                    self.shared.untrack(&item);
                    self.shared.items.write().remove(index);
                    self.shared.refresh_counts();
                    self.shared.emit_rows_removed(index, index);
                }
            }
        }

        item
    }

    /// Replaces the item at `index`, returning the old item.
    ///
    /// The old item is retired with the removal bookkeeping (an added item
    /// is dropped from the added bucket, anything else joins the deletion
    /// log); the new item is subscribed and forced to [`ItemState::Added`].
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn replace(&self, index: usize, item: Arc<T>) -> Arc<T> {
        let old = Arc::clone(&self.shared.items.read()[index]);
        if self.shared.is_tracking() {
            match old.as_trackable().map(|t| t.item_state()) {
                None => {}
                Some(ItemState::Added) => {
                    self.shared.untrack(&old);
                    self.shared.drop_from(&self.shared.added, &old);
                }
                Some(_) => {
                    // Replacement is delete-then-insert bookkeeping.
                    self.shared.force_state(&old, ItemState::Deleted);
                    self.shared.untrack(&old);
                }
            }
        }

        self.shared.items.write()[index] = Arc::clone(&item);
        if self.shared.is_tracking() {
            Shared::track(&self.shared, &item);
            self.shared.force_state(&item, ItemState::Added);
        }
        self.shared.refresh_counts();
        self.shared.emit_data_changed(index);
        old
    }

    /// Appends every item not already present, one tracked insert each.
    ///
    /// Duplicates (by reference identity) are silently skipped. Each
    /// accepted item flows through the single-item insert path and emits its
    /// own notifications; use [`append`](TrackedModel::append) for the
    /// coalesced bulk variant. Empty input is a no-op.
    pub fn extend<I>(&self, items: I)
    where
        I: IntoIterator<Item = Arc<T>>,
    {
        for item in items {
            if self.contains(&item) {
                continue;
            }
            self.push(item);
        }
    }

    /// Bulk append with one coalesced notification.
    ///
    /// Duplicates (by reference identity) are silently skipped; empty input
    /// is a no-op. Each accepted item is subscribed and classified: into
    /// `state` when given, otherwise from the state the item already
    /// carries (the bulk-load rule — nothing is forced to added).
    pub fn append<I>(&self, items: I, state: Option<ItemState>)
    where
        I: IntoIterator<Item = Arc<T>>,
    {
        let _span = PerfSpan::new("append");
        let _batch = self.begin_batch();
        let mut appended = 0usize;

        for item in items {
            if self.contains(&item) {
                continue;
            }
            self.shared.items.write().push(Arc::clone(&item));
            appended += 1;
            if self.shared.is_tracking() {
                Shared::track(&self.shared, &item);
                match state {
                    Some(state) => self.shared.force_state(&item, state),
                    None => {
                        if let Some(trackable) = item.as_trackable() {
                            self.shared.classify(&item, trackable.item_state());
                        }
                    }
                }
            }
        }

        tracing::trace!(target: "ledgerlist::model", appended, "bulk append");
        if appended > 0 {
            self.shared.refresh_counts();
            self.shared.emit_reset();
        }
    }

    /// Soft-deletes every item in one coalesced operation.
    ///
    /// With tracking disabled this is a plain [`clear`](TrackedModel::clear).
    /// Otherwise added items are dropped (deleting something never persisted
    /// is a plain removal) and every other tracked item joins the deletion
    /// log; unless soft-delete mode keeps them visible, the sequence is then
    /// physically cleared.
    pub fn delete_all(&self) {
        if !self.shared.is_tracking() {
            self.clear();
            return;
        }

        let _span = PerfSpan::new("delete_all");
        let _batch = self.begin_batch();
        let snapshot = self.shared.items.read().clone();
        let mut dropped: Vec<Arc<T>> = Vec::new();

        for item in &snapshot {
            match item.as_trackable().map(|t| t.item_state()) {
                None => {}
                Some(ItemState::Added) => {
                    self.shared.untrack(item);
                    self.shared.drop_from(&self.shared.added, item);
                    dropped.push(Arc::clone(item));
                }
                Some(_) => self.shared.force_state(item, ItemState::Deleted),
            }
        }

        if self.shared.show_removed.get() {
            if !dropped.is_empty() {
                self.shared
                    .items
                    .write()
                    .retain(|x| !dropped.iter().any(|d| Arc::ptr_eq(d, x)));
            }
        } else {
            self.shared.untrack_all();
            self.shared.items.write().clear();
        }

        self.shared.refresh_counts();
        self.shared.emit_reset();
    }

    /// Commits the current state: everything returns to
    /// [`ItemState::Unchanged`] and the delta buckets empty.
    ///
    /// Covers the union of the delta buckets (including physically removed
    /// deleted items) and everything still visible in the sequence.
    /// Idempotent — a second call in a row emits nothing.
    pub fn accept_changes(&self) {
        let _span = PerfSpan::new("accept_changes");
        let _batch = self.begin_batch();

        let mut affected: Vec<Arc<T>> = Vec::new();
        for bucket in [&self.shared.added, &self.shared.modified, &self.shared.deleted] {
            affected.extend(bucket.write().drain(..));
        }
        affected.extend(self.shared.items.read().iter().cloned());

        for item in affected {
            if let Some(trackable) = item.as_trackable() {
                trackable.set_item_state(ItemState::Unchanged);
            }
        }

        self.shared.refresh_counts();
    }

    /// Hard reset: unsubscribes and drops every item and empties the delta
    /// buckets without marking anything deleted.
    pub fn clear(&self) {
        tracing::trace!(target: "ledgerlist::model", "clearing model");
        self.shared.untrack_all();
        self.shared.items.write().clear();
        self.shared.added.write().clear();
        self.shared.modified.write().clear();
        self.shared.deleted.write().clear();
        self.shared.refresh_counts();
        self.shared.emit_reset();
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Enables or disables classification.
    ///
    /// Enabling subscribes every trackable item and rebuilds the delta
    /// buckets from the states the items currently carry; disabling
    /// unsubscribes everything and empties the buckets without touching any
    /// item's state. No-op if the value does not change.
    pub fn set_track_items(&self, enabled: bool) {
        if !self.shared.track_items.set(enabled) {
            return;
        }
        tracing::debug!(target: "ledgerlist::model", enabled, "tracking toggled");

        if enabled {
            let items = self.shared.items.read().clone();
            for item in &items {
                Shared::track(&self.shared, item);
            }
            self.shared.rebuild_buckets();
        } else {
            self.shared.untrack_all();
            self.shared.added.write().clear();
            self.shared.modified.write().clear();
            self.shared.deleted.write().clear();
        }

        self.shared.refresh_counts();
        self.shared.signals.track_items_changed.emit(enabled);
    }

    /// Toggles soft-delete mode.
    ///
    /// Only affects future removals — items already physically removed are
    /// not resurrected. Refreshes the counters, whose unchanged component
    /// depends on whether deleted items occupy the sequence.
    pub fn set_show_removed_items(&self, enabled: bool) {
        if !self.shared.show_removed.set(enabled) {
            return;
        }
        self.shared.refresh_counts();
        self.shared.signals.show_removed_changed.emit(enabled);
    }

    /// Replaces the ignored property-name set.
    pub fn set_ignored_properties<I>(&self, names: I)
    where
        I: IntoIterator<Item = &'static str>,
    {
        *self.shared.ignored.write() = names.into_iter().collect();
    }

    /// Adds one property name to the ignored set.
    pub fn ignore_property(&self, name: &'static str) {
        self.shared.ignored.write().insert(name);
    }

    // -------------------------------------------------------------------------
    // Batching
    // -------------------------------------------------------------------------

    /// Starts a coalescing batch.
    ///
    /// While any batch guard is alive, per-mutation row signals are
    /// suppressed; when the outermost guard drops, a single
    /// [`model_reset`](ModelSignals::model_reset) (and at most one
    /// [`counts_changed`](ModelSignals::counts_changed)) is emitted if
    /// anything happened. Nested batches compose: only the outermost
    /// release emits.
    pub fn begin_batch(&self) -> BatchGuard<'_, T> {
        self.shared.begin_batch();
        BatchGuard {
            shared: &self.shared,
        }
    }
}

impl<T: AsTrackable + 'static> Default for TrackedModel<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// RAII guard for a coalescing batch; see
/// [`TrackedModel::begin_batch`].
pub struct BatchGuard<'a, T: AsTrackable + 'static> {
    shared: &'a Arc<Shared<T>>,
}

impl<T: AsTrackable + 'static> Drop for BatchGuard<'_, T> {
    fn drop(&mut self) {
        self.shared.end_batch();
    }
}

// -------------------------------------------------------------------------
// Internals
// -------------------------------------------------------------------------

impl<T: AsTrackable + 'static> Shared<T> {
    fn is_tracking(&self) -> bool {
        self.track_items.get()
    }

    /// Subscribe to an item's change notifications. One of the two choke
    /// points that maintain the subscription invariant.
    fn track(this: &Arc<Self>, item: &Arc<T>) {
        if !this.is_tracking() {
            return;
        }
        let Some(trackable) = item.as_trackable() else {
            return;
        };

        let weak_model = Arc::downgrade(this);
        let weak_item = Arc::downgrade(item);
        let id = trackable.changed().connect(move |&name| {
            let (Some(model), Some(item)) = (weak_model.upgrade(), weak_item.upgrade()) else {
                return;
            };
            model.on_item_changed(&item, name);
        });

        this.subscriptions.lock().push((Arc::downgrade(item), id));
    }

    /// Drop an item's subscription, if any. The second choke point.
    fn untrack(&self, item: &Arc<T>) {
        let Some(trackable) = item.as_trackable() else {
            return;
        };
        let id = {
            let mut subscriptions = self.subscriptions.lock();
            let Some(pos) = subscriptions
                .iter()
                .position(|(weak, _)| weak.as_ptr() == Arc::as_ptr(item))
            else {
                return;
            };
            subscriptions.swap_remove(pos).1
        };
        trackable.changed().disconnect(id);
    }

    fn untrack_all(&self) {
        let subscriptions: Vec<(Weak<T>, ConnectionId)> =
            std::mem::take(&mut *self.subscriptions.lock());
        for (weak, id) in subscriptions {
            if let Some(item) = weak.upgrade() {
                if let Some(trackable) = item.as_trackable() {
                    trackable.changed().disconnect(id);
                }
            }
        }
    }

    /// The change-propagation state machine, invoked from every subscribed
    /// item's change signal.
    fn on_item_changed(&self, item: &Arc<T>, name: &'static str) {
        if !self.is_tracking() {
            return;
        }
        let Some(trackable) = item.as_trackable() else {
            return;
        };

        if name == ITEM_STATE_PROPERTY {
            self.classify(item, trackable.item_state());
        } else if self.ignored.read().contains(name) {
            // configured as presentation-only; never dirties the item
        } else if trackable.item_state() == ItemState::Unchanged {
            // The first content change dirties the item; the resulting
            // state notification re-enters through the branch above.
            trackable.set_item_state(ItemState::Modified);
        }
    }

    /// Re-file an item into the single bucket matching `state`.
    fn classify(&self, item: &Arc<T>, state: ItemState) {
        self.remove_from_buckets(item);
        match state {
            ItemState::Unchanged => {}
            ItemState::Added => self.added.write().push(Arc::clone(item)),
            ItemState::Modified => self.modified.write().push(Arc::clone(item)),
            ItemState::Deleted => self.deleted.write().push(Arc::clone(item)),
        }
        tracing::trace!(target: "ledgerlist::model", ?state, "classified item");

        self.refresh_counts();
        if let Some(row) = self.position(item) {
            self.emit_data_changed(row);
        }
    }

    fn remove_from_buckets(&self, item: &Arc<T>) {
        for bucket in [&self.added, &self.modified, &self.deleted] {
            self.drop_from(bucket, item);
        }
    }

    fn drop_from(&self, bucket: &RwLock<Vec<Arc<T>>>, item: &Arc<T>) {
        bucket.write().retain(|x| !Arc::ptr_eq(x, item));
    }

    fn position(&self, item: &Arc<T>) -> Option<usize> {
        self.items.read().iter().position(|x| Arc::ptr_eq(x, item))
    }

    /// Full rebuild of the delta buckets from the items' current states.
    fn rebuild_buckets(&self) {
        self.added.write().clear();
        self.modified.write().clear();
        self.deleted.write().clear();
        if !self.is_tracking() {
            return;
        }
        let items = self.items.read().clone();
        for item in &items {
            if let Some(trackable) = item.as_trackable() {
                match trackable.item_state() {
                    ItemState::Unchanged => {}
                    ItemState::Added => self.added.write().push(Arc::clone(item)),
                    ItemState::Modified => self.modified.write().push(Arc::clone(item)),
                    ItemState::Deleted => self.deleted.write().push(Arc::clone(item)),
                }
            }
        }
    }

    /// Force an item into `state`, letting the classifier run through the
    /// item's own notification when the state actually changes.
    fn force_state(&self, item: &Arc<T>, state: ItemState) {
        let Some(trackable) = item.as_trackable() else {
            return;
        };
        if trackable.item_state() == state {
            // No notification will fire; file it directly.
            self.classify(item, state);
        } else {
            trackable.set_item_state(state);
        }
    }

    // ---------------------------------------------------------------------
    // Counters
    // ---------------------------------------------------------------------

    fn compute_counts(&self) -> ItemCounts {
        let total = self.items.read().len();
        if !self.is_tracking() {
            return ItemCounts {
                unchanged: total,
                ..ItemCounts::default()
            };
        }
        let added = self.added.read().len();
        let modified = self.modified.read().len();
        let deleted = self.deleted.read().len();
        // Deleted items occupy the sequence only in soft-delete mode.
        let occupied = added + modified + if self.show_removed.get() { deleted } else { 0 };
        ItemCounts {
            unchanged: total.saturating_sub(occupied),
            added,
            modified,
            deleted,
        }
    }

    fn ensure_counts(&self) -> ItemCounts {
        if let Some(counts) = *self.counts.read() {
            return counts;
        }
        let counts = self.compute_counts();
        *self.counts.write() = Some(counts);
        counts
    }

    fn refresh_counts(&self) {
        let old = match *self.counts.read() {
            Some(counts) => counts,
            None => return, // maintenance not enabled yet
        };
        let new = self.compute_counts();
        if new == old {
            return;
        }
        *self.counts.write() = Some(new);
        self.emit_counts_changed(new);
    }

    // ---------------------------------------------------------------------
    // Batched emission
    // ---------------------------------------------------------------------

    fn begin_batch(&self) {
        self.batch.lock().depth += 1;
    }

    fn end_batch(&self) {
        let (emit_rows, emit_counts) = {
            let mut batch = self.batch.lock();
            batch.depth -= 1;
            if batch.depth > 0 {
                (false, false)
            } else {
                (
                    std::mem::take(&mut batch.rows_dirty),
                    std::mem::take(&mut batch.counts_dirty),
                )
            }
        };
        if emit_rows {
            self.signals.model_reset.emit(());
        }
        if emit_counts {
            if let Some(counts) = *self.counts.read() {
                self.signals.counts_changed.emit(counts);
            }
        }
    }

    fn emit_rows_inserted(&self, first: usize, last: usize) {
        {
            let mut batch = self.batch.lock();
            if batch.depth > 0 {
                batch.rows_dirty = true;
                return;
            }
        }
        self.signals.rows_inserted.emit((first, last));
    }

    fn emit_rows_removed(&self, first: usize, last: usize) {
        {
            let mut batch = self.batch.lock();
            if batch.depth > 0 {
                batch.rows_dirty = true;
                return;
            }
        }
        self.signals.rows_removed.emit((first, last));
    }

    fn emit_data_changed(&self, row: usize) {
        {
            let mut batch = self.batch.lock();
            if batch.depth > 0 {
                batch.rows_dirty = true;
                return;
            }
        }
        self.signals.data_changed.emit(row);
    }

    fn emit_reset(&self) {
        {
            let mut batch = self.batch.lock();
            if batch.depth > 0 {
                batch.rows_dirty = true;
                return;
            }
        }
        self.signals.model_reset.emit(());
    }

    fn emit_counts_changed(&self, counts: ItemCounts) {
        {
            let mut batch = self.batch.lock();
            if batch.depth > 0 {
                batch.counts_dirty = true;
                return;
            }
        }
        self.signals.counts_changed.emit(counts);
    }
}

static_assertions::assert_impl_all!(TrackedModel<String>: Send, Sync);
