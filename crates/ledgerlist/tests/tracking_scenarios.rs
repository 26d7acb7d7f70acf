//! End-to-end scenarios for the tracked collection: classification flows,
//! invariants, commit semantics and the batching surface.

use std::sync::Arc;

use ledgerlist::prelude::*;
use parking_lot::Mutex;

#[derive(Trackable)]
struct Contact {
    track_state: TrackState,
    name: Property<String>,
    is_selected: Property<bool>,
}

impl Contact {
    fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            track_state: TrackState::new(),
            name: Property::new(name.to_string()),
            is_selected: Property::new(false),
        })
    }

    fn set_name(&self, name: &str) {
        if self.name.set(name.to_string()) {
            self.track_state.notify("name");
        }
    }

    fn set_selected(&self, selected: bool) {
        if self.is_selected.set(selected) {
            self.track_state.notify("is_selected");
        }
    }
}

/// The three delta views never share an item by reference.
fn assert_disjoint(model: &TrackedModel<Contact>) {
    let added = model.added_items();
    let modified = model.modified_items();
    let deleted = model.deleted_items();

    for a in &added {
        assert!(!modified.iter().any(|x| Arc::ptr_eq(x, a)));
        assert!(!deleted.iter().any(|x| Arc::ptr_eq(x, a)));
    }
    for m in &modified {
        assert!(!deleted.iter().any(|x| Arc::ptr_eq(x, m)));
    }
}

/// Count conservation: unchanged + added + modified (+ deleted when removed
/// items stay visible) equals the sequence length.
fn assert_count_conservation(model: &TrackedModel<Contact>) {
    let counts = model.counts();
    let visible_deleted = if model.show_removed_items() {
        counts.deleted
    } else {
        0
    };
    assert_eq!(
        counts.unchanged + counts.added + counts.modified + visible_deleted,
        model.len(),
        "count conservation violated: {counts:?}, len {}",
        model.len()
    );
}

// ============= Classification flows =============

#[test]
fn scenario_add_classifies_as_added() {
    let model = TrackedModel::empty();
    let x = Contact::new("x");
    model.push(x.clone());

    assert_eq!(model.len(), 1);
    let added = model.added_items();
    assert_eq!(added.len(), 1);
    assert!(Arc::ptr_eq(&added[0], &x));
    assert_eq!(model.count_added(), 1);
    assert_eq!(model.count_unchanged(), 0);
    assert_disjoint(&model);
    assert_count_conservation(&model);
}

#[test]
fn scenario_accept_changes_commits_added_item() {
    let model = TrackedModel::empty();
    let x = Contact::new("x");
    model.push(x.clone());

    model.accept_changes();

    assert!(model.added_items().is_empty());
    assert_eq!(x.item_state(), ItemState::Unchanged);
    assert_eq!(model.count_unchanged(), 1);
    assert_count_conservation(&model);
}

#[test]
fn scenario_external_edit_marks_modified() {
    let contact = Contact::new("Ada");
    let model = TrackedModel::new(vec![contact.clone()]);

    contact.set_name("Ada Lovelace");

    assert_eq!(contact.item_state(), ItemState::Modified);
    let modified = model.modified_items();
    assert_eq!(modified.len(), 1);
    assert!(Arc::ptr_eq(&modified[0], &contact));
    assert_eq!(model.count_modified(), 1);
    assert_count_conservation(&model);
}

#[test]
fn scenario_soft_delete_keeps_item_visible() {
    let contact = Contact::new("Ada");
    let model = TrackedModel::with_config(
        vec![contact.clone()],
        TrackingConfig::new().with_show_removed_items(true),
    );
    let before = model.count_unchanged();

    model.remove(0);

    assert_eq!(model.len(), 1, "soft-deleted item stays in the sequence");
    assert_eq!(contact.item_state(), ItemState::Deleted);
    assert!(model.deleted_items().iter().any(|x| Arc::ptr_eq(x, &contact)));
    assert_eq!(model.count_unchanged(), before - 1);
    assert_count_conservation(&model);
}

#[test]
fn scenario_removing_added_item_drops_it_entirely() {
    let model = TrackedModel::new(vec![Contact::new("kept")]);
    let fresh = Contact::new("fresh");
    model.push(fresh.clone());

    model.remove(1);

    assert_eq!(model.len(), 1);
    assert!(model.added_items().is_empty());
    assert!(model.deleted_items().is_empty(), "never persisted, never deleted");
    assert_count_conservation(&model);
}

// ============= Invariants and properties =============

#[test]
fn accept_changes_is_idempotent() {
    let ada = Contact::new("Ada");
    let model = TrackedModel::new(vec![ada.clone(), Contact::new("Grace")]);
    ada.set_name("Ada L.");
    model.push(Contact::new("Edsger"));
    model.remove(0);

    model.accept_changes();
    let counts = model.counts();
    let len = model.len();

    // A second commit in a row changes and emits nothing.
    let resets = Arc::new(Mutex::new(0));
    let recv = resets.clone();
    model.signals().model_reset.connect(move |_| {
        *recv.lock() += 1;
    });
    let count_events = Arc::new(Mutex::new(0));
    let recv = count_events.clone();
    model.signals().counts_changed.connect(move |_| {
        *recv.lock() += 1;
    });

    model.accept_changes();

    assert_eq!(model.counts(), counts);
    assert_eq!(model.len(), len);
    assert_eq!(*resets.lock(), 0);
    assert_eq!(*count_events.lock(), 0);
}

#[test]
fn toggle_tracking_round_trips_classification() {
    let ada = Contact::new("Ada");
    let grace = Contact::new("Grace");
    let model = TrackedModel::new(vec![ada.clone(), grace.clone()]);
    ada.set_name("Ada L.");
    model.push(Contact::new("Edsger"));

    let added_before = model.added_items();
    let modified_before = model.modified_items();

    model.set_track_items(false);
    assert!(model.added_items().is_empty());
    assert!(model.modified_items().is_empty());
    assert_eq!(model.count_unchanged(), model.len());

    model.set_track_items(true);
    let added_after = model.added_items();
    let modified_after = model.modified_items();

    assert_eq!(added_after.len(), added_before.len());
    assert!(
        added_before
            .iter()
            .zip(&added_after)
            .all(|(a, b)| Arc::ptr_eq(a, b))
    );
    assert_eq!(modified_after.len(), modified_before.len());
    assert!(
        modified_before
            .iter()
            .zip(&modified_after)
            .all(|(a, b)| Arc::ptr_eq(a, b))
    );
    assert_count_conservation(&model);
}

#[test]
fn tracking_disabled_ignores_edits() {
    let ada = Contact::new("Ada");
    let model = TrackedModel::new(vec![ada.clone()]);

    model.set_track_items(false);
    ada.set_name("Ada L.");

    // Unsubscribed: the edit does not reclassify anything, even after
    // re-enabling (the item state itself was never touched).
    assert_eq!(ada.item_state(), ItemState::Unchanged);
    model.set_track_items(true);
    assert!(model.modified_items().is_empty());
}

#[test]
fn ignored_properties_do_not_dirty_items() {
    let contact = Contact::new("Ada");
    let model = TrackedModel::new(vec![contact.clone()]);

    // "is_selected" is ignored by default.
    contact.set_selected(true);

    assert_eq!(contact.item_state(), ItemState::Unchanged);
    assert!(model.modified_items().is_empty());
    assert_eq!(model.count_unchanged(), 1);
}

#[test]
fn dirty_items_are_not_reclassified_by_further_edits() {
    let contact = Contact::new("Ada");
    let model = TrackedModel::new(vec![contact.clone()]);

    contact.set_name("first edit");
    contact.set_name("second edit");

    assert_eq!(contact.item_state(), ItemState::Modified);
    assert_eq!(model.modified_items().len(), 1);
    assert_disjoint(&model);
}

#[test]
fn invariants_hold_across_a_mixed_mutation_flow() {
    let model = TrackedModel::with_config(
        vec![Contact::new("a"), Contact::new("b"), Contact::new("c")],
        TrackingConfig::new().with_show_removed_items(true),
    );
    assert_count_conservation(&model); // enables the counters

    let d = Contact::new("d");
    model.push(d.clone());
    assert_count_conservation(&model);
    assert_disjoint(&model);

    model.get(0).unwrap().set_name("a-edited");
    assert_count_conservation(&model);
    assert_disjoint(&model);

    model.remove(1); // unchanged item, soft-deleted in place
    assert_count_conservation(&model);
    assert_disjoint(&model);

    model.remove(3); // the added item "d": physically dropped
    assert!(!model.items().iter().any(|x| Arc::ptr_eq(x, &d)));
    assert_count_conservation(&model);
    assert_disjoint(&model);

    model.accept_changes();
    assert_eq!(model.count_unchanged(), model.len());
    assert_count_conservation(&model);
}

// ============= Bulk operations =============

#[test]
fn delete_all_soft_deletes_everything() {
    let fresh = Contact::new("fresh");
    let model = TrackedModel::new(vec![Contact::new("a"), Contact::new("b")]);
    model.push(fresh.clone());

    model.delete_all();

    // Soft delete off: the sequence empties, persisted items join the log.
    assert!(model.is_empty());
    assert_eq!(model.deleted_items().len(), 2);
    assert!(
        !model.deleted_items().iter().any(|x| Arc::ptr_eq(x, &fresh)),
        "added items are dropped, not deleted"
    );
    assert!(model.added_items().is_empty());
}

#[test]
fn delete_all_with_visible_removals() {
    let model = TrackedModel::with_config(
        vec![Contact::new("a"), Contact::new("b")],
        TrackingConfig::new().with_show_removed_items(true),
    );
    let fresh = Contact::new("fresh");
    model.push(fresh.clone());

    model.delete_all();

    // Persisted items stay visible with state Deleted; the added one is gone.
    assert_eq!(model.len(), 2);
    assert_eq!(model.deleted_items().len(), 2);
    assert!(
        model
            .items()
            .iter()
            .all(|x| x.item_state() == ItemState::Deleted)
    );
    assert_count_conservation(&model);
}

#[test]
fn bulk_flow_with_tracing_installed() {
    // Mutation tracing must not disturb the classification flow.
    let _ = tracing_subscriber::fmt()
        .with_env_filter("ledgerlist=trace")
        .try_init();

    let model = TrackedModel::empty();
    model.append((0..4).map(|i| Contact::new(&format!("c{i}"))), None);
    model.delete_all();
    model.accept_changes();

    assert!(model.is_empty());
    assert!(model.deleted_items().is_empty());
}

#[test]
fn delete_all_emits_one_coalesced_notification() {
    let model = TrackedModel::new(vec![Contact::new("a"), Contact::new("b")]);
    let resets = Arc::new(Mutex::new(0));
    let removals = Arc::new(Mutex::new(0));

    let recv = resets.clone();
    model.signals().model_reset.connect(move |_| {
        *recv.lock() += 1;
    });
    let recv = removals.clone();
    model.signals().rows_removed.connect(move |_| {
        *recv.lock() += 1;
    });

    model.delete_all();

    assert_eq!(*resets.lock(), 1);
    assert_eq!(*removals.lock(), 0);
}

#[test]
fn extend_notifies_per_item() {
    let model = TrackedModel::empty();
    let inserts = Arc::new(Mutex::new(Vec::new()));

    let recv = inserts.clone();
    model.signals().rows_inserted.connect(move |&(first, last)| {
        recv.lock().push((first, last));
    });

    model.extend([Contact::new("a"), Contact::new("b")]);

    assert_eq!(*inserts.lock(), vec![(0, 0), (1, 1)]);
}

// ============= Soft delete toggling and commit =============

#[test]
fn accept_changes_keeps_soft_deleted_rows_visible_as_unchanged() {
    let model = TrackedModel::with_config(
        vec![Contact::new("a")],
        TrackingConfig::new().with_show_removed_items(true),
    );
    model.remove(0);
    assert_eq!(model.get(0).unwrap().item_state(), ItemState::Deleted);

    model.accept_changes();

    assert_eq!(model.len(), 1);
    assert_eq!(model.get(0).unwrap().item_state(), ItemState::Unchanged);
    assert!(model.deleted_items().is_empty());
    assert_count_conservation(&model);
}

#[test]
fn toggling_show_removed_only_affects_future_removals() {
    let model = TrackedModel::new(vec![Contact::new("a"), Contact::new("b")]);
    model.remove(0); // physically removed

    model.set_show_removed_items(true);
    assert_eq!(model.len(), 1, "earlier removals are not resurrected");

    model.remove(0); // soft-deleted in place
    assert_eq!(model.len(), 1);
    assert_eq!(model.deleted_items().len(), 2);
}

#[test]
fn show_removed_toggle_notifies() {
    let model: TrackedModel<Contact> = TrackedModel::empty();
    let received = Arc::new(Mutex::new(Vec::new()));

    let recv = received.clone();
    model.signals().show_removed_changed.connect(move |&on| {
        recv.lock().push(on);
    });

    model.set_show_removed_items(true);
    model.set_show_removed_items(true); // no change, no signal
    model.set_show_removed_items(false);

    assert_eq!(*received.lock(), vec![true, false]);
}

#[test]
fn track_items_toggle_notifies() {
    let model: TrackedModel<Contact> = TrackedModel::empty();
    let received = Arc::new(Mutex::new(Vec::new()));

    let recv = received.clone();
    model.signals().track_items_changed.connect(move |&on| {
        recv.lock().push(on);
    });

    model.set_track_items(false);
    model.set_track_items(true);

    assert_eq!(*received.lock(), vec![false, true]);
}
