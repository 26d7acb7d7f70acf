//! Reactive properties for LedgerList.
//!
//! A [`Property<T>`] is an interior-mutable cell with change detection:
//! [`set`](Property::set) reports whether the stored value actually moved,
//! which is what lets owners emit a change signal exactly once per real
//! change. The trackable capability keeps its lifecycle state in a property,
//! and the tracked collection keeps its configuration flags in them.
//!
//! # Example
//!
//! ```
//! use ledgerlist_core::{Property, Signal};
//!
//! struct Row {
//!     title: Property<String>,
//!     title_changed: Signal<String>,
//! }
//!
//! impl Row {
//!     fn set_title(&self, title: String) {
//!         // Emit only when the stored value actually moved.
//!         if self.title.set(title.clone()) {
//!             self.title_changed.emit(title);
//!         }
//!     }
//! }
//!
//! let row = Row {
//!     title: Property::new("draft".into()),
//!     title_changed: Signal::new(),
//! };
//! row.set_title("final".into());
//! assert_eq!(row.title.get(), "final");
//! ```

use std::fmt;

use parking_lot::RwLock;

/// An interior-mutable value cell with change detection.
///
/// Reads go through [`get`](Property::get) (clones) or
/// [`with`](Property::with) (borrows); writes go through
/// [`set`](Property::set), whose return value tells the owner whether a
/// change notification is due. `set_silent` skips detection entirely, for
/// initialization paths where nobody is listening yet.
///
/// # Thread Safety
///
/// The cell is a `parking_lot::RwLock`, so `Property<T>` is `Send + Sync`
/// whenever `T` is — though the library's mutation model expects a single
/// logical mutator.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Wraps `value` in a new cell.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Clones out the current value.
    ///
    /// Prefer [`with`](Property::with) when `T` is expensive to clone.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Borrows the value inside a closure, without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Overwrites the value without change detection.
    ///
    /// For initialization, where notifications are not wanted yet.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Stores `value`, returning `true` if it differs from the current one.
    ///
    /// The owner emits its notification signal exactly when this returns
    /// `true`.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    }

    /// Stores `value`, handing back the previous value if it changed.
    pub fn replace(&self, value: T) -> Option<T> {
        let mut current = self.value.write();
        if *current != value {
            let old = std::mem::replace(&mut *current, value);
            Some(old)
        } else {
            None
        }
    }
}

impl<T: Clone> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Phase {
        Draft,
        Final,
    }

    #[test]
    fn test_set_reports_real_changes_only() {
        let flag = Property::new(false);

        assert!(flag.set(true));
        assert!(!flag.set(true), "same value must not count as a change");
        assert!(flag.set(false));
        assert!(!flag.get());
    }

    #[test]
    fn test_enum_cell() {
        let phase = Property::new(Phase::Draft);
        assert_eq!(phase.get(), Phase::Draft);

        assert!(phase.set(Phase::Final));
        assert!(!phase.set(Phase::Final));
        assert_eq!(phase.get(), Phase::Final);
    }

    #[test]
    fn test_set_silent_skips_detection() {
        let name = Property::new("draft".to_string());
        name.set_silent("final".to_string());
        assert_eq!(name.get(), "final");
        // A following set of the same value still detects "no change".
        assert!(!name.set("final".to_string()));
    }

    #[test]
    fn test_replace_hands_back_old_value() {
        let label = Property::new("a".to_string());

        assert_eq!(label.replace("a".to_string()), None);
        assert_eq!(label.replace("b".to_string()), Some("a".to_string()));
        assert_eq!(label.get(), "b");
    }

    #[test]
    fn test_with_borrows_without_cloning() {
        let names = Property::new(vec!["ada".to_string(), "grace".to_string()]);
        let joined = names.with(|v| v.join(","));
        assert_eq!(joined, "ada,grace");
    }

    #[test]
    fn test_clone_snapshots_the_value() {
        let original = Property::new(7);
        let snapshot = original.clone();

        original.set(8);

        assert_eq!(original.get(), 8);
        assert_eq!(snapshot.get(), 7, "clones do not share the cell");
    }

    #[test]
    fn test_default() {
        let count: Property<usize> = Property::default();
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_shared_across_threads() {
        let cell = Arc::new(Property::new(0usize));

        let writers: Vec<_> = (0..4)
            .map(|n| {
                let cell = cell.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        cell.set(n);
                        cell.with(|v| assert!(*v < 4));
                    }
                })
            })
            .collect();

        for w in writers {
            w.join().unwrap();
        }
        assert!(cell.get() < 4);
    }
}
