//! Construction-time configuration for the tracked collection.

use std::collections::HashSet;

/// Configuration for a [`TrackedModel`](crate::TrackedModel).
///
/// The defaults match interactive data-entry use: tracking enabled, removed
/// items physically dropped, and the usual presentation-only flags excluded
/// from modification tracking.
///
/// # Example
///
/// ```
/// use ledgerlist::TrackingConfig;
///
/// let config = TrackingConfig::new()
///     .with_show_removed_items(true)
///     .ignore("expanded");
/// assert!(config.track_items);
/// assert!(config.show_removed_items);
/// assert!(config.ignored_properties.contains("expanded"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingConfig {
    /// Whether items are classified at all. When `false` the collection
    /// behaves as a plain ordered sequence.
    pub track_items: bool,
    /// Soft-delete mode: removed items stay visible with state `Deleted`
    /// instead of being physically removed.
    pub show_removed_items: bool,
    /// Property names whose changes never flip an item to `Modified`.
    pub ignored_properties: HashSet<&'static str>,
}

impl TrackingConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether items are classified.
    pub fn with_track_items(mut self, track_items: bool) -> Self {
        self.track_items = track_items;
        self
    }

    /// Sets soft-delete mode.
    pub fn with_show_removed_items(mut self, show_removed_items: bool) -> Self {
        self.show_removed_items = show_removed_items;
        self
    }

    /// Replaces the ignored property-name set.
    pub fn with_ignored_properties<I>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = &'static str>,
    {
        self.ignored_properties = names.into_iter().collect();
        self
    }

    /// Adds one property name to the ignored set.
    pub fn ignore(mut self, name: &'static str) -> Self {
        self.ignored_properties.insert(name);
        self
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            track_items: true,
            show_removed_items: false,
            ignored_properties: ["show_details", "is_selected"].into_iter().collect(),
        }
    }
}
