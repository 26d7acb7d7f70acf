//! Logging and debugging facilities for LedgerList.
//!
//! The library is instrumented with the `tracing` crate and never installs
//! a subscriber itself; the embedding application decides where log output
//! goes (`tracing_subscriber::fmt::init()` is the usual one-liner).
//!
//! Collection mutations and classification transitions are traced at
//! `trace` level under the targets in [`targets`]; use them with `tracing`
//! filter directives to isolate a subsystem, e.g.
//! `RUST_LOG=ledgerlist::model=trace`.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "ledgerlist_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "ledgerlist_core::signal";
    /// Trackable-item capability target.
    pub const TRACKABLE: &str = "ledgerlist_core::trackable";
    /// Tracked collection model target.
    pub const MODEL: &str = "ledgerlist::model";
}

/// RAII span covering the duration of an operation.
///
/// Bulk operations open one of these so their full cost shows up as a
/// single `ledgerlist::perf` span.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Open a span named after `name`; it closes when the guard drops.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "ledgerlist::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Macros for common tracing patterns.
///
/// These are re-exported for convenience but are just wrappers around the
/// `tracing` crate macros with consistent target naming.
#[macro_export]
macro_rules! ledger_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "ledgerlist_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! ledger_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "ledgerlist_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! ledger_info {
    ($($arg:tt)*) => {
        tracing::info!(target: "ledgerlist_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! ledger_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "ledgerlist_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! ledger_error {
    ($($arg:tt)*) => {
        tracing::error!(target: "ledgerlist_core", $($arg)*)
    };
}
