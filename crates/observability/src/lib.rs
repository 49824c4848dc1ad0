//! Tracing/logging setup shared by processes embedding the aggregation crates.
//!
//! Library crates only emit `tracing` events; whoever owns the process calls
//! [`init`] once to decide where they go.

/// Initialize process-wide tracing with the default filter (`info`).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::DEFAULT_FILTER);
}

/// Initialize process-wide tracing, falling back to `default_filter` when
/// `RUST_LOG` is unset or invalid.
pub fn init_with_default(default_filter: &str) {
    tracing::init(default_filter);
}

/// Tracing configuration (filters, layers).
pub mod tracing;
