//! `pts-observability` — process-wide logging setup.

/// Tracing configuration (filters, output format).
pub mod tracing;

/// Initialize process-wide observability (tracing/logging).
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}
