//! Shared tracing setup for binaries and tests embedding the dispatcher.

/// Initialize process-wide tracing (JSON logs).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Initialize tracing for tests (human-readable, captured by the test harness).
pub fn init_for_tests() {
    tracing::init_for_tests();
}

/// Subscriber configuration (filters, formatters).
pub mod tracing;
