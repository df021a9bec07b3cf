//! Tracing subscriber initialization.
//!
//! Filtering follows `RUST_LOG` (default `info`). Dispatch calls log under a
//! `dispatch` span carrying the call's `dispatch_id`.

use tracing_subscriber::EnvFilter;

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Initialize JSON tracing for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter("info"))
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_current_span(true)
        .with_thread_names(true)
        .with_target(false)
        .try_init();
}

/// Initialize compact tracing routed through the test writer.
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter("debug"))
        .with_test_writer()
        .with_thread_names(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn repeated_initialization_is_harmless() {
        super::init_for_tests();
        super::init_for_tests();
        super::init();
    }
}
