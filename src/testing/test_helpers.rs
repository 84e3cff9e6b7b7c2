//! Helpers shared by unit and integration tests.

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber for test output. `RUST_LOG` wins over the
/// default `debug` filter. Safe to call from every test.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init()
        .ok(); // Ignore if already initialized
}
