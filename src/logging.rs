//! Logging setup for hosts embedding the planner.
//!
//! The library only emits `tracing` events; a host decides where they go.
//! These helpers install a `tracing-subscriber` fmt subscriber filtered by
//! `RUST_LOG` (default `info`), e.g. `RUST_LOG=u_exam=debug`.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber.
///
/// Panics if a global subscriber is already set; call once at startup.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Installs a debug-level subscriber writing through the test harness.
///
/// Safe to call from many tests; only the first call takes effect.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
