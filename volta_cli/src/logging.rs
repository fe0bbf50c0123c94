//! Logging setup for the CLI.
//!
//! `RUST_LOG` selects the filter (default `info`), e.g.
//! `RUST_LOG=volta_core=debug` to see skipped rows and catalog misses.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global fmt subscriber.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Verbose subscriber for tests; ignores a second installation.
#[cfg(test)]
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
