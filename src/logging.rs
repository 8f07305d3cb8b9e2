//! Structured logging setup.
//!
//! The library only emits `tracing` events; binaries decide where they go.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "sheet_store=info,warn";

/// Installs a global subscriber filtered by `RUST_LOG`.
///
/// Falls back to `sheet_store=info,warn` when `RUST_LOG` is unset or invalid.
/// Calling it again after a subscriber is installed does nothing.
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init();
}

/// Test-friendly variant of [`init`] that logs everything through the test
/// writer.
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new("debug"))
        .with(fmt::layer().with_test_writer())
        .try_init();
}
