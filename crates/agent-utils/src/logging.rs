//! Logging and tracing utilities

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing with an `info` default, overridable via `RUST_LOG`
pub fn init_tracing() {
    init_tracing_with("info");
}

/// Initialize tracing with `default_filter` unless `RUST_LOG` is set
///
/// Logs go to stderr so stdout stays free for run output. Calling this twice
/// is harmless; the second subscriber is ignored.
pub fn init_tracing_with(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
