use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Initialize structured JSON logging on stderr.
///
/// `RUST_LOG` takes precedence when set. Otherwise the level is `info`, or
/// `warn` when `quiet` is true. Safe to call more than once; later calls are
/// ignored.
pub fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let layer = fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_current_span(false)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}
