//! Logging setup.
//!
//! Diagnostics go to stderr through `tracing`; the report itself is printed
//! to stdout by the command layer.

use tracing::debug;

/// Initialize tracing/logging based on CLI flags.
///
/// `RUST_LOG` takes precedence over the flags when it is set.
pub fn init_logging(verbose: bool, debug: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();

    debug!("Logging initialized at level: {}", level);
}
