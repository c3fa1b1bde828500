//! stderr logging via `tracing-subscriber`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "QUICKBATCH_LOG";

/// Install the global subscriber.
///
/// Filter precedence: `QUICKBATCH_LOG`, then `--verbose` (debug), then the
/// config file's `[logging] filter`, then `warn`.
pub fn init_logging(config_filter: Option<&str>, verbose: bool) {
    let directive = if verbose {
        "debug"
    } else {
        config_filter.unwrap_or("warn")
    };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
