use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `FITWATCH_LOG` is unset.
const DEFAULT_FILTER: &str = "warn";

/// Install a stderr fmt subscriber. `verbose` forces debug output for this crate.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("fitwatch=debug")
    } else {
        EnvFilter::try_from_env("FITWATCH_LOG").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    // Ignore error if already set (e.g., during tests).
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
