use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

/// Filter applied when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Installs a global `fmt` subscriber writing to stdout, filtered by `RUST_LOG`.
///
/// Does nothing if a global subscriber has already been installed, for example by a test
/// harness, so it is safe to call more than once.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // Losing the race to another subscriber is harmless; that one receives our events.
    _ = fmt().with_env_filter(filter).with_thread_names(true).try_init();
}
