//! Log subscriber setup
//!
//! Stdout belongs to the host handshake, so logs always go to stderr.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::TryInitError;

/// Filter variable checked before `RUST_LOG`
pub const LOG_ENV: &str = "THECLOUD_LOG";

const DEFAULT_FILTER: &str = "info";

/// `THECLOUD_LOG`, then `RUST_LOG`, then `info`
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber, failing if one is already set
pub fn try_init_logging() -> Result<(), TryInitError> {
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish()
        .try_init()
}

/// Install the global subscriber; a second call is a no-op
pub fn init_logging() {
    let _ = try_init_logging();
}
