use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// install the global tracing subscriber
///
/// RUST_LOG wins over `logging.level` when set. output goes to stderr so the
/// console report on stdout stays readable.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
