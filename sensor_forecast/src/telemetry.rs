//! Logging setup

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Build the environment filter from logging config.
///
/// `RUST_LOG` wins when set and valid; otherwise the configured level is
/// combined with the optional extra directives.
pub fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    let base_level = config.level.as_str();

    if let Ok(env_filter) = std::env::var("RUST_LOG") {
        EnvFilter::try_new(env_filter).unwrap_or_else(|_| EnvFilter::new(base_level))
    } else if let Some(filter) = &config.filter {
        let combined = format!("{},{}", base_level, filter);
        EnvFilter::try_new(combined).unwrap_or_else(|_| EnvFilter::new(base_level))
    } else {
        EnvFilter::try_new(base_level).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Install a formatted stderr subscriber.
///
/// Returns `false` when a global subscriber was already installed, in which
/// case the existing one is left in place.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(config))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}
