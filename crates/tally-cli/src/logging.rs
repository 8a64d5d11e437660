//! Logging setup
//!
//! Logs go to stderr, or to the configured log file. `RUST_LOG` overrides
//! the default filter.

use std::fs::OpenOptions;

use tally_core::Config;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber
pub fn init(config: &Config, verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tally_core={},tally_cli={}", level, level)));

    if let Some(ref log_path) = config.log_file {
        let log_file = match OpenOptions::new().create(true).append(true).open(log_path) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
                return;
            }
        };

        // Ignore error if already initialized
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(log_file)
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    }

    debug!("Logging initialized");
}
