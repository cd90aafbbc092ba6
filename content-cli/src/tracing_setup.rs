//! Tracing setup and environment loading
//!
//! Usage:
//!   content-service --debug serve          # Debug logging to console
//!   RUST_LOG=content_server=debug ...     # Fine-grained log control

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (sets debug level if RUST_LOG is not set)
    pub debug: bool,
}

/// Initialize console tracing
pub fn init(config: &TracingConfig) -> Result<()> {
    let default_level = if config.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.debug) // Show targets in debug mode
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

/// Log the outcome of loading `.env` from the current directory.
///
/// Variables already set in the environment win over the file.
pub fn report_dotenv(result: dotenvy::Result<PathBuf>) {
    match result {
        Ok(path) => tracing::info!("Loaded configuration from {}", path.display()),
        Err(e) if e.not_found() => {
            tracing::debug!("No .env file found, using environment variables only")
        }
        Err(e) => tracing::warn!(error = %e, "Failed to parse .env file"),
    }
}
