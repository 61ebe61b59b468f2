//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins over the configured level so a single run can be made
//! more verbose without touching `checkstate.toml`.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Builds the filter: `RUST_LOG` if set and valid, otherwise `default_level`.
pub fn build_filter(default_level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(default_level)
        .map_err(|e| anyhow!("invalid log filter {default_level:?}: {e}"))
}

/// Installs a global fmt subscriber. Fails if one is already installed.
pub fn init(default_level: &str) -> Result<()> {
    let filter = build_filter(default_level)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}
