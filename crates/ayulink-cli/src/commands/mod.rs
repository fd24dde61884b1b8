//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod process;
pub mod serve;

use std::path::Path;

use ayulink_core::models::config::AyulinkConfig;
use tracing::debug;

/// Load the configuration named by `-c`, else the default file if present,
/// else built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<AyulinkConfig> {
    if let Some(path) = config_path {
        debug!("Loading configuration from {}", path);
        return Ok(AyulinkConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Loading configuration from {}", default_path.display());
        Ok(AyulinkConfig::from_file(&default_path)?)
    } else {
        Ok(AyulinkConfig::default())
    }
}
