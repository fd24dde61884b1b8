//! Config command - inspect and edit the JSON configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use tracing::debug;

use ayulink_core::models::config::AyulinkConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print one value, e.g. "storage.results_dir"
    Get { key: String },

    /// Change one value, e.g. `server.port 8080` or `storage.allowed_extensions pdf,jpg`
    Set { key: String, value: String },

    /// Print the configuration file location
    Path,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => {
            let config = load_or_default(&path)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            write_config(&path, &AyulinkConfig::default())?;
            println!("{} Created {}", style("✓").green(), path.display());
        }
        ConfigCommand::Get { key } => {
            let value = load_or_default(&path)?.get_value(&key)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        ConfigCommand::Set { key, value } => {
            let mut config = load_or_default(&path)?;
            let stored = config.set_value(&key, &value)?;
            write_config(&path, &config)?;
            println!("{} {} = {}", style("✓").green(), key, stored);
        }
        ConfigCommand::Path => {
            let status = if path.exists() {
                style("exists").green()
            } else {
                style("not created, run 'ayulink config init'").yellow()
            };
            println!("{} ({})", path.display(), status);
        }
    }

    Ok(())
}

/// `<config_dir>/ayulink/config.json`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ayulink")
        .join("config.json")
}

fn load_or_default(path: &Path) -> anyhow::Result<AyulinkConfig> {
    if path.exists() {
        debug!("Reading configuration from {}", path.display());
        Ok(AyulinkConfig::from_file(path)?)
    } else {
        eprintln!(
            "{} No config file at {}, using defaults.",
            style("ℹ").blue(),
            path.display()
        );
        Ok(AyulinkConfig::default())
    }
}

fn write_config(path: &Path, config: &AyulinkConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;
    Ok(())
}
