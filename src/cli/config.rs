//! `config` subcommand

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::config::{CONFIG_KEYS, ConfigLoader, get_config_value, paths};

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Get configuration value
    Get {
        /// Configuration key (e.g., "refreshRate", "ui.skin")
        key: Option<String>,
    },
    /// List all configuration
    List,
    /// Show configuration file path
    Path,
    /// Validate configuration
    Validate,
}

/// Handle configuration subcommands
pub fn handle_config_command(
    cmd: ConfigSubcommand,
    cluster: Option<&str>,
    context: Option<&str>,
) -> Result<()> {
    match cmd {
        ConfigSubcommand::Get { key: Some(key) } => {
            let config =
                ConfigLoader::load(cluster, context).context("Failed to load configuration")?;
            let value = get_config_value(&config, &key).with_context(|| {
                format!("Known keys: {}", CONFIG_KEYS.join(", "))
            })?;
            println!("{}", value.trim_end());
        }
        ConfigSubcommand::Get { key: None } | ConfigSubcommand::List => {
            let config =
                ConfigLoader::load(cluster, context).context("Failed to load configuration")?;
            let yaml =
                serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
            print!("{}", yaml);
        }
        ConfigSubcommand::Path => {
            println!("{}", paths::root_config_path().display());
        }
        ConfigSubcommand::Validate => {
            ConfigLoader::validate(cluster, context)
                .context("Configuration validation failed")?;
            println!("Configuration is valid");
        }
    }

    Ok(())
}
