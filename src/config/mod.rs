//! Configuration system for k9table
//!
//! Layered YAML configuration (defaults, root file, cluster and context
//! files, environment overrides) plus the directories everything is stored in.

pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{BenchConfig, Config, UiConfig};

/// Keys accepted by `get_config_value`
pub const CONFIG_KEYS: &[&str] = &[
    "defaultNamespace",
    "refreshRate",
    "ui.wide",
    "ui.skin",
    "aliases",
    "bench.name",
    "bench.n",
    "bench.c",
];

/// Get a configuration value by key (dot notation)
pub fn get_config_value(config: &Config, key: &str) -> anyhow::Result<String> {
    match key {
        "defaultNamespace" => Ok(config.default_namespace.clone()),
        "refreshRate" => Ok(config.refresh_rate.to_string()),
        "ui.wide" => Ok(config.ui.wide.to_string()),
        "ui.skin" => Ok(config.ui.skin.clone()),
        "aliases" => {
            // Sorted so the output is stable
            let aliases: std::collections::BTreeMap<_, _> = config.aliases.iter().collect();
            serde_yaml::to_string(&aliases)
                .map_err(|e| anyhow::anyhow!("Failed to serialize aliases: {}", e))
        }
        "bench.name" => Ok(config.bench.name.clone()),
        "bench.n" => Ok(config.bench.n.to_string()),
        "bench.c" => Ok(config.bench.c.to_string()),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}
