//! Configuration loading and merging logic
//!
//! Handles loading configuration from multiple sources and merging them
//! according to precedence rules.

use super::{paths, schema::Config};
use crate::client::Gvr;
use anyhow::{Context, Result};
use serde_yaml::Value;
use std::path::{Path, PathBuf};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers merged
    ///
    /// Precedence order (highest to lowest):
    /// 1. Environment variable overrides
    /// 2. Context-specific config
    /// 3. Cluster-specific config
    /// 4. Root config
    /// 5. Built-in defaults
    pub fn load(cluster: Option<&str>, context: Option<&str>) -> Result<Config> {
        let mut layers = vec![paths::root_config_path()];
        if let Some(cluster_name) = cluster {
            layers.push(paths::cluster_config_path(cluster_name, None));
            if let Some(context_name) = context {
                layers.push(paths::cluster_config_path(cluster_name, Some(context_name)));
            }
        }

        Ok(Self::apply_env_overrides(Self::load_layers(&layers)?))
    }

    /// Merge config files over the defaults, later files winning
    ///
    /// Missing files are skipped. A file only overrides the keys it sets;
    /// nested mappings (`ui`, `bench`, `aliases`) merge key by key.
    pub fn load_layers(layers: &[PathBuf]) -> Result<Config> {
        let mut merged = serde_yaml::to_value(Self::load_defaults())
            .context("Failed to serialize default configuration")?;

        for path in layers.iter().filter(|p| p.exists()) {
            merge_values(&mut merged, Self::read_layer(path)?);
        }

        serde_yaml::from_value(merged).context("Invalid merged configuration")
    }

    fn read_layer(path: &Path) -> Result<Value> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let layer: Value = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        // Check types early so the error names the offending file
        if !layer.is_null() {
            let mut alone = serde_yaml::to_value(Self::load_defaults())?;
            merge_values(&mut alone, layer.clone());
            serde_yaml::from_value::<Config>(alone)
                .with_context(|| format!("Invalid config file: {}", path.display()))?;
        }
        Ok(layer)
    }

    /// Load configuration from a file
    pub fn load_file(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load the merged configuration and check its values
    ///
    /// Fails on invalid YAML, wrong value types, a zero refresh rate, bench
    /// settings that cannot run, and aliases that do not name a resource kind.
    pub fn validate(cluster: Option<&str>, context: Option<&str>) -> Result<Config> {
        let config = Self::load(cluster, context).context("Failed to load merged configuration")?;
        Self::check(&config)?;
        Ok(config)
    }

    /// Check values that parse but cannot be used
    pub fn check(config: &Config) -> Result<()> {
        if config.refresh_rate == 0 {
            return Err(anyhow::anyhow!("refreshRate must be at least 1 second"));
        }
        if config.bench.n == 0 || config.bench.c == 0 {
            return Err(anyhow::anyhow!("bench.n and bench.c must be at least 1"));
        }
        if config.bench.c > config.bench.n {
            return Err(anyhow::anyhow!(
                "bench.c ({}) cannot exceed bench.n ({})",
                config.bench.c,
                config.bench.n
            ));
        }
        for (alias, target) in &config.aliases {
            Gvr::new(target)
                .with_context(|| format!("Alias {:?} points at an invalid resource", alias))?;
        }
        Ok(())
    }

    /// Load default configuration
    pub fn load_defaults() -> Config {
        Config::default()
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut config: Config) -> Config {
        if let Ok(namespace) = std::env::var("K9TABLE_DEFAULT_NAMESPACE") {
            config.default_namespace = namespace;
        }

        if let Ok(rate) = std::env::var("K9TABLE_REFRESH_RATE") {
            match rate.parse::<u64>() {
                Ok(val) => config.refresh_rate = val,
                Err(_) => tracing::warn!("Ignoring invalid K9TABLE_REFRESH_RATE: {}", rate),
            }
        }

        if let Ok(skin) = std::env::var("K9TABLE_SKIN") {
            config.ui.skin = skin;
        }

        config
    }

    /// Save configuration to a file
    pub fn save(config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)?;
        }

        let yaml =
            serde_yaml::to_string(config).context("Failed to serialize configuration to YAML")?;

        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}

/// Overlay `layer` onto `base`; mappings merge recursively, anything else replaces
fn merge_values(base: &mut Value, layer: Value) {
    match (base, layer) {
        (_, Value::Null) => {}
        (Value::Mapping(base), Value::Mapping(layer)) => {
            for (key, value) in layer {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, layer) => *base = layer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.default_namespace, "default");
        assert_eq!(config.refresh_rate, 2);
    }

    fn write(dir: &Path, rel: &str, yaml: &str) -> PathBuf {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, yaml).unwrap();
        path
    }

    #[test]
    fn test_layer_only_overrides_keys_it_sets() {
        let dir = tempfile::tempdir().unwrap();
        let root = write(
            dir.path(),
            "config.yaml",
            "defaultNamespace: flux-system\nrefreshRate: 9\nui:\n  skin: mono\n",
        );
        let cluster = write(dir.path(), "clusters/prod/config.yaml", "ui:\n  wide: true\n");

        let config = ConfigLoader::load_layers(&[root, cluster]).unwrap();

        assert_eq!(config.default_namespace, "flux-system");
        assert_eq!(config.refresh_rate, 9);
        assert!(config.ui.wide);
        assert_eq!(config.ui.skin, "mono");
        assert_eq!(config.bench, Config::default().bench);
    }

    #[test]
    fn test_layers_accumulate_aliases_and_skip_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = write(dir.path(), "config.yaml", "aliases:\n  po: v1/pods\n  x: v1/a\n");
        let context = write(
            dir.path(),
            "clusters/prod/admin/config.yaml",
            "aliases:\n  x: v1/b\nbench:\n  n: 10\n",
        );
        let missing = dir.path().join("clusters/prod/config.yaml");

        let config = ConfigLoader::load_layers(&[root, missing, context]).unwrap();

        assert_eq!(config.aliases.len(), 2);
        assert_eq!(config.aliases["po"], "v1/pods");
        assert_eq!(config.aliases["x"], "v1/b");
        assert_eq!(config.bench.n, 10);
        assert_eq!(config.bench.c, Config::default().bench.c);
    }

    #[test]
    fn test_empty_layer_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let root = write(dir.path(), "config.yaml", "refreshRate: 5\n");
        let empty = write(dir.path(), "clusters/prod/config.yaml", "");

        let config = ConfigLoader::load_layers(&[root, empty]).unwrap();
        assert_eq!(config.refresh_rate, 5);
    }

    #[test]
    fn test_bad_layer_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let bad = write(dir.path(), "clusters/prod/config.yaml", "refreshRate: often\n");

        let err = ConfigLoader::load_layers(&[bad]).unwrap_err();
        assert!(format!("{:#}", err).contains("clusters/prod/config.yaml"));
    }

    #[test]
    fn test_env_overrides() {
        // SAFETY: set_var is unsafe in Rust 2024 due to potential data races.
        // No other test in this binary reads these variables.
        unsafe {
            std::env::set_var("K9TABLE_SKIN", "test-skin");
            std::env::set_var("K9TABLE_REFRESH_RATE", "7");
        }

        let config = ConfigLoader::apply_env_overrides(Config::default());

        assert_eq!(config.ui.skin, "test-skin");
        assert_eq!(config.refresh_rate, 7);

        // SAFETY: see above
        unsafe {
            std::env::remove_var("K9TABLE_SKIN");
            std::env::remove_var("K9TABLE_REFRESH_RATE");
        }
    }

    #[test]
    fn test_check_rejects_unusable_values() {
        assert!(ConfigLoader::check(&Config::default()).is_ok());

        let config = Config {
            refresh_rate: 0,
            ..Default::default()
        };
        assert!(ConfigLoader::check(&config).is_err());

        let mut config = Config::default();
        config.bench.c = 500;
        assert!(ConfigLoader::check(&config).is_err());

        let config = Config {
            aliases: HashMap::from([("x".to_string(), "a/b/c/d".to_string())]),
            ..Default::default()
        };
        assert!(ConfigLoader::check(&config).is_err());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let mut config = Config::default();
        config.ui.wide = true;
        ConfigLoader::save(&config, &path).unwrap();

        let loaded = ConfigLoader::load_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
