//! Configuration schema definitions
//!
//! Defines the structure of configuration files using serde for serialization.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Starting namespace; empty or "all" watches every namespace
    #[serde(default = "default_namespace")]
    pub default_namespace: String,

    /// Seconds between snapshot refreshes
    #[serde(default = "default_refresh_rate")]
    pub refresh_rate: u64,

    /// UI configuration
    #[serde(default)]
    pub ui: UiConfig,

    /// User command aliases (alias -> "group/version/resource")
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub aliases: HashMap<String, String>,

    /// Render benchmark settings
    #[serde(default)]
    pub bench: BenchConfig,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UiConfig {
    /// Show wide columns
    #[serde(default)]
    pub wide: bool,

    /// Skin name
    #[serde(default = "default_skin")]
    pub skin: String,
}

/// Render benchmark settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BenchConfig {
    /// Name used for the report file
    #[serde(default = "default_bench_name")]
    pub name: String,

    /// Total number of renders
    #[serde(default = "default_bench_n")]
    pub n: usize,

    /// Number of concurrent workers
    #[serde(default = "default_bench_c")]
    pub c: usize,
}

fn default_namespace() -> String {
    "default".to_string()
}

fn default_refresh_rate() -> u64 {
    2
}

fn default_skin() -> String {
    "default".to_string()
}

fn default_bench_name() -> String {
    "render".to_string()
}

fn default_bench_n() -> usize {
    200
}

fn default_bench_c() -> usize {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_namespace: default_namespace(),
            refresh_rate: default_refresh_rate(),
            ui: UiConfig::default(),
            aliases: HashMap::new(),
            bench: BenchConfig::default(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            wide: false,
            skin: default_skin(),
        }
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            name: default_bench_name(),
            n: default_bench_n(),
            c: default_bench_c(),
        }
    }
}
