//! Where k9table keeps its files
//!
//! Config lives under the XDG config home (`%APPDATA%` on Windows), per-cluster
//! overrides and benchmark reports under the XDG data home (`%LOCALAPPDATA%`).
//! `K9TABLE_CONFIG_DIR` and `K9TABLE_DATA_DIR` replace either root outright.

use directories::{BaseDirs, ProjectDirs};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "k9table";
const CONFIG_FILE: &str = "config.yaml";

#[derive(Clone, Copy)]
enum Root {
    Config,
    Data,
}

impl Root {
    fn override_var(self) -> &'static str {
        match self {
            Root::Config => "K9TABLE_CONFIG_DIR",
            Root::Data => "K9TABLE_DATA_DIR",
        }
    }

    fn xdg_var(self) -> &'static str {
        match self {
            Root::Config => "XDG_CONFIG_HOME",
            Root::Data => "XDG_DATA_HOME",
        }
    }

    /// Relative to the home directory when no XDG variable is set
    fn home_relative(self) -> PathBuf {
        match self {
            Root::Config => PathBuf::from(".config"),
            Root::Data => Path::new(".local").join("share"),
        }
    }

    fn resolve(self) -> PathBuf {
        if let Ok(dir) = std::env::var(self.override_var()) {
            return PathBuf::from(dir);
        }

        if cfg!(windows) {
            if let Some(dirs) = ProjectDirs::from("", "", APP_NAME) {
                return match self {
                    Root::Config => dirs.config_dir().to_path_buf(),
                    Root::Data => dirs.data_dir().to_path_buf(),
                };
            }
        }

        let base = std::env::var(self.xdg_var())
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = BaseDirs::new()
                    .map(|dirs| dirs.home_dir().to_path_buf())
                    .unwrap_or_else(|| PathBuf::from("."));
                home.join(self.home_relative())
            });
        base.join(APP_NAME)
    }
}

pub fn config_dir() -> PathBuf {
    Root::Config.resolve()
}

pub fn data_dir() -> PathBuf {
    Root::Data.resolve()
}

pub fn root_config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

/// `<data>/clusters/<cluster>[/<context>]`
///
/// Cluster and context names often carry `/` (EKS ARNs), so each is kept to a
/// single path segment.
pub fn cluster_config_dir(cluster: &str, context: Option<&str>) -> PathBuf {
    let dir = data_dir().join("clusters").join(path_segment(cluster));
    match context {
        Some(ctx) => dir.join(path_segment(ctx)),
        None => dir,
    }
}

pub fn cluster_config_path(cluster: &str, context: Option<&str>) -> PathBuf {
    cluster_config_dir(cluster, context).join(CONFIG_FILE)
}

/// Directory holding persisted benchmark reports
pub fn benchmarks_dir() -> PathBuf {
    data_dir().join("benchmarks")
}

/// Replace path separators so `s` stays one directory level
pub fn path_segment(s: &str) -> String {
    s.replace(['/', '\\'], "_")
}

pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(path)
}
