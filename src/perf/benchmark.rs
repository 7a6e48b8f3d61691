//! Bounded, cancellable benchmark runner
//!
//! A run drives a [`Workload`] under a hard time ceiling. Whatever report the
//! workload produced, complete or partial, is written to a fresh file under
//! the benchmarks directory. Failures are logged rather than returned since
//! runs are fire-and-forget from the UI.

use super::Workload;
use crate::cancel::CancellationToken;
use crate::client::{IdentifierError, namespaced};
use crate::config::{BenchConfig, paths};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::io::AsyncWriteExt;

/// Hard ceiling for a single run
pub const BENCH_TIMEOUT: Duration = Duration::from_secs(120);

/// Time a workload gets to hand back its report once stopped
const STOP_GRACE: Duration = Duration::from_secs(5);

/// Benchmark errors
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error("Benchmark exceeded its {0:?} bound")]
    BoundExceeded(Duration),

    #[error("Invalid benchmark name: {0}")]
    InvalidName(#[from] IdentifierError),

    #[error("Failed to persist benchmark report: {0}")]
    Persistence(#[from] std::io::Error),
}

/// A workload put under load
pub struct Benchmark {
    config: BenchConfig,
    workload: Box<dyn Workload>,
    token: CancellationToken,
    canceled: AtomicBool,
    bound: Duration,
    reports_dir: Option<PathBuf>,
}

impl Benchmark {
    pub fn new(config: BenchConfig, workload: impl Workload + 'static) -> Self {
        tracing::debug!("Using bench config N:{}--C:{}", config.n, config.c);
        Self {
            config,
            workload: Box::new(workload),
            token: CancellationToken::new(),
            canceled: AtomicBool::new(false),
            bound: BENCH_TIMEOUT,
            reports_dir: None,
        }
    }

    /// Override the run ceiling
    pub fn with_bound(mut self, bound: Duration) -> Self {
        self.bound = bound;
        self
    }

    /// Write reports under `dir` instead of the benchmarks directory
    pub fn with_reports_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.reports_dir = Some(dir.into());
        self
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Stop the run in progress, or the next one if it has not started
    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::SeqCst);
        self.token.cancel();
    }

    /// Whether `cancel` was called; running past the bound does not count
    pub fn canceled(&self) -> bool {
        self.canceled.load(Ordering::SeqCst)
    }

    /// Run the workload and persist its report
    ///
    /// `done` is called exactly once, after the report is saved or the save
    /// failed. Returns the report path when one was written.
    pub async fn run(&self, cluster: &str, context: &str, done: impl FnOnce()) -> Option<PathBuf> {
        tracing::debug!("Running benchmark cluster={} context={}", cluster, context);

        let report = if self.token.is_cancelled() {
            tracing::debug!("Benchmark {} canceled before start", self.config.name);
            String::new()
        } else {
            self.drive().await
        };

        let saved = if report.is_empty() {
            None
        } else {
            match self.save(cluster, context, &report).await {
                Ok(path) => {
                    tracing::debug!("Benchmark report saved to {}", path.display());
                    Some(path)
                }
                Err(e) => {
                    tracing::error!("Saving benchmark: {}", e);
                    None
                }
            }
        };

        done();
        saved
    }

    async fn drive(&self) -> String {
        let work = self.workload.run(&self.config, self.token.clone());
        tokio::pin!(work);

        tokio::select! {
            report = &mut work => report,
            _ = tokio::time::sleep(self.bound) => {
                tracing::error!("{}", BenchError::BoundExceeded(self.bound));
                self.token.cancel();
                match tokio::time::timeout(STOP_GRACE, &mut work).await {
                    Ok(report) => report,
                    Err(_) => {
                        tracing::warn!("Workload ignored stop; discarding report");
                        String::new()
                    }
                }
            }
        }
    }

    async fn save(&self, cluster: &str, context: &str, report: &str) -> Result<PathBuf, BenchError> {
        let base = self
            .reports_dir
            .clone()
            .unwrap_or_else(paths::benchmarks_dir);
        let path = report_path(&base, cluster, context, &self.config.name, unix_nanos())?;
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(report.as_bytes()).await?;
        file.flush().await?;
        Ok(path)
    }
}

/// `<base>/<cluster>/<context>/<ns>_<name>_<nanos>.txt`
///
/// `|` and `:` in the name become `_`. Cluster and context each stay one
/// path segment.
pub fn report_path(
    base: &Path,
    cluster: &str,
    context: &str,
    name: &str,
    nanos: u128,
) -> Result<PathBuf, BenchError> {
    let (ns, name) = namespaced(name)?;
    let name = name.replace(['|', ':'], "_");
    Ok(base
        .join(paths::path_segment(cluster))
        .join(paths::path_segment(context))
        .join(format!("{}_{}_{}.txt", ns, name, nanos)))
}

fn unix_nanos() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default()
}
