//! Benchmark workloads

use crate::cancel::CancellationToken;
use crate::client::Scope;
use crate::config::BenchConfig;
use crate::model::Snapshot;
use crate::render::{Renderer, render_row};
use async_trait::async_trait;
use std::fmt::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Work driven by a [`Benchmark`](super::Benchmark)
///
/// Implementations must return soon after `token` is cancelled, handing back
/// whatever report they have so far. An empty report means nothing ran.
#[async_trait]
pub trait Workload: Send + Sync {
    async fn run(&self, config: &BenchConfig, token: CancellationToken) -> String;
}

/// Renders a snapshot through a renderer `n` times across `c` workers
pub struct RenderWorkload {
    renderer: Arc<dyn Renderer>,
    snapshot: Arc<Snapshot>,
    scope: Scope,
}

impl RenderWorkload {
    pub fn new(renderer: Arc<dyn Renderer>, snapshot: Snapshot, scope: Scope) -> Self {
        Self {
            renderer,
            snapshot: Arc::new(snapshot),
            scope,
        }
    }
}

#[derive(Debug, Default)]
struct WorkerStats {
    samples: Vec<Duration>,
    failures: usize,
}

#[async_trait]
impl Workload for RenderWorkload {
    async fn run(&self, config: &BenchConfig, token: CancellationToken) -> String {
        let total = config.n;
        let workers = config.c.clamp(1, total.max(1));
        let next = Arc::new(AtomicUsize::new(0));
        let started = Instant::now();

        tracing::debug!("Render workload N:{} C:{}", total, workers);

        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let renderer = self.renderer.clone();
                let snapshot = self.snapshot.clone();
                let scope = self.scope.clone();
                let token = token.clone();
                let next = next.clone();
                tokio::spawn(async move {
                    let mut stats = WorkerStats::default();
                    while !token.is_cancelled() && next.fetch_add(1, Ordering::SeqCst) < total {
                        let start = Instant::now();
                        for obj in snapshot.values() {
                            if render_row(renderer.as_ref(), obj, &scope).is_err() {
                                stats.failures += 1;
                            }
                        }
                        stats.samples.push(start.elapsed());
                        tokio::task::yield_now().await;
                    }
                    stats
                })
            })
            .collect();

        let mut merged = WorkerStats::default();
        for result in futures::future::join_all(handles).await {
            match result {
                Ok(stats) => {
                    merged.samples.extend(stats.samples);
                    merged.failures += stats.failures;
                }
                Err(e) => tracing::warn!("Render worker failed: {}", e),
            }
        }

        if merged.samples.is_empty() {
            return String::new();
        }
        summarize(
            &merged,
            total,
            self.snapshot.len(),
            started.elapsed(),
            token.is_cancelled(),
        )
    }
}

fn summarize(
    stats: &WorkerStats,
    total: usize,
    objects: usize,
    elapsed: Duration,
    cancelled: bool,
) -> String {
    let completed = stats.samples.len();
    let slowest = stats.samples.iter().max().copied().unwrap_or_default();
    let fastest = stats.samples.iter().min().copied().unwrap_or_default();
    let average = stats.samples.iter().sum::<Duration>() / completed.max(1) as u32;
    let secs = elapsed.as_secs_f64();
    let rate = if secs > 0.0 {
        completed as f64 / secs
    } else {
        0.0
    };

    let mut out = String::new();
    let _ = writeln!(out, "Summary:");
    let _ = writeln!(out, "  Total:\t{:.4} secs", secs);
    let _ = writeln!(out, "  Slowest:\t{:.4} secs", slowest.as_secs_f64());
    let _ = writeln!(out, "  Fastest:\t{:.4} secs", fastest.as_secs_f64());
    let _ = writeln!(out, "  Average:\t{:.4} secs", average.as_secs_f64());
    let _ = writeln!(out, "  Renders/sec:\t{:.4}", rate);
    let _ = writeln!(out);
    let _ = writeln!(out, "  Completed:\t{} of {}", completed, total);
    let _ = writeln!(out, "  Objects:\t{} per render", objects);
    let _ = writeln!(out, "  Failures:\t{}", stats.failures);
    if cancelled {
        let _ = writeln!(out, "  Stopped early");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Generic;
    use serde_json::json;

    fn snapshot() -> Snapshot {
        let mut snapshot = Snapshot::new();
        snapshot.insert(
            "default/web".to_string(),
            json!({"metadata": {"name": "web", "namespace": "default"}}),
        );
        snapshot.insert("broken".to_string(), json!({"spec": {}}));
        snapshot
    }

    fn config(n: usize, c: usize) -> BenchConfig {
        BenchConfig {
            name: "render".to_string(),
            n,
            c,
        }
    }

    #[tokio::test]
    async fn test_render_workload_reports_every_render() {
        let workload = RenderWorkload::new(Arc::new(Generic), snapshot(), Scope::All);
        let report = workload
            .run(&config(20, 4), CancellationToken::new())
            .await;

        assert!(report.contains("Completed:\t20 of 20"));
        assert!(report.contains("Objects:\t2 per render"));
        assert!(report.contains("Failures:\t20"));
        assert!(!report.contains("Stopped early"));
    }

    #[tokio::test]
    async fn test_cancelled_workload_reports_nothing() {
        let token = CancellationToken::new();
        token.cancel();
        let workload = RenderWorkload::new(Arc::new(Generic), snapshot(), Scope::All);
        assert!(workload.run(&config(20, 2), token).await.is_empty());
    }

    #[test]
    fn test_summarize_marks_early_stop() {
        let stats = WorkerStats {
            samples: vec![Duration::from_millis(1), Duration::from_millis(3)],
            failures: 0,
        };
        let report = summarize(&stats, 10, 1, Duration::from_millis(4), true);
        assert!(report.contains("Completed:\t2 of 10"));
        assert!(report.contains("Slowest:\t0.0030 secs"));
        assert!(report.contains("Fastest:\t0.0010 secs"));
        assert!(report.contains("Average:\t0.0020 secs"));
        assert!(report.contains("Stopped early"));
    }
}
