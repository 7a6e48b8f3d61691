//! Render benchmarks
//!
//! - `benchmark.rs` - bounded runner that persists reports
//! - `workload.rs` - the work being measured

mod benchmark;
mod workload;

pub use benchmark::{BENCH_TIMEOUT, BenchError, Benchmark, report_path};
pub use workload::{RenderWorkload, Workload};

pub use crate::config::BenchConfig;
