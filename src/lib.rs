//! # procio - per-process I/O telemetry
//!
//! A lightweight collector that periodically walks the process table, reads
//! each process's cumulative storage I/O counters, and reports how much they
//! moved since the previous sample.
//!
//! ## Features
//!
//! - **Delta sampling**: cumulative `/proc/<pid>/io` counters turned into per-interval deltas
//! - **CSV log**: one append-only row per process per tick
//! - **Prometheus gauges**: latest deltas labeled by `(pid, label)` on a pull endpoint
//! - **Label filter**: only report processes whose command line contains a substring
//! - **Library + Binary**: use as a crate or standalone application
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use procio::{Collector, CollectorConfig, CsvSink, IoMetrics};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let metrics = IoMetrics::new()?;
//!     let mut collector = Collector::from_config(CollectorConfig::default())
//!         .with_sink(CsvSink::stdout()?)
//!         .with_sink(metrics.clone());
//!
//!     collector.run(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await?;
//!     Ok(())
//! }
//! ```

pub mod collector;
pub mod config;
pub mod error;
pub mod output;
pub mod sampler;
pub mod web;

// Re-export public API
pub use collector::Collector;
pub use config::CollectorConfig;
pub use error::{CollectorError, Result};
pub use output::{CsvSink, RecordSink};
pub use sampler::{
    DeltaEngine, DeltaRecord, IoCounters, IoDeltas, Pid, ProcFs, ProcessDataSource, RawSample,
};
pub use web::{bind_metrics_server, IoMetrics, MetricsConfig, MetricsServer};

/// The default polling interval in seconds
pub const DEFAULT_INTERVAL_SECS: u64 = 1;

/// The default metrics bind address
pub const DEFAULT_METRICS_HOST: &str = "0.0.0.0";

/// The default metrics port
pub const DEFAULT_METRICS_PORT: u16 = 9090;

/// The default metrics exposition path
pub const DEFAULT_METRICS_PATH: &str = "/metrics";
