//! procio - per-process I/O telemetry binary
//!
//! Samples `/proc/<pid>/io` on a fixed interval, writes per-interval deltas as
//! CSV and publishes them as Prometheus gauges.

use anyhow::Context;
use clap::Parser;
use procio::{
    bind_metrics_server, Collector, CollectorConfig, CsvSink, IoMetrics, MetricsConfig,
    DEFAULT_INTERVAL_SECS, DEFAULT_METRICS_HOST, DEFAULT_METRICS_PORT,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "procio")]
#[command(about = "Per-process I/O telemetry collector")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = "Periodically samples per-process I/O counters, writes the per-interval \
deltas as CSV and exposes them as Prometheus gauges")]
struct Cli {
    /// Polling interval in seconds
    #[arg(long, default_value_t = DEFAULT_INTERVAL_SECS)]
    interval: u64,

    /// Output file (default: stdout)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Filter processes by label substring (e.g. 'wal writer')
    #[arg(long)]
    filter: Option<String>,

    /// Bind address for the Prometheus metrics server; empty disables it
    #[arg(long, default_value = DEFAULT_METRICS_HOST)]
    prometheus_bind: String,

    /// Port for the Prometheus metrics server; zero or negative disables it
    #[arg(long, default_value_t = DEFAULT_METRICS_PORT as i64, allow_negative_numbers = true)]
    prometheus_port: i64,

    /// Process table root
    #[arg(long, default_value = procio::sampler::DEFAULT_PROC_ROOT)]
    proc_root: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

impl Cli {
    fn collector_config(&self) -> CollectorConfig {
        CollectorConfig::default()
            .with_interval(Duration::from_secs(self.interval))
            .with_filter(self.filter.clone())
            .with_output(self.output.clone())
            .with_proc_root(&self.proc_root)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("Error: failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Level from `-v/-d`, overridable per target through `RUST_LOG`.
fn log_filter(cli: &Cli) -> EnvFilter {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy()
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    // stdout carries the CSV stream
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter(cli))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.collector_config();
    info!("Starting procio collector...");

    let mut metrics = None;
    if let Some(metrics_config) =
        MetricsConfig::from_cli(&cli.prometheus_bind, cli.prometheus_port)?
    {
        let registry = IoMetrics::new().context("Failed to create metrics registry")?;
        let server = bind_metrics_server(&metrics_config, registry.clone())
            .await
            .context("Error starting Prometheus server")?;
        tokio::spawn(async move {
            if let Err(e) = server.serve().await {
                error!("Prometheus server stopped: {}", e);
                std::process::exit(1);
            }
        });
        metrics = Some(registry);
    } else {
        info!("Prometheus publication disabled");
    }

    let csv = match &config.output {
        Some(path) => CsvSink::create(path)
            .with_context(|| format!("Error creating output file {}", path.display()))?,
        None => CsvSink::stdout()?,
    };

    let mut collector = Collector::from_config(config).with_sink(csv);
    if let Some(metrics) = metrics {
        collector = collector.with_sink(metrics);
    }

    collector
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
        .context("Error listing processes")?;

    Ok(())
}
