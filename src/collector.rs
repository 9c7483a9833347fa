//! The poll loop: enumerate, sample, diff, filter, emit.

use crate::config::CollectorConfig;
use crate::error::Result;
use crate::output::RecordSink;
use crate::sampler::{sample, DeltaEngine, DeltaRecord, ProcFs, ProcessDataSource};
use std::future::Future;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::time;
use tracing::{debug, info, warn};

/// Drives sampling ticks and fans records out to the configured sinks.
pub struct Collector<S> {
    source: S,
    engine: DeltaEngine,
    config: CollectorConfig,
    sinks: Vec<Box<dyn RecordSink>>,
}

impl Collector<ProcFs> {
    /// Create a collector reading from the procfs root in `config`.
    pub fn from_config(config: CollectorConfig) -> Self {
        let source = ProcFs::new(config.proc_root.clone());
        Self::new(source, config)
    }
}

impl<S: ProcessDataSource> Collector<S> {
    /// Create a collector over an arbitrary process data source.
    pub fn new(source: S, config: CollectorConfig) -> Self {
        Self {
            source,
            engine: DeltaEngine::new(),
            config,
            sinks: Vec::new(),
        }
    }

    /// Add a sink; records are delivered to sinks in the order they were added.
    pub fn with_sink(mut self, sink: impl RecordSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Add a sink to an existing collector.
    pub fn add_sink(&mut self, sink: Box<dyn RecordSink>) {
        self.sinks.push(sink);
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Retained per-pid baselines.
    pub fn engine(&self) -> &DeltaEngine {
        &self.engine
    }

    /// Run one enumerate/sample/emit cycle and return the emitted records.
    ///
    /// Fails only if the process table cannot be listed; vanished processes
    /// are skipped and sink failures are logged.
    pub fn tick(&mut self) -> Result<Vec<DeltaRecord>> {
        let pids = self.source.list_pids()?;

        let mut records = Vec::new();
        let mut vanished = 0usize;
        for &pid in &pids {
            let raw = match sample(&self.source, pid) {
                Ok(raw) => raw,
                Err(e) if e.is_recoverable() => {
                    vanished += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let record = self.engine.observe(raw);
            if self.config.accepts(&record.label) {
                records.push(record);
            }
        }

        for record in &records {
            for sink in self.sinks.iter_mut() {
                if let Err(e) = sink.emit(record) {
                    warn!(pid = %record.pid, "Failed to emit record: {}", e);
                }
            }
        }
        for sink in self.sinks.iter_mut() {
            if let Err(e) = sink.flush() {
                warn!("Failed to flush sink: {}", e);
            }
        }

        debug!(
            enumerated = pids.len(),
            emitted = records.len(),
            vanished,
            tracked = self.engine.len(),
            "tick complete"
        );

        Ok(records)
    }

    /// [`Collector::tick`] from async context.
    ///
    /// On a multi-threaded runtime the blocking procfs reads run through
    /// `block_in_place`, so other tasks (the metrics server) keep being
    /// polled. A current-thread runtime cannot do that and ticks inline.
    fn tick_in_runtime(&mut self) -> Result<Vec<DeltaRecord>> {
        match Handle::try_current().map(|h| h.runtime_flavor()) {
            Ok(RuntimeFlavor::MultiThread) => tokio::task::block_in_place(|| self.tick()),
            _ => self.tick(),
        }
    }

    /// Run exactly `ticks` ticks, sleeping the configured interval between them.
    pub async fn run_ticks(&mut self, ticks: usize) -> Result<()> {
        for n in 0..ticks {
            if n > 0 {
                time::sleep(self.config.interval).await;
            }
            self.tick_in_runtime()?;
        }
        Ok(())
    }

    /// Tick until `shutdown` resolves or enumeration fails.
    ///
    /// Shutdown is only observed between ticks; a tick in progress always
    /// completes.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!(
            "Sampling every {:?}{}",
            self.config.interval,
            self.config
                .filter
                .as_ref()
                .map(|f| format!(" (label filter: {:?})", f))
                .unwrap_or_default()
        );

        loop {
            self.tick_in_runtime()?;

            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping collector");
                    return Ok(());
                }
                _ = time::sleep(self.config.interval) => {}
            }
        }
    }
}
