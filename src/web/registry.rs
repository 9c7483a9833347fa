//! Gauge registry backing the metrics endpoint.

use crate::error::Result;
use crate::output::RecordSink;
use crate::sampler::DeltaRecord;
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::sync::{Arc, Mutex};

const LABELS: &[&str] = &["pid", "label"];

/// The five per-process I/O gauges, each labeled by `(pid, label)` and set to
/// the latest interval delta.
///
/// Cloning is cheap and every clone shares the same registry.
#[derive(Clone)]
pub struct IoMetrics {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Registry,
    gauges: Mutex<Gauges>,
}

struct Gauges {
    rchar: GaugeVec,
    wchar: GaugeVec,
    read_bytes: GaugeVec,
    write_bytes: GaugeVec,
    cancelled_write_bytes: GaugeVec,
}

fn gauge(name: &str, help: &str) -> Result<GaugeVec> {
    Ok(GaugeVec::new(Opts::new(name, help), LABELS)?)
}

impl IoMetrics {
    /// Create the gauges and register them with a private registry.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let gauges = Gauges {
            rchar: gauge(
                "process_rchar_bytes",
                "Number of bytes read from storage by the process.",
            )?,
            wchar: gauge(
                "process_wchar_bytes",
                "Number of bytes written to storage by the process.",
            )?,
            read_bytes: gauge(
                "process_read_bytes",
                "Number of bytes actually read from storage by the process.",
            )?,
            write_bytes: gauge(
                "process_write_bytes",
                "Number of bytes actually written to storage by the process.",
            )?,
            cancelled_write_bytes: gauge(
                "process_cancelled_write_bytes",
                "Number of bytes cancelled during write operations by the process.",
            )?,
        };

        registry.register(Box::new(gauges.rchar.clone()))?;
        registry.register(Box::new(gauges.wchar.clone()))?;
        registry.register(Box::new(gauges.read_bytes.clone()))?;
        registry.register(Box::new(gauges.write_bytes.clone()))?;
        registry.register(Box::new(gauges.cancelled_write_bytes.clone()))?;

        Ok(Self {
            inner: Arc::new(Inner {
                registry,
                gauges: Mutex::new(gauges),
            }),
        })
    }

    /// Set all five gauges for the record's `(pid, label)` pair.
    pub fn set(&self, record: &DeltaRecord) {
        let pid = record.pid.to_string();
        let values = [pid.as_str(), record.label.as_str()];
        let d = &record.deltas;

        // A poisoned lock only means another writer panicked mid-update;
        // the gauges themselves are still usable.
        let gauges = self
            .inner
            .gauges
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        gauges.rchar.with_label_values(&values).set(d.rchar as f64);
        gauges.wchar.with_label_values(&values).set(d.wchar as f64);
        gauges
            .read_bytes
            .with_label_values(&values)
            .set(d.read_bytes as f64);
        gauges
            .write_bytes
            .with_label_values(&values)
            .set(d.write_bytes as f64);
        gauges
            .cancelled_write_bytes
            .with_label_values(&values)
            .set(d.cancelled_write_bytes as f64);
    }

    /// Encode every series in the text exposition format.
    pub fn render(&self) -> Result<String> {
        let families = {
            let _guard = self
                .inner
                .gauges
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            self.inner.registry.gather()
        };

        let mut buffer = Vec::new();
        TextEncoder::new().encode(&families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Content type of [`IoMetrics::render`] output.
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }
}

impl RecordSink for IoMetrics {
    fn emit(&mut self, record: &DeltaRecord) -> Result<()> {
        self.set(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::{IoDeltas, Pid};
    use chrono::Utc;

    fn record(pid: u32, label: &str, rchar: i64) -> DeltaRecord {
        DeltaRecord {
            pid: Pid(pid),
            ppid: Some(Pid(1)),
            label: label.to_string(),
            captured_at: Utc::now(),
            deltas: IoDeltas {
                rchar,
                wchar: 512,
                read_bytes: 2048,
                write_bytes: 1024,
                cancelled_write_bytes: 256,
            },
        }
    }

    #[test]
    fn test_render_contains_series() {
        let metrics = IoMetrics::new().unwrap();
        metrics.set(&record(1234, "test-process", 1024));

        let text = metrics.render().unwrap();
        assert!(text.contains("# TYPE process_rchar_bytes gauge"));
        assert!(text.contains(r#"process_rchar_bytes{label="test-process",pid="1234"} 1024"#));
        assert!(text.contains(r#"process_wchar_bytes{label="test-process",pid="1234"} 512"#));
        assert!(text.contains(r#"process_read_bytes{label="test-process",pid="1234"} 2048"#));
        assert!(text.contains(r#"process_write_bytes{label="test-process",pid="1234"} 1024"#));
        assert!(text.contains(
            r#"process_cancelled_write_bytes{label="test-process",pid="1234"} 256"#
        ));
    }

    #[test]
    fn test_latest_value_wins() {
        let mut metrics = IoMetrics::new().unwrap();
        metrics.emit(&record(1, "a", 10)).unwrap();
        metrics.emit(&record(1, "a", -3)).unwrap();

        let text = metrics.render().unwrap();
        assert!(text.contains(r#"process_rchar_bytes{label="a",pid="1"} -3"#));
        assert!(!text.contains(r#"process_rchar_bytes{label="a",pid="1"} 10"#));
    }

    #[test]
    fn test_clones_share_registry() {
        let metrics = IoMetrics::new().unwrap();
        let writer = metrics.clone();
        writer.set(&record(9, "shared", 7));

        assert!(metrics
            .render()
            .unwrap()
            .contains(r#"process_rchar_bytes{label="shared",pid="9"} 7"#));
        assert!(metrics.content_type().starts_with("text/plain"));
    }
}
