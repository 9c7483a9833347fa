//! Tabular (CSV) record output.

use crate::error::Result;
use crate::output::RecordSink;
use crate::sampler::DeltaRecord;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Column names, in output order.
pub const CSV_HEADER: [&str; 9] = [
    "timestamp",
    "pid",
    "ppid",
    "label",
    "rchar",
    "wchar",
    "read_bytes",
    "write_bytes",
    "cancelled_write_bytes",
];

/// Writes one header row and then one row per record.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvSink<Box<dyn Write + Send>> {
    /// Write to standard output.
    pub fn stdout() -> Result<Self> {
        Self::new(Box::new(io::stdout()))
    }

    /// Create (or truncate) `path` and write to it.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path.as_ref())?;
        Self::new(Box::new(file))
    }
}

impl<W: Write> CsvSink<W> {
    /// Wrap `inner` and write the header row immediately.
    pub fn new(inner: W) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(inner);
        writer.write_record(CSV_HEADER)?;
        Ok(Self { writer })
    }

    /// Encode a single record as a row.
    pub fn write_record(&mut self, record: &DeltaRecord) -> Result<()> {
        let d = &record.deltas;
        self.writer.write_record([
            record.timestamp(),
            record.pid.to_string(),
            record.ppid_string(),
            record.label.clone(),
            d.rchar.to_string(),
            d.wchar.to_string(),
            d.read_bytes.to_string(),
            d.write_bytes.to_string(),
            d.cancelled_write_bytes.to_string(),
        ])?;
        Ok(())
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| io::Error::new(e.error().kind(), e.error().to_string()).into())
    }
}

impl<W: Write + Send> RecordSink for CsvSink<W> {
    fn emit(&mut self, record: &DeltaRecord) -> Result<()> {
        self.write_record(record)
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
