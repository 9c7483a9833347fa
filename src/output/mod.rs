//! Destinations for emitted delta records.

pub mod csv;

pub use self::csv::{CsvSink, CSV_HEADER};

use crate::error::Result;
use crate::sampler::DeltaRecord;

/// Something that consumes finished [`DeltaRecord`]s, in emission order.
pub trait RecordSink: Send {
    /// Consume one record.
    fn emit(&mut self, record: &DeltaRecord) -> Result<()>;

    /// Make everything emitted so far durable. Called once per tick.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<T: RecordSink + ?Sized> RecordSink for Box<T> {
    fn emit(&mut self, record: &DeltaRecord) -> Result<()> {
        (**self).emit(record)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}
