//! Process sampling and delta computation.
//!
//! [`source`] lists pids and performs the raw per-process reads, [`sample`]
//! turns those reads into a [`RawSample`], and [`delta`] converts cumulative
//! counters into per-interval [`DeltaRecord`]s.

pub mod data;
pub mod delta;
pub mod sample;
pub mod source;

// Re-export commonly used items
pub use data::{DeltaRecord, IoCounters, IoDeltas, Pid, RawSample};
pub use delta::DeltaEngine;
pub use sample::sample;
pub use source::{ProcFs, ProcessDataSource, DEFAULT_PROC_ROOT};
