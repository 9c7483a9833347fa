//! Conversion of cumulative counters into per-interval deltas.

use crate::sampler::data::{DeltaRecord, IoDeltas, Pid, RawSample};
use std::collections::HashMap;

/// Converts raw samples into [`DeltaRecord`]s using the previous sample of
/// each pid as the baseline.
///
/// Entries are never evicted on their own: a pid that disappears keeps its
/// last sample, which becomes the baseline if the kernel later hands the same
/// pid to a new process. That case yields negative deltas and is not detected.
#[derive(Debug, Default)]
pub struct DeltaEngine {
    state: HashMap<Pid, RawSample>,
}

impl DeltaEngine {
    /// Create an engine with no prior observations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the delta record for `raw` and make it the new baseline.
    ///
    /// The first observation of a pid reports its cumulative counters as-is.
    pub fn observe(&mut self, raw: RawSample) -> DeltaRecord {
        let deltas = match self.state.get(&raw.pid) {
            Some(previous) => IoDeltas::between(&previous.counters, &raw.counters),
            None => IoDeltas::from(raw.counters),
        };

        let record = DeltaRecord::from_sample(&raw, deltas);
        self.state.insert(raw.pid, raw);
        record
    }

    /// The retained baseline for `pid`, if any.
    pub fn previous(&self, pid: Pid) -> Option<&RawSample> {
        self.state.get(&pid)
    }

    /// Drop the baseline for `pid`; its next observation counts as the first.
    pub fn forget(&mut self, pid: Pid) -> Option<RawSample> {
        self.state.remove(&pid)
    }

    /// Drop every baseline, as if the collector had been restarted.
    pub fn clear(&mut self) {
        self.state.clear();
    }

    /// Number of pids with a retained baseline.
    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }
}
