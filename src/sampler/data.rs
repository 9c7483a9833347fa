//! Data structures for process I/O samples.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of one process in the host process table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pid(pub u32);

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Pid {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Pid)
    }
}

impl From<u32> for Pid {
    fn from(pid: u32) -> Self {
        Pid(pid)
    }
}

/// Cumulative I/O counters as reported by the kernel for one process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoCounters {
    /// Bytes the process asked to read (includes page cache hits)
    pub rchar: u64,
    /// Bytes the process asked to write
    pub wchar: u64,
    /// Bytes actually fetched from the storage layer
    pub read_bytes: u64,
    /// Bytes actually sent to the storage layer
    pub write_bytes: u64,
    /// Bytes whose writeback was cancelled (e.g. truncated dirty pages)
    pub cancelled_write_bytes: u64,
}

/// Per-interval change of the five I/O counters.
///
/// Signed so that a counter regression (pid reuse) surfaces as a negative
/// value instead of wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoDeltas {
    pub rchar: i64,
    pub wchar: i64,
    pub read_bytes: i64,
    pub write_bytes: i64,
    pub cancelled_write_bytes: i64,
}

impl IoDeltas {
    /// Field-wise `current - previous`.
    pub fn between(previous: &IoCounters, current: &IoCounters) -> Self {
        Self {
            rchar: signed_diff(current.rchar, previous.rchar),
            wchar: signed_diff(current.wchar, previous.wchar),
            read_bytes: signed_diff(current.read_bytes, previous.read_bytes),
            write_bytes: signed_diff(current.write_bytes, previous.write_bytes),
            cancelled_write_bytes: signed_diff(
                current.cancelled_write_bytes,
                previous.cancelled_write_bytes,
            ),
        }
    }
}

impl From<IoCounters> for IoDeltas {
    fn from(counters: IoCounters) -> Self {
        Self {
            rchar: saturating_signed(counters.rchar),
            wchar: saturating_signed(counters.wchar),
            read_bytes: saturating_signed(counters.read_bytes),
            write_bytes: saturating_signed(counters.write_bytes),
            cancelled_write_bytes: saturating_signed(counters.cancelled_write_bytes),
        }
    }
}

fn saturating_signed(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

// Two's complement wrap gives the exact signed result whenever it fits in i64.
fn signed_diff(current: u64, previous: u64) -> i64 {
    current.wrapping_sub(previous) as i64
}

/// One snapshot of a process's identity and cumulative counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Process identifier
    pub pid: Pid,
    /// Parent process identifier, if the stat record could be parsed
    pub ppid: Option<Pid>,
    /// Invocation description with argument separators turned into spaces
    pub label: String,
    /// Wall-clock time at which the counters were read
    pub captured_at: DateTime<Utc>,
    /// Cumulative counters at `captured_at`
    pub counters: IoCounters,
}

/// One emitted observation: identity plus per-interval deltas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaRecord {
    pub pid: Pid,
    pub ppid: Option<Pid>,
    pub label: String,
    pub captured_at: DateTime<Utc>,
    pub deltas: IoDeltas,
}

impl DeltaRecord {
    /// Build a record from a sample and already computed deltas.
    pub fn from_sample(sample: &RawSample, deltas: IoDeltas) -> Self {
        Self {
            pid: sample.pid,
            ppid: sample.ppid,
            label: sample.label.clone(),
            captured_at: sample.captured_at,
            deltas,
        }
    }

    /// Capture time as an RFC 3339 UTC string, e.g. `2024-05-01T12:00:00Z`.
    pub fn timestamp(&self) -> String {
        self.captured_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// Parent pid rendered for output; empty when unknown.
    pub fn ppid_string(&self) -> String {
        self.ppid.map(|p| p.to_string()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_deltas_between() {
        let prev = IoCounters {
            rchar: 100,
            wchar: 50,
            read_bytes: 4096,
            write_bytes: 0,
            cancelled_write_bytes: 0,
        };
        let cur = IoCounters {
            rchar: 150,
            wchar: 50,
            read_bytes: 8192,
            write_bytes: 512,
            cancelled_write_bytes: 0,
        };

        let deltas = IoDeltas::between(&prev, &cur);
        assert_eq!(deltas.rchar, 50);
        assert_eq!(deltas.wchar, 0);
        assert_eq!(deltas.read_bytes, 4096);
        assert_eq!(deltas.write_bytes, 512);
        assert_eq!(deltas.cancelled_write_bytes, 0);
    }

    #[test]
    fn test_deltas_regression_is_negative() {
        let prev = IoCounters {
            rchar: 10_000,
            ..Default::default()
        };
        let cur = IoCounters {
            rchar: 300,
            ..Default::default()
        };

        assert_eq!(IoDeltas::between(&prev, &cur).rchar, -9_700);
    }

    #[test]
    fn test_first_observation_saturates_huge_counter() {
        let counters = IoCounters {
            rchar: u64::MAX,
            wchar: i64::MAX as u64,
            read_bytes: 42,
            ..Default::default()
        };

        let deltas = IoDeltas::from(counters);
        assert_eq!(deltas.rchar, i64::MAX);
        assert_eq!(deltas.wchar, i64::MAX);
        assert_eq!(deltas.read_bytes, 42);
    }

    #[test]
    fn test_timestamp_format() {
        let record = DeltaRecord {
            pid: Pid(1),
            ppid: None,
            label: String::new(),
            captured_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            deltas: IoDeltas::default(),
        };

        assert_eq!(record.timestamp(), "2024-05-01T12:00:00Z");
        assert_eq!(record.ppid_string(), "");
    }

    #[test]
    fn test_pid_parsing() {
        assert_eq!("4242".parse::<Pid>().unwrap(), Pid(4242));
        assert!("self".parse::<Pid>().is_err());
        assert_eq!(Pid(7).to_string(), "7");
    }
}
