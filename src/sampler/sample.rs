//! Reading one raw sample for a single process.

use crate::error::{CollectorError, Result};
use crate::sampler::data::{IoCounters, Pid, RawSample};
use crate::sampler::source::ProcessDataSource;
use chrono::Utc;
use tracing::trace;

/// Read identity, parent and cumulative counters for `pid`.
///
/// Fails with [`CollectorError::ProcessVanished`] if any of the three reads
/// fails; a partial sample is never returned.
pub fn sample<S: ProcessDataSource + ?Sized>(source: &S, pid: Pid) -> Result<RawSample> {
    let vanished = |err: std::io::Error| {
        trace!(%pid, error = %err, "process read failed");
        CollectorError::process_vanished(pid)
    };

    let cmdline = source.read_cmdline(pid).map_err(vanished)?;
    let stat = source.read_stat(pid).map_err(vanished)?;
    let io = source.read_io(pid).map_err(vanished)?;
    let captured_at = Utc::now();

    Ok(RawSample {
        pid,
        ppid: parse_parent_pid(&stat),
        label: normalize_label(&cmdline),
        captured_at,
        counters: parse_io_counters(&io),
    })
}

/// Turn NUL-separated invocation arguments into a printable single-line label.
pub fn normalize_label(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).replace('\0', " ")
}

/// Extract the parent pid from a stat record.
///
/// The command name sits in parentheses and may itself contain spaces or
/// parentheses, so fields are counted after the last `)`.
pub fn parse_parent_pid(stat: &str) -> Option<Pid> {
    let (_, rest) = stat.rsplit_once(')')?;
    // state, ppid, ...
    rest.split_whitespace().nth(1)?.parse::<Pid>().ok()
}

/// Parse the `key: value` I/O accounting record.
///
/// Unknown keys are ignored; a known key with an unparsable value counts as zero.
pub fn parse_io_counters(io: &str) -> IoCounters {
    let mut counters = IoCounters::default();

    for line in io.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };

        let slot = match key.trim() {
            "rchar" => &mut counters.rchar,
            "wchar" => &mut counters.wchar,
            "read_bytes" => &mut counters.read_bytes,
            "write_bytes" => &mut counters.write_bytes,
            "cancelled_write_bytes" => &mut counters.cancelled_write_bytes,
            _ => continue,
        };

        *slot = value.trim().parse().unwrap_or_else(|_| {
            trace!(key = key.trim(), value = value.trim(), "malformed counter field");
            0
        });
    }

    counters
}
