//! Poll loop configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the sampling loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Sleep between the end of one tick and the start of the next
    pub interval: Duration,
    /// Only records whose label contains this substring are emitted
    pub filter: Option<String>,
    /// CSV destination; standard output when unset
    pub output: Option<PathBuf>,
    /// Root of the process table
    pub proc_root: PathBuf,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(crate::DEFAULT_INTERVAL_SECS),
            filter: None,
            output: None,
            proc_root: PathBuf::from(crate::sampler::DEFAULT_PROC_ROOT),
        }
    }
}

impl CollectorConfig {
    /// Set the polling interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the label filter. An empty string disables filtering.
    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter.filter(|f| !f.is_empty());
        self
    }

    /// Set the CSV output path.
    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    /// Set the process table root.
    pub fn with_proc_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.proc_root = root.into();
        self
    }

    /// Whether a record with this label passes the filter.
    pub fn accepts(&self, label: &str) -> bool {
        match &self.filter {
            Some(filter) => label.contains(filter.as_str()),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CollectorConfig::default();
        assert_eq!(config.interval, Duration::from_secs(1));
        assert_eq!(config.filter, None);
        assert_eq!(config.output, None);
        assert_eq!(config.proc_root, PathBuf::from("/proc"));
    }

    #[test]
    fn test_filter() {
        let config = CollectorConfig::default().with_filter(Some("wal".to_string()));
        assert!(config.accepts("wal writer thread"));
        assert!(!config.accepts("checkpointer"));

        let open = CollectorConfig::default().with_filter(Some(String::new()));
        assert_eq!(open.filter, None);
        assert!(open.accepts("checkpointer"));
        assert!(open.accepts(""));
    }
}
