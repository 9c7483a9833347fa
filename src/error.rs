//! Error handling for the procio collector.

use crate::sampler::Pid;
use std::path::PathBuf;

/// A specialized `Result` type for procio operations.
pub type Result<T> = std::result::Result<T, CollectorError>;

/// The main error type for procio operations.
#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    /// The process table could not be listed at all
    #[error("Failed to list processes under {}: {source}", root.display())]
    EnumerationFailed {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// One of the per-process reads failed, usually because the process exited
    #[error("Process {pid} vanished while sampling")]
    ProcessVanished { pid: Pid },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Metric registration or encoding failed
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Web server error
    #[error("Web server error: {0}")]
    WebServer(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CollectorError {
    /// Create a new enumeration error for the given process table root
    pub fn enumeration_failed(root: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::EnumerationFailed {
            root: root.into(),
            source,
        }
    }

    /// Create a new vanished-process error
    pub fn process_vanished(pid: Pid) -> Self {
        Self::ProcessVanished { pid }
    }

    /// Create a new web server error
    pub fn web_server_error(msg: impl Into<String>) -> Self {
        Self::WebServer(msg.into())
    }

    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error only concerns a single process and may be skipped.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ProcessVanished { .. })
    }
}
