//! Metrics endpoint configuration.

use crate::error::{CollectorError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the metrics pull endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Host to bind the server to
    pub host: String,
    /// Port to bind the server to
    pub port: u16,
    /// Path the exposition is served at
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            host: crate::DEFAULT_METRICS_HOST.to_string(),
            port: crate::DEFAULT_METRICS_PORT,
            path: crate::DEFAULT_METRICS_PATH.to_string(),
        }
    }
}

impl MetricsConfig {
    /// Create a new metrics configuration with custom host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Build from command-line values.
    ///
    /// An empty bind address or a non-positive port disables publication and
    /// yields `Ok(None)`.
    pub fn from_cli(bind: &str, port: i64) -> Result<Option<Self>> {
        if bind.is_empty() || port <= 0 {
            return Ok(None);
        }

        let port = u16::try_from(port)
            .map_err(|_| CollectorError::config_error(format!("Invalid metrics port: {}", port)))?;

        Ok(Some(Self::new(bind, port)))
    }

    /// Set the host for the server.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port for the server.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the exposition path. A missing leading `/` is added.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.path = if path.starts_with('/') {
            path
        } else {
            format!("/{}", path)
        };
        self
    }

    /// Get the full bind address.
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            // Bare IPv6 literal
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MetricsConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:9090");
        assert_eq!(config.path, "/metrics");
    }

    #[test]
    fn test_from_cli_disabled() {
        assert_eq!(MetricsConfig::from_cli("", 9090).unwrap(), None);
        assert_eq!(MetricsConfig::from_cli("0.0.0.0", 0).unwrap(), None);
        assert_eq!(MetricsConfig::from_cli("0.0.0.0", -1).unwrap(), None);
    }

    #[test]
    fn test_from_cli_enabled_and_invalid() {
        let config = MetricsConfig::from_cli("127.0.0.1", 9100).unwrap().unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:9100");

        assert!(MetricsConfig::from_cli("127.0.0.1", 70_000).is_err());
    }

    #[test]
    fn test_builder() {
        let config = MetricsConfig::default()
            .with_host("::1")
            .with_port(9191)
            .with_path("prom");
        assert_eq!(config.bind_address(), "[::1]:9191");
        assert_eq!(config.path, "/prom");
    }
}
