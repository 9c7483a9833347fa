//! Pull endpoint publishing per-process I/O gauges.

pub mod config;
pub mod handlers;
pub mod registry;
pub mod router;

// Re-export commonly used items
pub use config::MetricsConfig;
pub use registry::IoMetrics;
pub use router::create_app;

use crate::error::{CollectorError, Result};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

/// A metrics server whose listener is already bound.
pub struct MetricsServer {
    listener: TcpListener,
    app: axum::Router,
}

impl MetricsServer {
    /// Address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve requests until the task is dropped or the server fails.
    pub async fn serve(self) -> Result<()> {
        axum::serve(self.listener, self.app)
            .await
            .map_err(|e| CollectorError::web_server_error(format!("Server error: {}", e)))
    }
}

/// Bind the metrics listener.
///
/// Binding happens eagerly so that an unusable address is reported at startup
/// rather than from a background task.
pub async fn bind_metrics_server(
    config: &MetricsConfig,
    metrics: IoMetrics,
) -> Result<MetricsServer> {
    let addr = config.bind_address();

    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        CollectorError::web_server_error(format!("Failed to bind to {}: {}", addr, e))
    })?;

    info!(
        "Metrics server listening on http://{}{}",
        listener.local_addr()?,
        config.path
    );

    Ok(MetricsServer {
        listener,
        app: create_app(config, metrics),
    })
}
