//! HTTP handlers for the metrics endpoint.

use crate::web::registry::IoMetrics;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::error;

/// Serve every gauge in the text exposition format.
pub async fn get_metrics(State(metrics): State<IoMetrics>) -> Response {
    match metrics.render() {
        Ok(body) => ([(header::CONTENT_TYPE, metrics.content_type())], body).into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Health check endpoint.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "procio",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Plain-text landing page pointing at the metrics path.
pub async fn index(metrics_path: String) -> String {
    format!(
        "procio {}\n\nMetrics: {}\nHealth: /health\n",
        env!("CARGO_PKG_VERSION"),
        metrics_path
    )
}
