//! Web application router and middleware setup.

use crate::web::config::MetricsConfig;
use crate::web::handlers;
use crate::web::registry::IoMetrics;
use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the axum application serving the metrics exposition.
pub fn create_app(config: &MetricsConfig, metrics: IoMetrics) -> Router {
    let metrics_path = config.path.clone();
    let index_path = metrics_path.clone();

    let mut app = Router::new()
        .route(&metrics_path, get(handlers::get_metrics))
        .route("/health", get(handlers::health_check));

    if metrics_path != "/" {
        app = app.route("/", get(move || handlers::index(index_path.clone())));
    }

    app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(metrics)
}
