//! Weather tile HTTP service.
//!
//! Library half of the `tile-api` binary, exposed so the router can be
//! driven directly in tests.

pub mod cleanup;
pub mod config;
pub mod handlers;
pub mod metrics;
pub mod state;

use axum::{extract::Extension, routing::get, Router};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use state::AppState;

/// Build the application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index_handler))
        // Tiles; the extension is parsed by the handler
        .route("/tiles/:z/:x/:y", get(handlers::tile_handler))
        // Health check
        .route("/health", get(handlers::health_handler))
        // Metrics
        .route("/metrics", get(handlers::metrics_handler))
        .route("/api/cache/stats", get(handlers::cache_stats_handler))
        .fallback(handlers::not_found_handler)
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
