//! Health checks, metrics, and cache statistics endpoints.

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt::Write;
use std::sync::Arc;
use storage::CacheStats;
use tracing::instrument;

use crate::state::AppState;

// ============================================================================
// Health Checks
// ============================================================================

/// GET /health - Basic health check
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

// ============================================================================
// Prometheus Metrics
// ============================================================================

/// GET /metrics - Prometheus metrics endpoint
///
/// Exporter output (when a recorder is installed) followed by collector and
/// cache gauges.
#[instrument(skip(state))]
pub async fn metrics_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let snapshot = state.metrics.snapshot().await;
    let cache = state.weather.cache().stats().await;

    let mut output = state
        .prometheus
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default();

    let mut metric = |name: &str, kind: &str, help: &str, value: f64| {
        let _ = write!(
            output,
            "# HELP {name} {help}\n# TYPE {name} {kind}\n{name} {value}\n"
        );
    };

    metric("tile_api_uptime_seconds", "gauge", "Seconds since startup", snapshot.uptime_secs as f64);
    metric("tile_api_svg_requests", "counter", "SVG tile requests served", snapshot.svg_requests as f64);
    metric("tile_api_png_requests", "counter", "PNG tile requests served", snapshot.png_requests as f64);
    metric("tile_api_rejected_requests", "counter", "Tile requests rejected as invalid", snapshot.rejected_requests as f64);
    metric("tile_api_fallback_tiles", "counter", "Tiles served without weather data", snapshot.fallback_tiles as f64);
    metric("tile_api_render_avg_ms", "gauge", "Mean tile render time", snapshot.render.avg_ms);
    metric("tile_api_render_max_ms", "gauge", "Slowest tile render", snapshot.render.max_ms);
    metric("tile_api_weather_lookup_avg_ms", "gauge", "Mean weather lookup time", snapshot.weather_lookup.avg_ms);
    metric("tile_api_weather_lookup_max_ms", "gauge", "Slowest weather lookup", snapshot.weather_lookup.max_ms);

    metric("weather_cache_entries", "gauge", "Weather records cached", cache.entries as f64);
    metric("weather_cache_capacity", "gauge", "Weather cache capacity", cache.capacity as f64);
    metric("weather_cache_hits", "counter", "Weather cache hits", cache.hits as f64);
    metric("weather_cache_misses", "counter", "Weather cache misses", cache.misses as f64);
    metric("weather_cache_expired", "counter", "Weather records found expired", cache.expired as f64);
    metric("weather_cache_evictions", "counter", "Weather records evicted for capacity", cache.evictions as f64);

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        output,
    )
        .into_response()
}

// ============================================================================
// JSON Cache Statistics
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    pub hit_rate: f64,
    pub ttl_secs: u64,
}

/// GET /api/cache/stats - Weather cache statistics
#[instrument(skip(state))]
pub async fn cache_stats_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<CacheStatsResponse> {
    let cache = state.weather.cache();
    let stats = cache.stats().await;

    Json(CacheStatsResponse {
        hit_rate: stats.hit_rate(),
        ttl_secs: cache.ttl().as_secs(),
        stats,
    })
}
