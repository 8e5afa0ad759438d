//! Application state shared across handlers.

use metrics_exporter_prometheus::PrometheusHandle;
use renderer::TileRenderer;
use std::sync::Arc;
use storage::WeatherCache;
use tracing::info;
use weather_source::{FetchError, OpenWeatherMapClient, OpenWeatherMapConfig, WeatherService};

use crate::config::Config;
use crate::metrics::MetricsCollector;

/// Shared application state.
pub struct AppState {
    pub weather: WeatherService,
    pub renderer: TileRenderer,
    pub metrics: Arc<MetricsCollector>,
    /// Exporter handle, absent when no global recorder was installed
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Build state talking to the configured OpenWeatherMap endpoint.
    pub fn new(config: &Config, prometheus: Option<PrometheusHandle>) -> Result<Self, FetchError> {
        let cache = Arc::new(WeatherCache::new(config.cache_capacity, config.cache_ttl));
        let client = OpenWeatherMapClient::new(OpenWeatherMapConfig {
            base_url: config.weather_api_url.clone(),
            api_key: config.api_key.clone(),
            timeout: config.fetch_timeout,
        })?;

        info!(
            capacity = config.cache_capacity,
            ttl_secs = config.cache_ttl.as_secs(),
            upstream = %config.weather_api_url,
            "Weather service initialized"
        );

        let weather = WeatherService::new(cache, Arc::new(client), config.fetch_timeout);
        let renderer = TileRenderer::with_font_path(config.font_path.as_deref());

        Ok(Self::from_parts(weather, renderer, prometheus))
    }

    pub fn from_parts(
        weather: WeatherService,
        renderer: TileRenderer,
        prometheus: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            weather,
            renderer,
            metrics: Arc::new(MetricsCollector::new()),
            prometheus,
        }
    }
}
