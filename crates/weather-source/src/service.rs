//! Cache-fronted weather lookup used by the tile pipeline.

use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use storage::WeatherCache;
use tile_common::{CacheKey, GeoCoordinate, WeatherRecord};
use tracing::{debug, info, warn};

use crate::provider::{FetchError, WeatherProvider};

/// Weather lookup by coordinate, shared across all requests.
///
/// Lookups go through the shared [`WeatherCache`]; a miss calls the
/// provider with the rounded coordinate. Failures are logged and reported as
/// `None` and nothing is cached for them.
#[derive(Clone)]
pub struct WeatherService {
    cache: Arc<WeatherCache>,
    provider: Arc<dyn WeatherProvider>,
    fetch_timeout: Duration,
}

impl WeatherService {
    pub fn new(
        cache: Arc<WeatherCache>,
        provider: Arc<dyn WeatherProvider>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            cache,
            provider,
            fetch_timeout,
        }
    }

    /// The cache backing this service.
    pub fn cache(&self) -> &Arc<WeatherCache> {
        &self.cache
    }

    /// Current weather near `coordinate`, or `None` if it cannot be had.
    ///
    /// The upstream fetch runs as its own task: if the caller is dropped
    /// mid-fetch, the fetch still completes and populates the cache.
    pub async fn get_weather(&self, coordinate: GeoCoordinate) -> Option<WeatherRecord> {
        let key = coordinate.cache_key();

        if let Some(record) = self.cache.get(&key).await {
            debug!(key = %key, "Weather cache hit");
            return Some(record);
        }

        let fetch = fetch_and_store(
            self.cache.clone(),
            self.provider.clone(),
            key,
            self.fetch_timeout,
        );

        match tokio::spawn(fetch).await {
            Ok(record) => record,
            Err(e) => {
                warn!(key = %key, error = %e, "Weather fetch task aborted");
                None
            }
        }
    }
}

async fn fetch_and_store(
    cache: Arc<WeatherCache>,
    provider: Arc<dyn WeatherProvider>,
    key: CacheKey,
    fetch_timeout: Duration,
) -> Option<WeatherRecord> {
    let rounded = key.coordinate();

    let outcome = match tokio::time::timeout(fetch_timeout, provider.current_weather(rounded)).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout(fetch_timeout)),
    };

    match outcome {
        Ok(record) => {
            cache.insert(key, record.clone()).await;
            counter!("weather_fetch_total", "outcome" => "success").increment(1);
            info!(key = %key, "Fetched weather for coordinates");
            Some(record)
        }
        Err(e) => {
            counter!("weather_fetch_total", "outcome" => e.kind()).increment(1);
            warn!(key = %key, error = %e, "Error fetching weather data");
            None
        }
    }
}
