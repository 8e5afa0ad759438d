//! Background sweep of expired weather records.

use std::sync::Arc;
use std::time::Duration;
use storage::WeatherCache;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

/// Periodically drop expired entries so stale records do not hold capacity
/// until they happen to be looked up.
pub fn spawn_cache_purge(cache: Arc<WeatherCache>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let purged = cache.purge_expired().await;
            if purged > 0 {
                let remaining = cache.len().await;
                debug!(purged, remaining, "Purged expired weather records");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_common::{GeoCoordinate, WeatherRecord};

    #[tokio::test(start_paused = true)]
    async fn test_purge_task_removes_expired_entries() {
        let cache = Arc::new(WeatherCache::new(10, Duration::from_secs(60)));
        let record = WeatherRecord::from_observation(1.0, "Clear", "clear sky", 1.0, 0.0);
        cache
            .insert(GeoCoordinate::new(1.0, 1.0).cache_key(), record)
            .await;

        let handle = spawn_cache_purge(cache.clone(), Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(61)).await;

        assert!(cache.is_empty().await);
        handle.abort();
    }
}
