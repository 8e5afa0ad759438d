//! In-memory LRU cache for weather observations.
//!
//! Entries are keyed by the rounded coordinate ([`CacheKey`]) so that the
//! many tiles mapping to nearly the same point share one upstream call.
//!
//! ## Eviction
//!
//! The cache holds at most `capacity` entries. Inserting a new key into a
//! full cache evicts the least-recently-used entry in the same critical
//! section. Expired entries are dropped lazily when they are read, or in
//! bulk through [`WeatherCache::purge_expired`].
//!
//! ## Metrics
//!
//! Hits, misses, expirations, evictions and inserts are tracked with atomics
//! so metrics endpoints can read them without taking the lock.

use lru::LruCache;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tile_common::{CacheKey, WeatherRecord};
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

/// Capacity-bounded, TTL-enforcing cache of weather records.
///
/// Design considerations:
/// - A single lock around the LRU map; every get or insert is one critical
///   section
/// - TTL enforcement on read (lazy expiration)
/// - Entries are replaced, never mutated in place
pub struct WeatherCache {
    cache: RwLock<LruCache<CacheKey, CachedWeather>>,
    capacity: NonZeroUsize,
    ttl: Duration,
    stats: StatsCounters,
}

struct CachedWeather {
    record: WeatherRecord,
    inserted_at: Instant,
    ttl: Duration,
}

impl CachedWeather {
    fn is_expired(&self) -> bool {
        self.inserted_at.elapsed() >= self.ttl
    }
}

#[derive(Default)]
struct StatsCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    expired: AtomicU64,
    evictions: AtomicU64,
    inserts: AtomicU64,
}

/// Point-in-time view of the cache counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that found nothing live (includes expired entries)
    pub misses: u64,
    /// Entries dropped because their TTL elapsed
    pub expired: u64,
    /// Entries evicted to respect the capacity
    pub evictions: u64,
    /// Successful inserts, replacements included
    pub inserts: u64,
    /// Entries currently stored
    pub entries: u64,
    /// Maximum number of entries
    pub capacity: u64,
}

impl CacheStats {
    /// Cache hit rate as a percentage (0-100).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

impl WeatherCache {
    /// Create a cache holding at most `capacity` entries, each living `ttl`.
    ///
    /// A capacity of zero is raised to one.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use storage::WeatherCache;
    ///
    /// // 10k coordinates, 10 minute TTL
    /// let cache = WeatherCache::new(10_000, Duration::from_secs(600));
    /// assert_eq!(cache.capacity(), 10_000);
    /// ```
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: RwLock::new(LruCache::new(capacity)),
            capacity,
            ttl,
            stats: StatsCounters::default(),
        }
    }

    /// Get a live record (returns None if expired or missing).
    ///
    /// Expired entries are removed on the spot.
    pub async fn get(&self, key: &CacheKey) -> Option<WeatherRecord> {
        // LRU promotion needs exclusive access
        let mut cache = self.cache.write().await;

        let expired = match cache.get(key) {
            Some(entry) if !entry.is_expired() => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.record.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            cache.pop(key);
            self.stats.expired.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "Weather cache entry expired");
        }
        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store a record, replacing any entry for the same key.
    ///
    /// At capacity, the least-recently-used entry makes room.
    pub async fn insert(&self, key: CacheKey, record: WeatherRecord) {
        let entry = CachedWeather {
            record,
            inserted_at: Instant::now(),
            ttl: self.ttl,
        };

        let mut cache = self.cache.write().await;
        if let Some((displaced_key, _)) = cache.push(key, entry) {
            if displaced_key != key {
                self.stats.evictions.fetch_add(1, Ordering::Relaxed);
                debug!(evicted = %displaced_key, "Weather cache evicted LRU entry");
            }
        }
        self.stats.inserts.fetch_add(1, Ordering::Relaxed);
    }

    /// Drop every expired entry. Returns the number removed.
    pub async fn purge_expired(&self) -> usize {
        let mut cache = self.cache.write().await;
        let expired_keys: Vec<CacheKey> = cache
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| *key)
            .collect();

        for key in &expired_keys {
            cache.pop(key);
        }
        self.stats
            .expired
            .fetch_add(expired_keys.len() as u64, Ordering::Relaxed);
        expired_keys.len()
    }

    /// Current number of entries, including ones not yet found expired.
    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    /// Check if cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Time-to-live applied to new entries.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get current statistics.
    pub async fn stats(&self) -> CacheStats {
        let entries = self.len().await as u64;
        CacheStats {
            hits: self.stats.hits.load(Ordering::Relaxed),
            misses: self.stats.misses.load(Ordering::Relaxed),
            expired: self.stats.expired.load(Ordering::Relaxed),
            evictions: self.stats.evictions.load(Ordering::Relaxed),
            inserts: self.stats.inserts.load(Ordering::Relaxed),
            entries,
            capacity: self.capacity.get() as u64,
        }
    }

    /// Clear all cached entries and reset statistics.
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.clear();

        self.stats.hits.store(0, Ordering::Relaxed);
        self.stats.misses.store(0, Ordering::Relaxed);
        self.stats.expired.store(0, Ordering::Relaxed);
        self.stats.evictions.store(0, Ordering::Relaxed);
        self.stats.inserts.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tile_common::GeoCoordinate;

    fn key(lat: f64, lon: f64) -> CacheKey {
        GeoCoordinate::new(lat, lon).cache_key()
    }

    fn record(temp: f64) -> WeatherRecord {
        WeatherRecord::from_observation(temp, "Clear", "clear sky", 2.0, 90.0)
    }

    #[tokio::test]
    async fn test_cache_basic_operations() {
        let cache = WeatherCache::new(100, Duration::from_secs(60));

        assert!(cache.is_empty().await);
        assert!(cache.get(&key(10.0, 20.0)).await.is_none());

        cache.insert(key(10.0, 20.0), record(21.0)).await;
        assert_eq!(cache.len().await, 1);

        let retrieved = cache.get(&key(10.001, 19.999)).await;
        assert_eq!(retrieved, Some(record(21.0)));

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.inserts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_ttl_expiration() {
        let cache = WeatherCache::new(100, Duration::from_secs(600));
        cache.insert(key(1.0, 1.0), record(5.0)).await;

        tokio::time::advance(Duration::from_secs(599)).await;
        assert!(cache.get(&key(1.0, 1.0)).await.is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get(&key(1.0, 1.0)).await.is_none());

        let stats = cache.stats().await;
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.entries, 0);
    }

    #[tokio::test]
    async fn test_cache_capacity_bound() {
        let cache = WeatherCache::new(8, Duration::from_secs(60));

        for i in 0..50 {
            cache.insert(key(i as f64, 0.0), record(i as f64)).await;
            assert!(cache.len().await <= 8);
        }

        let stats = cache.stats().await;
        assert_eq!(stats.entries, 8);
        assert_eq!(stats.evictions, 42);
        // Most recent keys survive
        assert!(cache.get(&key(49.0, 0.0)).await.is_some());
        assert!(cache.get(&key(0.0, 0.0)).await.is_none());
    }

    #[tokio::test]
    async fn test_cache_evicts_least_recently_used() {
        let cache = WeatherCache::new(2, Duration::from_secs(60));
        cache.insert(key(1.0, 0.0), record(1.0)).await;
        cache.insert(key(2.0, 0.0), record(2.0)).await;

        // Touch the older entry so the newer one becomes LRU
        assert!(cache.get(&key(1.0, 0.0)).await.is_some());
        cache.insert(key(3.0, 0.0), record(3.0)).await;

        assert!(cache.get(&key(1.0, 0.0)).await.is_some());
        assert!(cache.get(&key(2.0, 0.0)).await.is_none());
        assert!(cache.get(&key(3.0, 0.0)).await.is_some());
    }

    #[tokio::test]
    async fn test_cache_replacement_is_not_eviction() {
        let cache = WeatherCache::new(4, Duration::from_secs(60));
        cache.insert(key(1.0, 1.0), record(1.0)).await;
        cache.insert(key(1.0, 1.0), record(2.0)).await;

        let stats = cache.stats().await;
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.evictions, 0);
        assert_eq!(cache.get(&key(1.0, 1.0)).await, Some(record(2.0)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let cache = WeatherCache::new(10, Duration::from_secs(10));
        cache.insert(key(1.0, 1.0), record(1.0)).await;
        tokio::time::advance(Duration::from_secs(5)).await;
        cache.insert(key(2.0, 2.0), record(2.0)).await;
        tokio::time::advance(Duration::from_secs(6)).await;

        assert_eq!(cache.purge_expired().await, 1);
        assert_eq!(cache.len().await, 1);
        assert!(cache.get(&key(2.0, 2.0)).await.is_some());
    }

    #[tokio::test]
    async fn test_zero_capacity_holds_one() {
        let cache = WeatherCache::new(0, Duration::from_secs(60));
        assert_eq!(cache.capacity(), 1);
        cache.insert(key(1.0, 1.0), record(1.0)).await;
        cache.insert(key(2.0, 2.0), record(2.0)).await;
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_cache_clear() {
        let cache = WeatherCache::new(10, Duration::from_secs(60));
        cache.insert(key(1.0, 1.0), record(1.0)).await;
        cache.get(&key(1.0, 1.0)).await;
        cache.clear().await;

        assert!(cache.is_empty().await);
        assert_eq!(cache.stats().await, CacheStats {
            capacity: 10,
            ..CacheStats::default()
        });
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_access() {
        let cache = Arc::new(WeatherCache::new(64, Duration::from_secs(60)));
        let mut handles = Vec::new();

        for task in 0..8 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..100 {
                    let k = key(((task * 100 + i) % 128) as f64, 0.0);
                    if cache.get(&k).await.is_none() {
                        cache.insert(k, record(i as f64)).await;
                    }
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert!(cache.len().await <= 64);
        let stats = cache.stats().await;
        assert_eq!(stats.hits + stats.misses, 800);
    }

    #[test]
    fn test_hit_rate() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            ..CacheStats::default()
        };
        assert!((stats.hit_rate() - 75.0).abs() < f64::EPSILON);
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }
}
