//! Application metrics collection and reporting.

use metrics::{counter, histogram};
use renderer::TileFormat;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::sync::RwLock;

/// Metrics collector for the tile API.
///
/// Counters are mirrored to the `metrics` facade so the Prometheus exporter
/// sees them too.
#[derive(Debug)]
pub struct MetricsCollector {
    /// Request counts
    pub svg_requests: AtomicU64,
    pub png_requests: AtomicU64,
    pub rejected_requests: AtomicU64,

    /// Tiles served without weather data
    pub fallback_tiles: AtomicU64,

    /// Timing stats (stored as microseconds)
    weather_times: RwLock<TimingStats>,
    render_times: RwLock<TimingStats>,

    /// Start time for uptime calculation
    start_time: Instant,
}

#[derive(Debug, Default)]
struct TimingStats {
    count: u64,
    total_us: u64,
    min_us: u64,
    max_us: u64,
    last_us: u64,
}

impl TimingStats {
    fn record(&mut self, duration_us: u64) {
        self.count += 1;
        self.total_us += duration_us;
        self.last_us = duration_us;
        if self.count == 1 || duration_us < self.min_us {
            self.min_us = duration_us;
        }
        if duration_us > self.max_us {
            self.max_us = duration_us;
        }
    }

    fn avg_ms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.total_us as f64 / self.count as f64) / 1000.0
        }
    }

    fn summary(&self) -> TimingSummary {
        TimingSummary {
            count: self.count,
            avg_ms: self.avg_ms(),
            min_ms: self.min_us as f64 / 1000.0,
            max_ms: self.max_us as f64 / 1000.0,
            last_ms: self.last_us as f64 / 1000.0,
        }
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            svg_requests: AtomicU64::new(0),
            png_requests: AtomicU64::new(0),
            rejected_requests: AtomicU64::new(0),
            fallback_tiles: AtomicU64::new(0),
            weather_times: RwLock::new(TimingStats::default()),
            render_times: RwLock::new(TimingStats::default()),
            start_time: Instant::now(),
        }
    }

    /// Record an accepted tile request
    pub fn record_tile_request(&self, format: TileFormat) {
        match format {
            TileFormat::Svg => self.svg_requests.fetch_add(1, Ordering::Relaxed),
            TileFormat::Png => self.png_requests.fetch_add(1, Ordering::Relaxed),
        };
        counter!("tile_requests_total", "format" => format.extension()).increment(1);
    }

    /// Record a request rejected for a bad tile path
    pub fn record_rejected(&self) {
        self.rejected_requests.fetch_add(1, Ordering::Relaxed);
        counter!("tile_rejected_total").increment(1);
    }

    /// Record a tile served without weather data
    pub fn record_fallback(&self, format: TileFormat) {
        self.fallback_tiles.fetch_add(1, Ordering::Relaxed);
        counter!("tile_fallback_total", "format" => format.extension()).increment(1);
    }

    /// Record time spent obtaining weather (cache or upstream)
    pub async fn record_weather_lookup(&self, duration_us: u64) {
        histogram!("weather_lookup_duration_seconds").record(duration_us as f64 / 1_000_000.0);
        self.weather_times.write().await.record(duration_us);
    }

    /// Record a render operation
    pub async fn record_render(&self, format: TileFormat, duration_us: u64) {
        histogram!("tile_render_duration_seconds", "format" => format.extension())
            .record(duration_us as f64 / 1_000_000.0);
        self.render_times.write().await.record(duration_us);
    }

    /// Get current metrics snapshot
    pub async fn snapshot(&self) -> MetricsSnapshot {
        let weather = self.weather_times.read().await.summary();
        let render = self.render_times.read().await.summary();

        MetricsSnapshot {
            uptime_secs: self.start_time.elapsed().as_secs(),
            svg_requests: self.svg_requests.load(Ordering::Relaxed),
            png_requests: self.png_requests.load(Ordering::Relaxed),
            rejected_requests: self.rejected_requests.load(Ordering::Relaxed),
            fallback_tiles: self.fallback_tiles.load(Ordering::Relaxed),
            weather_lookup: weather,
            render,
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of current metrics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub svg_requests: u64,
    pub png_requests: u64,
    pub rejected_requests: u64,
    pub fallback_tiles: u64,
    pub weather_lookup: TimingSummary,
    pub render: TimingSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimingSummary {
    pub count: u64,
    pub avg_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub last_ms: f64,
}

/// Timer guard for measuring operation duration.
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_stats() {
        let mut stats = TimingStats::default();
        stats.record(2000);
        stats.record(0);
        stats.record(4000);

        let summary = stats.summary();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.min_ms, 0.0);
        assert_eq!(summary.max_ms, 4.0);
        assert_eq!(summary.last_ms, 4.0);
        assert!((summary.avg_ms - 2.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_snapshot_counts() {
        let metrics = MetricsCollector::new();
        metrics.record_tile_request(TileFormat::Svg);
        metrics.record_tile_request(TileFormat::Png);
        metrics.record_tile_request(TileFormat::Png);
        metrics.record_fallback(TileFormat::Png);
        metrics.record_rejected();
        metrics.record_render(TileFormat::Png, 1500).await;

        let snapshot = metrics.snapshot().await;
        assert_eq!(snapshot.svg_requests, 1);
        assert_eq!(snapshot.png_requests, 2);
        assert_eq!(snapshot.fallback_tiles, 1);
        assert_eq!(snapshot.rejected_requests, 1);
        assert_eq!(snapshot.render.count, 1);
        assert_eq!(snapshot.weather_lookup.count, 0);
    }
}
