//! HTTP request handlers.
//!
//! - `tiles`: weather tile rendering
//! - `metrics`: health, Prometheus metrics and cache statistics
//! - `index`: landing page and 404 fallback

pub mod index;
pub mod metrics;
pub mod tiles;

pub use index::{index_handler, not_found_handler};
pub use metrics::{cache_stats_handler, health_handler, metrics_handler};
pub use tiles::{parse_tile_path, tile_handler};
