//! Storage abstractions for weather-tiles services.
//!
//! Provides the in-memory, capacity-bounded, expiring cache of weather
//! observations shared by all tile requests.

pub mod weather_cache;

pub use weather_cache::{CacheStats, WeatherCache};
