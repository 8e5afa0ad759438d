//! Common types and utilities shared across the weather-tiles crates.

pub mod error;
pub mod tile;
pub mod weather;

pub use error::{TileError, TileResult};
pub use tile::{tile_to_coordinate, CacheKey, GeoCoordinate, TileAddress, TILE_SIZE};
pub use weather::{ConditionCode, WeatherRecord};
