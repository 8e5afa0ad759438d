//! Error types for weather-tiles services.

use thiserror::Error;

/// Result type alias using TileError.
pub type TileResult<T> = Result<T, TileError>;

/// Errors raised while addressing a tile.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TileError {
    #[error("Tile {z}/{x}/{y} is outside the tile grid for zoom {z}")]
    TileOutOfRange { z: u32, x: u32, y: u32 },

    #[error("Unsupported tile format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid tile path segment: {0}")]
    InvalidSegment(String),
}

impl TileError {
    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            TileError::UnsupportedFormat(_) => 404,
            TileError::TileOutOfRange { .. }
            | TileError::InvalidSegment(_) => 400,
        }
    }
}
