//! Slippy-map tile addressing and the Web Mercator inverse projection.

use crate::{TileError, TileResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Width and height of every rendered tile in pixels.
pub const TILE_SIZE: u32 = 256;

/// A tile coordinate (z/x/y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileAddress {
    /// Zoom level
    pub z: u32,
    /// Column (x)
    pub x: u32,
    /// Row (y)
    pub y: u32,
}

impl TileAddress {
    pub fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Number of tiles along each axis at this zoom (2^z).
    pub fn matrix_size(&self) -> u64 {
        1u64 << self.z.min(63)
    }

    /// Whether x and y fall inside `[0, 2^z)`.
    pub fn is_within_bounds(&self) -> bool {
        let n = self.matrix_size();
        (self.x as u64) < n && (self.y as u64) < n
    }

    /// Reject indices outside the grid. Any zoom level is accepted.
    pub fn validate(&self) -> TileResult<()> {
        if !self.is_within_bounds() {
            return Err(TileError::TileOutOfRange {
                z: self.z,
                x: self.x,
                y: self.y,
            });
        }
        Ok(())
    }

    /// Path-style identifier used in logs.
    pub fn path_key(&self) -> String {
        format!("{}/{}/{}", self.z, self.x, self.y)
    }
}

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Cache key for this position (both axes rounded to 2 decimals).
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::from_coordinate(self)
    }

    /// This position rounded to 2 decimal places in both axes.
    pub fn rounded(&self) -> GeoCoordinate {
        self.cache_key().coordinate()
    }
}

/// Coordinate rounded to hundredths of a degree.
///
/// Stored as integers so equal rounded positions always hash identically,
/// including `-0.00` and `0.00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    lat_centi: i32,
    lon_centi: i32,
}

impl CacheKey {
    pub fn from_coordinate(coord: &GeoCoordinate) -> Self {
        Self {
            lat_centi: to_centi(coord.latitude),
            lon_centi: to_centi(coord.longitude),
        }
    }

    /// The rounded coordinate this key stands for.
    pub fn coordinate(&self) -> GeoCoordinate {
        GeoCoordinate {
            latitude: self.lat_centi as f64 / 100.0,
            longitude: self.lon_centi as f64 / 100.0,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let coord = self.coordinate();
        write!(f, "{:.2},{:.2}", coord.latitude, coord.longitude)
    }
}

fn to_centi(value: f64) -> i32 {
    // Halves go to even, so -163.125 keys as -163.12.
    // `as` saturates for non-finite and huge values
    (value * 100.0).round_ties_even() as i32
}

/// Convert Web Mercator tile coordinates to the lat/lon of the tile's
/// north-west corner.
///
/// Total over all inputs; indices outside `[0, 2^z)` produce positions
/// outside the normal range rather than an error.
pub fn tile_to_coordinate(tile: &TileAddress) -> GeoCoordinate {
    let n = 2f64.powf(tile.z as f64);

    let longitude = tile.x as f64 / n * 360.0 - 180.0;
    let latitude = (PI * (1.0 - 2.0 * tile.y as f64 / n))
        .sinh()
        .atan()
        .to_degrees();

    GeoCoordinate {
        latitude,
        longitude,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_to_coordinate_zoom_one_origin() {
        // North-west corner of the grid: the Web Mercator latitude limit
        let coord = tile_to_coordinate(&TileAddress::new(1, 0, 0));
        assert_eq!(coord.longitude, -180.0);
        assert!((coord.latitude - 85.051_128_779_806_6).abs() < 1e-9);
    }

    #[test]
    fn test_tile_to_coordinate_quarter_row() {
        // y/n = 1/4 lands on sinh(pi/2)
        let coord = tile_to_coordinate(&TileAddress::new(2, 0, 1));
        assert_eq!(coord.longitude, -180.0);
        assert!((coord.latitude - 66.51).abs() < 0.01);
    }

    #[test]
    fn test_tile_to_coordinate_center() {
        for z in 1..=31u32 {
            let half = 1u32 << (z - 1);
            let coord = tile_to_coordinate(&TileAddress::new(z, half, half));
            assert!(coord.latitude.abs() < 1e-9, "z={} lat={}", z, coord.latitude);
            assert!(coord.longitude.abs() < 1e-9, "z={} lon={}", z, coord.longitude);
        }
    }

    #[test]
    fn test_tile_to_coordinate_stays_in_range() {
        for z in 0..=4u32 {
            let n = 1u32 << z;
            for x in 0..n {
                for y in 0..n {
                    let coord = tile_to_coordinate(&TileAddress::new(z, x, y));
                    assert!((-90.0..=90.0).contains(&coord.latitude));
                    assert!((-180.0..=180.0).contains(&coord.longitude));
                }
            }
        }
    }

    #[test]
    fn test_tile_to_coordinate_out_of_range_is_total() {
        // x = 2^z wraps past the antimeridian instead of failing
        let coord = tile_to_coordinate(&TileAddress::new(1, 2, 0));
        assert_eq!(coord.longitude, 180.0);
    }

    #[test]
    fn test_validate() {
        assert!(TileAddress::new(0, 0, 0).validate().is_ok());
        assert!(TileAddress::new(10, 1023, 1023).validate().is_ok());
        assert_eq!(
            TileAddress::new(10, 1024, 0).validate(),
            Err(TileError::TileOutOfRange { z: 10, x: 1024, y: 0 })
        );
        assert_eq!(
            TileAddress::new(0, 0, 1).validate(),
            Err(TileError::TileOutOfRange { z: 0, x: 0, y: 1 })
        );
    }

    #[test]
    fn test_deep_zoom_is_valid() {
        assert!(TileAddress::new(23, 0, 0).validate().is_ok());
        assert!(TileAddress::new(30, 1 << 29, 1 << 29).validate().is_ok());
        assert!(TileAddress::new(32, u32::MAX, u32::MAX).validate().is_ok());
        assert!(TileAddress::new(u32::MAX, 7, 7).validate().is_ok());

        let coord = tile_to_coordinate(&TileAddress::new(u32::MAX, 0, 0));
        assert!(coord.latitude.is_finite());
        assert_eq!(coord.longitude, -180.0);
    }

    #[test]
    fn test_cache_key_rounds_ties_to_even() {
        // z=6, x=3 puts the west edge exactly on -163.125
        let coord = tile_to_coordinate(&TileAddress::new(6, 3, 32));
        assert_eq!(coord.longitude, -163.125);
        assert_eq!(coord.cache_key().to_string(), "0.00,-163.12");

        assert_eq!(GeoCoordinate::new(0.125, 0.375).cache_key().to_string(), "0.12,0.38");
    }

    #[test]
    fn test_cache_key_rounding() {
        let a = GeoCoordinate::new(66.513_26, -179.996);
        let b = GeoCoordinate::new(66.509_9, -180.004);
        assert_eq!(a.cache_key(), b.cache_key());
        assert_eq!(a.cache_key().to_string(), "66.51,-180.00");
    }

    #[test]
    fn test_cache_key_negative_zero() {
        let a = GeoCoordinate::new(-0.001, 0.001);
        let b = GeoCoordinate::new(0.0, 0.0);
        assert_eq!(a.cache_key(), b.cache_key());
        assert_eq!(a.cache_key().to_string(), "0.00,0.00");
    }

    #[test]
    fn test_rounded_coordinate() {
        let rounded = GeoCoordinate::new(40.712_8, -74.006_0).rounded();
        assert!((rounded.latitude - 40.71).abs() < 1e-9);
        assert!((rounded.longitude - (-74.01)).abs() < 1e-9);
    }
}
