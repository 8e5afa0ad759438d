//! Output formats.

use std::fmt;
use std::str::FromStr;
use tile_common::TileError;

/// Encoding of a rendered tile, chosen by the request's file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileFormat {
    Svg,
    Png,
}

impl TileFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            TileFormat::Svg => "image/svg+xml",
            TileFormat::Png => "image/png",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            TileFormat::Svg => "svg",
            TileFormat::Png => "png",
        }
    }
}

impl FromStr for TileFormat {
    type Err = TileError;

    /// Parse a file extension. Matching is exact: `SVG` is not `svg`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "svg" => Ok(TileFormat::Svg),
            "png" => Ok(TileFormat::Png),
            other => Err(TileError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for TileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
