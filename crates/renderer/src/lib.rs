//! Weather tile rendering.
//!
//! Produces 256x256 tiles showing the temperature, a condition icon and a
//! wind arrow, as SVG or PNG. Both encodings are drawn from the shared
//! [`layout`] so they place every element at the same anchors.

pub mod error;
pub mod font;
pub mod format;
pub mod icons;
pub mod layout;
pub mod png;
pub mod raster;
pub mod svg;

pub use error::{RenderError, RenderResult};
pub use font::TextRasterizer;
pub use format::TileFormat;
pub use svg::EMPTY_SVG;

use bytes::Bytes;
use once_cell::sync::Lazy;
use std::path::Path;
use std::sync::Arc;
use tile_common::WeatherRecord;
use tracing::{error, warn};

use crate::layout::CANVAS_SIZE;

static EMPTY_PNG: Lazy<Bytes> = Lazy::new(|| {
    let size = CANVAS_SIZE as usize;
    match png::create_png_auto(&vec![0u8; size * size * 4], size, size) {
        Ok(data) => Bytes::from(data),
        Err(e) => {
            error!(error = %e, "Failed to encode empty PNG tile");
            Bytes::new()
        }
    }
});

/// The transparent tile for `format`.
pub fn empty_tile(format: TileFormat) -> Bytes {
    match format {
        TileFormat::Svg => Bytes::from_static(EMPTY_SVG.as_bytes()),
        TileFormat::Png => EMPTY_PNG.clone(),
    }
}

/// Renders weather records into tile images.
///
/// Cloning is cheap; the loaded font is shared.
#[derive(Clone, Default)]
pub struct TileRenderer {
    text: Arc<TextRasterizer>,
}

impl TileRenderer {
    pub fn new(text: TextRasterizer) -> Self {
        Self {
            text: Arc::new(text),
        }
    }

    /// Renderer using the font at `font_path`, or the bitmap font.
    pub fn with_font_path(font_path: Option<&Path>) -> Self {
        Self::new(TextRasterizer::load(font_path))
    }

    /// Render `weather` in `format`.
    ///
    /// Never fails: no weather, or any raster error, yields [`empty_tile`].
    pub fn render(&self, weather: Option<&WeatherRecord>, format: TileFormat) -> Bytes {
        let Some(record) = weather else {
            return empty_tile(format);
        };

        match format {
            TileFormat::Svg => Bytes::from(svg::render_svg(record)),
            TileFormat::Png => match raster::render_png(record, &self.text) {
                Ok(data) => Bytes::from(data),
                Err(e) => {
                    warn!(error = %e, "Raster render failed, serving empty tile");
                    empty_tile(format)
                }
            },
        }
    }
}
