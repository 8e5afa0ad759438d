//! Rendering error types.

use thiserror::Error;

/// Why a raster tile could not be produced.
///
/// These never reach a client: [`crate::TileRenderer`] answers with the
/// empty tile instead.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to allocate {0}x{0} canvas")]
    Canvas(u32),

    #[error("Degenerate path for {0}")]
    Path(&'static str),

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("Font error: {0}")]
    Font(String),
}

pub type RenderResult<T> = Result<T, RenderError>;
