//! Text rasterization for PNG tiles.
//!
//! A TrueType font can be supplied at startup. Without one, or if it fails
//! to load, labels are drawn with a small built-in bitmap font that covers
//! every character a temperature label can contain.

use rusttype::{point, Font, Scale};
use std::path::Path;
use tiny_skia::{Mask, Pixmap, Rect, Transform};
use tracing::{info, warn};

use crate::error::{RenderError, RenderResult};
use crate::layout::{Point, Rgb};
use crate::raster::paint_for;

/// Horizontal offset of the second pass that emboldens TrueType text.
const BOLD_OFFSET: f32 = 0.75;

/// Rows of the bitmap glyphs.
const BITMAP_ROWS: usize = 7;

/// Columns of the bitmap glyphs.
const BITMAP_COLS: usize = 5;

/// 5x7 glyphs, one byte per row, most significant of the low five bits on
/// the left.
const BITMAP_GLYPHS: &[(char, [u8; BITMAP_ROWS])] = &[
    ('0', [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E]),
    ('1', [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E]),
    ('2', [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F]),
    ('3', [0x1E, 0x01, 0x01, 0x0E, 0x01, 0x01, 0x1E]),
    ('4', [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02]),
    ('5', [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E]),
    ('6', [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E]),
    ('7', [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08]),
    ('8', [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E]),
    ('9', [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C]),
    ('-', [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00]),
    ('°', [0x0C, 0x12, 0x12, 0x0C, 0x00, 0x00, 0x00]),
    ('C', [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E]),
    ('?', [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04]),
];

/// Draws centred, bold text onto a pixmap.
pub struct TextRasterizer {
    font: Option<Font<'static>>,
}

impl TextRasterizer {
    /// Rasterizer using only the built-in bitmap font.
    pub fn builtin() -> Self {
        Self { font: None }
    }

    /// Load a TrueType font from `path`.
    pub fn from_file(path: &Path) -> RenderResult<Self> {
        let data = std::fs::read(path)
            .map_err(|e| RenderError::Font(format!("{}: {}", path.display(), e)))?;
        let font = Font::try_from_vec(data).ok_or_else(|| {
            RenderError::Font(format!("{}: not a TrueType font", path.display()))
        })?;
        Ok(Self { font: Some(font) })
    }

    /// Load the configured font, falling back to the bitmap font on failure.
    pub fn load(path: Option<&Path>) -> Self {
        match path {
            None => Self::builtin(),
            Some(path) => match Self::from_file(path) {
                Ok(rasterizer) => {
                    info!(path = %path.display(), "Loaded tile font");
                    rasterizer
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load tile font, using built-in bitmap font");
                    Self::builtin()
                }
            },
        }
    }

    pub fn has_truetype_font(&self) -> bool {
        self.font.is_some()
    }

    /// Draw `text` with its baseline centred on `anchor`.
    pub fn draw_centered(&self, pixmap: &mut Pixmap, text: &str, anchor: Point, size: f32, color: Rgb) {
        match &self.font {
            Some(font) => draw_truetype(font, pixmap, text, anchor, size, color),
            None => draw_bitmap(pixmap, text, anchor, size, color),
        }
    }
}

impl Default for TextRasterizer {
    fn default() -> Self {
        Self::builtin()
    }
}

fn draw_truetype(font: &Font<'_>, pixmap: &mut Pixmap, text: &str, anchor: Point, size: f32, color: Rgb) {
    let scale = Scale::uniform(size);

    let width = font
        .layout(text, scale, point(0.0, 0.0))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
        + BOLD_OFFSET;
    let origin_x = anchor.x - width / 2.0;

    let (w, h) = (pixmap.width(), pixmap.height());
    let (Some(mut mask), Some(canvas)) = (Mask::new(w, h), Rect::from_xywh(0.0, 0.0, w as f32, h as f32)) else {
        return;
    };

    // Two offset passes stand in for a bold face
    let coverage_mask = mask.data_mut();
    for dx in [0.0, BOLD_OFFSET] {
        for glyph in font.layout(text, scale, point(origin_x + dx, anchor.y)) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, coverage| {
                    let (x, y) = (bb.min.x + gx as i32, bb.min.y + gy as i32);
                    if x < 0 || y < 0 || x >= w as i32 || y >= h as i32 {
                        return;
                    }
                    let cell = &mut coverage_mask[y as usize * w as usize + x as usize];
                    *cell = (*cell).max((coverage.clamp(0.0, 1.0) * 255.0).round() as u8);
                });
            }
        }
    }

    pixmap.fill_rect(canvas, &paint_for(color), Transform::identity(), Some(&mask));
}

fn draw_bitmap(pixmap: &mut Pixmap, text: &str, anchor: Point, size: f32, color: Rgb) {
    let cell = (size / BITMAP_ROWS as f32).round().max(1.0) as i32;
    let advance = (BITMAP_COLS as i32 + 1) * cell;
    // Bold strokes are one pixel wider than a cell
    let ink_width = BITMAP_COLS as i32 * cell + 1;

    let count = text.chars().count() as i32;
    if count == 0 {
        return;
    }
    let total_width = (count - 1) * advance + ink_width;
    let origin_x = (anchor.x - total_width as f32 / 2.0).round() as i32;
    let top = anchor.y.round() as i32 - BITMAP_ROWS as i32 * cell;

    // Whole-pixel cells, no anti-aliasing
    let mut paint = paint_for(color);
    paint.anti_alias = false;

    for (i, ch) in text.chars().enumerate() {
        let rows = bitmap_glyph(ch);
        let glyph_x = origin_x + i as i32 * advance;

        for (row, bits) in rows.iter().enumerate() {
            for col in 0..BITMAP_COLS {
                if bits & (1 << (BITMAP_COLS - 1 - col)) == 0 {
                    continue;
                }
                let x0 = glyph_x + col as i32 * cell;
                let y0 = top + row as i32 * cell;
                if let Some(rect) = Rect::from_xywh(x0 as f32, y0 as f32, (cell + 1) as f32, cell as f32) {
                    pixmap.fill_rect(rect, &paint, Transform::identity(), None);
                }
            }
        }
    }
}

fn bitmap_glyph(ch: char) -> &'static [u8; BITMAP_ROWS] {
    let lookup = |c: char| BITMAP_GLYPHS.iter().find(|(g, _)| *g == c).map(|(_, rows)| rows);
    lookup(ch)
        .or_else(|| lookup('?'))
        .unwrap_or(&[0; BITMAP_ROWS])
}
