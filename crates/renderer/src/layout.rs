//! Tile layout shared by the SVG and raster renderers.
//!
//! All coordinates are absolute canvas pixels with the origin at the top-left
//! and y growing downward, which is the convention of both SVG and tiny-skia.

use tile_common::TILE_SIZE;

/// Width and height of every rendered tile.
pub const CANVAS_SIZE: u32 = TILE_SIZE;

/// Baseline centre of the temperature label.
pub const TEMPERATURE_ANCHOR: Point = Point::new(30.0, 24.0);

/// Temperature label size in pixels.
pub const TEMPERATURE_FONT_SIZE: f32 = 13.0;

pub const TEXT_COLOR: Rgb = Rgb(0, 0, 0);

/// Centre of the condition icon.
pub const ICON_CENTER: Point = Point::new(30.0, 40.0);

/// Half the side of the square every icon fits in.
pub const ICON_EXTENT: f32 = 10.0;

/// Pivot of the wind arrow.
pub const WIND_ANCHOR: Point = Point::new(76.0, 20.0);

/// Distance from the pivot to the arrow tip.
pub const WIND_ARM_LENGTH: f32 = 12.0;

/// Arrow outline pointing north, relative to [`WIND_ANCHOR`].
pub const WIND_ARROW_OUTLINE: [Point; 4] = [
    Point::new(0.0, -WIND_ARM_LENGTH),
    Point::new(-4.0, -4.0),
    Point::new(0.0, -6.0),
    Point::new(4.0, -4.0),
];

pub const WIND_ARROW_COLOR: Rgb = Rgb(0, 0, 0);

pub const WIND_ARROW_STROKE_WIDTH: f32 = 1.0;

/// A position on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Rotate clockwise about the origin by `degrees`.
    pub fn rotated(self, degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let (sin, cos) = (sin as f32, cos as f32);
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }
}

/// An opaque sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// `#rrggbb` form for SVG attributes.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// How a closed shape is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapePaint {
    Fill(Rgb),
    Stroke { color: Rgb, width: f32 },
}

/// Drawing primitive understood by both renderers.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle {
        center: Point,
        radius: f32,
        paint: ShapePaint,
    },
    /// Round-capped line segment.
    Line {
        from: Point,
        to: Point,
        color: Rgb,
        width: f32,
    },
    /// Filled closed polygon.
    Polygon { points: Vec<Point>, color: Rgb },
}

impl Shape {
    /// Axis-aligned bounds as `(min, max)`, including stroke width.
    pub fn bounds(&self) -> (Point, Point) {
        match self {
            Shape::Circle {
                center,
                radius,
                paint,
            } => {
                let pad = match paint {
                    ShapePaint::Fill(_) => 0.0,
                    ShapePaint::Stroke { width, .. } => width / 2.0,
                };
                let r = radius + pad;
                (center.offset(-r, -r), center.offset(r, r))
            }
            Shape::Line {
                from, to, width, ..
            } => {
                let pad = width / 2.0;
                (
                    Point::new(from.x.min(to.x) - pad, from.y.min(to.y) - pad),
                    Point::new(from.x.max(to.x) + pad, from.y.max(to.y) + pad),
                )
            }
            Shape::Polygon { points, .. } => points.iter().fold(
                (
                    Point::new(f32::INFINITY, f32::INFINITY),
                    Point::new(f32::NEG_INFINITY, f32::NEG_INFINITY),
                ),
                |(min, max), p| {
                    (
                        Point::new(min.x.min(p.x), min.y.min(p.y)),
                        Point::new(max.x.max(p.x), max.y.max(p.y)),
                    )
                },
            ),
        }
    }
}

/// The wind arrow outline in canvas coordinates for a bearing in degrees
/// clockwise from north.
pub fn wind_arrow_points(direction_degrees: f64) -> [Point; 4] {
    WIND_ARROW_OUTLINE.map(|p| {
        let r = p.rotated(direction_degrees);
        WIND_ANCHOR.offset(r.x, r.y)
    })
}
