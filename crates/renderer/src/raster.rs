//! Raster tile rendering with tiny-skia.

use tile_common::WeatherRecord;
use tiny_skia::{FillRule, LineCap, Paint, Path, PathBuilder, Pixmap, Stroke, Transform};

use crate::error::{RenderError, RenderResult};
use crate::font::TextRasterizer;
use crate::icons::icon_shapes;
use crate::layout::{
    wind_arrow_points, Point, Rgb, Shape, ShapePaint, CANVAS_SIZE, TEMPERATURE_ANCHOR,
    TEMPERATURE_FONT_SIZE, TEXT_COLOR, WIND_ARROW_COLOR, WIND_ARROW_STROKE_WIDTH,
};
use crate::png::create_png_auto;

/// Paint a weather record onto a fresh transparent canvas.
pub fn render_pixmap(record: &WeatherRecord, text: &TextRasterizer) -> RenderResult<Pixmap> {
    let mut pixmap = Pixmap::new(CANVAS_SIZE, CANVAS_SIZE).ok_or(RenderError::Canvas(CANVAS_SIZE))?;

    text.draw_centered(
        &mut pixmap,
        &record.temperature_label(),
        TEMPERATURE_ANCHOR,
        TEMPERATURE_FONT_SIZE,
        TEXT_COLOR,
    );

    for shape in icon_shapes(record.condition) {
        draw_shape(&mut pixmap, &shape)?;
    }

    let arrow = polygon_path(&wind_arrow_points(record.wind_direction_degrees))
        .ok_or(RenderError::Path("wind arrow"))?;
    fill(&mut pixmap, &arrow, WIND_ARROW_COLOR);
    stroke(&mut pixmap, &arrow, WIND_ARROW_COLOR, WIND_ARROW_STROKE_WIDTH, LineCap::Butt);

    Ok(pixmap)
}

/// Render a weather record as PNG bytes.
pub fn render_png(record: &WeatherRecord, text: &TextRasterizer) -> RenderResult<Vec<u8>> {
    let pixmap = render_pixmap(record, text)?;
    encode_pixmap(&pixmap)
}

/// Encode a premultiplied pixmap as PNG.
pub fn encode_pixmap(pixmap: &Pixmap) -> RenderResult<Vec<u8>> {
    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    create_png_auto(&rgba, pixmap.width() as usize, pixmap.height() as usize)
        .map_err(RenderError::Encode)
}

fn draw_shape(pixmap: &mut Pixmap, shape: &Shape) -> RenderResult<()> {
    match shape {
        Shape::Circle {
            center,
            radius,
            paint,
        } => {
            let path = PathBuilder::from_circle(center.x, center.y, *radius)
                .ok_or(RenderError::Path("circle"))?;
            match paint {
                ShapePaint::Fill(color) => fill(pixmap, &path, *color),
                ShapePaint::Stroke { color, width } => {
                    stroke(pixmap, &path, *color, *width, LineCap::Butt)
                }
            }
        }
        Shape::Line {
            from,
            to,
            color,
            width,
        } => {
            let mut pb = PathBuilder::new();
            pb.move_to(from.x, from.y);
            pb.line_to(to.x, to.y);
            let path = pb.finish().ok_or(RenderError::Path("line"))?;
            stroke(pixmap, &path, *color, *width, LineCap::Round);
        }
        Shape::Polygon { points, color } => {
            let path = polygon_path(points).ok_or(RenderError::Path("polygon"))?;
            fill(pixmap, &path, *color);
        }
    }
    Ok(())
}

fn polygon_path(points: &[Point]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    pb.close();
    pb.finish()
}

pub(crate) fn paint_for(color: Rgb) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.0, color.1, color.2, 255);
    paint.anti_alias = true;
    paint
}

fn fill(pixmap: &mut Pixmap, path: &Path, color: Rgb) {
    pixmap.fill_path(path, &paint_for(color), FillRule::Winding, Transform::identity(), None);
}

fn stroke(pixmap: &mut Pixmap, path: &Path, color: Rgb, width: f32, line_cap: LineCap) {
    let stroke = Stroke {
        width,
        line_cap,
        ..Stroke::default()
    };
    pixmap.stroke_path(path, &paint_for(color), &stroke, Transform::identity(), None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{ICON_CENTER, ICON_EXTENT, WIND_ANCHOR};
    use tile_common::ConditionCode;

    fn alpha_at(pixmap: &Pixmap, x: u32, y: u32) -> u8 {
        pixmap.data()[((y * pixmap.width() + x) * 4 + 3) as usize]
    }

    fn inked_in(pixmap: &Pixmap, center: Point, half: f32) -> usize {
        let (x0, x1) = ((center.x - half) as u32, (center.x + half) as u32);
        let (y0, y1) = ((center.y - half) as u32, (center.y + half) as u32);
        (y0..y1)
            .flat_map(|y| (x0..x1).map(move |x| (x, y)))
            .filter(|&(x, y)| alpha_at(pixmap, x, y) > 0)
            .count()
    }

    #[test]
    fn test_every_condition_paints_its_icon() {
        let text = TextRasterizer::builtin();
        for condition in ConditionCode::ALL {
            let record = WeatherRecord::from_observation(10.0, condition.as_str(), "", 1.0, 0.0);
            let pixmap = render_pixmap(&record, &text).unwrap();
            assert!(inked_in(&pixmap, ICON_CENTER, ICON_EXTENT) > 0, "{:?}", condition);
        }
    }

    #[test]
    fn test_arrow_painted_at_wind_anchor() {
        let record = WeatherRecord::from_observation(10.0, "Clear", "", 1.0, 0.0);
        let pixmap = render_pixmap(&record, &TextRasterizer::builtin()).unwrap();

        // Tip region above the pivot is inked, region below is not
        assert!(alpha_at(&pixmap, WIND_ANCHOR.x as u32, WIND_ANCHOR.y as u32 - 8) > 0);
        assert_eq!(alpha_at(&pixmap, WIND_ANCHOR.x as u32, WIND_ANCHOR.y as u32 + 8), 0);
    }

    #[test]
    fn test_far_corner_stays_transparent() {
        let record = WeatherRecord::from_observation(10.0, "Thunderstorm", "", 1.0, 45.0);
        let pixmap = render_pixmap(&record, &TextRasterizer::builtin()).unwrap();
        assert_eq!(alpha_at(&pixmap, 255, 255), 0);
        assert_eq!(alpha_at(&pixmap, 128, 128), 0);
    }

    #[test]
    fn test_render_png_signature() {
        let record = WeatherRecord::from_observation(-3.0, "Snow", "", 1.0, 270.0);
        let png = render_png(&record, &TextRasterizer::builtin()).unwrap();
        assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }

    #[test]
    fn test_polygon_path_needs_points() {
        assert!(polygon_path(&[]).is_none());
    }
}
