//! SVG tile rendering.

use std::fmt::Write;
use tile_common::WeatherRecord;

use crate::icons::{glyph_name, icon_shapes};
use crate::layout::{
    Shape, ShapePaint, CANVAS_SIZE, TEMPERATURE_ANCHOR, TEMPERATURE_FONT_SIZE, TEXT_COLOR,
    WIND_ANCHOR, WIND_ARROW_COLOR, WIND_ARROW_OUTLINE, WIND_ARROW_STROKE_WIDTH,
};

/// The transparent tile served when there is no weather to draw.
pub const EMPTY_SVG: &str = concat!(
    r#"<svg xmlns="http://www.w3.org/2000/svg" width="256" height="256" viewBox="0 0 256 256">"#,
    r#"<rect width="256" height="256" fill="none"/>"#,
    "</svg>"
);

/// Render a weather record as a standalone SVG document.
pub fn render_svg(record: &WeatherRecord) -> String {
    let mut out = String::with_capacity(2048);

    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#,
        size = CANVAS_SIZE
    );

    let _ = write!(
        out,
        r#"<text x="{}" y="{}" text-anchor="middle" font-family="Arial, sans-serif" font-size="{}" font-weight="bold" fill="{}">{}</text>"#,
        num(TEMPERATURE_ANCHOR.x),
        num(TEMPERATURE_ANCHOR.y),
        num(TEMPERATURE_FONT_SIZE),
        TEXT_COLOR.hex(),
        record.temperature_label()
    );

    let _ = write!(
        out,
        r#"<g class="condition-icon" data-condition="{}" data-glyph="{}">"#,
        record.condition,
        glyph_name(record.condition)
    );
    for shape in icon_shapes(record.condition) {
        write_shape(&mut out, &shape);
    }
    out.push_str("</g>");

    let outline = WIND_ARROW_OUTLINE
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{} {},{}", if i == 0 { "M" } else { "L" }, num(p.x), num(p.y)))
        .collect::<Vec<_>>()
        .join(" ");
    let _ = write!(
        out,
        r#"<g class="wind-arrow" transform="translate({}, {}) rotate({})"><path d="{} Z" fill="{color}" stroke="{color}" stroke-width="{}"/></g>"#,
        num(WIND_ANCHOR.x),
        num(WIND_ANCHOR.y),
        num(record.wind_direction_degrees as f32),
        outline,
        num(WIND_ARROW_STROKE_WIDTH),
        color = WIND_ARROW_COLOR.hex()
    );

    out.push_str("</svg>");
    out
}

fn write_shape(out: &mut String, shape: &Shape) {
    let _ = match shape {
        Shape::Circle {
            center,
            radius,
            paint: ShapePaint::Fill(color),
        } => write!(
            out,
            r#"<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
            num(center.x),
            num(center.y),
            num(*radius),
            color.hex()
        ),
        Shape::Circle {
            center,
            radius,
            paint: ShapePaint::Stroke { color, width },
        } => write!(
            out,
            r#"<circle cx="{}" cy="{}" r="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
            num(center.x),
            num(center.y),
            num(*radius),
            color.hex(),
            num(*width)
        ),
        Shape::Line {
            from,
            to,
            color,
            width,
        } => write!(
            out,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}" stroke-linecap="round"/>"#,
            num(from.x),
            num(from.y),
            num(to.x),
            num(to.y),
            color.hex(),
            num(*width)
        ),
        Shape::Polygon { points, color } => {
            let points = points
                .iter()
                .map(|p| format!("{},{}", num(p.x), num(p.y)))
                .collect::<Vec<_>>()
                .join(" ");
            write!(out, r#"<polygon points="{}" fill="{}"/>"#, points, color.hex())
        }
    };
}

/// Shortest decimal form with at most two fractional digits.
fn num(value: f32) -> String {
    let s = format!("{:.2}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}
