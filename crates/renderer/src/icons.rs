//! Condition glyphs built from layout primitives.

use tile_common::ConditionCode;

use crate::layout::{Point, Rgb, Shape, ShapePaint, ICON_CENTER};

const SUN: Rgb = Rgb(255, 193, 7);
const CLOUD: Rgb = Rgb(144, 164, 174);
const STORM_CLOUD: Rgb = Rgb(96, 125, 139);
const RAIN: Rgb = Rgb(33, 150, 243);
const SNOW: Rgb = Rgb(129, 212, 250);
const BOLT: Rgb = Rgb(255, 235, 59);
const FOG: Rgb = Rgb(158, 158, 158);
const UNKNOWN: Rgb = Rgb(117, 117, 117);

/// Name of the glyph drawn for a condition.
///
/// Mist, fog and haze share one glyph.
pub fn glyph_name(condition: ConditionCode) -> &'static str {
    match condition {
        ConditionCode::Clear => "sun",
        ConditionCode::Clouds => "cloud",
        ConditionCode::Rain => "rain",
        ConditionCode::Drizzle => "drizzle",
        ConditionCode::Thunderstorm => "storm",
        ConditionCode::Snow => "snow",
        ConditionCode::Mist | ConditionCode::Fog | ConditionCode::Haze => "fog",
        ConditionCode::Unknown => "unknown",
    }
}

/// Primitive shapes of the icon for `condition`, in paint order, positioned
/// around [`ICON_CENTER`].
pub fn icon_shapes(condition: ConditionCode) -> Vec<Shape> {
    match condition {
        ConditionCode::Clear => sun(),
        ConditionCode::Clouds => cloud(CLOUD, 1.0),
        ConditionCode::Rain => {
            let mut shapes = cloud(CLOUD, -3.0);
            shapes.extend([-3.0, 1.0, 5.0].iter().map(|&dx| Shape::Line {
                from: at(dx, 3.5),
                to: at(dx - 1.5, 8.0),
                color: RAIN,
                width: 1.5,
            }));
            shapes
        }
        ConditionCode::Drizzle => {
            let mut shapes = cloud(CLOUD, -3.0);
            shapes.extend(dots(&[(-3.0, 5.0), (1.0, 7.0), (5.0, 5.0)], 1.0, RAIN));
            shapes
        }
        ConditionCode::Thunderstorm => {
            let mut shapes = cloud(STORM_CLOUD, -3.0);
            shapes.push(Shape::Polygon {
                points: vec![
                    at(1.5, 1.0),
                    at(-2.0, 5.5),
                    at(0.5, 5.5),
                    at(-1.0, 9.5),
                    at(3.5, 4.0),
                    at(1.0, 4.0),
                ],
                color: BOLT,
            });
            shapes
        }
        ConditionCode::Snow => {
            let mut shapes = cloud(CLOUD, -3.0);
            shapes.extend(dots(&[(-3.0, 5.0), (1.0, 7.5), (5.0, 5.0)], 1.3, SNOW));
            shapes
        }
        ConditionCode::Mist | ConditionCode::Fog | ConditionCode::Haze => [-4.0, 0.0, 4.0]
            .iter()
            .map(|&dy| Shape::Line {
                from: at(-7.0, dy),
                to: at(7.0, dy),
                color: FOG,
                width: 2.0,
            })
            .collect(),
        ConditionCode::Unknown => vec![
            Shape::Circle {
                center: ICON_CENTER,
                radius: 6.0,
                paint: ShapePaint::Stroke {
                    color: UNKNOWN,
                    width: 1.5,
                },
            },
            Shape::Circle {
                center: ICON_CENTER,
                radius: 1.5,
                paint: ShapePaint::Fill(UNKNOWN),
            },
        ],
    }
}

fn at(dx: f32, dy: f32) -> Point {
    ICON_CENTER.offset(dx, dy)
}

fn sun() -> Vec<Shape> {
    let mut shapes = vec![Shape::Circle {
        center: ICON_CENTER,
        radius: 4.5,
        paint: ShapePaint::Fill(SUN),
    }];
    for i in 0..8 {
        let bearing = f64::from(i) * 45.0;
        let inner = Point::new(0.0, -6.5).rotated(bearing);
        let outer = Point::new(0.0, -9.0).rotated(bearing);
        shapes.push(Shape::Line {
            from: at(inner.x, inner.y),
            to: at(outer.x, outer.y),
            color: SUN,
            width: 1.5,
        });
    }
    shapes
}

/// Three puffs over a flat base, shifted vertically by `dy`.
fn cloud(color: Rgb, dy: f32) -> Vec<Shape> {
    let puff = |dx: f32, py: f32, radius: f32| Shape::Circle {
        center: at(dx, dy + py),
        radius,
        paint: ShapePaint::Fill(color),
    };
    vec![
        puff(-3.5, 1.0, 3.5),
        puff(1.0, -1.5, 4.5),
        puff(5.0, 1.5, 3.0),
        Shape::Polygon {
            points: vec![
                at(-3.5, dy + 1.0),
                at(5.0, dy + 1.0),
                at(5.0, dy + 4.5),
                at(-3.5, dy + 4.5),
            ],
            color,
        },
    ]
}

fn dots(offsets: &[(f32, f32)], radius: f32, color: Rgb) -> Vec<Shape> {
    offsets
        .iter()
        .map(|&(dx, dy)| Shape::Circle {
            center: at(dx, dy),
            radius,
            paint: ShapePaint::Fill(color),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ICON_EXTENT;

    #[test]
    fn test_every_condition_has_a_glyph() {
        for condition in ConditionCode::ALL {
            assert!(!icon_shapes(condition).is_empty(), "{:?}", condition);
        }
    }

    #[test]
    fn test_icons_stay_inside_icon_box() {
        for condition in ConditionCode::ALL {
            for shape in icon_shapes(condition) {
                let (min, max) = shape.bounds();
                assert!(min.x >= ICON_CENTER.x - ICON_EXTENT, "{:?}: {:?}", condition, shape);
                assert!(min.y >= ICON_CENTER.y - ICON_EXTENT, "{:?}: {:?}", condition, shape);
                assert!(max.x <= ICON_CENTER.x + ICON_EXTENT, "{:?}: {:?}", condition, shape);
                assert!(max.y <= ICON_CENTER.y + ICON_EXTENT, "{:?}: {:?}", condition, shape);
            }
        }
    }

    #[test]
    fn test_fog_family_shares_glyph() {
        let fog = icon_shapes(ConditionCode::Fog);
        assert_eq!(icon_shapes(ConditionCode::Mist), fog);
        assert_eq!(icon_shapes(ConditionCode::Haze), fog);
        assert_eq!(glyph_name(ConditionCode::Haze), "fog");
    }

    #[test]
    fn test_distinct_categories_have_distinct_glyphs() {
        let categories = [
            ConditionCode::Clear,
            ConditionCode::Clouds,
            ConditionCode::Rain,
            ConditionCode::Drizzle,
            ConditionCode::Thunderstorm,
            ConditionCode::Snow,
            ConditionCode::Fog,
            ConditionCode::Unknown,
        ];
        for (i, a) in categories.iter().enumerate() {
            for b in &categories[i + 1..] {
                assert_ne!(icon_shapes(*a), icon_shapes(*b), "{:?} vs {:?}", a, b);
                assert_ne!(glyph_name(*a), glyph_name(*b));
            }
        }
    }
}
