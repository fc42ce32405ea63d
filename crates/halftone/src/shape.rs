//! Shape primitives.
//!
//! Each primitive is drawn around a center point from a single scalar size.
//! Outlines are built in a local frame centered on the origin and placed with
//! a transform, so every variant is a flat arm of the [`draw_shape`] match.

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::color::Color;

/// Shape drawn in each grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShapeKind {
    /// Filled disc of radius `size`.
    #[default]
    Circle,
    /// Axis-aligned square of side `2 * size`.
    Square,
    /// Isosceles triangle, apex up; half-width and half-height `size`.
    Triangle,
    /// The square rotated by 45 degrees.
    Diamond,
    /// Five-point star, outer radius `size`, inner radius `size / 2`.
    Star,
    /// Heart silhouette filling a `2 * size` box.
    Heart,
    /// Regular hexagon with circumradius `size`, a vertex pointing right.
    Hexagon,
    /// Five stroked vertical bars of varying weight in a `2 * size` box.
    ParallelBars,
}

impl ShapeKind {
    /// Every shape, in menu order.
    pub const ALL: [ShapeKind; 8] = [
        ShapeKind::Circle,
        ShapeKind::Square,
        ShapeKind::Triangle,
        ShapeKind::Diamond,
        ShapeKind::Star,
        ShapeKind::Heart,
        ShapeKind::Hexagon,
        ShapeKind::ParallelBars,
    ];

    /// Canonical name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Square => "square",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Diamond => "diamond",
            ShapeKind::Star => "star",
            ShapeKind::Heart => "heart",
            ShapeKind::Hexagon => "hex",
            ShapeKind::ParallelBars => "parallel",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a shape name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseShapeError(pub String);

impl fmt::Display for ParseShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown shape {:?} (expected one of: ", self.0)?;
        for (i, kind) in ShapeKind::ALL.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(kind.name())?;
        }
        f.write_str(")")
    }
}

impl std::error::Error for ParseShapeError {}

impl FromStr for ShapeKind {
    type Err = ParseShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "circle" => Ok(ShapeKind::Circle),
            "square" => Ok(ShapeKind::Square),
            "triangle" => Ok(ShapeKind::Triangle),
            "diamond" => Ok(ShapeKind::Diamond),
            "star" => Ok(ShapeKind::Star),
            "heart" => Ok(ShapeKind::Heart),
            "hex" | "hexagon" => Ok(ShapeKind::Hexagon),
            "parallel" | "parallel-bars" => Ok(ShapeKind::ParallelBars),
            _ => Err(ParseShapeError(s.to_string())),
        }
    }
}

/// Draw `kind` centered at `center` with the given size.
///
/// Paints with `color` using anti-aliasing and source-over compositing.
/// Transparent colors and non-positive sizes draw nothing.
pub fn draw_shape(
    pixmap: &mut Pixmap,
    kind: ShapeKind,
    center: (f64, f64),
    size: f64,
    color: Color,
) {
    let Color::Rgb { r, g, b } = color else {
        return;
    };
    if !(size > 0.0) {
        return;
    }

    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, 255);
    paint.anti_alias = true;

    let s = size as f32;
    let at = Transform::from_translate(center.0 as f32, center.1 as f32);

    match kind {
        ShapeKind::Circle => fill(pixmap, PathBuilder::from_circle(0.0, 0.0, s), &paint, at),
        ShapeKind::Square => fill(pixmap, square(s), &paint, at),
        ShapeKind::Triangle => fill(pixmap, triangle(s), &paint, at),
        ShapeKind::Diamond => fill(
            pixmap,
            square(s),
            &paint,
            at.pre_concat(Transform::from_rotate(45.0)),
        ),
        ShapeKind::Star => fill(pixmap, star(5, s, s / 2.0), &paint, at),
        ShapeKind::Heart => {
            // Fit the 24x24 template box to 2 * size, centered
            let k = 2.0 * s / HEART_BOX;
            let half = HEART_BOX / 2.0;
            fill(
                pixmap,
                heart(),
                &paint,
                at.pre_scale(k, k).pre_translate(-half, -half),
            )
        }
        ShapeKind::Hexagon => fill(pixmap, hexagon(s), &paint, at),
        ShapeKind::ParallelBars => parallel_bars(pixmap, s, &paint, at),
    }
}

#[inline]
fn fill(pixmap: &mut Pixmap, path: Option<Path>, paint: &Paint, transform: Transform) {
    if let Some(path) = path {
        pixmap.fill_path(&path, paint, FillRule::Winding, transform, None);
    }
}

fn square(s: f32) -> Option<Path> {
    Rect::from_xywh(-s, -s, 2.0 * s, 2.0 * s).map(PathBuilder::from_rect)
}

fn triangle(s: f32) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(0.0, -s);
    pb.line_to(-s, s);
    pb.line_to(s, s);
    pb.close();
    pb.finish()
}

/// Alternating outer/inner vertices, starting straight up.
fn star(spikes: u32, outer: f32, inner: f32) -> Option<Path> {
    let step = PI / spikes as f32;
    let mut rot = PI / 2.0 * 3.0;

    let mut pb = PathBuilder::new();
    pb.move_to(0.0, -outer);
    for _ in 0..spikes {
        pb.line_to(rot.cos() * outer, rot.sin() * outer);
        rot += step;
        pb.line_to(rot.cos() * inner, rot.sin() * inner);
        rot += step;
    }
    pb.line_to(0.0, -outer);
    pb.close();
    pb.finish()
}

fn hexagon(s: f32) -> Option<Path> {
    let mut pb = PathBuilder::new();
    for i in 0..6 {
        let angle = PI / 3.0 * i as f32;
        let (x, y) = (s * angle.cos(), s * angle.sin());
        if i == 0 {
            pb.move_to(x, y);
        } else {
            pb.line_to(x, y);
        }
    }
    pb.close();
    pb.finish()
}

// ---------------------------------------------------------------------------
// Heart
// ---------------------------------------------------------------------------

/// Edge length of the square the heart template is drawn in.
const HEART_BOX: f32 = 24.0;

enum Segment {
    Line(f32, f32),
    Cubic(f32, f32, f32, f32, f32, f32),
}

const HEART_START: (f32, f32) = (12.0, 21.0);

/// Heart outline in absolute template coordinates: two lobes meeting in a
/// notch at (12, 9), tip at (12, 21).
const HEART_SEGMENTS: [Segment; 8] = [
    Segment::Cubic(12.0, 21.0, 5.3, 16.65, 2.8, 13.3),
    Segment::Cubic(1.0, 11.2, 1.2, 7.8, 3.5, 6.0),
    Segment::Cubic(5.3, 4.6, 7.9, 4.8, 9.5, 6.6),
    Segment::Line(12.0, 9.0),
    Segment::Line(14.5, 6.6),
    Segment::Cubic(16.1, 4.8, 18.7, 4.6, 20.5, 6.0),
    Segment::Cubic(22.8, 7.8, 23.0, 11.2, 21.2, 13.3),
    Segment::Cubic(18.7, 16.7, 12.0, 21.0, 12.0, 21.0),
];

fn heart() -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(HEART_START.0, HEART_START.1);
    for segment in &HEART_SEGMENTS {
        match *segment {
            Segment::Line(x, y) => pb.line_to(x, y),
            Segment::Cubic(x1, y1, x2, y2, x, y) => pb.cubic_to(x1, y1, x2, y2, x, y),
        }
    }
    pb.close();
    pb.finish()
}

// ---------------------------------------------------------------------------
// Parallel bars
// ---------------------------------------------------------------------------

/// Reference box the bar template is laid out in.
const BARS_BOX: (f32, f32) = (313.0, 278.0);

/// A vertical stroke in template units.
struct Bar {
    x: f32,
    width: f32,
    y1: f32,
    y2: f32,
}

const BARS: [Bar; 5] = [
    Bar { x: 19.8438, width: 39.6876, y1: 19.8438, y2: 257.969 },
    Bar { x: 139.095, width: 39.6876, y1: 19.8438, y2: 257.969 },
    Bar { x: 298.034, width: 29.7657, y1: 14.8828, y2: 262.93 },
    Bar { x: 220.554, width: 49.6095, y1: 24.8047, y2: 253.008 },
    Bar { x: 79.4644, width: 19.8438, y1: 9.92188, y2: 267.891 },
];

/// Stroke the bar template scaled into a `2 * s` box around the origin.
///
/// Stroke widths follow the horizontal scale only.
fn parallel_bars(pixmap: &mut Pixmap, s: f32, paint: &Paint, at: Transform) {
    let sx = 2.0 * s / BARS_BOX.0;
    let sy = 2.0 * s / BARS_BOX.1;
    let origin = at.pre_translate(-BARS_BOX.0 / 2.0 * sx, -BARS_BOX.1 / 2.0 * sy);

    for bar in &BARS {
        let mut pb = PathBuilder::new();
        pb.move_to(bar.x * sx, bar.y1 * sy);
        pb.line_to(bar.x * sx, bar.y2 * sy);
        let Some(path) = pb.finish() else {
            continue;
        };

        let stroke = Stroke {
            width: bar.width * sx,
            ..Default::default()
        };
        pixmap.stroke_path(&path, paint, &stroke, origin, None);
    }
}
