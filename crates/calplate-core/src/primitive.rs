//! The canonical shape set every pattern generator emits and every sink consumes.
//!
//! Colors and fill modes are presentational intent only; nothing about the
//! physical reticle depends on them beyond "dark" versus "light".

use glam::DVec2;

use crate::geometry::SectionRect;
use crate::patterns::PatternKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
    Gray,
    LightGray,
}

impl Color {
    pub fn name(self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::White => "white",
            Color::Gray => "gray",
            Color::LightGray => "lightgray",
        }
    }

    pub fn rgb(self) -> u32 {
        match self {
            Color::Black => 0x000000,
            Color::White => 0xFFFFFF,
            Color::Gray => 0x808080,
            Color::LightGray => 0xD3D3D3,
        }
    }
}

/// How a closed shape is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Fill(Color),
    Outline { color: Color, stroke_width: f64 },
}

impl Paint {
    pub fn color(&self) -> Color {
        match *self {
            Paint::Fill(color) | Paint::Outline { color, .. } => color,
        }
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Paint::Fill(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Circle {
        center: DVec2,
        radius: f64,
        paint: Paint,
    },
    Rect {
        origin: DVec2,
        size: DVec2,
        paint: Paint,
    },
    Line {
        start: DVec2,
        end: DVec2,
        stroke_width: f64,
        color: Color,
    },
    Polyline {
        points: Vec<DVec2>,
        closed: bool,
        paint: Paint,
    },
}

impl Primitive {
    pub fn filled_circle(center: DVec2, radius: f64) -> Self {
        Primitive::Circle {
            center,
            radius,
            paint: Paint::Fill(Color::Black),
        }
    }

    pub fn filled_rect(origin: DVec2, size: DVec2, color: Color) -> Self {
        Primitive::Rect {
            origin,
            size,
            paint: Paint::Fill(color),
        }
    }

    pub fn outline_rect(rect: &SectionRect, color: Color, stroke_width: f64) -> Self {
        Primitive::Rect {
            origin: rect.origin,
            size: rect.size,
            paint: Paint::Outline {
                color,
                stroke_width,
            },
        }
    }

    pub fn line(start: DVec2, end: DVec2, stroke_width: f64) -> Self {
        Primitive::Line {
            start,
            end,
            stroke_width,
            color: Color::Black,
        }
    }

    /// Closed, filled polygon.
    pub fn polygon(points: Vec<DVec2>, color: Color) -> Self {
        Primitive::Polyline {
            points,
            closed: true,
            paint: Paint::Fill(color),
        }
    }

    pub fn is_filled(&self) -> bool {
        match self {
            Primitive::Circle { paint, .. }
            | Primitive::Rect { paint, .. }
            | Primitive::Polyline { paint, .. } => paint.is_filled(),
            Primitive::Line { .. } => false,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Primitive::Circle { paint, .. }
            | Primitive::Rect { paint, .. }
            | Primitive::Polyline { paint, .. } => paint.color(),
            Primitive::Line { color, .. } => *color,
        }
    }

    /// Axis-aligned bounds of the geometry, ignoring stroke width.
    pub fn bounds(&self) -> SectionRect {
        let (min, max) = match self {
            Primitive::Circle { center, radius, .. } => {
                let r = DVec2::splat(*radius);
                (*center - r, *center + r)
            }
            Primitive::Rect { origin, size, .. } => (*origin, *origin + *size),
            Primitive::Line { start, end, .. } => (start.min(*end), start.max(*end)),
            Primitive::Polyline { points, .. } => points.iter().fold(
                (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY)),
                |(lo, hi), p| (lo.min(*p), hi.max(*p)),
            ),
        };
        SectionRect {
            origin: min,
            size: max - min,
        }
    }

    /// The point(s) that define the primitive's placement: circle centers,
    /// rect corners, line endpoints and polyline vertices.
    pub fn anchor_points(&self) -> Vec<DVec2> {
        match self {
            Primitive::Circle { center, .. } => vec![*center],
            Primitive::Rect { origin, size, .. } => vec![*origin, *origin + *size],
            Primitive::Line { start, end, .. } => vec![*start, *end],
            Primitive::Polyline { points, .. } => points.clone(),
        }
    }
}

/// Ordered output of one pattern generator run.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPattern {
    pub kind: PatternKind,
    pub primitives: Vec<Primitive>,
}

impl GeneratedPattern {
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn filled_count(&self) -> usize {
        self.primitives.iter().filter(|p| p.is_filled()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_of_each_shape() {
        let c = Primitive::filled_circle(DVec2::new(1.0, 2.0), 0.5);
        assert_eq!(c.bounds(), SectionRect::new(0.5, 1.5, 1.0, 1.0));

        let l = Primitive::line(DVec2::new(3.0, 1.0), DVec2::new(1.0, 1.0), 0.1);
        assert_eq!(l.bounds(), SectionRect::new(1.0, 1.0, 2.0, 0.0));

        let p = Primitive::polygon(
            vec![
                DVec2::new(0.0, 1.0),
                DVec2::new(1.0, 0.0),
                DVec2::new(2.0, 1.0),
            ],
            Color::Black,
        );
        assert_eq!(p.bounds(), SectionRect::new(0.0, 0.0, 2.0, 1.0));
    }

    #[test]
    fn test_fill_intent() {
        let rect = SectionRect::new(0.0, 0.0, 1.0, 1.0);
        assert!(!Primitive::outline_rect(&rect, Color::Gray, 0.05).is_filled());
        assert!(Primitive::filled_rect(rect.origin, rect.size, Color::White).is_filled());
        assert!(!Primitive::line(DVec2::ZERO, DVec2::ONE, 0.1).is_filled());
        assert_eq!(
            Primitive::outline_rect(&rect, Color::Gray, 0.05).color(),
            Color::Gray
        );
    }
}
