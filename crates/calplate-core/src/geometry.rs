use glam::DVec2;

/// Tolerance for containment and equality checks on mm coordinates.
pub const GEOMETRY_EPS: f64 = 1e-9;

/// Relative slack applied before flooring a quotient, so that `0.3 / 0.1`
/// counts as 3 steps rather than 2.
const FLOOR_SLACK: f64 = 1e-9;

/// Trait for approximate equality with tolerance
pub trait ApproxEq<Rhs = Self> {
    fn approx_eq(&self, other: &Rhs, eps: f64) -> bool;
}

impl ApproxEq for f64 {
    fn approx_eq(&self, other: &f64, eps: f64) -> bool {
        (self - other).abs() <= eps
    }
}

impl ApproxEq for DVec2 {
    fn approx_eq(&self, other: &DVec2, eps: f64) -> bool {
        self.x.approx_eq(&other.x, eps) && self.y.approx_eq(&other.y, eps)
    }
}

/// Number of whole `step`s that fit in `span`.
///
/// Returns 0 for non-finite or non-positive inputs.
pub fn whole_steps(span: f64, step: f64) -> usize {
    if !(span > 0.0 && step > 0.0) {
        return 0;
    }
    let q = span / step;
    if !q.is_finite() {
        return 0;
    }
    (q + q.max(1.0) * FLOOR_SLACK).floor() as usize
}

/// Axis-aligned rectangle in plate coordinates (mm, y growing downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionRect {
    pub origin: DVec2,
    pub size: DVec2,
}

impl SectionRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: DVec2::new(x, y),
            size: DVec2::new(width, height),
        }
    }

    pub fn width(&self) -> f64 {
        self.size.x
    }

    pub fn height(&self) -> f64 {
        self.size.y
    }

    pub fn min(&self) -> DVec2 {
        self.origin
    }

    pub fn max(&self) -> DVec2 {
        self.origin + self.size
    }

    pub fn center(&self) -> DVec2 {
        self.origin + self.size * 0.5
    }

    pub fn area(&self) -> f64 {
        self.size.x * self.size.y
    }

    /// Clockwise corner ring starting at the origin corner.
    pub fn corners(&self) -> [DVec2; 4] {
        let min = self.min();
        let max = self.max();
        [
            min,
            DVec2::new(max.x, min.y),
            max,
            DVec2::new(min.x, max.y),
        ]
    }

    /// Rectangle shrunk by `fraction` of its own size on every side.
    pub fn inset_fraction(&self, fraction: f64) -> Self {
        Self {
            origin: self.origin + self.size * fraction,
            size: self.size * (1.0 - 2.0 * fraction),
        }
    }

    /// Rectangle shrunk by an absolute distance on every side.
    pub fn inset(&self, distance: f64) -> Self {
        Self {
            origin: self.origin + DVec2::splat(distance),
            size: self.size - DVec2::splat(2.0 * distance),
        }
    }

    /// Split into a `cols` x `rows` grid, returned row-major from the origin.
    pub fn grid(&self, cols: usize, rows: usize) -> Vec<SectionRect> {
        let cell = self.size / DVec2::new(cols as f64, rows as f64);
        let mut cells = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(SectionRect {
                    origin: self.origin + cell * DVec2::new(col as f64, row as f64),
                    size: cell,
                });
            }
        }
        cells
    }

    pub fn contains(&self, p: DVec2) -> bool {
        let min = self.min() - DVec2::splat(GEOMETRY_EPS);
        let max = self.max() + DVec2::splat(GEOMETRY_EPS);
        p.x >= min.x && p.y >= min.y && p.x <= max.x && p.y <= max.y
    }

    pub fn contains_rect(&self, other: &SectionRect) -> bool {
        self.contains(other.min()) && self.contains(other.max())
    }

    /// True when the interiors overlap; rectangles that only share an edge
    /// do not intersect.
    pub fn overlaps(&self, other: &SectionRect) -> bool {
        let a_min = self.min();
        let a_max = self.max();
        let b_min = other.min();
        let b_max = other.max();
        a_min.x < b_max.x - GEOMETRY_EPS
            && b_min.x < a_max.x - GEOMETRY_EPS
            && a_min.y < b_max.y - GEOMETRY_EPS
            && b_min.y < a_max.y - GEOMETRY_EPS
    }
}
