use glam::DVec2;
use log::debug;

use super::{PatternGenerator, PatternKind};
use crate::config::DistortionParams;
use crate::density::{GenerateContext, GridDensity, GridFill};
use crate::geometry::{SectionRect, whole_steps};
use crate::primitive::{Color, GeneratedPattern, Primitive};

impl PatternGenerator for DistortionParams {
    fn kind(&self) -> PatternKind {
        PatternKind::Distortion
    }

    /// Checkerboard anchored at the section origin. Cells are stretched so the
    /// grid fills the section exactly; only cells with even `row + col` are
    /// emitted.
    fn generate(&self, section: &SectionRect, ctx: &GenerateContext<'_>) -> GeneratedPattern {
        let requested = GridDensity {
            cols: whole_steps(section.width(), self.grid_size).max(1),
            rows: whole_steps(section.height(), self.grid_size).max(1),
        };
        let GridDensity { cols, rows } =
            ctx.guard
                .clamp_grid(self.kind(), requested, GridFill::AlternateCells, section, ctx);

        let cell = section.size / DVec2::new(cols as f64, rows as f64);
        let mut primitives = Vec::with_capacity(GridFill::AlternateCells.element_count(cols, rows));
        for row in 0..rows {
            for col in (row % 2..cols).step_by(2) {
                let origin = section.origin + cell * DVec2::new(col as f64, row as f64);
                primitives.push(Primitive::filled_rect(origin, cell, Color::Black));
            }
        }

        debug!(
            "distortion: {cols}x{rows} grid, cell {:.4} x {:.4} mm, {} filled",
            cell.x,
            cell.y,
            primitives.len()
        );
        GeneratedPattern {
            kind: self.kind(),
            primitives,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::density::{DensityGuard, WarningLog};
    use crate::geometry::{ApproxEq, GEOMETRY_EPS};

    fn cells(pattern: &GeneratedPattern) -> Vec<SectionRect> {
        pattern.primitives.iter().map(Primitive::bounds).collect()
    }

    #[test]
    fn test_10mm_board_has_50_filled_cells() {
        let guard = DensityGuard::default();
        let log = WarningLog::new();
        let section = SectionRect::new(0.0, 0.0, 10.0, 10.0);
        let pattern = DistortionParams { grid_size: 1.0 }
            .generate(&section, &GenerateContext::new(&guard, &log));

        assert_eq!(pattern.len(), 50);
        assert_eq!(pattern.filled_count(), 50);
        assert!(log.is_empty());

        let cells = cells(&pattern);
        for (i, a) in cells.iter().enumerate() {
            assert!(a.size.approx_eq(&DVec2::ONE, GEOMETRY_EPS));
            assert!(section.contains_rect(a));
            for b in &cells[i + 1..] {
                assert!(!a.overlaps(b));
                // filled cells never share an edge, only a corner
                let d = (a.origin - b.origin).abs();
                let shares_edge = (d.x.approx_eq(&1.0, GEOMETRY_EPS)
                    && d.y.approx_eq(&0.0, GEOMETRY_EPS))
                    || (d.x.approx_eq(&0.0, GEOMETRY_EPS) && d.y.approx_eq(&1.0, GEOMETRY_EPS));
                assert!(!shares_edge, "{a:?} and {b:?} share an edge");
            }
        }
    }

    #[test]
    fn test_first_cell_is_anchored_at_origin() {
        let guard = DensityGuard::default();
        let log = WarningLog::new();
        let section = SectionRect::new(4.0, 6.0, 10.5, 7.0);
        let pattern = DistortionParams { grid_size: 2.0 }
            .generate(&section, &GenerateContext::new(&guard, &log));

        // 5 x 3 grid stretched to 2.1 x 2.333 mm cells
        let cells = cells(&pattern);
        assert_eq!(cells.len(), 8);
        assert_eq!(cells[0].origin, section.origin);
        assert!(cells[0].size.approx_eq(&DVec2::new(2.1, 7.0 / 3.0), 1e-12));
        let far = cells.iter().map(SectionRect::max).fold(DVec2::ZERO, DVec2::max);
        assert!(far.approx_eq(&section.max(), 1e-9));
    }

    #[test]
    fn test_fine_grid_is_clamped_on_filled_count() {
        let guard = DensityGuard::default();
        let log = WarningLog::new();
        let section = SectionRect::new(0.0, 0.0, 40.0, 40.0);
        let pattern = DistortionParams { grid_size: 0.1 }
            .generate(&section, &GenerateContext::new(&guard, &log));

        // 400 x 400 cells is 80000 filled; clamped to 141 x 141
        assert_eq!(pattern.len(), 9941);
        assert_eq!(log.len(), 1);
    }
}
