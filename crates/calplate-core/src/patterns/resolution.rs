use glam::DVec2;
use log::debug;

use super::{PatternGenerator, PatternKind};
use crate::config::ResolutionParams;
use crate::density::{GenerateContext, GridDensity, GridFill};
use crate::geometry::{SectionRect, whole_steps};
use crate::primitive::{GeneratedPattern, Primitive};

/// Positions of `count` points spread edge to edge over `[start, start + span]`.
/// A single point sits at the midpoint.
fn exact_fit(start: f64, span: f64, count: usize) -> impl Iterator<Item = f64> {
    let pitch = if count > 1 {
        span / (count - 1) as f64
    } else {
        0.0
    };
    let first = if count > 1 { start } else { start + span / 2.0 };
    (0..count).map(move |i| first + i as f64 * pitch)
}

impl PatternGenerator for ResolutionParams {
    fn kind(&self) -> PatternKind {
        PatternKind::Resolution
    }

    /// Dot array spanning the section exactly, one filled circle per grid node.
    fn generate(&self, section: &SectionRect, ctx: &GenerateContext<'_>) -> GeneratedPattern {
        let requested = GridDensity {
            cols: whole_steps(section.width(), self.dot_spacing).max(1),
            rows: whole_steps(section.height(), self.dot_spacing).max(1),
        };
        let GridDensity { cols, rows } =
            ctx.guard
                .clamp_grid(self.kind(), requested, GridFill::EveryCell, section, ctx);

        let radius = self.dot_diameter / 2.0;
        let xs: Vec<f64> = exact_fit(section.origin.x, section.width(), cols).collect();
        let mut primitives = Vec::with_capacity(cols * rows);
        for y in exact_fit(section.origin.y, section.height(), rows) {
            for &x in &xs {
                primitives.push(Primitive::filled_circle(DVec2::new(x, y), radius));
            }
        }

        debug!(
            "resolution: {cols}x{rows} dots, pitch {:.4} x {:.4} mm",
            section.width() / (cols.max(2) - 1) as f64,
            section.height() / (rows.max(2) - 1) as f64
        );
        GeneratedPattern {
            kind: self.kind(),
            primitives,
        }
    }
}
