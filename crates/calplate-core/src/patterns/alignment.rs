use glam::DVec2;
use log::debug;

use super::{PatternGenerator, PatternKind};
use crate::config::{AlignmentParams, MarkerType};
use crate::density::{GenerateContext, Warning, WarningDetail};
use crate::geometry::SectionRect;
use crate::primitive::{Color, GeneratedPattern, Paint, Primitive};

const MARKER_STROKE: f64 = 0.1;
const TICK_STROKE: f64 = 0.05;
const MAJOR_TICK_HEIGHT: f64 = 0.2;
const MINOR_TICK_HEIGHT: f64 = 0.1;
/// Ticks are placed at tenths of the bar, so 11 in total.
const SCALE_DIVISIONS: usize = 10;
const MAJOR_TICK_EVERY: usize = 5;

impl PatternGenerator for AlignmentParams {
    fn kind(&self) -> PatternKind {
        PatternKind::Alignment
    }

    /// Single marker centered in the section. A marker that does not fit is
    /// shrunk to the section's smaller side.
    fn generate(&self, section: &SectionRect, ctx: &GenerateContext<'_>) -> GeneratedPattern {
        let fit = section.width().min(section.height());
        let size = if self.marker_size > fit {
            ctx.warnings.record(Warning {
                section: ctx.section,
                kind: self.kind(),
                detail: WarningDetail::MarkerShrunk {
                    requested_mm: self.marker_size,
                    fitted_mm: fit,
                },
            });
            fit
        } else {
            self.marker_size
        };

        let center = section.center();
        let mut primitives = match self.marker_type {
            MarkerType::Crosshair => crosshair(center, size),
            MarkerType::Fiducial => fiducial(center, size),
            MarkerType::ScaleBar => scale_bar(center, size),
        };
        let requested = primitives.len();
        ctx.guard
            .enforce(self.kind(), requested, &mut primitives, ctx);
        debug!("alignment: {:?} marker, {size} mm", self.marker_type);
        GeneratedPattern {
            kind: self.kind(),
            primitives,
        }
    }
}

fn crosshair(center: DVec2, size: f64) -> Vec<Primitive> {
    let half = size / 2.0;
    vec![
        Primitive::line(
            center - DVec2::new(half, 0.0),
            center + DVec2::new(half, 0.0),
            MARKER_STROKE,
        ),
        Primitive::line(
            center - DVec2::new(0.0, half),
            center + DVec2::new(0.0, half),
            MARKER_STROKE,
        ),
    ]
}

fn fiducial(center: DVec2, size: f64) -> Vec<Primitive> {
    vec![
        Primitive::Circle {
            center,
            radius: size / 2.0,
            paint: Paint::Outline {
                color: Color::Black,
                stroke_width: MARKER_STROKE,
            },
        },
        Primitive::filled_circle(center, size / 8.0),
    ]
}

/// Horizontal bar with ticks centred on it; every fifth tick is major.
fn scale_bar(center: DVec2, size: f64) -> Vec<Primitive> {
    let start = center - DVec2::new(size / 2.0, 0.0);
    let step = size / SCALE_DIVISIONS as f64;

    let mut primitives = Vec::with_capacity(SCALE_DIVISIONS + 2);
    primitives.push(Primitive::line(
        start,
        center + DVec2::new(size / 2.0, 0.0),
        MARKER_STROKE,
    ));
    for i in 0..=SCALE_DIVISIONS {
        let height = if i % MAJOR_TICK_EVERY == 0 {
            MAJOR_TICK_HEIGHT
        } else {
            MINOR_TICK_HEIGHT
        };
        let x = start + DVec2::new(i as f64 * step, 0.0);
        let half = DVec2::new(0.0, height / 2.0);
        primitives.push(Primitive::line(x - half, x + half, TICK_STROKE));
    }
    primitives
}
