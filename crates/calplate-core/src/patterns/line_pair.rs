//! Line-pair resolution targets.
//!
//! Single mode fills the whole section with one frequency at 50% duty cycle.
//! Multi mode splits the section into a chart of cells, each carrying a bar
//! stack at its own spatial frequency.

use std::f64::consts::SQRT_2;

use glam::DVec2;
use log::debug;

use super::{PatternGenerator, PatternKind};
use crate::config::{ChartScheme, LinePairMode, LinePairParams, Orientation};
use crate::density::GenerateContext;
use crate::geometry::{GEOMETRY_EPS, SectionRect, whole_steps};
use crate::primitive::{Color, GeneratedPattern, Paint, Primitive};
use crate::units::um_to_mm;

/// Spatial frequencies of the 6x6 chart in line pairs per mm, row-major.
pub const LPMM_TABLE: [f64; 36] = [
    1.0, 2.0, 3.0, 4.0, 5.0, 6.0, //
    8.0, 10.0, 12.0, 16.0, 20.0, 24.0, //
    32.0, 40.0, 48.0, 56.0, 64.0, 72.0, //
    80.0, 88.0, 96.0, 104.0, 112.0, 120.0, //
    128.0, 136.0, 144.0, 152.0, 160.0, 168.0, //
    176.0, 184.0, 192.0, 200.0, 208.0, 216.0,
];

const LPMM_CHART_SIDE: usize = 6;
const TARGET_CHART_SIDE: usize = 3;

/// Fraction of a chart cell, along the scan axis, that bars may occupy.
const USABLE_FRACTION: f64 = 0.9;
/// Cell inset on every side.
const CELL_MARGIN_FRACTION: f64 = 0.05;
const MIN_LINE_PAIRS: usize = 5;
const CELL_BORDER_WIDTH: f64 = 0.02;
/// Bar thickness relative to pitch in the 3x3 target chart.
const TARGET_DUTY: f64 = 0.3;

/// Bar direction within a chart cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarAngle {
    /// Horizontal bars, stacked top to bottom.
    Deg0,
    Deg45,
    /// Vertical bars, stacked left to right.
    Deg90,
}

impl BarAngle {
    pub fn degrees(self) -> u16 {
        match self {
            BarAngle::Deg0 => 0,
            BarAngle::Deg45 => 45,
            BarAngle::Deg90 => 90,
        }
    }
}

/// One cell of the 3x3 target chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartTarget {
    pub spacing_um: f64,
    pub lines: usize,
    pub angle: BarAngle,
}

const fn target(spacing_um: f64, lines: usize, angle: BarAngle) -> ChartTarget {
    ChartTarget {
        spacing_um,
        lines,
        angle,
    }
}

/// Cells of the 3x3 target chart, row-major.
pub const TARGET_TABLE: [ChartTarget; 9] = [
    target(7.0, 3, BarAngle::Deg0),
    target(5.0, 5, BarAngle::Deg45),
    target(3.0, 7, BarAngle::Deg90),
    target(2.0, 10, BarAngle::Deg0),
    target(1.0, 15, BarAngle::Deg45),
    target(0.7, 20, BarAngle::Deg90),
    target(0.5, 12, BarAngle::Deg0),
    target(0.3, 8, BarAngle::Deg45),
    target(0.25, 6, BarAngle::Deg90),
];

/// Axis along which bars are stacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanAxis {
    X,
    Y,
}

impl ScanAxis {
    fn extent(self, rect: &SectionRect) -> f64 {
        match self {
            ScanAxis::X => rect.width(),
            ScanAxis::Y => rect.height(),
        }
    }

    /// Full-length bar crossing `area` at `offset` along the scan axis.
    fn bar(self, area: &SectionRect, offset: f64, thickness: f64) -> (DVec2, DVec2) {
        match self {
            ScanAxis::X => (
                area.origin + DVec2::new(offset, 0.0),
                DVec2::new(thickness, area.height()),
            ),
            ScanAxis::Y => (
                area.origin + DVec2::new(0.0, offset),
                DVec2::new(area.width(), thickness),
            ),
        }
    }
}

impl From<Orientation> for ScanAxis {
    fn from(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Vertical => ScanAxis::X,
            Orientation::Horizontal => ScanAxis::Y,
        }
    }
}

/// Line positions for single-frequency mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingleFrequencyLayout {
    /// Line positions after clamping; every second one is drawn.
    pub num_lines: usize,
    pub drawn: usize,
    /// Exact-fit distance between adjacent line positions.
    pub pitch: f64,
    pub thickness: f64,
    /// Offset of the first drawn line from the section edge.
    pub start: f64,
}

impl SingleFrequencyLayout {
    pub fn new(params: &LinePairParams, span: f64, ctx: &GenerateContext<'_>) -> Self {
        let spacing = um_to_mm(params.line_spacing_um);
        let thickness = um_to_mm(params.line_width_um).min(span);
        let requested = whole_steps(span, spacing).max(1);
        let num_lines = ctx
            .guard
            .clamp_alternate_lines(PatternKind::LinePair, requested, ctx);
        let drawn = num_lines.div_ceil(2);

        let pitch = if num_lines > 1 {
            (span - thickness) / (num_lines - 1) as f64
        } else {
            0.0
        };
        let extent = 2.0 * pitch * (drawn - 1) as f64 + thickness;
        Self {
            num_lines,
            drawn,
            pitch,
            thickness,
            start: (span - extent) / 2.0,
        }
    }

    /// Offset of drawn line `i` from the section edge.
    pub fn offset(&self, i: usize) -> f64 {
        self.start + 2.0 * self.pitch * i as f64
    }
}

/// Bar stack for one cell of the lp/mm chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartBars {
    /// Half period in mm.
    pub spacing: f64,
    pub n_pairs: usize,
    pub n_lines: usize,
    pub thickness: f64,
}

impl ChartBars {
    pub fn for_lpmm(lpmm: f64, usable_span: f64) -> Self {
        let spacing = 1.0 / (2.0 * lpmm);
        let n_pairs = whole_steps(usable_span, 2.0 * spacing).max(MIN_LINE_PAIRS);
        Self {
            spacing,
            n_pairs,
            n_lines: 2 * n_pairs,
            thickness: 0.5 * spacing,
        }
    }
}

impl PatternGenerator for LinePairParams {
    fn kind(&self) -> PatternKind {
        PatternKind::LinePair
    }

    fn generate(&self, section: &SectionRect, ctx: &GenerateContext<'_>) -> GeneratedPattern {
        let primitives = match (self.mode, self.scheme) {
            (LinePairMode::Single, _) => self.single_frequency(section, ctx),
            (LinePairMode::Multi, ChartScheme::Lpmm6x6) => lpmm_chart(section, ctx),
            (LinePairMode::Multi, ChartScheme::Targets3x3) => target_chart(section, ctx),
        };
        GeneratedPattern {
            kind: self.kind(),
            primitives,
        }
    }
}

impl LinePairParams {
    fn single_frequency(&self, section: &SectionRect, ctx: &GenerateContext<'_>) -> Vec<Primitive> {
        let axis = ScanAxis::from(self.orientation);
        let layout = SingleFrequencyLayout::new(self, axis.extent(section), ctx);
        debug!(
            "line-pair: {} of {} lines drawn, pitch {:.6} mm",
            layout.drawn, layout.num_lines, layout.pitch
        );

        (0..layout.drawn)
            .map(|i| {
                let (origin, size) = axis.bar(section, layout.offset(i), layout.thickness);
                Primitive::filled_rect(origin, size, Color::Black)
            })
            .collect()
    }
}

fn cell_border(cell: &SectionRect) -> Primitive {
    Primitive::outline_rect(cell, Color::LightGray, CELL_BORDER_WIDTH)
}

/// Alternating dark and light bars: even indices are filled.
fn chart_bar(index: usize, origin: DVec2, size: DVec2) -> Primitive {
    if index % 2 == 0 {
        Primitive::filled_rect(origin, size, Color::Black)
    } else {
        Primitive::Rect {
            origin,
            size,
            paint: Paint::Outline {
                color: Color::White,
                stroke_width: 0.0,
            },
        }
    }
}

/// One cell of the lp/mm chart, with the bars that fit its pattern area.
struct ChartCell {
    border: Primitive,
    axis: ScanAxis,
    area: SectionRect,
    bars: ChartBars,
    fitting: usize,
}

impl ChartCell {
    fn new(index: usize, cell: &SectionRect, lpmm: f64) -> Self {
        // 0 degrees on even cells, 90 on odd
        let axis = if index % 2 == 0 {
            ScanAxis::Y
        } else {
            ScanAxis::X
        };
        let area = cell.inset_fraction(CELL_MARGIN_FRACTION);
        let extent = axis.extent(&area);
        let bars = ChartBars::for_lpmm(lpmm, USABLE_FRACTION * axis.extent(cell));
        // bars whose far edge would leave the pattern area are not drawn
        let fitting = (0..bars.n_lines)
            .take_while(|&i| i as f64 * bars.spacing + bars.thickness <= extent + GEOMETRY_EPS)
            .count();
        Self {
            border: cell_border(cell),
            axis,
            area,
            bars,
            fitting,
        }
    }

    fn push(&self, drawn: usize, out: &mut Vec<Primitive>) {
        out.push(self.border.clone());
        for i in 0..drawn {
            let (origin, size) =
                self.axis
                    .bar(&self.area, i as f64 * self.bars.spacing, self.bars.thickness);
            out.push(chart_bar(i, origin, size));
        }
    }
}

fn lpmm_chart(section: &SectionRect, ctx: &GenerateContext<'_>) -> Vec<Primitive> {
    let cells: Vec<ChartCell> = section
        .grid(LPMM_CHART_SIDE, LPMM_CHART_SIDE)
        .iter()
        .zip(LPMM_TABLE)
        .enumerate()
        .map(|(index, (cell, lpmm))| ChartCell::new(index, cell, lpmm))
        .collect();

    let demands: Vec<usize> = cells.iter().map(|c| c.fitting).collect();
    let shares = ctx.guard.share_budget(&demands, cells.len());
    let requested = cells.len() + demands.iter().sum::<usize>();

    let mut primitives = Vec::with_capacity(requested.min(ctx.guard.cap()));
    for (cell, &drawn) in cells.iter().zip(&shares) {
        cell.push(drawn, &mut primitives);
    }
    ctx.guard
        .enforce(PatternKind::LinePair, requested, &mut primitives, ctx);

    debug!(
        "line-pair: {}x{} lp/mm chart, {} elements",
        LPMM_CHART_SIDE,
        LPMM_CHART_SIDE,
        primitives.len()
    );
    primitives
}

fn target_chart(section: &SectionRect, ctx: &GenerateContext<'_>) -> Vec<Primitive> {
    let cells = section.grid(TARGET_CHART_SIDE, TARGET_CHART_SIDE);
    let mut primitives = Vec::new();
    for (cell, target) in cells.iter().zip(TARGET_TABLE.iter()) {
        primitives.push(cell_border(cell));
        let margin = CELL_MARGIN_FRACTION * cell.width().min(cell.height());
        target.push_bars(&cell.inset(margin), &mut primitives);
    }
    let requested = primitives.len();
    ctx.guard
        .enforce(PatternKind::LinePair, requested, &mut primitives, ctx);
    debug!("line-pair: 3x3 target chart, {} elements", primitives.len());
    primitives
}

impl ChartTarget {
    fn push_bars(&self, area: &SectionRect, out: &mut Vec<Primitive>) {
        let spacing = um_to_mm(self.spacing_um);
        let thickness = TARGET_DUTY * spacing;
        let stack = self.lines.saturating_sub(1) as f64 * spacing + thickness;

        let axis = match self.angle {
            BarAngle::Deg0 => ScanAxis::Y,
            BarAngle::Deg90 => ScanAxis::X,
            BarAngle::Deg45 => {
                self.push_diagonal_bars(area, spacing, thickness, stack, out);
                return;
            }
        };
        let extent = axis.extent(area);
        let start = (extent - stack) / 2.0;
        for k in 0..self.lines {
            let offset = start + k as f64 * spacing;
            if offset < -GEOMETRY_EPS || offset + thickness > extent + GEOMETRY_EPS {
                continue;
            }
            let (origin, size) = axis.bar(area, offset, thickness);
            out.push(Primitive::filled_rect(origin, size, Color::Black));
        }
    }

    /// 45 degree bars as rotated rectangles around the area center. Bar length
    /// is chosen so every corner stays inside the largest centered square.
    fn push_diagonal_bars(
        &self,
        area: &SectionRect,
        spacing: f64,
        thickness: f64,
        stack: f64,
        out: &mut Vec<Primitive>,
    ) {
        let half_side = area.width().min(area.height()) / 2.0;
        let max_offset = (stack - thickness) / 2.0;
        let length =
            (2.0 * half_side).min(2.0 * SQRT_2 * half_side - 2.0 * max_offset - thickness);
        if length <= 0.0 {
            return;
        }

        let along = DVec2::new(1.0, -1.0) / SQRT_2;
        let across = DVec2::new(1.0, 1.0) / SQRT_2;
        let center = area.center();
        let (a, t) = (along * (length / 2.0), across * (thickness / 2.0));
        for k in 0..self.lines {
            let mid = center + across * (k as f64 * spacing - max_offset);
            out.push(Primitive::polygon(
                vec![mid - a - t, mid + a - t, mid + a + t, mid - a + t],
                Color::Black,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::density::{DensityGuard, WarningDetail, WarningLog};
    use crate::geometry::ApproxEq;

    fn single(spacing_um: f64, width_um: f64, orientation: Orientation) -> LinePairParams {
        LinePairParams {
            mode: LinePairMode::Single,
            line_spacing_um: spacing_um,
            line_width_um: width_um,
            orientation,
            ..LinePairParams::default()
        }
    }

    #[test]
    fn test_single_mode_5um_on_2mm() {
        let guard = DensityGuard::default();
        let log = WarningLog::new();
        let ctx = GenerateContext::new(&guard, &log);
        let section = SectionRect::new(0.0, 0.0, 2.0, 2.0);
        let params = single(5.0, 1.0, Orientation::Vertical);

        let layout = SingleFrequencyLayout::new(&params, section.width(), &ctx);
        assert_eq!(layout.num_lines, 400);
        assert_eq!(layout.drawn, 200);

        let pattern = params.generate(&section, &ctx);
        assert_eq!(pattern.len(), 200);
        assert!(log.is_empty());

        let bars: Vec<SectionRect> = pattern.primitives.iter().map(Primitive::bounds).collect();
        for bar in &bars {
            assert!(bar.width().approx_eq(&0.001, 1e-12));
            assert!(bar.height().approx_eq(&2.0, 1e-12));
            assert!(section.contains_rect(bar));
        }
        // evenly spaced and never touching
        let step = bars[1].origin.x - bars[0].origin.x;
        assert!(step > 0.001);
        for pair in bars.windows(2) {
            assert!((pair[1].origin.x - pair[0].origin.x).approx_eq(&step, 1e-12));
            assert!(!pair[0].overlaps(&pair[1]));
        }
        // centered: equal gaps at both ends
        let left = bars[0].origin.x - section.origin.x;
        let right = section.max().x - bars[199].max().x;
        assert!(left.approx_eq(&right, 1e-12));
    }

    #[test]
    fn test_single_mode_horizontal_spans_width() {
        let guard = DensityGuard::default();
        let log = WarningLog::new();
        let section = SectionRect::new(10.0, 20.0, 4.0, 1.0);
        let pattern = single(100.0, 20.0, Orientation::Horizontal)
            .generate(&section, &GenerateContext::new(&guard, &log));

        // 10 positions over 1 mm, 5 drawn
        assert_eq!(pattern.len(), 5);
        for p in &pattern.primitives {
            let bar = p.bounds();
            assert!(bar.width().approx_eq(&4.0, 1e-12));
            assert!(bar.height().approx_eq(&0.02, 1e-12));
            assert!(section.contains_rect(&bar));
        }
    }

    #[test]
    fn test_single_line_is_centered() {
        let guard = DensityGuard::default();
        let log = WarningLog::new();
        let section = SectionRect::new(0.0, 0.0, 0.004, 1.0);
        let pattern = single(5.0, 1.0, Orientation::Vertical)
            .generate(&section, &GenerateContext::new(&guard, &log));
        assert_eq!(pattern.len(), 1);
        let bar = pattern.primitives[0].bounds();
        assert!(bar.center().x.approx_eq(&section.center().x, 1e-12));
    }

    #[test]
    fn test_single_mode_drawn_lines_are_capped() {
        let guard = DensityGuard::default();
        let log = WarningLog::new();
        let section = SectionRect::new(0.0, 0.0, 40.0, 40.0);
        let pattern = single(1.0, 0.3, Orientation::Vertical)
            .generate(&section, &GenerateContext::new(&guard, &log));
        assert_eq!(pattern.len(), 10_000);
        assert_eq!(log.len(), 1);
        for p in &pattern.primitives {
            assert!(section.contains_rect(&p.bounds()));
        }
    }

    #[test]
    fn test_chart_bars_at_1_lpmm() {
        let bars = ChartBars::for_lpmm(1.0, 0.9 * 10.0);
        assert_eq!(bars.spacing, 0.5);
        assert_eq!(bars.n_pairs, 9);
        assert_eq!(bars.n_lines, 18);
        assert_eq!(bars.thickness, 0.25);
    }

    #[test]
    fn test_chart_bars_minimum_pairs() {
        // floor(4.5 / 1.0) = 4 pairs fit, raised to 5
        let bars = ChartBars::for_lpmm(1.0, 0.9 * 5.0);
        assert_eq!(bars.n_pairs, 5);
        assert_eq!(bars.n_lines, 10);

        assert_eq!(ChartBars::for_lpmm(100.0, 0.9).n_pairs, 90);
    }

    #[test]
    fn test_lpmm_table_is_increasing() {
        assert!(LPMM_TABLE.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_lpmm_chart_layout() {
        let guard = DensityGuard::default();
        let log = WarningLog::new();
        let ctx = GenerateContext::new(&guard, &log);
        // 60 mm section: 10 mm cells, 9 mm usable
        let section = SectionRect::new(0.0, 0.0, 60.0, 60.0);
        let pattern = LinePairParams::default().generate(&section, &ctx);

        assert!(pattern.len() <= guard.cap());
        assert_eq!(log.len(), 1);

        // first cell: border then 18 horizontal bars at 1 lp/mm
        let first = &pattern.primitives[..19];
        assert_eq!(
            first[0],
            Primitive::outline_rect(
                &SectionRect::new(0.0, 0.0, 10.0, 10.0),
                Color::LightGray,
                0.02
            )
        );
        for (i, p) in first[1..].iter().enumerate() {
            let bar = p.bounds();
            assert!(bar.origin.approx_eq(&DVec2::new(0.5, 0.5 + 0.5 * i as f64), 1e-12));
            assert!(bar.size.approx_eq(&DVec2::new(9.0, 0.25), 1e-12));
            assert_eq!(p.is_filled(), i % 2 == 0);
        }

        // second cell is rotated: vertical bars inside x = 10.5..19.5
        let Primitive::Rect { origin, size, .. } = &pattern.primitives[20] else {
            panic!("expected rect");
        };
        assert!(origin.approx_eq(&DVec2::new(10.5, 0.5), 1e-12));
        assert!(size.approx_eq(&DVec2::new(0.125, 9.0), 1e-12));

        // coarse cells are drawn in full and pass their unused share on to
        // the finest stack
        assert_eq!(pattern.len(), 10_000);
        let last_border = pattern
            .primitives
            .iter()
            .rposition(|p| p.color() == Color::LightGray)
            .unwrap();
        assert_eq!(pattern.len() - last_border - 1, 337);
    }

    #[test]
    fn test_lpmm_chart_below_border_count() {
        let guard = DensityGuard::new(30);
        let log = WarningLog::new();
        let ctx = GenerateContext::new(&guard, &log);
        let section = SectionRect::new(0.0, 0.0, 60.0, 60.0);
        let pattern = LinePairParams::default().generate(&section, &ctx);

        assert_eq!(pattern.len(), 30);
        let warnings = log.into_inner();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings[0].detail,
            WarningDetail::DensityClamped {
                clamped: 30,
                cap: 30,
                ..
            }
        ));
    }

    #[test]
    fn test_lpmm_chart_truncates_overflowing_bars() {
        let guard = DensityGuard::default();
        let log = WarningLog::new();
        let ctx = GenerateContext::new(&guard, &log);
        // 30 mm section: 5 mm cells. The 1 lp/mm cell asks for 10 bars but
        // only 9 fit in the 4.5 mm pattern area.
        let section = SectionRect::new(0.0, 0.0, 30.0, 30.0);
        let pattern = LinePairParams::default().generate(&section, &ctx);
        let is_border = |p: &Primitive| {
            !p.is_filled() && p.color() == Color::LightGray
        };
        let second_border = pattern.primitives[1..]
            .iter()
            .position(is_border)
            .map(|i| i + 1);
        assert_eq!(second_border, Some(10));
        for p in &pattern.primitives {
            assert!(section.contains_rect(&p.bounds()));
        }
    }

    #[test]
    fn test_target_chart() {
        let guard = DensityGuard::default();
        let log = WarningLog::new();
        let ctx = GenerateContext::new(&guard, &log);
        let section = SectionRect::new(0.0, 0.0, 3.0, 3.0);
        let params = LinePairParams {
            scheme: ChartScheme::Targets3x3,
            ..LinePairParams::default()
        };
        let pattern = params.generate(&section, &ctx);

        let bars: usize = TARGET_TABLE.iter().map(|t| t.lines).sum();
        assert_eq!(pattern.len(), 9 + bars);
        assert!(log.is_empty());

        let polygons = pattern
            .primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Polyline { .. }))
            .count();
        assert_eq!(polygons, 5 + 15 + 8);

        let cells = section.grid(3, 3);
        for p in &pattern.primitives {
            let bounds = p.bounds();
            assert!(
                cells.iter().any(|c| c.contains_rect(&bounds)),
                "{p:?} crosses a cell boundary"
            );
        }
    }

    #[test]
    fn test_target_chart_respects_cap() {
        let guard = DensityGuard::new(50);
        let log = WarningLog::new();
        let ctx = GenerateContext::new(&guard, &log);
        let params = LinePairParams {
            scheme: ChartScheme::Targets3x3,
            ..LinePairParams::default()
        };
        let pattern = params.generate(&SectionRect::new(0.0, 0.0, 3.0, 3.0), &ctx);

        assert_eq!(pattern.len(), 50);
        let warnings = log.into_inner();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings[0].detail,
            WarningDetail::DensityClamped {
                requested: 95,
                clamped: 50,
                cap: 50
            }
        ));
    }

    #[test]
    fn test_orientation_degrees() {
        assert_eq!(
            TARGET_TABLE.map(|t| t.angle.degrees()),
            [0, 45, 90, 0, 45, 90, 0, 45, 90]
        );
    }
}
