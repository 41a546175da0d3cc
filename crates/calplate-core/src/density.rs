//! Element-count bounding for pattern generators.
//!
//! Every generator asks [`DensityGuard`] how many elements it may emit before
//! it emits any. A request over the cap is not an error: the guard reduces the
//! density, records a [`Warning`] and generation carries on.

use std::fmt;
use std::sync::Mutex;

use log::warn;

use crate::geometry::SectionRect;
use crate::layout::SectionPosition;
use crate::patterns::PatternKind;
use crate::primitive::Primitive;

/// Default cap on primitives emitted by a single pattern.
pub const MAX_ELEMENTS_PER_PATTERN: usize = 10_000;

/// How a `cols` x `rows` grid turns into emitted elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridFill {
    /// One element per cell (dot arrays).
    EveryCell,
    /// One element per alternate cell (checkerboards).
    AlternateCells,
}

impl GridFill {
    pub fn element_count(self, cols: usize, rows: usize) -> usize {
        let cells = cols.saturating_mul(rows);
        match self {
            GridFill::EveryCell => cells,
            GridFill::AlternateCells => cells.div_ceil(2),
        }
    }

    /// Largest cell count whose element count stays within `cap`.
    fn cell_budget(self, cap: usize) -> usize {
        match self {
            GridFill::EveryCell => cap,
            GridFill::AlternateCells => cap.saturating_mul(2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDensity {
    pub cols: usize,
    pub rows: usize,
}

#[derive(Debug, Clone)]
pub struct DensityGuard {
    cap: usize,
}

impl Default for DensityGuard {
    fn default() -> Self {
        Self::new(MAX_ELEMENTS_PER_PATTERN)
    }
}

impl DensityGuard {
    pub fn new(cap: usize) -> Self {
        Self { cap: cap.max(1) }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Clamp a grid so that its element count stays within the cap.
    ///
    /// The reduced grid keeps the section's aspect ratio:
    /// `max_cols = floor(sqrt(budget * w / h))`, `max_rows = floor(budget / max_cols)`.
    pub fn clamp_grid(
        &self,
        kind: PatternKind,
        requested: GridDensity,
        fill: GridFill,
        section: &SectionRect,
        ctx: &GenerateContext<'_>,
    ) -> GridDensity {
        let elements = fill.element_count(requested.cols, requested.rows);
        if elements <= self.cap {
            return requested;
        }

        let budget = fill.cell_budget(self.cap);
        let aspect = section.width() / section.height();
        let max_cols = ((budget as f64 * aspect).sqrt().floor() as usize).clamp(1, budget);
        let max_rows = (budget / max_cols).max(1);

        let clamped = GridDensity {
            cols: requested.cols.min(max_cols),
            rows: requested.rows.min(max_rows),
        };
        ctx.warnings.record(Warning {
            section: ctx.section,
            kind,
            detail: WarningDetail::DensityClamped {
                requested: elements,
                clamped: fill.element_count(clamped.cols, clamped.rows),
                cap: self.cap,
            },
        });
        clamped
    }

    /// Clamp a 50% duty line pattern of `num_lines` positions, of which every
    /// second one is drawn. The cap applies to the drawn lines.
    pub fn clamp_alternate_lines(
        &self,
        kind: PatternKind,
        num_lines: usize,
        ctx: &GenerateContext<'_>,
    ) -> usize {
        let drawn = num_lines.div_ceil(2);
        if drawn <= self.cap {
            return num_lines;
        }

        let clamped = num_lines.min(self.cap.saturating_mul(2));
        ctx.warnings.record(Warning {
            section: ctx.section,
            kind,
            detail: WarningDetail::DensityClamped {
                requested: drawn,
                clamped: clamped.div_ceil(2),
                cap: self.cap,
            },
        });
        clamped
    }

    /// Split what is left of the cap after `reserved` fixed elements among
    /// cells that each want `demands[i]` elements.
    ///
    /// Cells are served smallest demand first with an equal share of the
    /// remainder, so budget a cell does not need passes on to the larger ones.
    pub fn share_budget(&self, demands: &[usize], reserved: usize) -> Vec<usize> {
        let mut budget = self.cap.saturating_sub(reserved);
        let mut order: Vec<usize> = (0..demands.len()).collect();
        order.sort_by_key(|&i| demands[i]);

        let mut shares = vec![0; demands.len()];
        for (served, &i) in order.iter().enumerate() {
            let share = demands[i].min(budget / (demands.len() - served));
            shares[i] = share;
            budget -= share;
        }
        shares
    }

    /// Final check on a finished pattern: truncate it to the cap, and record
    /// a warning when fewer than `requested` elements remain.
    pub fn enforce(
        &self,
        kind: PatternKind,
        requested: usize,
        primitives: &mut Vec<Primitive>,
        ctx: &GenerateContext<'_>,
    ) {
        primitives.truncate(self.cap);
        if primitives.len() < requested {
            ctx.warnings.record(Warning {
                section: ctx.section,
                kind,
                detail: WarningDetail::DensityClamped {
                    requested,
                    clamped: primitives.len(),
                    cap: self.cap,
                },
            });
        }
    }
}

/// Shared, read-only inputs for one generator run.
#[derive(Debug, Clone, Copy)]
pub struct GenerateContext<'a> {
    pub guard: &'a DensityGuard,
    pub warnings: &'a WarningLog,
    /// Which plate section is being generated, when known.
    pub section: Option<SectionPosition>,
}

impl<'a> GenerateContext<'a> {
    pub fn new(guard: &'a DensityGuard, warnings: &'a WarningLog) -> Self {
        Self {
            guard,
            warnings,
            section: None,
        }
    }

    pub fn for_section(self, section: SectionPosition) -> Self {
        Self {
            section: Some(section),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub section: Option<SectionPosition>,
    pub kind: PatternKind,
    pub detail: WarningDetail,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WarningDetail {
    /// The requested density would exceed the element cap.
    DensityClamped {
        requested: usize,
        clamped: usize,
        cap: usize,
    },
    /// An alignment marker larger than its section was shrunk to fit.
    MarkerShrunk { requested_mm: f64, fitted_mm: f64 },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(section) = self.section {
            write!(f, "{section} section: ")?;
        }
        match &self.detail {
            WarningDetail::DensityClamped {
                requested,
                clamped,
                cap,
            } => write!(
                f,
                "{} pattern would create {requested} elements (max: {cap}); reduced to {clamped}",
                self.kind.label()
            ),
            WarningDetail::MarkerShrunk {
                requested_mm,
                fitted_mm,
            } => write!(
                f,
                "{} marker of {requested_mm} mm does not fit; reduced to {fitted_mm} mm",
                self.kind.label()
            ),
        }
    }
}

/// Append-only warning record, safe to share between section workers.
#[derive(Debug, Default)]
pub struct WarningLog {
    entries: Mutex<Vec<Warning>>,
}

impl WarningLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, warning: Warning) {
        warn!("{warning}");
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(warning);
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Vec<Warning> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn into_inner(self) -> Vec<Warning> {
        self.entries
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
