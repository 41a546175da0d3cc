//! Pattern generators.
//!
//! Each generator is a pure function of a section rectangle and its
//! parameters. The only shared input is the [`GenerateContext`], which carries
//! the element cap and the append-only warning log.

mod alignment;
mod distortion;
mod line_pair;
mod resolution;

use serde::Serialize;

use crate::config::PatternParams;
use crate::density::GenerateContext;
use crate::geometry::SectionRect;
use crate::primitive::GeneratedPattern;

pub use line_pair::{
    BarAngle, ChartBars, ChartTarget, LPMM_TABLE, SingleFrequencyLayout, TARGET_TABLE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Resolution,
    Distortion,
    LinePair,
    Alignment,
}

impl PatternKind {
    pub fn label(self) -> &'static str {
        match self {
            PatternKind::Resolution => "resolution",
            PatternKind::Distortion => "distortion",
            PatternKind::LinePair => "line-pair",
            PatternKind::Alignment => "alignment",
        }
    }
}

impl std::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Turns a section rectangle into an ordered list of primitives.
pub trait PatternGenerator {
    fn kind(&self) -> PatternKind;

    fn generate(&self, section: &SectionRect, ctx: &GenerateContext<'_>) -> GeneratedPattern;
}

impl PatternGenerator for PatternParams {
    fn kind(&self) -> PatternKind {
        PatternParams::kind(self)
    }

    fn generate(&self, section: &SectionRect, ctx: &GenerateContext<'_>) -> GeneratedPattern {
        match self {
            PatternParams::Resolution(p) => p.generate(section, ctx),
            PatternParams::Distortion(p) => p.generate(section, ctx),
            PatternParams::LinePair(p) => p.generate(section, ctx),
            PatternParams::Alignment(p) => p.generate(section, ctx),
        }
    }
}
