use log::debug;
use rayon::prelude::*;

use crate::Result;
use crate::config::PlateSpec;
use crate::density::{DensityGuard, GenerateContext, Warning, WarningLog};
use crate::geometry::SectionRect;
use crate::layout::{PlateConfig, SectionPosition, plan_sections};
use crate::patterns::PatternGenerator;
use crate::primitive::{GeneratedPattern, Primitive};

/// One quadrant of a generated plate.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionDrawing {
    pub position: SectionPosition,
    pub rect: SectionRect,
    pub pattern: GeneratedPattern,
}

/// Everything a sink needs to serialize one plate.
#[derive(Debug, Clone, PartialEq)]
pub struct PlateDrawing {
    pub plate: PlateConfig,
    /// Sections in [`SectionPosition::ALL`] order.
    pub sections: Vec<SectionDrawing>,
    /// Non-fatal warnings, grouped by section.
    pub warnings: Vec<Warning>,
}

impl PlateDrawing {
    pub fn outline(&self) -> SectionRect {
        self.plate.outline()
    }

    pub fn section_outlines(&self) -> impl Iterator<Item = &SectionRect> {
        self.sections.iter().map(|s| &s.rect)
    }

    /// Pattern primitives in emission order: section by section, each in
    /// generator order.
    pub fn primitives(&self) -> impl Iterator<Item = &Primitive> {
        self.sections.iter().flat_map(|s| &s.pattern.primitives)
    }

    pub fn primitive_count(&self) -> usize {
        self.sections.iter().map(|s| s.pattern.len()).sum()
    }
}

/// Validate `spec`, lay out the plate and run every section's generator.
///
/// Sections are generated in parallel; the result does not depend on
/// scheduling.
pub fn generate_plate(spec: &PlateSpec) -> Result<PlateDrawing> {
    spec.validate()?;
    let rects = plan_sections(&spec.plate)?;

    let guard = DensityGuard::new(spec.max_elements);
    let warnings = WarningLog::new();
    let ctx = GenerateContext::new(&guard, &warnings);

    let sections: Vec<SectionDrawing> = SectionPosition::ALL
        .par_iter()
        .map(|&position| {
            let rect = rects[position.index()];
            let params = &spec.sections[position.index()];
            let pattern = params.generate(&rect, &ctx.for_section(position));
            debug!(
                "{position} section: {} pattern, {} elements",
                pattern.kind,
                pattern.len()
            );
            SectionDrawing {
                position,
                rect,
                pattern,
            }
        })
        .collect();

    let mut warnings = warnings.into_inner();
    warnings.sort_by_key(|w| w.section.map(SectionPosition::index));

    Ok(PlateDrawing {
        plate: spec.plate,
        sections,
        warnings,
    })
}
