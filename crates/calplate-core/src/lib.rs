// Calibration plate layout and pattern geometry
pub mod config;
pub mod density;
pub mod geometry;
pub mod layout;
pub mod patterns;
mod plate;
pub mod primitive;
pub mod units;

pub use config::{
    AlignmentParams, ChartScheme, DistortionParams, LinePairMode, LinePairParams, MarkerType,
    Orientation, PatternParams, PlateSpec, ResolutionParams,
};
pub use density::{
    DensityGuard, GenerateContext, MAX_ELEMENTS_PER_PATTERN, Warning, WarningDetail, WarningLog,
};
pub use geometry::SectionRect;
pub use layout::{PlateConfig, SectionPosition, plan_sections};
pub use patterns::{PatternGenerator, PatternKind};
pub use plate::{PlateDrawing, SectionDrawing, generate_plate};
pub use primitive::{Color, GeneratedPattern, Paint, Primitive};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlateError {
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    #[error("Invalid parameter{}: {reason}", section_suffix(.section))]
    InvalidParameter {
        section: Option<SectionPosition>,
        reason: String,
    },
}

fn section_suffix(section: &Option<SectionPosition>) -> String {
    match section {
        Some(position) => format!(" in {position} section"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, PlateError>;
