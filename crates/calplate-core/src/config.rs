//! Plate and per-section pattern parameters, as read from a TOML plate file.

use serde::{Deserialize, Serialize};

use crate::density::MAX_ELEMENTS_PER_PATTERN;
use crate::layout::{PlateConfig, SectionPosition};
use crate::patterns::PatternKind;
use crate::{PlateError, Result};

/// Everything needed for one generation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlateSpec {
    /// Element cap applied to each section's pattern.
    pub max_elements: usize,
    pub plate: PlateConfig,
    /// One pattern per section, in top-left, top-right, bottom-left,
    /// bottom-right order.
    pub sections: [PatternParams; 4],
}

impl Default for PlateSpec {
    fn default() -> Self {
        Self {
            max_elements: MAX_ELEMENTS_PER_PATTERN,
            plate: PlateConfig::default(),
            sections: [
                PatternParams::Resolution(ResolutionParams::default()),
                PatternParams::Distortion(DistortionParams::default()),
                PatternParams::LinePair(LinePairParams::default()),
                PatternParams::Alignment(AlignmentParams::default()),
            ],
        }
    }
}

impl PlateSpec {
    /// The sample plate: 50 mm square, 2 mm dot pitch, 1 mm checkerboard,
    /// 1 µm line pairs and a 3 mm crosshair.
    pub fn demo() -> Self {
        Self {
            max_elements: MAX_ELEMENTS_PER_PATTERN,
            plate: PlateConfig::new(50.0, 50.0, 5.0),
            sections: [
                PatternParams::Resolution(ResolutionParams {
                    dot_spacing: 2.0,
                    dot_diameter: 0.5,
                }),
                PatternParams::Distortion(DistortionParams { grid_size: 1.0 }),
                PatternParams::LinePair(LinePairParams {
                    mode: LinePairMode::Single,
                    line_spacing_um: 1.0,
                    line_width_um: 0.3,
                    orientation: Orientation::Vertical,
                    ..LinePairParams::default()
                }),
                PatternParams::Alignment(AlignmentParams {
                    marker_type: MarkerType::Crosshair,
                    marker_size: 3.0,
                }),
            ],
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.plate.validate()?;
        if self.max_elements == 0 {
            return Err(PlateError::InvalidParameter {
                section: None,
                reason: "max_elements must be at least 1".to_string(),
            });
        }
        for (position, params) in SectionPosition::ALL.into_iter().zip(&self.sections) {
            params
                .validate()
                .map_err(|reason| PlateError::InvalidParameter {
                    section: Some(position),
                    reason,
                })?;
        }
        Ok(())
    }
}

/// Pattern selection for one section; the tag picks the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "pattern", rename_all = "snake_case")]
pub enum PatternParams {
    Resolution(ResolutionParams),
    Distortion(DistortionParams),
    LinePair(LinePairParams),
    Alignment(AlignmentParams),
}

impl PatternParams {
    pub fn kind(&self) -> PatternKind {
        match self {
            PatternParams::Resolution(_) => PatternKind::Resolution,
            PatternParams::Distortion(_) => PatternKind::Distortion,
            PatternParams::LinePair(_) => PatternKind::LinePair,
            PatternParams::Alignment(_) => PatternKind::Alignment,
        }
    }

    /// Check that every length is finite and positive.
    pub fn validate(&self) -> std::result::Result<(), String> {
        match self {
            PatternParams::Resolution(p) => {
                positive("dot_spacing", p.dot_spacing)?;
                positive("dot_diameter", p.dot_diameter)
            }
            PatternParams::Distortion(p) => positive("grid_size", p.grid_size),
            PatternParams::LinePair(p) => match p.mode {
                LinePairMode::Single => {
                    positive("line_spacing_um", p.line_spacing_um)?;
                    positive("line_width_um", p.line_width_um)
                }
                LinePairMode::Multi => Ok(()),
            },
            PatternParams::Alignment(p) => positive("marker_size", p.marker_size),
        }
    }
}

fn positive(name: &str, value: f64) -> std::result::Result<(), String> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(format!("{name} must be a positive number, got {value}"))
    }
}

/// Dot array: lengths in mm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionParams {
    pub dot_spacing: f64,
    pub dot_diameter: f64,
}

impl Default for ResolutionParams {
    fn default() -> Self {
        Self {
            dot_spacing: 0.25,
            dot_diameter: 0.125,
        }
    }
}

/// Checkerboard: cell size in mm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistortionParams {
    pub grid_size: f64,
}

impl Default for DistortionParams {
    fn default() -> Self {
        Self { grid_size: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinePairMode {
    Single,
    #[default]
    Multi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

/// Which frequency table the multi-frequency chart uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartScheme {
    /// 6x6 cells, 1 to 216 lp/mm, alternating 0/90 degrees.
    #[default]
    Lpmm6x6,
    /// 3x3 cells with explicit spacing, bar count and 0/45/90 degree bars.
    Targets3x3,
}

/// Line pairs. Single mode lengths are in µm; multi mode uses a fixed table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinePairParams {
    pub mode: LinePairMode,
    pub line_spacing_um: f64,
    pub line_width_um: f64,
    pub orientation: Orientation,
    pub scheme: ChartScheme,
}

impl Default for LinePairParams {
    fn default() -> Self {
        Self {
            mode: LinePairMode::Multi,
            line_spacing_um: 5.0,
            line_width_um: 1.0,
            orientation: Orientation::Vertical,
            scheme: ChartScheme::Lpmm6x6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerType {
    #[default]
    Crosshair,
    Fiducial,
    ScaleBar,
}

/// Alignment marker: size in mm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentParams {
    pub marker_type: MarkerType,
    pub marker_size: f64,
}

impl Default for AlignmentParams {
    fn default() -> Self {
        Self {
            marker_type: MarkerType::Crosshair,
            marker_size: 2.0,
        }
    }
}
