use serde::{Deserialize, Serialize};

use crate::geometry::SectionRect;
use crate::{PlateError, Result};

/// Physical plate dimensions in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlateConfig {
    pub width_mm: f64,
    pub height_mm: f64,
    pub margin_mm: f64,
}

impl Default for PlateConfig {
    /// A 4 inch square plate with a 10 mm border.
    fn default() -> Self {
        Self {
            width_mm: 101.6,
            height_mm: 101.6,
            margin_mm: 10.0,
        }
    }
}

impl PlateConfig {
    pub fn new(width_mm: f64, height_mm: f64, margin_mm: f64) -> Self {
        Self {
            width_mm,
            height_mm,
            margin_mm,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let Self {
            width_mm,
            height_mm,
            margin_mm,
        } = *self;
        if !(width_mm.is_finite() && width_mm > 0.0) {
            return Err(PlateError::InvalidDimension(format!(
                "plate width must be positive, got {width_mm}"
            )));
        }
        if !(height_mm.is_finite() && height_mm > 0.0) {
            return Err(PlateError::InvalidDimension(format!(
                "plate height must be positive, got {height_mm}"
            )));
        }
        if !(margin_mm.is_finite() && margin_mm >= 0.0) {
            return Err(PlateError::InvalidDimension(format!(
                "margin must not be negative, got {margin_mm}"
            )));
        }
        if 2.0 * margin_mm >= width_mm.min(height_mm) {
            return Err(PlateError::InvalidDimension(format!(
                "margin {margin_mm} mm leaves no room on a {width_mm} x {height_mm} mm plate"
            )));
        }
        Ok(())
    }

    /// The plate border.
    pub fn outline(&self) -> SectionRect {
        SectionRect::new(0.0, 0.0, self.width_mm, self.height_mm)
    }

    /// The area inside the margin that the four sections share.
    pub fn interior(&self) -> SectionRect {
        SectionRect::new(
            self.margin_mm,
            self.margin_mm,
            self.width_mm - 2.0 * self.margin_mm,
            self.height_mm - 2.0 * self.margin_mm,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl SectionPosition {
    pub const ALL: [SectionPosition; 4] = [
        SectionPosition::TopLeft,
        SectionPosition::TopRight,
        SectionPosition::BottomLeft,
        SectionPosition::BottomRight,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            SectionPosition::TopLeft => "top-left",
            SectionPosition::TopRight => "top-right",
            SectionPosition::BottomLeft => "bottom-left",
            SectionPosition::BottomRight => "bottom-right",
        }
    }
}

impl std::fmt::Display for SectionPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Split the plate interior into a 2x2 grid, in [`SectionPosition::ALL`] order.
pub fn plan_sections(config: &PlateConfig) -> Result<[SectionRect; 4]> {
    config.validate()?;

    let interior = config.interior();
    let w = interior.width() / 2.0;
    let h = interior.height() / 2.0;
    let x0 = interior.origin.x;
    let y0 = interior.origin.y;

    Ok([
        SectionRect::new(x0, y0, w, h),
        SectionRect::new(x0 + w, y0, w, h),
        SectionRect::new(x0, y0 + h, w, h),
        SectionRect::new(x0 + w, y0 + h, w, h),
    ])
}
