use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calplate_core::PlateSpec;
use clap::Args;
use log::debug;

/// Plate configuration source shared by `generate` and `plan`.
#[derive(Args, Debug, Default, Clone)]
pub struct SpecArgs {
    /// Plate configuration (TOML). Built-in defaults are used when omitted
    #[arg(short, long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Plate width in mm
    #[arg(long, value_name = "MM", allow_negative_numbers = true)]
    pub width: Option<f64>,

    /// Plate height in mm
    #[arg(long, value_name = "MM", allow_negative_numbers = true)]
    pub height: Option<f64>,

    /// Border between the plate edge and the sections, in mm
    #[arg(long, value_name = "MM", allow_negative_numbers = true)]
    pub margin: Option<f64>,

    /// Maximum elements per pattern
    #[arg(long, value_name = "N")]
    pub max_elements: Option<usize>,
}

impl SpecArgs {
    /// Load the configuration file, if any, then apply command line overrides.
    pub fn load(&self) -> Result<PlateSpec> {
        let mut spec = match &self.config {
            Some(path) => load_spec(path)?,
            None => PlateSpec::default(),
        };
        if let Some(width) = self.width {
            spec.plate.width_mm = width;
        }
        if let Some(height) = self.height {
            spec.plate.height_mm = height;
        }
        if let Some(margin) = self.margin {
            spec.plate.margin_mm = margin;
        }
        if let Some(max_elements) = self.max_elements {
            spec.max_elements = max_elements;
        }
        Ok(spec)
    }
}

pub fn load_spec(path: &Path) -> Result<PlateSpec> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let spec: PlateSpec = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    debug!("Loaded plate config from {}", path.display());
    Ok(spec)
}
