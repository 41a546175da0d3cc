use std::path::PathBuf;

use anyhow::{Context, Result};
use calplate_core::generate_plate;
use calplate_export::{ExportOptions, SinkKind, export_to_path};
use clap::{Args, ValueEnum};
use colored::Colorize;

use crate::color::print_warnings;
use crate::config::SpecArgs;

const DEFAULT_STEM: &str = "calibration_plate";

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Svg,
    Dxf,
}

impl From<ExportFormat> for SinkKind {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Svg => SinkKind::Svg,
            ExportFormat::Dxf => SinkKind::Dxf,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub spec: SpecArgs,

    /// Output format. Inferred from the output extension when omitted,
    /// otherwise SVG
    #[arg(short, long)]
    pub format: Option<ExportFormat>,

    /// Output file [default: calibration_plate.<format>]
    #[arg(short, long, value_name = "PATH", value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Skip solid hatches behind filled rectangles in DXF output
    #[arg(long)]
    pub no_hatch: bool,
}

impl GenerateArgs {
    fn resolve_output(&self) -> (SinkKind, PathBuf) {
        let kind = self
            .format
            .map(SinkKind::from)
            .or_else(|| self.output.as_deref().and_then(SinkKind::from_path))
            .unwrap_or(SinkKind::Svg);
        let path = self
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{DEFAULT_STEM}.{}", kind.extension())));
        (kind, path)
    }
}

pub fn execute(args: GenerateArgs) -> Result<()> {
    let spec = args.spec.load()?;
    let (kind, path) = args.resolve_output();

    let drawing = generate_plate(&spec).context("Failed to generate plate")?;
    print_warnings(&drawing.warnings);

    let options = ExportOptions {
        hatch_rects: !args.no_hatch,
    };
    let summary = export_to_path(&drawing, kind, &options, &path)
        .with_context(|| format!("Failed to export {kind} drawing"))?;

    println!(
        "{} {} ({} elements)",
        "Saved".green(),
        path.display(),
        summary.entities
    );
    Ok(())
}
