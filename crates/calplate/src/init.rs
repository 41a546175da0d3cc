use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use calplate_core::PlateSpec;
use clap::{Args, ValueEnum};
use colored::Colorize;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// 4 inch plate with the standard pattern set
    Default,
    /// 50 mm sample plate with coarse patterns
    Demo,
}

impl Preset {
    fn spec(self) -> PlateSpec {
        match self {
            Preset::Default => PlateSpec::default(),
            Preset::Demo => PlateSpec::demo(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Where to write the configuration
    #[arg(short, long, value_name = "PATH", default_value = "calplate.toml")]
    pub output: PathBuf,

    /// Starting configuration
    #[arg(long, default_value = "default")]
    pub preset: Preset,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

pub fn execute(args: InitArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            args.output.display()
        );
    }

    let body = toml::to_string_pretty(&args.preset.spec())
        .context("Failed to serialize plate configuration")?;
    let content = format!(
        "# Calibration plate configuration. Lengths are in mm except line_spacing_um\n\
         # and line_width_um. Sections are listed top-left, top-right, bottom-left,\n\
         # bottom-right.\n\n{body}"
    );
    fs::write(&args.output, content)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!("{} {}", "Created".green(), args.output.display());
    Ok(())
}
