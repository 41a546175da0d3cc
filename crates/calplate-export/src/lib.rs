//! Serialization of generated plates to vector and CAD formats.
//!
//! Every sink consumes the same [`PlateDrawing`] and only differs in how it
//! writes primitives out. Coordinates are millimeters with y growing
//! downward from the plate's top-left corner, in both formats.

#[cfg(feature = "dxf")]
pub mod dxf;
#[cfg(feature = "svg")]
pub mod svg;

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use atomicwrites::{AtomicFile, OverwriteBehavior};
use calplate_core::PlateDrawing;
use log::info;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{0} export is not available in this build")]
    SinkUnavailable(SinkKind),

    #[error("Failed to write {}: {source}", .path.display())]
    SinkWriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[cfg(feature = "svg")]
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    Svg,
    Dxf,
}

impl SinkKind {
    pub const ALL: [SinkKind; 2] = [SinkKind::Svg, SinkKind::Dxf];

    pub fn extension(self) -> &'static str {
        match self {
            SinkKind::Svg => "svg",
            SinkKind::Dxf => "dxf",
        }
    }

    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::ALL
            .into_iter()
            .find(|kind| kind.extension().eq_ignore_ascii_case(ext))
    }

    pub fn is_available(self) -> bool {
        match self {
            SinkKind::Svg => cfg!(feature = "svg"),
            SinkKind::Dxf => cfg!(feature = "dxf"),
        }
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkKind::Svg => f.write_str("SVG"),
            SinkKind::Dxf => f.write_str("DXF"),
        }
    }
}

impl FromStr for SinkKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.extension().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown export format '{s}' (expected svg or dxf)"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Add a solid hatch behind filled rectangles and polygons. Filled
    /// circles are always hatched.
    pub hatch_rects: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { hatch_rects: true }
    }
}

/// What a sink wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ExportSummary {
    /// Pattern primitives serialized, in emission order.
    pub primitives: usize,
    /// Drawing elements in the output, including outlines and hatches.
    pub entities: usize,
}

pub trait Sink {
    fn kind(&self) -> SinkKind;

    fn emit(&self, drawing: &PlateDrawing, out: &mut dyn Write) -> Result<ExportSummary>;
}

/// Look up the writer for `kind`; fails when the format was compiled out.
#[cfg_attr(not(feature = "dxf"), allow(unused_variables))]
pub fn sink_for(kind: SinkKind, options: &ExportOptions) -> Result<Box<dyn Sink>> {
    match kind {
        #[cfg(feature = "svg")]
        SinkKind::Svg => Ok(Box::new(svg::SvgSink)),
        #[cfg(feature = "dxf")]
        SinkKind::Dxf => Ok(Box::new(dxf::DxfSink::new(options.hatch_rects))),
        #[allow(unreachable_patterns)]
        other => Err(ExportError::SinkUnavailable(other)),
    }
}

/// Render `drawing` and replace `path` with the result.
///
/// The document is rendered in memory first and written through a temporary
/// file, so a failure at any point leaves `path` untouched.
pub fn export_to_path(
    drawing: &PlateDrawing,
    kind: SinkKind,
    options: &ExportOptions,
    path: &Path,
) -> Result<ExportSummary> {
    let sink = sink_for(kind, options)?;

    let mut buf = Vec::new();
    let summary = sink.emit(drawing, &mut buf)?;

    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| {
            f.write_all(&buf)?;
            f.flush()
        })
        .map_err(|err| ExportError::SinkWriteFailure {
            path: path.to_path_buf(),
            source: match err {
                atomicwrites::Error::Internal(e) | atomicwrites::Error::User(e) => e,
            },
        })?;

    info!(
        "Wrote {kind} drawing to {} ({} primitives, {} entities)",
        path.display(),
        summary.primitives,
        summary.entities
    );
    Ok(summary)
}
