use anyhow::{Context, Result};
use calplate_core::units::{format_length, format_mm, format_plate_size};
use calplate_core::{PlateDrawing, generate_plate};
use clap::Args;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, Color, Table};
use serde_json::json;

use crate::OutputFormat;
use crate::color::print_warnings;
use crate::config::SpecArgs;

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    #[command(flatten)]
    pub spec: SpecArgs,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

pub fn execute(args: PlanArgs) -> Result<()> {
    let spec = args.spec.load()?;
    let drawing = generate_plate(&spec).context("Failed to plan plate")?;

    match args.format {
        OutputFormat::Text => output_text(&drawing, spec.max_elements),
        OutputFormat::Json => output_json(&drawing, spec.max_elements),
    }
}

fn output_text(drawing: &PlateDrawing, max_elements: usize) -> Result<()> {
    println!("{}", "Plate Summary".bold());

    let mut summary = Table::new();
    summary.load_preset(UTF8_FULL_CONDENSED);
    summary.set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
    let plate = &drawing.plate;
    summary.add_row(vec![
        Cell::new("Plate Size").fg(Color::Cyan),
        Cell::new(format_plate_size(plate.width_mm, plate.height_mm)),
    ]);
    summary.add_row(vec![
        Cell::new("Margin").fg(Color::Cyan),
        Cell::new(format_length(plate.margin_mm)),
    ]);
    summary.add_row(vec![
        Cell::new("Element Cap").fg(Color::Cyan),
        Cell::new(format!("{max_elements} per pattern")),
    ]);
    summary.add_row(vec![
        Cell::new("Total Elements").fg(Color::Cyan),
        Cell::new(drawing.primitive_count()),
    ]);
    println!("{summary}");

    println!();
    println!("{}", "Sections".bold());
    let mut sections = Table::new();
    sections.load_preset(UTF8_FULL_CONDENSED);
    sections.set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
    sections.set_header(vec!["Section", "Pattern", "Origin", "Size", "Elements"]);
    for section in &drawing.sections {
        let rect = &section.rect;
        sections.add_row(vec![
            Cell::new(section.position.label()).fg(Color::Cyan),
            Cell::new(section.pattern.kind.label()),
            Cell::new(format!(
                "{}, {}",
                format_mm(rect.origin.x),
                format_mm(rect.origin.y)
            )),
            Cell::new(format_plate_size(rect.width(), rect.height())),
            Cell::new(section.pattern.len()),
        ]);
    }
    println!("{sections}");

    print_warnings(&drawing.warnings);
    Ok(())
}

fn output_json(drawing: &PlateDrawing, max_elements: usize) -> Result<()> {
    let plate = &drawing.plate;
    let sections: Vec<_> = drawing
        .sections
        .iter()
        .map(|section| {
            json!({
                "position": section.position,
                "pattern": section.pattern.kind,
                "origin_mm": [section.rect.origin.x, section.rect.origin.y],
                "size_mm": [section.rect.width(), section.rect.height()],
                "elements": section.pattern.len(),
            })
        })
        .collect();
    let warnings: Vec<String> = drawing.warnings.iter().map(ToString::to_string).collect();

    let output = json!({
        "plate": {
            "width_mm": plate.width_mm,
            "height_mm": plate.height_mm,
            "margin_mm": plate.margin_mm,
        },
        "max_elements": max_elements,
        "total_elements": drawing.primitive_count(),
        "sections": sections,
        "warnings": warnings,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
