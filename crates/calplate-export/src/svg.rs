//! SVG output. One user unit is one millimeter; the document is sized in mm
//! so it prints at true scale.

use std::io::Write;

use calplate_core::units::format_mm;
use calplate_core::{Color, Paint, PlateDrawing, Primitive, SectionRect};
use glam::DVec2;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

use crate::{ExportSummary, Result, Sink, SinkKind};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const PLATE_STROKE: f64 = 0.1;
const SECTION_STROKE: f64 = 0.05;
const SECTION_DASH: &str = "1,1";

#[derive(Debug, Clone, Copy, Default)]
pub struct SvgSink;

impl Sink for SvgSink {
    fn kind(&self) -> SinkKind {
        SinkKind::Svg
    }

    fn emit(&self, drawing: &PlateDrawing, out: &mut dyn Write) -> Result<ExportSummary> {
        let mut writer = Writer::new_with_indent(out, b' ', 2);
        let plate = drawing.outline();
        let mut entities = 0;

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut root = BytesStart::new("svg");
        root.push_attribute(("xmlns", SVG_NS));
        root.push_attribute(("width", format!("{}mm", format_mm(plate.width())).as_str()));
        root.push_attribute(("height", format!("{}mm", format_mm(plate.height())).as_str()));
        root.push_attribute((
            "viewBox",
            format!(
                "0 0 {} {}",
                format_mm(plate.width()),
                format_mm(plate.height())
            )
            .as_str(),
        ));
        writer.write_event(Event::Start(root))?;

        let mut border = rect_element(&plate);
        stroke_attrs(&mut border, Color::Black, PLATE_STROKE);
        border.push_attribute(("id", "plate"));
        writer.write_event(Event::Empty(border))?;
        entities += 1;

        let mut outlines = BytesStart::new("g");
        outlines.push_attribute(("id", "sections"));
        stroke_attrs(&mut outlines, Color::Gray, SECTION_STROKE);
        outlines.push_attribute(("stroke-dasharray", SECTION_DASH));
        writer.write_event(Event::Start(outlines))?;
        for rect in drawing.section_outlines() {
            writer.write_event(Event::Empty(rect_element(rect)))?;
            entities += 1;
        }
        writer.write_event(Event::End(BytesEnd::new("g")))?;

        let mut primitives = 0;
        for section in &drawing.sections {
            let mut group = BytesStart::new("g");
            group.push_attribute(("id", section.position.label()));
            group.push_attribute(("class", section.pattern.kind.label()));
            if section.pattern.is_empty() {
                writer.write_event(Event::Empty(group))?;
                continue;
            }
            writer.write_event(Event::Start(group))?;
            for primitive in &section.pattern.primitives {
                writer.write_event(Event::Empty(primitive_element(primitive)))?;
                primitives += 1;
            }
            writer.write_event(Event::End(BytesEnd::new("g")))?;
        }
        entities += primitives;

        writer.write_event(Event::End(BytesEnd::new("svg")))?;
        writer.get_mut().write_all(b"\n")?;

        Ok(ExportSummary {
            primitives,
            entities,
        })
    }
}

fn rect_element(rect: &SectionRect) -> BytesStart<'static> {
    let mut elem = BytesStart::new("rect");
    push_rect(&mut elem, rect.origin, rect.size);
    elem
}

fn push_rect(elem: &mut BytesStart<'_>, origin: DVec2, size: DVec2) {
    elem.push_attribute(("x", format_mm(origin.x).as_str()));
    elem.push_attribute(("y", format_mm(origin.y).as_str()));
    elem.push_attribute(("width", format_mm(size.x).as_str()));
    elem.push_attribute(("height", format_mm(size.y).as_str()));
}

fn stroke_attrs(elem: &mut BytesStart<'_>, color: Color, width: f64) {
    elem.push_attribute(("fill", "none"));
    elem.push_attribute(("stroke", color.name()));
    elem.push_attribute(("stroke-width", format_mm(width).as_str()));
}

fn paint_attrs(elem: &mut BytesStart<'_>, paint: &Paint) {
    match *paint {
        Paint::Fill(color) => elem.push_attribute(("fill", color.name())),
        Paint::Outline {
            color,
            stroke_width,
        } => stroke_attrs(elem, color, stroke_width),
    }
}

fn points_attr(points: &[DVec2]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", format_mm(p.x), format_mm(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn primitive_element(primitive: &Primitive) -> BytesStart<'static> {
    match primitive {
        Primitive::Circle {
            center,
            radius,
            paint,
        } => {
            let mut elem = BytesStart::new("circle");
            elem.push_attribute(("cx", format_mm(center.x).as_str()));
            elem.push_attribute(("cy", format_mm(center.y).as_str()));
            elem.push_attribute(("r", format_mm(*radius).as_str()));
            paint_attrs(&mut elem, paint);
            elem
        }
        Primitive::Rect {
            origin,
            size,
            paint,
        } => {
            let mut elem = BytesStart::new("rect");
            push_rect(&mut elem, *origin, *size);
            paint_attrs(&mut elem, paint);
            elem
        }
        Primitive::Line {
            start,
            end,
            stroke_width,
            color,
        } => {
            let mut elem = BytesStart::new("line");
            elem.push_attribute(("x1", format_mm(start.x).as_str()));
            elem.push_attribute(("y1", format_mm(start.y).as_str()));
            elem.push_attribute(("x2", format_mm(end.x).as_str()));
            elem.push_attribute(("y2", format_mm(end.y).as_str()));
            elem.push_attribute(("stroke", color.name()));
            elem.push_attribute(("stroke-width", format_mm(*stroke_width).as_str()));
            elem
        }
        Primitive::Polyline {
            points,
            closed,
            paint,
        } => {
            let mut elem = BytesStart::new(if *closed { "polygon" } else { "polyline" });
            elem.push_attribute(("points", points_attr(points).as_str()));
            if *closed {
                paint_attrs(&mut elem, paint);
            } else {
                // an open path has no inside to fill
                stroke_attrs(&mut elem, paint.color(), stroke_width(paint));
            }
            elem
        }
    }
}

fn stroke_width(paint: &Paint) -> f64 {
    match *paint {
        Paint::Outline { stroke_width, .. } => stroke_width,
        Paint::Fill(_) => PLATE_STROKE,
    }
}
