//! ASCII DXF (R2000) output in millimeters.
//!
//! Coordinates are written as generated, so y grows downward exactly as in
//! the SVG output. Filled circles become a CIRCLE plus a solid HATCH bounded by
//! the same circle; filled rectangles and polygons become a closed LWPOLYLINE,
//! hatched unless disabled.

use std::fmt::Write as _;
use std::io::Write;

use calplate_core::units::format_mm;
use calplate_core::{Color, Paint, PlateDrawing, Primitive, SectionRect};
use glam::DVec2;

use crate::{ExportSummary, Result, Sink, SinkKind};

const LAYER_PLATE: &str = "PLATE";
const LAYER_SECTIONS: &str = "SECTIONS";
const LAYER_PATTERN: &str = "PATTERN";

const PLATE_STROKE: f64 = 0.1;
const SECTION_STROKE: f64 = 0.05;
/// Standard lineweights in hundredths of a millimeter (group code 370).
const LINEWEIGHTS: [i32; 24] = [
    0, 5, 9, 13, 15, 18, 20, 25, 30, 35, 40, 50, 53, 60, 70, 80, 90, 100, 106, 120, 140, 158, 200,
    211,
];

/// AutoCAD color index for a color intent. ACI 7 renders black on a light
/// background; the true-color code disambiguates black from white.
fn aci(color: Color) -> i32 {
    match color {
        Color::Black | Color::White => 7,
        Color::Gray => 8,
        Color::LightGray => 9,
    }
}

fn lineweight(stroke_mm: f64) -> i32 {
    let target = stroke_mm * 100.0;
    LINEWEIGHTS
        .iter()
        .copied()
        .min_by(|a, b| {
            (f64::from(*a) - target)
                .abs()
                .total_cmp(&(f64::from(*b) - target).abs())
        })
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy)]
pub struct DxfSink {
    hatch_rects: bool,
}

impl Default for DxfSink {
    fn default() -> Self {
        Self { hatch_rects: true }
    }
}

impl DxfSink {
    pub fn new(hatch_rects: bool) -> Self {
        Self { hatch_rects }
    }
}

impl Sink for DxfSink {
    fn kind(&self) -> SinkKind {
        SinkKind::Dxf
    }

    fn emit(&self, drawing: &PlateDrawing, out: &mut dyn Write) -> Result<ExportSummary> {
        let mut body = DxfWriter::new();
        body.tables();
        body.blocks();

        body.section("ENTITIES");
        body.rect_outline(
            &drawing.outline(),
            LAYER_PLATE,
            Color::Black,
            PLATE_STROKE,
        );
        for rect in drawing.section_outlines() {
            body.rect_outline(rect, LAYER_SECTIONS, Color::Gray, SECTION_STROKE);
        }
        let mut primitives = 0;
        for primitive in drawing.primitives() {
            body.primitive(primitive, self.hatch_rects);
            primitives += 1;
        }
        body.end_section();
        body.objects();

        let mut doc = DxfWriter::new();
        doc.header(drawing, body.next_handle);
        out.write_all(doc.buf.as_bytes())?;
        out.write_all(body.buf.as_bytes())?;
        out.write_all(b"  0\nEOF\n")?;

        Ok(ExportSummary {
            primitives,
            entities: body.entities,
        })
    }
}

/// Group-code/value pair writer.
struct DxfWriter {
    buf: String,
    next_handle: u32,
    entities: usize,
    /// Block records owning the model and paper space entities.
    model_space: u32,
    paper_space: u32,
}

impl DxfWriter {
    fn new() -> Self {
        Self {
            buf: String::new(),
            // 0 is reserved
            next_handle: 1,
            entities: 0,
            model_space: 0,
            paper_space: 0,
        }
    }

    fn pair(&mut self, code: u16, value: impl std::fmt::Display) {
        // writing to a String cannot fail
        let _ = write!(self.buf, "{code:>3}\n{value}\n");
    }

    fn num(&mut self, code: u16, value: f64) {
        self.pair(code, format_mm(value));
    }

    fn point(&mut self, base: u16, p: DVec2) {
        self.num(base, p.x);
        self.num(base + 10, p.y);
    }

    fn handle(&mut self) -> u32 {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.pair(5, format_args!("{handle:X}"));
        handle
    }

    fn owner(&mut self, handle: u32) {
        self.pair(330, format_args!("{handle:X}"));
    }

    fn section(&mut self, name: &str) {
        self.pair(0, "SECTION");
        self.pair(2, name);
    }

    fn end_section(&mut self) {
        self.pair(0, "ENDSEC");
    }

    fn header(&mut self, drawing: &PlateDrawing, handseed: u32) {
        let outline = drawing.outline();
        self.section("HEADER");
        self.pair(9, "$ACADVER");
        self.pair(1, "AC1015");
        self.pair(9, "$HANDSEED");
        self.pair(5, format_args!("{handseed:X}"));
        self.pair(9, "$INSUNITS");
        self.pair(70, 4);
        self.pair(9, "$MEASUREMENT");
        self.pair(70, 1);
        self.pair(9, "$EXTMIN");
        self.point(10, outline.min());
        self.num(30, 0.0);
        self.pair(9, "$EXTMAX");
        self.point(10, outline.max());
        self.num(30, 0.0);
        self.end_section();
    }

    fn table(&mut self, name: &str, entries: usize) -> u32 {
        self.pair(0, "TABLE");
        self.pair(2, name);
        let handle = self.handle();
        self.owner(0);
        self.pair(100, "AcDbSymbolTable");
        self.pair(70, entries);
        handle
    }

    fn end_table(&mut self) {
        self.pair(0, "ENDTAB");
    }

    fn record(&mut self, kind: &str, table: u32, subclass: &str, name: &str) -> u32 {
        self.pair(0, kind);
        let handle = self.handle();
        self.owner(table);
        self.pair(100, "AcDbSymbolTableRecord");
        self.pair(100, subclass);
        self.pair(2, name);
        self.pair(70, 0);
        handle
    }

    fn tables(&mut self) {
        self.section("TABLES");

        self.table("VPORT", 0);
        self.end_table();

        let ltype = self.table("LTYPE", 4);
        self.linetype(ltype, "ByBlock", "", &[]);
        self.linetype(ltype, "ByLayer", "", &[]);
        self.linetype(ltype, "CONTINUOUS", "Solid line", &[]);
        self.linetype(ltype, "DASHED", "Dashed __ __ __", &[1.0, -1.0]);
        self.end_table();

        let layer = self.table("LAYER", 4);
        self.layer(layer, "0", Color::Black, "CONTINUOUS");
        self.layer(layer, LAYER_PLATE, Color::Black, "CONTINUOUS");
        self.layer(layer, LAYER_SECTIONS, Color::Gray, "DASHED");
        self.layer(layer, LAYER_PATTERN, Color::Black, "CONTINUOUS");
        self.end_table();

        let style = self.table("STYLE", 1);
        self.record("STYLE", style, "AcDbTextStyleTableRecord", "Standard");
        self.num(40, 0.0);
        self.num(41, 1.0);
        self.num(50, 0.0);
        self.pair(71, 0);
        self.num(42, 2.5);
        self.pair(3, "txt");
        self.pair(4, "");
        self.end_table();

        self.table("VIEW", 0);
        self.end_table();
        self.table("UCS", 0);
        self.end_table();

        let appid = self.table("APPID", 1);
        self.record("APPID", appid, "AcDbRegAppTableRecord", "ACAD");
        self.end_table();

        self.table("DIMSTYLE", 0);
        self.pair(100, "AcDbDimStyleTable");
        self.pair(71, 0);
        self.end_table();

        let blocks = self.table("BLOCK_RECORD", 2);
        self.model_space =
            self.record("BLOCK_RECORD", blocks, "AcDbBlockTableRecord", "*Model_Space");
        self.paper_space =
            self.record("BLOCK_RECORD", blocks, "AcDbBlockTableRecord", "*Paper_Space");
        self.end_table();

        self.end_section();
    }

    fn linetype(&mut self, table: u32, name: &str, description: &str, dashes: &[f64]) {
        self.record("LTYPE", table, "AcDbLinetypeTableRecord", name);
        self.pair(3, description);
        self.pair(72, 65);
        self.pair(73, dashes.len());
        self.num(40, dashes.iter().map(|d| d.abs()).sum());
        for &dash in dashes {
            self.num(49, dash);
            self.pair(74, 0);
        }
    }

    fn layer(&mut self, table: u32, name: &str, color: Color, linetype: &str) {
        self.record("LAYER", table, "AcDbLayerTableRecord", name);
        self.pair(62, aci(color));
        self.pair(6, linetype);
    }

    /// Empty block definitions for the model and paper space records.
    fn blocks(&mut self) {
        self.section("BLOCKS");
        for (name, record) in [
            ("*Model_Space", self.model_space),
            ("*Paper_Space", self.paper_space),
        ] {
            self.pair(0, "BLOCK");
            self.handle();
            self.owner(record);
            self.pair(100, "AcDbEntity");
            self.pair(8, "0");
            self.pair(100, "AcDbBlockBegin");
            self.pair(2, name);
            self.pair(70, 0);
            self.point(10, DVec2::ZERO);
            self.num(30, 0.0);
            self.pair(3, name);
            self.pair(1, "");

            self.pair(0, "ENDBLK");
            self.handle();
            self.owner(record);
            self.pair(100, "AcDbEntity");
            self.pair(8, "0");
            self.pair(100, "AcDbBlockEnd");
        }
        self.end_section();
    }

    /// Root dictionary with the mandatory ACAD_GROUP entry.
    fn objects(&mut self) {
        self.section("OBJECTS");
        let group = self.next_handle + 1;

        self.pair(0, "DICTIONARY");
        let root = self.handle();
        self.owner(0);
        self.pair(100, "AcDbDictionary");
        self.pair(281, 1);
        self.pair(3, "ACAD_GROUP");
        self.pair(350, format_args!("{group:X}"));

        self.pair(0, "DICTIONARY");
        self.handle();
        self.owner(root);
        self.pair(100, "AcDbDictionary");
        self.pair(281, 1);

        self.end_section();
    }

    fn entity(&mut self, kind: &str, layer: &str, color: Color) {
        self.entities += 1;
        self.pair(0, kind);
        self.handle();
        self.owner(self.model_space);
        self.pair(100, "AcDbEntity");
        self.pair(8, layer);
        self.pair(62, aci(color));
        self.pair(420, color.rgb());
    }

    fn line(&mut self, start: DVec2, end: DVec2, stroke_width: f64, color: Color) {
        self.entity("LINE", LAYER_PATTERN, color);
        self.pair(370, lineweight(stroke_width));
        self.pair(100, "AcDbLine");
        self.point(10, start);
        self.num(30, 0.0);
        self.point(11, end);
        self.num(31, 0.0);
    }

    fn circle(&mut self, center: DVec2, radius: f64, paint: &Paint) {
        self.entity("CIRCLE", LAYER_PATTERN, paint.color());
        if let Paint::Outline { stroke_width, .. } = *paint {
            self.pair(370, lineweight(stroke_width));
        }
        self.pair(100, "AcDbCircle");
        self.point(10, center);
        self.num(30, 0.0);
        self.num(40, radius);
    }

    fn lwpolyline(&mut self, points: &[DVec2], closed: bool, layer: &str, color: Color, width: f64) {
        self.entity("LWPOLYLINE", layer, color);
        self.pair(100, "AcDbPolyline");
        self.pair(90, points.len());
        self.pair(70, u8::from(closed));
        self.num(43, width);
        for &p in points {
            self.point(10, p);
        }
    }

    fn rect_outline(&mut self, rect: &SectionRect, layer: &str, color: Color, width: f64) {
        self.lwpolyline(&rect.corners(), true, layer, color, width);
    }

    fn hatch_start(&mut self, color: Color) {
        self.entity("HATCH", LAYER_PATTERN, color);
        self.pair(100, "AcDbHatch");
        self.point(10, DVec2::ZERO);
        self.num(30, 0.0);
        self.num(210, 0.0);
        self.num(220, 0.0);
        self.num(230, 1.0);
        self.pair(2, "SOLID");
        self.pair(70, 1);
        self.pair(71, 0);
        self.pair(91, 1);
    }

    fn hatch_end(&mut self) {
        // no source objects, normal style, predefined pattern, no seeds
        self.pair(97, 0);
        self.pair(75, 0);
        self.pair(76, 1);
        self.pair(98, 0);
    }

    /// Solid hatch bounded by one full-circle arc edge.
    fn circle_hatch(&mut self, center: DVec2, radius: f64, color: Color) {
        self.hatch_start(color);
        self.pair(92, 1);
        self.pair(93, 1);
        self.pair(72, 2);
        self.point(10, center);
        self.num(40, radius);
        self.num(50, 0.0);
        self.num(51, 360.0);
        self.pair(73, 1);
        self.hatch_end();
    }

    /// Solid hatch bounded by a closed polyline path.
    fn polygon_hatch(&mut self, points: &[DVec2], color: Color) {
        self.hatch_start(color);
        // external | polyline
        self.pair(92, 3);
        self.pair(72, 0);
        self.pair(73, 1);
        self.pair(93, points.len());
        for &p in points {
            self.point(10, p);
        }
        self.hatch_end();
    }

    fn filled_polygon(&mut self, points: &[DVec2], color: Color, hatch: bool) {
        self.lwpolyline(points, true, LAYER_PATTERN, color, 0.0);
        if hatch {
            self.polygon_hatch(points, color);
        }
    }

    fn primitive(&mut self, primitive: &Primitive, hatch_rects: bool) {
        match primitive {
            Primitive::Circle {
                center,
                radius,
                paint,
            } => {
                self.circle(*center, *radius, paint);
                if let Paint::Fill(color) = paint {
                    self.circle_hatch(*center, *radius, *color);
                }
            }
            Primitive::Rect {
                origin,
                size,
                paint,
            } => {
                let corners = SectionRect {
                    origin: *origin,
                    size: *size,
                }
                .corners();
                match *paint {
                    Paint::Fill(color) => self.filled_polygon(&corners, color, hatch_rects),
                    Paint::Outline {
                        color,
                        stroke_width,
                    } => self.lwpolyline(&corners, true, LAYER_PATTERN, color, stroke_width),
                }
            }
            Primitive::Line {
                start,
                end,
                stroke_width,
                color,
            } => self.line(*start, *end, *stroke_width, *color),
            Primitive::Polyline {
                points,
                closed,
                paint,
            } => match *paint {
                Paint::Fill(color) if *closed => self.filled_polygon(points, color, hatch_rects),
                Paint::Fill(color) => self.lwpolyline(points, false, LAYER_PATTERN, color, 0.0),
                Paint::Outline {
                    color,
                    stroke_width,
                } => self.lwpolyline(points, *closed, LAYER_PATTERN, color, stroke_width),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity_body(primitive: &Primitive, hatch_rects: bool) -> (String, usize) {
        let mut w = DxfWriter::new();
        w.primitive(primitive, hatch_rects);
        (w.buf, w.entities)
    }

    fn pairs(dxf: &str) -> Vec<(u16, &str)> {
        let lines: Vec<&str> = dxf.lines().collect();
        lines
            .chunks(2)
            .map(|pair| (pair[0].trim().parse().unwrap(), pair[1]))
            .collect()
    }

    #[test]
    fn test_line_entity() {
        let (dxf, count) = entity_body(
            &Primitive::line(DVec2::new(0.0, 1.5), DVec2::new(3.0, 1.5), 0.1),
            true,
        );
        assert_eq!(count, 1);
        assert_eq!(
            pairs(&dxf),
            [
                (0, "LINE"),
                (5, "1"),
                (330, "0"),
                (100, "AcDbEntity"),
                (8, "PATTERN"),
                (62, "7"),
                (420, "0"),
                (370, "9"),
                (100, "AcDbLine"),
                (10, "0"),
                (20, "1.5"),
                (30, "0"),
                (11, "3"),
                (21, "1.5"),
                (31, "0"),
            ]
        );
    }

    #[test]
    fn test_filled_circle_is_hatched() {
        let (dxf, count) = entity_body(&Primitive::filled_circle(DVec2::new(1.0, 2.0), 0.25), false);
        assert_eq!(count, 2);
        assert!(dxf.contains("CIRCLE\n"));
        assert!(dxf.contains("HATCH\n"));
        assert!(dxf.contains(" 40\n0.25\n"));
        assert!(dxf.contains("  2\nSOLID\n"));
    }

    #[test]
    fn test_outlined_circle_keeps_stroke() {
        let ring = Primitive::Circle {
            center: DVec2::new(4.0, 4.0),
            radius: 2.0,
            paint: Paint::Outline {
                color: Color::Black,
                stroke_width: 0.1,
            },
        };
        let (dxf, count) = entity_body(&ring, true);
        assert_eq!(count, 1);
        let pairs = pairs(&dxf);
        assert!(pairs.contains(&(370, "9")));
        assert!(!dxf.contains("HATCH\n"));
    }

    #[test]
    fn test_rect_hatch_is_optional() {
        let rect = Primitive::filled_rect(DVec2::ZERO, DVec2::new(1.0, 0.5), Color::Black);
        let (_, hatched) = entity_body(&rect, true);
        let (dxf, plain) = entity_body(&rect, false);
        assert_eq!(hatched, 2);
        assert_eq!(plain, 1);
        assert!(dxf.contains("LWPOLYLINE\n"));
        assert!(dxf.contains(" 90\n4\n 70\n1\n"));
    }

    #[test]
    fn test_lineweight_snaps_to_standard_values() {
        assert_eq!(lineweight(0.1), 9);
        assert_eq!(lineweight(0.05), 5);
        assert_eq!(lineweight(0.02), 0);
        assert_eq!(lineweight(0.0), 0);
        assert_eq!(lineweight(5.0), 211);
    }
}
