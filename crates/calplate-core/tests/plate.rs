use calplate_core::{
    MAX_ELEMENTS_PER_PATTERN, PatternKind, PlateConfig, PlateError, PlateSpec, Primitive,
    SectionRect, generate_plate, plan_sections,
};

const SPEC: &str = r#"
[plate]
width_mm = 80.0
height_mm = 60.0
margin_mm = 4.0

[[sections]]
pattern = "resolution"
dot_spacing = 0.5
dot_diameter = 0.2

[[sections]]
pattern = "distortion"
grid_size = 0.5

[[sections]]
pattern = "line_pair"
scheme = "targets3x3"

[[sections]]
pattern = "alignment"
marker_type = "fiducial"
marker_size = 5.0
"#;

fn inside(section: &SectionRect, primitive: &Primitive) -> bool {
    primitive.anchor_points().iter().all(|p| section.contains(*p))
}

#[test]
fn test_plate_from_toml() {
    let spec: PlateSpec = toml::from_str(SPEC).unwrap();
    let drawing = generate_plate(&spec).unwrap();

    assert!(drawing.warnings.is_empty(), "{:?}", drawing.warnings);
    assert_eq!(drawing.outline(), SectionRect::new(0.0, 0.0, 80.0, 60.0));

    let expected = plan_sections(&PlateConfig::new(80.0, 60.0, 4.0)).unwrap();
    for (section, rect) in drawing.sections.iter().zip(expected) {
        assert_eq!(section.rect, rect);
        assert!(section.pattern.len() <= MAX_ELEMENTS_PER_PATTERN);
        for primitive in &section.pattern.primitives {
            assert!(
                inside(&section.rect, primitive),
                "{} section: {primitive:?} escapes {:?}",
                section.position,
                section.rect
            );
        }
    }

    // 36 x 26 mm sections
    let dots = &drawing.sections[0].pattern;
    assert_eq!(dots.kind, PatternKind::Resolution);
    assert_eq!(dots.len(), 72 * 52);

    let board = &drawing.sections[1].pattern;
    assert_eq!(board.len(), 72 * 52 / 2);
}

#[test]
fn test_shared_cap_applies_to_every_section() {
    let mut spec: PlateSpec = toml::from_str(SPEC).unwrap();
    spec.max_elements = 500;
    let drawing = generate_plate(&spec).unwrap();

    for section in &drawing.sections {
        assert!(section.pattern.len() <= 500);
    }
    let clamped: Vec<_> = drawing.warnings.iter().map(|w| w.kind).collect();
    assert_eq!(clamped, [PatternKind::Resolution, PatternKind::Distortion]);
}

#[test]
fn test_invalid_parameters_are_rejected() {
    let mut spec: PlateSpec = toml::from_str(SPEC).unwrap();
    spec.plate.width_mm = -1.0;
    assert!(matches!(
        generate_plate(&spec),
        Err(PlateError::InvalidDimension(_))
    ));

    let spec: PlateSpec = toml::from_str(&SPEC.replace("grid_size = 0.5", "grid_size = 0.0")).unwrap();
    let err = generate_plate(&spec).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid parameter in top-right section: grid_size must be a positive number, got 0"
    );
}

#[test]
fn test_small_caps_hold_for_every_pattern() {
    let variants = [
        SPEC.to_string(),
        SPEC.replace("scheme = \"targets3x3\"", "scheme = \"lpmm6x6\"")
            .replace("marker_type = \"fiducial\"", "marker_type = \"scale_bar\""),
    ];
    for text in &variants {
        for cap in [1, 5, 12, 30, 50] {
            let mut spec: PlateSpec = toml::from_str(text).unwrap();
            spec.max_elements = cap;
            let drawing = generate_plate(&spec).unwrap();

            for section in &drawing.sections {
                assert!(
                    section.pattern.len() <= cap,
                    "{} section: {} elements over a cap of {cap}",
                    section.position,
                    section.pattern.len()
                );
                // every section here asks for more than 1 element, so a
                // clamped section always leaves a warning behind
                if cap == 1 {
                    assert!(
                        drawing
                            .warnings
                            .iter()
                            .any(|w| w.section == Some(section.position)),
                        "{} section clamped silently",
                        section.position
                    );
                }
            }
        }
    }
}
