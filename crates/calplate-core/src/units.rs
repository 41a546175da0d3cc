//! Length units. Millimeters are the canonical internal unit; micrometers are
//! accepted for line-pair parameters, where feature sizes are sub-millimeter.

const UM_PER_MM: f64 = 1000.0;

/// Decimal places kept when serializing millimeter values (1 nm resolution).
pub const MM_DECIMALS: usize = 6;

/// Convert micrometers to millimeters
pub fn um_to_mm(um: f64) -> f64 {
    um / UM_PER_MM
}

/// Convert millimeters to micrometers
pub fn mm_to_um(mm: f64) -> f64 {
    mm * UM_PER_MM
}

/// Format a millimeter value for file output: fixed nanometer precision with
/// trailing zeros trimmed, and negative zero folded to `0`.
pub fn format_mm(mm: f64) -> String {
    let mut s = format!("{:.*}", MM_DECIMALS, mm);
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

/// Human readable length, choosing mm, µm or nm by magnitude.
pub fn format_length(mm: f64) -> String {
    let abs = mm.abs();
    if abs >= 1.0 || abs == 0.0 {
        format!("{:.3} mm", mm)
    } else if abs >= 0.001 {
        format!("{:.2} µm", mm_to_um(mm))
    } else {
        format!("{:.0} nm", mm_to_um(mm) * 1000.0)
    }
}

/// Format plate dimensions (width x height)
pub fn format_plate_size(width_mm: f64, height_mm: f64) -> String {
    format!("{:.2}mm × {:.2}mm", width_mm, height_mm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_um_to_mm() {
        assert_eq!(um_to_mm(1000.0), 1.0);
        assert_eq!(um_to_mm(5.0), 0.005);
        assert_eq!(mm_to_um(0.25), 250.0);
    }

    #[test]
    fn test_format_mm_trims() {
        assert_eq!(format_mm(10.0), "10");
        assert_eq!(format_mm(0.0625), "0.0625");
        assert_eq!(format_mm(0.1 + 0.2), "0.3");
        assert_eq!(format_mm(-0.0000001), "0");
        assert_eq!(format_mm(1.0 / 3.0), "0.333333");
    }

    #[test]
    fn test_format_length_picks_unit() {
        assert_eq!(format_length(2.0), "2.000 mm");
        assert_eq!(format_length(0.005), "5.00 µm");
        assert_eq!(format_length(0.00025), "250 nm");
    }

    #[test]
    fn test_format_plate_size() {
        assert_eq!(format_plate_size(101.6, 50.0), "101.60mm × 50.00mm");
    }
}
