//! Unit conversion utilities
//!
//! Job parts address the bed in integer device pixels at a declared
//! resolution (dots per inch); the controller expects physical millimetres.
//! These helpers convert between the two and apply the optional X-axis
//! mirror against the bed width. All functions are pure.

/// Millimetres per inch, the fixed pixel/physical ratio anchor.
pub const MM_PER_INCH: f64 = 25.4;

/// Convert a pixel count to millimetres at the given resolution.
pub fn px_to_mm(px: f64, dpi: f64) -> f64 {
    px * MM_PER_INCH / dpi
}

/// Convert millimetres to a pixel count at the given resolution.
pub fn mm_to_px(mm: f64, dpi: f64) -> f64 {
    mm * dpi / MM_PER_INCH
}

/// Bed width expressed in whole device pixels at the given resolution.
pub fn bed_width_px(bed_width_mm: f64, dpi: f64) -> i32 {
    mm_to_px(bed_width_mm, dpi) as i32
}

/// Map a device pixel coordinate to physical millimetres.
///
/// When `flip_x` is set the X coordinate is mirrored against the bed width
/// before conversion; Y is never mirrored.
pub fn to_physical(x: i32, y: i32, dpi: f64, flip_x: bool, bed_width_mm: f64) -> (f64, f64) {
    let x = if flip_x {
        bed_width_px(bed_width_mm, dpi) - x
    } else {
        x
    };
    (px_to_mm(x as f64, dpi), px_to_mm(y as f64, dpi))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn px_mm_round_trip() {
        let mm = px_to_mm(mm_to_px(12.5, 500.0), 500.0);
        assert!((mm - 12.5).abs() < 1e-9);
    }

    #[test]
    fn to_physical_without_flip() {
        // 254 dpi makes one pixel exactly 0.1 mm
        let (x, y) = to_physical(10, 20, 254.0, false, 250.0);
        assert!((x - 1.0).abs() < 1e-9);
        assert!((y - 2.0).abs() < 1e-9);
    }

    #[test]
    fn flip_mirrors_x_against_bed_width() {
        let (x, _) = to_physical(0, 0, 254.0, true, 250.0);
        assert!((x - 250.0).abs() < 1e-9);
        let (x, _) = to_physical(2500, 0, 254.0, true, 250.0);
        assert!(x.abs() < 1e-9);
    }

    #[test]
    fn flip_never_touches_y() {
        let (_, y) = to_physical(100, 300, 254.0, true, 250.0);
        assert!((y - 30.0).abs() < 1e-9);
    }
}
