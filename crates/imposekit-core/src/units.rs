//! Unit conversion utilities
//!
//! The editor models everything in millimeters; rendering and hit-testing
//! work in pixels through a scale factor, and PDF collaborators speak in
//! points. Conversions here are pure arithmetic - the stored mm-space
//! geometry is never mutated by a display transform.

/// Millimeters per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// PostScript points per inch.
pub const PT_PER_INCH: f64 = 72.0;

/// Converts millimeters to pixels at the given scale (pixels per mm).
pub fn mm_to_px(mm: f64, px_per_mm: f64) -> f64 {
    mm * px_per_mm
}

/// Converts pixels to millimeters at the given scale (pixels per mm).
pub fn px_to_mm(px: f64, px_per_mm: f64) -> f64 {
    px / px_per_mm
}

/// Converts millimeters to PostScript points.
pub fn mm_to_pt(mm: f64) -> f64 {
    mm / MM_PER_INCH * PT_PER_INCH
}

/// Converts PostScript points to millimeters.
pub fn pt_to_mm(pt: f64) -> f64 {
    pt / PT_PER_INCH * MM_PER_INCH
}

/// Formats a millimeter value for display with two decimals.
pub fn format_mm(value_mm: f64) -> String {
    format!("{:.2} mm", value_mm)
}
