//! Unit conversion between editor pixels, millimeters and PDF points
//!
//! Layout files are authored in a 96 DPI pixel space. Every coordinate and
//! extent that crosses into page space goes through `px_to_mm` exactly once.

// =============================================================================
// Constants
// =============================================================================

/// Pixel density of the layout editor
pub const EDITOR_DPI: f32 = 96.0;

/// Millimeters per inch
pub const MM_PER_INCH: f32 = 25.4;

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / MM_PER_INCH;

/// Editor pixels per point (96 DPI vs 72 DPI)
pub const PX_PER_PT: f32 = EDITOR_DPI / 72.0;

// =============================================================================
// Conversions
// =============================================================================

/// Convert editor pixels to millimeters
#[inline]
pub fn px_to_mm(px: f32) -> f32 {
    px / (EDITOR_DPI / MM_PER_INCH)
}

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Convert points to millimeters
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / POINTS_PER_MM
}

/// Convert an editor font size (pixels) to points
#[inline]
pub fn px_to_pt(px: f32) -> f32 {
    px / PX_PER_PT
}
