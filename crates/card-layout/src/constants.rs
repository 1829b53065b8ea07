//! Shared constants for card layout
//!
//! This module centralizes magic numbers used by the design canvas,
//! the region defaults, and the export planner.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

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

// =============================================================================
// Design Canvas
// =============================================================================

/// Width of the reference design canvas (design units)
pub const REFERENCE_WIDTH: f32 = 200.0;

/// Height of the reference design canvas (design units)
pub const REFERENCE_HEIGHT: f32 = 280.0;

// =============================================================================
// Project Defaults
// =============================================================================

pub const DEFAULT_PROJECT_NAME: &str = "default";
pub const DEFAULT_COLUMNS: usize = 3;
pub const DEFAULT_ROWS: usize = 3;

/// Default card border width (design units)
pub const DEFAULT_BORDER_WIDTH: f32 = 2.0;

// =============================================================================
// Region Defaults (design units, relative to the reference canvas)
// =============================================================================

pub const DEFAULT_TEXT_X: f32 = 10.0;
pub const DEFAULT_TEXT_Y: f32 = 10.0;
pub const DEFAULT_TEXT_WIDTH: f32 = 80.0;
pub const DEFAULT_TEXT_HEIGHT: f32 = 30.0;
pub const DEFAULT_FONT_SIZE: f32 = 12.0;
pub const DEFAULT_FONT_FAMILY: &str = "Helvetica";

pub const DEFAULT_IMAGE_X: f32 = 10.0;
pub const DEFAULT_IMAGE_Y: f32 = 50.0;
pub const DEFAULT_IMAGE_WIDTH: f32 = 60.0;
pub const DEFAULT_IMAGE_HEIGHT: f32 = 60.0;

// =============================================================================
// Export
// =============================================================================

/// Default page margin (mm)
pub const DEFAULT_MARGIN_MM: f32 = 10.0;

/// Card border: millimeters of line per design unit of border width
pub const BORDER_WIDTH_TO_MM: f32 = 0.1;

/// Watermark font size (points)
pub const WATERMARK_FONT_SIZE_PT: f32 = 6.0;

/// Watermark anchor, measured left from the card's right edge (mm)
pub const WATERMARK_OFFSET_X_MM: f32 = 15.0;

/// Watermark baseline, measured up from the card's bottom edge (mm)
pub const WATERMARK_OFFSET_Y_MM: f32 = 2.0;

/// Approximate character width ratio for Helvetica
pub const HELVETICA_CHAR_WIDTH_RATIO: f32 = 0.5;
