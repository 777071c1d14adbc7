//! Shared constants for split geometry and segmentation
//!
//! This module centralizes the magic numbers used by the geometry
//! calculator, the split position store and the segmenter.

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

// =============================================================================
// Split Lines
// =============================================================================

/// Narrowest split line that is still comfortable to grab (display units)
pub const MIN_SPLIT_LINE_WIDTH: f32 = 88.0;

/// Extra width added on both sides of the image by the padded split line
/// layout (display units, total over both sides)
pub const SPLIT_LINE_PADDING: f32 = 36.0;

// =============================================================================
// Segmentation
// =============================================================================

/// Minimum distance between two kept split positions (image pixels)
pub const MIN_SPLIT_GAP_PX: f32 = 10.0;

/// Default JPEG quality for written segments
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// File name prefix for segments written by the JPEG codec
pub const SEGMENT_FILE_PREFIX: &str = "segment";

// =============================================================================
// Export
// =============================================================================

/// Page width used for `Manual` exports (A4 width)
pub const MANUAL_PAGE_WIDTH_MM: f32 = 210.0;
