//! Display geometry for the split editor
//!
//! Pure functions that place the source image inside the scroll container
//! and size the split lines drawn on top of it. Nothing here is cached:
//! callers recompute on every layout or zoom change.

use crate::constants::MIN_SPLIT_LINE_WIDTH;
use crate::types::ImageDimensions;

// =============================================================================
// Image Placement
// =============================================================================

/// Compute the on-screen size of the image.
///
/// Zoomed in, the image fills the container width and may be taller than the
/// container (scrollable). Zoomed out, it fits the container height.
///
/// Returns `(0, 0)` until the container has a real layout.
pub fn display_dimensions(
    actual: ImageDimensions,
    container: ImageDimensions,
    zoomed_in: bool,
) -> ImageDimensions {
    if container.is_empty() || actual.is_empty() {
        return ImageDimensions::ZERO;
    }

    let aspect = actual.aspect_ratio();

    if zoomed_in {
        ImageDimensions::new(container.width, container.width * aspect)
    } else {
        ImageDimensions::new(container.height / aspect, container.height)
    }
}

/// Ratio between display height and actual height.
///
/// Multiply an image-space Y by this to get a display-space Y.
pub fn scale_factor(display: ImageDimensions, actual: ImageDimensions) -> f32 {
    if actual.height <= 0.0 {
        return 0.0;
    }
    display.height / actual.height
}

// =============================================================================
// Split Lines
// =============================================================================

/// Horizontal extent of a split line in container coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SplitLineExtent {
    pub width: f32,
    pub left: f32,
}

/// Split line spanning the image width, never narrower than
/// [`MIN_SPLIT_LINE_WIDTH`] and never wider than the container.
pub fn split_line_extent(display: ImageDimensions, container: ImageDimensions) -> SplitLineExtent {
    padded_split_line_extent(display, container, 0.0)
}

/// Like [`split_line_extent`], with `padding` added to the image width before
/// clamping.
pub fn padded_split_line_extent(
    display: ImageDimensions,
    container: ImageDimensions,
    padding: f32,
) -> SplitLineExtent {
    // The container bound wins over the usability floor on very narrow screens
    let width = (display.width + padding)
        .max(MIN_SPLIT_LINE_WIDTH)
        .min(container.width);
    let left = container.width / 2.0 - width / 2.0;

    SplitLineExtent { width, left }
}

// =============================================================================
// Combined Metrics
// =============================================================================

/// Everything the editor needs to draw one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplayMetrics {
    pub display: ImageDimensions,
    pub split_line: SplitLineExtent,
    pub scale_factor: f32,
}

impl DisplayMetrics {
    pub fn compute(actual: ImageDimensions, container: ImageDimensions, zoomed_in: bool) -> Self {
        let display = display_dimensions(actual, container, zoomed_in);

        Self {
            display,
            split_line: split_line_extent(display, container),
            scale_factor: scale_factor(display, actual),
        }
    }

    /// True once the container has been laid out
    pub fn is_ready(&self) -> bool {
        self.scale_factor > 0.0 && self.scale_factor.is_finite()
    }
}
