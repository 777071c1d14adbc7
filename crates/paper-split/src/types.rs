use crate::{Result, SplitError};

/// Width and height of an image, either in source pixels or in display units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageDimensions {
    pub width: f32,
    pub height: f32,
}

impl ImageDimensions {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create dimensions without any checks (display and container sizes,
    /// which are legitimately zero before the first layout)
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Create dimensions for an actual source image.
    ///
    /// Both sides must be finite and strictly positive.
    pub fn validated(width: f32, height: f32) -> Result<Self> {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(SplitError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Dimensions of a decoded image in pixels
    pub fn from_pixels(width: u32, height: u32) -> Result<Self> {
        Self::validated(width as f32, height as f32)
    }

    /// Height divided by width
    pub fn aspect_ratio(self) -> f32 {
        self.height / self.width
    }

    /// True if either side is zero (or negative)
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Target page sizes for splitting and export.
///
/// All dimensions are portrait and in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PageSize {
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    Custom {
        width_mm: f32,
        height_mm: f32,
    },
    /// No target page: split positions are placed by hand only
    Manual,
}

impl PageSize {
    /// Get base dimensions, `None` for `Manual`
    pub fn dimensions_mm(self) -> Option<(f32, f32)> {
        match self {
            PageSize::A4 => Some((210.0, 297.0)),
            PageSize::A5 => Some((148.0, 210.0)),
            PageSize::Letter => Some((215.9, 279.4)),
            PageSize::Legal => Some((215.9, 355.6)),
            PageSize::Custom {
                width_mm,
                height_mm,
            } => Some((width_mm, height_mm)),
            PageSize::Manual => None,
        }
    }

    /// Page dimensions as an `ImageDimensions` value, `None` for `Manual`
    pub fn dimensions(self) -> Option<ImageDimensions> {
        self.dimensions_mm()
            .map(|(width, height)| ImageDimensions::new(width, height))
    }

    pub fn name(&self) -> &'static str {
        match self {
            PageSize::A4 => "A4",
            PageSize::A5 => "A5",
            PageSize::Letter => "Letter",
            PageSize::Legal => "Legal",
            PageSize::Custom { .. } => "Custom",
            PageSize::Manual => "Manual",
        }
    }

    pub fn is_manual(&self) -> bool {
        matches!(self, PageSize::Manual)
    }
}

/// One crop rectangle of the source image, spanning its full width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    /// Top edge in source pixels
    pub origin_y: u32,
    pub width: u32,
    pub height: u32,
}

impl Segment {
    /// Bottom edge (exclusive) in source pixels
    pub fn end_y(&self) -> u32 {
        self.origin_y + self.height
    }
}
