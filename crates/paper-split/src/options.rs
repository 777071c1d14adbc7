use crate::constants::DEFAULT_JPEG_QUALITY;
use crate::types::*;
use crate::{Result, SplitError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Split and export configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SplitOptions {
    // Target page
    pub page_size: PageSize,
    pub auto_split: bool,

    // Segment output
    pub jpeg_quality: u8,
    /// Crops allowed to run at once; 1 keeps the strict one-by-one order
    pub max_in_flight_crops: usize,

    // Input surface
    /// Offset between pointer coordinates and the top of the container
    pub top_inset: f32,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            auto_split: true,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            max_in_flight_crops: 1,
            top_inset: 0.0,
        }
    }
}

impl SplitOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: Self = serde_json::from_slice(&bytes)
            .map_err(|e| SplitError::Config(format!("Failed to parse config: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SplitError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if let PageSize::Custom {
            width_mm,
            height_mm,
        } = self.page_size
        {
            if !(width_mm > 0.0 && height_mm > 0.0 && width_mm.is_finite() && height_mm.is_finite())
            {
                return Err(SplitError::Config(format!(
                    "Custom page size must be positive, got {}x{} mm",
                    width_mm, height_mm
                )));
            }
        }

        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(SplitError::Config(
                "JPEG quality must be between 1 and 100".to_string(),
            ));
        }

        if self.max_in_flight_crops == 0 {
            return Err(SplitError::Config(
                "At least one crop must be allowed in flight".to_string(),
            ));
        }

        check_top_inset(self.top_inset)
    }
}

/// Pointer offsets must be finite and non-negative
pub(crate) fn check_top_inset(top_inset: f32) -> Result<()> {
    if !top_inset.is_finite() || top_inset < 0.0 {
        return Err(SplitError::Config(format!(
            "Top inset must be a non-negative number, got {}",
            top_inset
        )));
    }
    Ok(())
}
