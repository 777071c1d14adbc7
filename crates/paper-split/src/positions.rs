//! Split position store
//!
//! Holds the cut lines of one editing session in image space. The list is
//! kept ascending after every operation except [`SplitPositions::update_split`],
//! which may leave it out of order while a drag is in progress.

use crate::constants::MIN_SPLIT_GAP_PX;
use crate::types::ImageDimensions;
use crate::{Result, SplitError};

/// How the visible viewport maps onto the image at the moment of an edit
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportMapping {
    /// Vertical scroll offset of the container (display units)
    pub scroll_offset: f32,
    /// Height of the visible part of the container (display units)
    pub visible_height: f32,
    /// Display height / actual height
    pub scale_factor: f32,
    /// Distance between pointer coordinates and the top of the container
    pub top_inset: f32,
}

impl ViewportMapping {
    fn usable_scale(&self) -> Result<f32> {
        if self.scale_factor > 0.0 && self.scale_factor.is_finite() {
            Ok(self.scale_factor)
        } else {
            Err(SplitError::LayoutPending)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SplitPositions {
    positions: Vec<f32>,
    actual_height: f32,
}

impl SplitPositions {
    pub fn new(actual: ImageDimensions) -> Self {
        Self {
            positions: Vec::new(),
            actual_height: actual.height,
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Add a split in the middle of the visible viewport.
    ///
    /// Returns the stored image-space position.
    pub fn add_split(&mut self, viewport: &ViewportMapping) -> Result<f32> {
        let scale = viewport.usable_scale()?;

        let on_display = viewport.scroll_offset + viewport.visible_height / 2.0;
        let position = self.clamp(on_display / scale);

        self.positions.push(position);
        self.sort();

        log::debug!("Added split at {position:.1}px ({} total)", self.len());
        Ok(position)
    }

    /// Move the split at `index` under the pointer. Does not re-sort.
    pub fn update_split(
        &mut self,
        index: usize,
        pointer_y: f32,
        viewport: &ViewportMapping,
    ) -> Result<f32> {
        self.check_index(index)?;
        let scale = viewport.usable_scale()?;

        let on_viewport = (pointer_y - viewport.top_inset)
            .max(0.0)
            .min(viewport.visible_height);
        let on_display = on_viewport + viewport.scroll_offset;
        let position = self.clamp(on_display / scale);

        self.positions[index] = position;
        Ok(position)
    }

    /// Remove the split at `index`, returning its position
    pub fn remove_split(&mut self, index: usize) -> Result<f32> {
        self.check_index(index)?;
        let removed = self.positions.remove(index);
        self.sort();
        Ok(removed)
    }

    pub fn remove_all_splits(&mut self) {
        self.positions.clear();
    }

    /// Restore ascending order once a drag gesture ends
    pub fn handle_drag_end(&mut self) {
        self.sort();
    }

    /// Replace all splits with one cut per page of `page` aspect ratio.
    ///
    /// Images shorter than one page leave the current splits untouched.
    /// Very flat pages are capped at one split per [`MIN_SPLIT_GAP_PX`], the
    /// densest the segmenter keeps. Returns the number of generated splits.
    pub fn auto_split(&mut self, actual: ImageDimensions, page: ImageDimensions) -> usize {
        let image_aspect = actual.aspect_ratio();
        let page_aspect = page.aspect_ratio();
        let count = (image_aspect / page_aspect).floor();

        if count.is_nan() || count < 1.0 {
            log::debug!("Image shorter than one page, auto split skipped");
            return 0;
        }

        let max_count = (actual.height / MIN_SPLIT_GAP_PX).floor().max(1.0);
        if count > max_count {
            log::warn!("Page too flat for auto split, capping at {max_count} splits");
        }
        let count = count.min(max_count) as usize;

        let page_height = actual.width * page_aspect;
        let max = self.actual_height;
        self.positions = (0..count)
            .map(|i| ((i + 1) as f32 * page_height).min(max))
            .collect();

        log::debug!(
            "Auto split into {} pages of {page_height:.1}px",
            self.len() + 1
        );
        self.positions.len()
    }

    /// Owned, ascending copy for handing off to the segmenter
    pub fn snapshot(&self) -> Vec<f32> {
        let mut snapshot = self.positions.clone();
        snapshot.sort_by(f32::total_cmp);
        snapshot
    }

    /// Positions in display space, in storage order
    pub fn display_positions(&self, scale_factor: f32) -> Vec<f32> {
        self.positions.iter().map(|p| p * scale_factor).collect()
    }

    fn clamp(&self, position: f32) -> f32 {
        position.max(0.0).min(self.actual_height)
    }

    fn sort(&mut self) {
        self.positions.sort_by(f32::total_cmp);
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.positions.len() {
            return Err(SplitError::SplitIndex {
                index,
                len: self.positions.len(),
            });
        }
        Ok(())
    }
}
