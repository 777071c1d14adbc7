//! One split-editing session for one image
//!
//! Wires container layout, zoom/scroll state and the split position store
//! together, so that UI events can be forwarded as they arrive.

use crate::Result;
use crate::geometry::DisplayMetrics;
use crate::options::{SplitOptions, check_top_inset};
use crate::positions::{SplitPositions, ViewportMapping};
use crate::types::{ImageDimensions, PageSize};
use crate::zoom::{ScrollCommand, ZoomScroll};

#[derive(Debug, Clone)]
pub struct SplitSession {
    actual: ImageDimensions,
    page_size: PageSize,
    container: ImageDimensions,
    top_inset: f32,
    zoom: ZoomScroll,
    positions: SplitPositions,
}

impl SplitSession {
    pub fn new(actual: ImageDimensions, page_size: PageSize) -> Self {
        Self {
            actual,
            page_size,
            container: ImageDimensions::ZERO,
            top_inset: 0.0,
            zoom: ZoomScroll::new(),
            positions: SplitPositions::new(actual),
        }
    }

    /// Session with the page size and top inset of `options`
    pub fn from_options(actual: ImageDimensions, options: &SplitOptions) -> Self {
        Self {
            top_inset: options.top_inset,
            ..Self::new(actual, options.page_size)
        }
    }

    pub fn actual(&self) -> ImageDimensions {
        self.actual
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn container(&self) -> ImageDimensions {
        self.container
    }

    pub fn zoom(&self) -> &ZoomScroll {
        &self.zoom
    }

    // Input surface

    pub fn handle_layout(&mut self, width: f32, height: f32) {
        self.container = ImageDimensions::new(width, height);
    }

    /// Rejects negative or non-finite insets, keeping the previous one
    pub fn set_top_inset(&mut self, top_inset: f32) -> Result<()> {
        check_top_inset(top_inset)?;
        self.top_inset = top_inset;
        Ok(())
    }

    pub fn top_inset(&self) -> f32 {
        self.top_inset
    }

    pub fn handle_scroll(&mut self, offset: f32) {
        self.zoom.handle_scroll(offset);
    }

    pub fn set_zoom(&mut self, zoom_in: bool) -> Option<ScrollCommand> {
        self.zoom.set_zoom(zoom_in)
    }

    pub fn toggle_zoom(&mut self) -> Option<ScrollCommand> {
        self.zoom.toggle()
    }

    pub fn handle_pinch(&mut self, scale: f32) -> Option<ScrollCommand> {
        self.zoom.handle_pinch(scale)
    }

    /// Current display metrics, recomputed on every call
    pub fn metrics(&self) -> DisplayMetrics {
        DisplayMetrics::compute(self.actual, self.container, self.zoom.is_zoomed_in())
    }

    fn viewport(&self) -> ViewportMapping {
        ViewportMapping {
            scroll_offset: self.zoom.current_offset(),
            visible_height: self.container.height,
            scale_factor: self.metrics().scale_factor,
            top_inset: self.top_inset,
        }
    }

    // Split editing

    pub fn add_split(&mut self) -> Result<f32> {
        let viewport = self.viewport();
        self.positions.add_split(&viewport)
    }

    pub fn update_split(&mut self, index: usize, pointer_y: f32) -> Result<f32> {
        let viewport = self.viewport();
        self.positions.update_split(index, pointer_y, &viewport)
    }

    pub fn remove_split(&mut self, index: usize) -> Result<f32> {
        self.positions.remove_split(index)
    }

    pub fn remove_all_splits(&mut self) {
        self.positions.remove_all_splits();
    }

    pub fn handle_drag_end(&mut self) {
        self.positions.handle_drag_end();
    }

    /// Auto split for the session page size. `Manual` pages never split.
    pub fn auto_split(&mut self) -> usize {
        match self.page_size.dimensions() {
            Some(page) => self.positions.auto_split(self.actual, page),
            None => {
                log::debug!("Manual page size, auto split skipped");
                0
            }
        }
    }

    pub fn positions(&self) -> &[f32] {
        self.positions.as_slice()
    }

    /// Split positions in display space, for drawing the lines
    pub fn display_positions(&self) -> Vec<f32> {
        self.positions.display_positions(self.metrics().scale_factor)
    }

    /// Ascending copy of the positions for the segmenter
    pub fn snapshot(&self) -> Vec<f32> {
        self.positions.snapshot()
    }
}
