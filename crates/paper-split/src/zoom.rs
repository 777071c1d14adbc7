//! Zoom and scroll coordination
//!
//! Tracks whether the image is zoomed in (fit to width, scrollable) or zoomed
//! out (fit to screen), and remembers the zoomed-in scroll offset so that
//! zooming back in returns to the same place.

/// Zoom states of the split editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZoomState {
    /// Fit to width, vertically scrollable
    #[default]
    ZoomedIn,
    /// Whole image visible, no scrolling
    ZoomedOut,
}

/// Instruction for the scroll surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollCommand {
    pub offset: f32,
    pub animated: bool,
    /// Apply on the next tick, after the new layout has settled
    pub deferred: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ZoomScroll {
    state: ZoomState,
    current_offset: f32,
    last_offset_while_zoomed: f32,
}

impl ZoomScroll {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ZoomState {
        self.state
    }

    pub fn is_zoomed_in(&self) -> bool {
        self.state == ZoomState::ZoomedIn
    }

    pub fn current_offset(&self) -> f32 {
        self.current_offset
    }

    pub fn last_offset_while_zoomed(&self) -> f32 {
        self.last_offset_while_zoomed
    }

    /// Record a scroll event. Ignored while zoomed out.
    pub fn handle_scroll(&mut self, offset: f32) {
        if self.is_zoomed_in() {
            self.current_offset = offset;
            self.last_offset_while_zoomed = offset;
        }
    }

    /// Switch zoom state, returning the scroll the surface must perform.
    ///
    /// Requesting the current state does nothing.
    pub fn set_zoom(&mut self, zoom_in: bool) -> Option<ScrollCommand> {
        match (self.state, zoom_in) {
            (ZoomState::ZoomedIn, false) => {
                self.last_offset_while_zoomed = self.current_offset;
                self.state = ZoomState::ZoomedOut;
                self.current_offset = 0.0;
                log::debug!(
                    "Zoomed out, remembering offset {:.1}",
                    self.last_offset_while_zoomed
                );
                Some(ScrollCommand {
                    offset: 0.0,
                    animated: false,
                    deferred: false,
                })
            }
            (ZoomState::ZoomedOut, true) => {
                self.state = ZoomState::ZoomedIn;
                self.current_offset = self.last_offset_while_zoomed;
                log::debug!("Zoomed in, restoring offset {:.1}", self.current_offset);
                Some(ScrollCommand {
                    offset: self.last_offset_while_zoomed,
                    animated: false,
                    deferred: true,
                })
            }
            _ => None,
        }
    }

    pub fn toggle(&mut self) -> Option<ScrollCommand> {
        self.set_zoom(!self.is_zoomed_in())
    }

    /// Pinch gestures zoom in when spreading, out when pinching
    pub fn handle_pinch(&mut self, scale: f32) -> Option<ScrollCommand> {
        self.set_zoom(scale > 1.0)
    }
}
