mod worker;

// Re-export types from library crates
pub use paper_split::{
    DisplayMetrics, ImageDimensions, PageSize, ScrollCommand, SplitOptions, SplitSession,
};
pub use worker::SessionWorker;

/// Input events sent from the UI to the session worker
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Layout {
        width: f32,
        height: f32,
    },
    TopInset {
        top_inset: f32,
    },
    Scroll {
        offset: f32,
    },
    Zoom {
        zoom_in: bool,
    },
    ToggleZoom,
    Pinch {
        scale: f32,
    },
    AddSplit,
    UpdateSplit {
        index: usize,
        pointer_y: f32,
    },
    /// Drag gesture finished, restore split order
    DragEnd,
    RemoveSplit {
        index: usize,
    },
    RemoveAllSplits,
    AutoSplit,
    /// Crop the image at the current splits
    Confirm,
}

/// Updates sent from the worker back to the UI
#[derive(Debug, Clone)]
pub enum SessionUpdate<O> {
    Metrics(DisplayMetrics),
    Positions {
        /// Image space, storage order
        positions: Vec<f32>,
        /// Display space, same order
        display: Vec<f32>,
    },
    ScrollTo(ScrollCommand),
    Segmented {
        outputs: Vec<O>,
    },
    Error {
        message: String,
    },
}
