pub mod codec;
pub mod constants;
mod geometry;
mod options;
mod positions;
mod segment;
mod session;
mod types;
mod zoom;

pub use codec::{CodecError, ImageCodec, JpegFileCodec, MemoryCodec, load_image};
pub use geometry::*;
pub use options::*;
pub use positions::{SplitPositions, ViewportMapping};
pub use segment::{
    CropError, filter_positions, plan_segments, split_image, split_image_concurrent,
};
pub use session::SplitSession;
pub use types::*;
pub use zoom::{ScrollCommand, ZoomScroll, ZoomState};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("failed to split image: {0}")]
    Split(#[source] CropError),
    #[error("Split index {index} out of range ({len} splits)")]
    SplitIndex { index: usize, len: usize },
    #[error("Container layout not available yet")]
    LayoutPending,
    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: f32, height: f32 },
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, SplitError>;
