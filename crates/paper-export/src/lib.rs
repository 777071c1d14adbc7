//! PDF export of split segments
//!
//! One page per segment, in segment order, each image fitted and centered
//! on a page of the chosen size.

mod options;
mod pdf;
mod types;

pub use options::ExportOptions;
pub use pdf::{ImagePlacement, generate_pdf, generate_pdf_bytes, page_size_mm, place_image};
pub use types::{ExportError, Result};
