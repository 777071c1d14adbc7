//! Image codec collaborators
//!
//! The segmenter only knows the [`ImageCodec`] trait. Two implementations
//! are provided on top of the `image` crate: one keeping crops in memory and
//! one writing each crop as a JPEG file.

use crate::constants::{DEFAULT_JPEG_QUALITY, SEGMENT_FILE_PREFIX};
use crate::types::{ImageDimensions, Segment};
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use std::future::Future;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("{0}")]
    Image(#[from] image::ImageError),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("crop {segment:?} exceeds the {width}x{height} source")]
    OutOfBounds {
        segment: Segment,
        width: u32,
        height: u32,
    },
    #[error("{0}")]
    Other(String),
    /// The codec failed without a usable error value (e.g. it panicked)
    #[error("Unknown error")]
    Unknown,
}

impl From<tokio::task::JoinError> for CodecError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_panic() {
            log::warn!("Codec task panicked");
            CodecError::Unknown
        } else {
            CodecError::Other(err.to_string())
        }
    }
}

/// Crops one rectangle out of a source image
pub trait ImageCodec {
    type Source: ?Sized + Sync;
    type Output: Send;

    fn crop(
        &self,
        source: &Self::Source,
        segment: Segment,
    ) -> impl Future<Output = Result<Self::Output, CodecError>> + Send;
}

/// Keeps every crop as a decoded image
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryCodec;

impl ImageCodec for MemoryCodec {
    type Source = DynamicImage;
    type Output = DynamicImage;

    async fn crop(&self, source: &DynamicImage, segment: Segment) -> Result<DynamicImage, CodecError> {
        check_bounds(source, segment)?;
        Ok(source.crop_imm(0, segment.origin_y, segment.width, segment.height))
    }
}

/// Writes every crop as a JPEG file into `output_dir`.
///
/// Files are named after the segment origin, zero padded, so sorting the
/// file names gives page order.
#[derive(Debug, Clone)]
pub struct JpegFileCodec {
    output_dir: PathBuf,
    quality: u8,
}

impl JpegFileCodec {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// JPEG quality, clamped to 1..=100
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn segment_path(&self, segment: Segment) -> PathBuf {
        self.output_dir
            .join(format!("{SEGMENT_FILE_PREFIX}-{:08}.jpg", segment.origin_y))
    }
}

impl ImageCodec for JpegFileCodec {
    type Source = DynamicImage;
    type Output = PathBuf;

    async fn crop(&self, source: &DynamicImage, segment: Segment) -> Result<PathBuf, CodecError> {
        check_bounds(source, segment)?;
        let cropped = source.crop_imm(0, segment.origin_y, segment.width, segment.height);
        let quality = self.quality;

        // Encoding is CPU-bound, spawn blocking
        let bytes = tokio::task::spawn_blocking(move || encode_jpeg(&cropped, quality)).await??;

        let path = self.segment_path(segment);
        tokio::fs::write(&path, bytes).await?;
        log::debug!("Wrote {}", path.display());

        Ok(path)
    }
}

fn check_bounds(source: &DynamicImage, segment: Segment) -> Result<(), CodecError> {
    let (width, height) = (source.width(), source.height());
    if segment.width > width || segment.end_y() > height || segment.height == 0 {
        return Err(CodecError::OutOfBounds {
            segment,
            width,
            height,
        });
    }
    Ok(())
}

/// Encode an image as baseline JPEG (alpha is dropped)
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> image::ImageResult<Vec<u8>> {
    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
    DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder)?;
    Ok(bytes)
}

/// Load and decode a source image
pub async fn load_image(path: impl AsRef<Path>) -> crate::Result<(DynamicImage, ImageDimensions)> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path).await?;

    // Decoding is CPU-bound, spawn blocking
    let image = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes)).await??;
    let dimensions = ImageDimensions::from_pixels(image.width(), image.height())?;

    log::info!(
        "Loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok((image, dimensions))
}
