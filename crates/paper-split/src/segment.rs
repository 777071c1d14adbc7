//! Image segmentation
//!
//! Turns the final split positions into full-width crop rectangles that tile
//! the source image top to bottom, then realizes them through an
//! [`ImageCodec`].

use crate::codec::{CodecError, ImageCodec};
use crate::constants::MIN_SPLIT_GAP_PX;
use crate::types::{ImageDimensions, Segment};
use crate::{Result, SplitError};
use futures_util::{StreamExt, TryStreamExt, stream};
use thiserror::Error;

/// A codec failure, tagged with the rectangle being cropped
#[derive(Error, Debug)]
#[error("failed to crop image: {source}")]
pub struct CropError {
    pub segment: Segment,
    #[source]
    pub source: CodecError,
}

/// Keep the usable split positions, ascending.
///
/// Positions on the top or bottom edge (at pixel resolution) are dropped, as
/// is any position closer than [`MIN_SPLIT_GAP_PX`] to the previous kept one.
pub fn filter_positions(positions: &[f32], actual: ImageDimensions) -> Vec<f32> {
    let bottom = actual.height.round();

    let mut sorted: Vec<f32> = positions
        .iter()
        .copied()
        .filter(|p| p.is_finite())
        .filter(|p| {
            let y = p.round();
            y > 0.0 && y < bottom
        })
        .collect();
    sorted.sort_by(f32::total_cmp);

    sorted.into_iter().fold(Vec::new(), |mut kept, position| {
        match kept.last() {
            Some(&last) if position - last < MIN_SPLIT_GAP_PX => {
                log::debug!("Dropping split at {position:.1}px, too close to {last:.1}px");
            }
            _ => kept.push(position),
        }
        kept
    })
}

/// Crop rectangles for `positions`, one more than the kept positions
pub fn plan_segments(actual: ImageDimensions, positions: &[f32]) -> Vec<Segment> {
    let width = actual.width.round() as u32;
    let height = actual.height.round() as u32;

    let kept = filter_positions(positions, actual);
    let mut segments = Vec::with_capacity(kept.len() + 1);
    let mut start_y = 0;

    for position in kept {
        let y = position.round() as u32;
        segments.push(Segment {
            origin_y: start_y,
            width,
            height: y - start_y,
        });
        start_y = y;
    }

    if start_y < height {
        segments.push(Segment {
            origin_y: start_y,
            width,
            height: height - start_y,
        });
    }

    segments
}

/// Split `source` at `positions`, one crop at a time in page order.
///
/// The first failing crop aborts the whole split. Outputs already produced by
/// the codec are not cleaned up.
pub async fn split_image<C: ImageCodec>(
    codec: &C,
    source: &C::Source,
    actual: ImageDimensions,
    positions: &[f32],
) -> Result<Vec<C::Output>> {
    let segments = plan_segments(actual, positions);
    log::info!("Splitting image into {} segments", segments.len());

    let mut outputs = Vec::with_capacity(segments.len());
    for segment in segments {
        let output = crop_segment(codec, source, segment)
            .await
            .map_err(SplitError::Split)?;
        outputs.push(output);
    }

    Ok(outputs)
}

/// Like [`split_image`], with up to `max_in_flight` crops running at once.
///
/// Outputs are still returned in page order, not completion order.
pub async fn split_image_concurrent<C: ImageCodec>(
    codec: &C,
    source: &C::Source,
    actual: ImageDimensions,
    positions: &[f32],
    max_in_flight: usize,
) -> Result<Vec<C::Output>> {
    let segments = plan_segments(actual, positions);
    log::info!(
        "Splitting image into {} segments ({} at a time)",
        segments.len(),
        max_in_flight.max(1)
    );

    stream::iter(segments)
        .map(|segment| crop_segment(codec, source, segment))
        .buffered(max_in_flight.max(1))
        .try_collect::<Vec<_>>()
        .await
        .map_err(SplitError::Split)
}

async fn crop_segment<C: ImageCodec>(
    codec: &C,
    source: &C::Source,
    segment: Segment,
) -> std::result::Result<C::Output, CropError> {
    codec
        .crop(source, segment)
        .await
        .map_err(|source| CropError { segment, source })
}
