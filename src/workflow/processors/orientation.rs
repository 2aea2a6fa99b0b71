//! Orientation classification.
//!
//! Images trust their EXIF `Orientation` tag; videos trust their rotation tag
//! and fall back to comparing raw dimensions.

use crate::{
    common::errors::{WatermarkError, WatermarkResult},
    models::media::{MediaDimensions, MediaKind, MediaProbe, Orientation},
};

/// Decide how a media item is meant to be displayed.
pub fn classify(
    kind: MediaKind,
    dimensions: Option<MediaDimensions>,
    orientation_tag: Option<u32>,
    rotation_tag: Option<i32>,
    exif_portrait_codes: &[u32],
) -> WatermarkResult<Orientation> {
    match kind {
        MediaKind::Image => Ok(classify_image(orientation_tag, exif_portrait_codes)),
        MediaKind::Video => classify_video(dimensions, rotation_tag),
    }
}

/// `classify` over everything the prober returned.
pub fn classify_probe(probe: &MediaProbe, exif_portrait_codes: &[u32]) -> WatermarkResult<Orientation> {
    classify(
        probe.kind()?,
        probe.dimensions,
        probe.exif_orientation,
        probe.rotation,
        exif_portrait_codes,
    )
}

fn classify_image(orientation_tag: Option<u32>, exif_portrait_codes: &[u32]) -> Orientation {
    match orientation_tag {
        Some(code) if exif_portrait_codes.contains(&code) => Orientation::Portrait,
        _ => Orientation::Landscape,
    }
}

fn classify_video(
    dimensions: Option<MediaDimensions>,
    rotation_tag: Option<i32>,
) -> WatermarkResult<Orientation> {
    if let Some(rotation) = rotation_tag.filter(|rotation| *rotation != 0) {
        return Ok(if is_quarter_turn(rotation) {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        });
    }

    match dimensions {
        Some(dims) if dims.height() > dims.width() => Ok(Orientation::Portrait),
        Some(_) => Ok(Orientation::Landscape),
        None => Err(WatermarkError::InsufficientMetadata("video orientation")),
    }
}

/// Odd multiples of 90 degrees swap the displayed width and height.
fn is_quarter_turn(rotation: i32) -> bool {
    rotation % 90 == 0 && (rotation / 90) % 2 != 0
}
