//! Watermark planning - turns per-file facts plus the run configuration into a
//! `FilterPlan`.

use crate::{
    common::errors::WatermarkResult,
    models::{
        filter::{FilterPlan, Transform},
        media::{AspectRatio, MediaDimensions, MediaKind, Orientation},
        placement::{AnchorPosition, MarginSet},
    },
    workflow::processors::{
        position::position,
        scale::{ScaleRatios, scale},
    },
};

/// Build the filter plan for one file.
///
/// Portrait still images are stored landscape and get rotated first; the
/// watermark is then sized against the rotated frame. Videos are composited
/// as stored.
pub fn plan(
    kind: MediaKind,
    orientation: Orientation,
    dimensions: MediaDimensions,
    aspect: AspectRatio,
    anchor: AnchorPosition,
    margins: &MarginSet,
    ratios: &ScaleRatios,
) -> WatermarkResult<FilterPlan> {
    let transform = corrective_transform(kind, orientation);
    let frame = match transform {
        Some(_) => dimensions.transposed(),
        None => dimensions,
    };

    Ok(FilterPlan {
        transform,
        watermark: scale(orientation, frame, aspect, ratios),
        placement: position(anchor, margins),
    })
}

pub fn corrective_transform(kind: MediaKind, orientation: Orientation) -> Option<Transform> {
    match (kind, orientation) {
        (MediaKind::Image, Orientation::Portrait) => Some(Transform::RotateCounterClockwise),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::filter::ScaledWatermark;

    fn dims(width: u32, height: u32) -> MediaDimensions {
        MediaDimensions::new(width, height).unwrap()
    }

    fn aspect(ratio: f64) -> AspectRatio {
        AspectRatio::new(ratio).unwrap()
    }

    #[test]
    fn portrait_image_is_rotated_and_scaled_on_rotated_frame() {
        // stored 4000x3000, displayed 3000x4000
        let plan = plan(
            MediaKind::Image,
            Orientation::Portrait,
            dims(4000, 3000),
            aspect(3.0),
            AnchorPosition::Sw,
            &MarginSet::default(),
            &ScaleRatios::default(),
        )
        .unwrap();
        assert_eq!(plan.transform, Some(Transform::RotateCounterClockwise));
        assert_eq!(
            plan.watermark,
            ScaledWatermark {
                width: 600.0,
                height: 200.0
            }
        );
    }

    #[test]
    fn portrait_video_is_never_rotated() {
        let plan = plan(
            MediaKind::Video,
            Orientation::Portrait,
            dims(1080, 1920),
            aspect(2.0),
            AnchorPosition::C,
            &MarginSet::NONE,
            &ScaleRatios::default(),
        )
        .unwrap();
        assert_eq!(plan.transform, None);
        assert_eq!(plan.watermark.rounded(), (216, 108));
    }

    #[test]
    fn landscape_image_is_not_rotated() {
        assert_eq!(
            corrective_transform(MediaKind::Image, Orientation::Landscape),
            None
        );
    }
}
