use crate::{
    common::{
        WATERMARK_TO_HEIGHT_RATIO, WATERMARK_TO_WIDTH_RATIO,
        errors::{WatermarkError, WatermarkResult},
    },
    models::{
        filter::ScaledWatermark,
        media::{AspectRatio, MediaDimensions, Orientation},
    },
};

/// Size of the watermark relative to the frame.
///
/// Landscape frames size the watermark by height, portrait frames by width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleRatios {
    height_ratio: f64,
    width_ratio: f64,
}

impl ScaleRatios {
    pub fn new(height_ratio: f64, width_ratio: f64) -> WatermarkResult<Self> {
        for (name, ratio) in [("height", height_ratio), ("width", width_ratio)] {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(WatermarkError::config(format!(
                    "watermark to {name} ratio must be in (0, 1], got {ratio}"
                )));
            }
        }
        Ok(Self {
            height_ratio,
            width_ratio,
        })
    }

    pub fn height_ratio(&self) -> f64 {
        self.height_ratio
    }

    pub fn width_ratio(&self) -> f64 {
        self.width_ratio
    }
}

impl Default for ScaleRatios {
    fn default() -> Self {
        Self {
            height_ratio: WATERMARK_TO_HEIGHT_RATIO,
            width_ratio: WATERMARK_TO_WIDTH_RATIO,
        }
    }
}

/// Render size of the watermark on a frame of `dimensions`, keeping its aspect ratio.
pub fn scale(
    orientation: Orientation,
    dimensions: MediaDimensions,
    aspect: AspectRatio,
    ratios: &ScaleRatios,
) -> ScaledWatermark {
    match orientation {
        Orientation::Landscape => {
            let height = dimensions.height() as f64 * ratios.height_ratio;
            ScaledWatermark {
                width: aspect.value() * height,
                height,
            }
        }
        Orientation::Portrait => {
            let width = dimensions.width() as f64 * ratios.width_ratio;
            ScaledWatermark {
                width,
                height: width / aspect.value(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aspect(ratio: f64) -> AspectRatio {
        AspectRatio::new(ratio).unwrap()
    }

    #[test]
    fn landscape_scales_by_frame_height() {
        let dims = MediaDimensions::new(1000, 500).unwrap();
        let scaled = scale(Orientation::Landscape, dims, aspect(2.0), &ScaleRatios::default());
        assert_eq!(scaled, ScaledWatermark { width: 50.0, height: 25.0 });
    }

    #[test]
    fn portrait_scales_by_frame_width() {
        let dims = MediaDimensions::new(500, 1000).unwrap();
        let scaled = scale(Orientation::Portrait, dims, aspect(2.0), &ScaleRatios::default());
        assert_eq!(scaled, ScaledWatermark { width: 100.0, height: 50.0 });
    }

    #[test]
    fn aspect_ratio_is_preserved() {
        let dims = MediaDimensions::new(4000, 3000).unwrap();
        for orientation in [Orientation::Landscape, Orientation::Portrait] {
            let scaled = scale(orientation, dims, aspect(3.0), &ScaleRatios::default());
            assert!((scaled.width / scaled.height - 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn ratios_outside_unit_interval_are_rejected() {
        assert!(ScaleRatios::new(0.05, 0.2).is_ok());
        assert!(ScaleRatios::new(1.0, 1.0).is_ok());
        for (h, w) in [(0.0, 0.2), (0.05, 1.5), (-0.1, 0.2), (f64::NAN, 0.2)] {
            assert!(matches!(
                ScaleRatios::new(h, w),
                Err(WatermarkError::Configuration(_))
            ));
        }
    }
}
