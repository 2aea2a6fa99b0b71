use crate::models::placement::Placement;

pub mod generator;

/// Corrective transform applied to the media stream before compositing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transform {
    /// Quarter turn counter-clockwise (`transpose=2`).
    RotateCounterClockwise,
}

/// Render size of the watermark for one file, in (fractional) pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledWatermark {
    pub width: f64,
    pub height: f64,
}

impl ScaledWatermark {
    /// Whole-pixel size handed to the transcoder. Never below 1x1.
    pub fn rounded(&self) -> (u32, u32) {
        (round_pixels(self.width), round_pixels(self.height))
    }
}

fn round_pixels(value: f64) -> u32 {
    value.round().max(1.0) as u32
}

/// Everything the transcoder needs to composite one file: the optional
/// transform, the watermark size and the overlay placement, in that order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterPlan {
    pub transform: Option<Transform>,
    pub watermark: ScaledWatermark,
    pub placement: Placement,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_happens_at_the_boundary() {
        let watermark = ScaledWatermark {
            width: 449.6,
            height: 0.2,
        };
        assert_eq!(watermark.rounded(), (450, 1));
    }
}
