use super::{FilterPlan, ScaledWatermark, Transform};

const MEDIA_INPUT: &str = "[0:v]";
const WATERMARK_INPUT: &str = "[1:v]";
const TRANSFORMED_MEDIA: &str = "[media]";
const SCALED_WATERMARK: &str = "[wtrmrk]";

impl Transform {
    pub fn generate_filter(&self) -> &'static str {
        match self {
            Transform::RotateCounterClockwise => "transpose=2",
        }
    }
}

impl ScaledWatermark {
    pub fn generate_filter(&self) -> String {
        let (width, height) = self.rounded();
        format!("scale={}:{}", width, height)
    }
}

impl FilterPlan {
    /// Serialise the plan into an ffmpeg `-filter_complex` graph where input 0
    /// is the media file and input 1 the watermark image.
    pub fn generate_filter_complex(&self) -> String {
        let mut graph = String::new();

        let media_label = match self.transform {
            Some(transform) => {
                graph.push_str(&format!(
                    "{MEDIA_INPUT}{}{TRANSFORMED_MEDIA};",
                    transform.generate_filter()
                ));
                TRANSFORMED_MEDIA
            }
            None => MEDIA_INPUT,
        };

        graph.push_str(&format!(
            "{WATERMARK_INPUT}{}{SCALED_WATERMARK};",
            self.watermark.generate_filter()
        ));
        graph.push_str(&format!(
            "{media_label}{SCALED_WATERMARK}overlay={}",
            self.placement
        ));
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::placement::{AnchorPosition, MarginSet};
    use crate::workflow::processors::position::position;

    fn plan(transform: Option<Transform>) -> FilterPlan {
        FilterPlan {
            transform,
            watermark: ScaledWatermark {
                width: 450.0,
                height: 150.0,
            },
            placement: position(AnchorPosition::C, &MarginSet::NONE),
        }
    }

    #[test]
    fn graph_without_transform_overlays_raw_input() {
        assert_eq!(
            plan(None).generate_filter_complex(),
            "[1:v]scale=450:150[wtrmrk];[0:v][wtrmrk]overlay=main_w/2-overlay_w/2:main_h/2-overlay_h/2"
        );
    }

    #[test]
    fn transform_comes_first_and_feeds_the_overlay() {
        assert_eq!(
            plan(Some(Transform::RotateCounterClockwise)).generate_filter_complex(),
            "[0:v]transpose=2[media];[1:v]scale=450:150[wtrmrk];[media][wtrmrk]overlay=main_w/2-overlay_w/2:main_h/2-overlay_h/2"
        );
    }
}
