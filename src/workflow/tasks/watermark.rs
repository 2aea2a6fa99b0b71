use log::debug;
use std::path::{Path, PathBuf};

use crate::{
    common::errors::{WatermarkError, WatermarkResult},
    config::AppConfig,
    models::{
        filter::FilterPlan,
        media::{AspectRatio, MediaProbe},
    },
    workflow::{
        processors::{orientation::classify_probe, plan::plan, scale::ScaleRatios},
        types::{MediaProber, Transcoder},
    },
};

/// Everything a file needs that stays the same for the whole run.
pub struct WatermarkContext<'a> {
    pub config: &'a AppConfig,
    pub ratios: ScaleRatios,
    pub aspect: AspectRatio,
    pub watermark: &'a Path,
    pub prober: &'a dyn MediaProber,
    pub transcoder: &'a dyn Transcoder,
}

pub struct WatermarkTask {
    source_path: PathBuf,
    output_path: PathBuf,
}

impl WatermarkTask {
    pub fn new(source_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            source_path,
            output_path,
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn run(&self, ctx: &WatermarkContext) -> WatermarkResult<()> {
        watermark_task(ctx, &self.source_path, &self.output_path)
    }
}

pub fn watermark_task(ctx: &WatermarkContext, source: &Path, output: &Path) -> WatermarkResult<()> {
    let probe = ctx.prober.probe(source)?;
    let plan = plan_for_probe(ctx, &probe)?;
    let filter_complex = plan.generate_filter_complex();
    debug!("{:?}: {}", source, filter_complex);
    ctx.transcoder
        .transcode(source, ctx.watermark, &filter_complex, output)
}

/// Filter plan for a probed file. A forced orientation skips classification.
pub fn plan_for_probe(ctx: &WatermarkContext, probe: &MediaProbe) -> WatermarkResult<FilterPlan> {
    let kind = probe.kind()?;
    let orientation = match ctx.config.orientation {
        Some(orientation) => orientation,
        None => classify_probe(probe, &ctx.config.exif_portrait_codes)?,
    };
    let dimensions = probe
        .dimensions
        .ok_or(WatermarkError::InsufficientMetadata("media dimensions"))?;

    plan(
        kind,
        orientation,
        dimensions,
        ctx.aspect,
        ctx.config.position,
        &ctx.config.margins,
        &ctx.ratios,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        filter::Transform,
        media::{MediaDimensions, Orientation},
    };
    use std::sync::Mutex;

    struct StaticProber(MediaProbe);

    impl MediaProber for StaticProber {
        fn mime_type(&self, _path: &Path) -> Option<String> {
            Some(self.0.mime.clone())
        }

        fn probe(&self, _path: &Path) -> WatermarkResult<MediaProbe> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct RecordingTranscoder(Mutex<Vec<String>>);

    impl Transcoder for RecordingTranscoder {
        fn transcode(&self, _: &Path, _: &Path, filter_complex: &str, _: &Path) -> WatermarkResult<()> {
            self.0.lock().unwrap().push(filter_complex.to_string());
            Ok(())
        }
    }

    fn image(width: u32, height: u32, exif: Option<u32>) -> MediaProbe {
        MediaProbe {
            mime: "image/jpeg".into(),
            dimensions: MediaDimensions::new(width, height),
            exif_orientation: exif,
            rotation: None,
        }
    }

    fn run(config: &AppConfig, probe: MediaProbe) -> (WatermarkResult<()>, Vec<String>) {
        let prober = StaticProber(probe);
        let transcoder = RecordingTranscoder::default();
        let ctx = WatermarkContext {
            config,
            ratios: config.scale_ratios().unwrap(),
            aspect: AspectRatio::new(3.0).unwrap(),
            watermark: Path::new("logo.png"),
            prober: &prober,
            transcoder: &transcoder,
        };
        let task = WatermarkTask::new("a.jpg".into(), "wm_a.jpg".into());
        let result = task.run(&ctx);
        (result, transcoder.0.into_inner().unwrap())
    }

    #[test]
    fn landscape_image_with_defaults() {
        let (result, graphs) = run(&AppConfig::default(), image(4000, 3000, Some(1)));
        assert!(result.is_ok());
        assert_eq!(
            graphs,
            vec!["[1:v]scale=450:150[wtrmrk];[0:v][wtrmrk]overlay=main_w-overlay_w-15:main_h-overlay_h-15"]
        );
    }

    #[test]
    fn forced_orientation_overrides_exif() {
        let config = AppConfig {
            orientation: Some(Orientation::Portrait),
            ..Default::default()
        };
        let prober = StaticProber(image(4000, 3000, None));
        let transcoder = RecordingTranscoder::default();
        let ctx = WatermarkContext {
            config: &config,
            ratios: config.scale_ratios().unwrap(),
            aspect: AspectRatio::new(3.0).unwrap(),
            watermark: Path::new("logo.png"),
            prober: &prober,
            transcoder: &transcoder,
        };
        let plan = plan_for_probe(&ctx, &prober.0).unwrap();
        assert_eq!(plan.transform, Some(Transform::RotateCounterClockwise));
    }

    #[test]
    fn missing_dimensions_fail_without_transcoding() {
        let mut probe = image(1, 1, None);
        probe.dimensions = None;
        let (result, graphs) = run(&AppConfig::default(), probe);
        assert_eq!(
            result,
            Err(WatermarkError::InsufficientMetadata("media dimensions"))
        );
        assert!(graphs.is_empty());
    }

    #[test]
    fn unsupported_mime_is_reported() {
        let mut probe = image(10, 10, None);
        probe.mime = "audio/mpeg".into();
        let (result, _) = run(&AppConfig::default(), probe);
        assert!(matches!(result, Err(WatermarkError::UnsupportedMediaType(_))));
    }
}
