use log::debug;
use std::path::Path;

use crate::{
    common::errors::{WatermarkError, WatermarkResult},
    models::media::{MediaDimensions, MediaKind, MediaProbe},
    utils::fs_utils::detect_mime,
    workflow::{
        processors::{
            image::{generate_exif_orientation, generate_image_width_height},
            video::generate_video_stream_info,
        },
        types::MediaProber,
    },
};

/// Prober backed by the `image`/`exif` crates for stills and `ffprobe` for video.
#[derive(Debug, Clone)]
pub struct ToolProber {
    ffprobe: String,
}

impl ToolProber {
    pub fn new(ffprobe: impl Into<String>) -> Self {
        Self {
            ffprobe: ffprobe.into(),
        }
    }

    fn probe_image(&self, path: &Path, mime: String) -> WatermarkResult<MediaProbe> {
        let dimensions = match generate_image_width_height(path) {
            Ok((width, height)) => MediaDimensions::new(width, height),
            Err(err) => {
                // formats the image crate can't read (HEIC, ...) still go through ffprobe
                debug!("Falling back to ffprobe for {:?}: {:#}", path, err);
                generate_video_stream_info(&self.ffprobe, path)
                    .map_err(|err| WatermarkError::metadata(path, format!("{err:#}")))?
                    .dimensions
            }
        };

        Ok(MediaProbe {
            mime,
            dimensions,
            exif_orientation: generate_exif_orientation(path),
            rotation: None,
        })
    }

    fn probe_video(&self, path: &Path, mime: String) -> WatermarkResult<MediaProbe> {
        let info = generate_video_stream_info(&self.ffprobe, path)
            .map_err(|err| WatermarkError::metadata(path, format!("{err:#}")))?;

        Ok(MediaProbe {
            mime,
            dimensions: info.dimensions,
            exif_orientation: None,
            rotation: info.rotation,
        })
    }
}

impl MediaProber for ToolProber {
    fn mime_type(&self, path: &Path) -> Option<String> {
        detect_mime(path)
    }

    fn probe(&self, path: &Path) -> WatermarkResult<MediaProbe> {
        let mime = detect_mime(path).ok_or_else(|| {
            WatermarkError::UnsupportedMediaType(format!("unknown type of {:?}", path))
        })?;

        match MediaKind::from_mime(&mime)? {
            MediaKind::Image => self.probe_image(path, mime),
            MediaKind::Video => self.probe_video(path, mime),
        }
    }
}
