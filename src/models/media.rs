use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::common::errors::{WatermarkError, WatermarkResult};

/// The two kinds of media the batch knows how to watermark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Derive the kind from a full mime string such as `image/jpeg`.
    pub fn from_mime(mime: &str) -> WatermarkResult<Self> {
        match mime_top_level(mime) {
            Some("image") => Ok(Self::Image),
            Some("video") => Ok(Self::Video),
            _ => Err(WatermarkError::UnsupportedMediaType(mime.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

/// Top-level part of a well-formed `type/subtype` mime string.
pub fn mime_top_level(mime: &str) -> Option<&str> {
    let mut parts = mime.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(top), Some(sub), None) if !top.is_empty() && !sub.is_empty() => Some(top),
        _ => None,
    }
}

/// Display orientation of a media item, independent of how its pixels are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl FromStr for Orientation {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "landscape" => Ok(Self::Landscape),
            "portrait" => Ok(Self::Portrait),
            _ => Err(WatermarkError::UnknownOrientation(s.to_string())),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Landscape => f.write_str("landscape"),
            Self::Portrait => f.write_str("portrait"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MediaDimensions {
    width: u32,
    height: u32,
}

impl MediaDimensions {
    /// `None` when either side is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions after a quarter turn.
    pub fn transposed(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

impl fmt::Display for MediaDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Width divided by height of the watermark image. Fixed for a whole run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectRatio(f64);

impl AspectRatio {
    pub fn new(ratio: f64) -> Option<Self> {
        (ratio.is_finite() && ratio > 0.0).then_some(Self(ratio))
    }

    pub fn of(dimensions: MediaDimensions) -> Self {
        Self(dimensions.width() as f64 / dimensions.height() as f64)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// What the prober learned about a single file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaProbe {
    pub mime: String,
    pub dimensions: Option<MediaDimensions>,
    /// EXIF `Orientation` tag, images only.
    pub exif_orientation: Option<u32>,
    /// Rotation in degrees from the container tag or display matrix, videos only.
    pub rotation: Option<i32>,
}

impl MediaProbe {
    pub fn kind(&self) -> WatermarkResult<MediaKind> {
        MediaKind::from_mime(&self.mime)
    }
}
