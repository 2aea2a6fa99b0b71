//! Run configuration.
//!
//! Built once at startup from, in increasing precedence: defaults, an optional
//! JSON file, `WATERMARK_*` environment variables (a `.env` file is honoured)
//! and command line flags. Never mutated afterwards.

use dotenv::dotenv;
use log::debug;
use path_clean::PathClean;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    common::{
        CURRENT_NUM_THREADS, ENV_PREFIX, EXIF_PORTRAIT_CODES, RELEVANT_MEDIA_TYPES,
        WATERMARK_TO_HEIGHT_RATIO, WATERMARK_TO_WIDTH_RATIO,
        errors::{WatermarkError, WatermarkResult},
    },
    models::{
        media::Orientation,
        placement::{AnchorPosition, MarginSet, parse_margin},
    },
    workflow::processors::scale::ScaleRatios,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Anchor of the watermark: NE NC NW SE SC SW C CE CW
    pub position: AnchorPosition,
    pub margins: MarginSet,
    /// Watermark height relative to a landscape frame's height
    pub watermark_to_height_ratio: f64,
    /// Watermark width relative to a portrait frame's width
    pub watermark_to_width_ratio: f64,
    /// Mime top-level types that get watermarked
    pub relevant_media_types: Vec<String>,
    /// EXIF orientation codes that mark a still image as portrait
    pub exif_portrait_codes: Vec<u32>,
    /// Skip detection and use this orientation for every file
    pub orientation: Option<Orientation>,
    /// Files processed in parallel; 0 uses every core
    pub jobs: usize,
    /// Upper bound for a single ffmpeg run
    pub transcode_timeout_secs: Option<u64>,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            position: AnchorPosition::Sw,
            margins: MarginSet::default(),
            watermark_to_height_ratio: WATERMARK_TO_HEIGHT_RATIO,
            watermark_to_width_ratio: WATERMARK_TO_WIDTH_RATIO,
            relevant_media_types: RELEVANT_MEDIA_TYPES.iter().map(|t| t.to_string()).collect(),
            exif_portrait_codes: EXIF_PORTRAIT_CODES.to_vec(),
            orientation: None,
            jobs: 1,
            transcode_timeout_secs: None,
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
        }
    }
}

impl AppConfig {
    /// Layer file, environment and command line overrides over the defaults.
    pub fn load(config_file: Option<&Path>, cli: &ConfigOverrides) -> WatermarkResult<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply(&ConfigOverrides::from_env()?)?;
        config.apply(cli)?;
        config.validate()?;
        debug!("Effective configuration: {:?}", config);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> WatermarkResult<Self> {
        let file = File::open(path).map_err(|err| {
            WatermarkError::config(format!("cannot open config file {:?}: {}", path, err))
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|err| {
            WatermarkError::config(format!("invalid config file {:?}: {}", path, err))
        })
    }

    pub fn apply(&mut self, overrides: &ConfigOverrides) -> WatermarkResult<()> {
        if let Some(position) = &overrides.position {
            self.position = position.parse()?;
        }
        for (target, raw) in [
            (&mut self.margins.nord, &overrides.margin_nord),
            (&mut self.margins.south, &overrides.margin_south),
            (&mut self.margins.east, &overrides.margin_east),
            (&mut self.margins.west, &overrides.margin_west),
        ] {
            if let Some(raw) = raw {
                *target = parse_margin(raw);
            }
        }
        if let Some(ratio) = overrides.height_ratio {
            self.watermark_to_height_ratio = ratio;
        }
        if let Some(ratio) = overrides.width_ratio {
            self.watermark_to_width_ratio = ratio;
        }
        if let Some(types) = &overrides.media_types {
            self.relevant_media_types = types
                .iter()
                .map(|t| t.trim().to_ascii_lowercase())
                .filter(|t| !t.is_empty())
                .collect();
        }
        if let Some(codes) = &overrides.exif_portrait_codes {
            self.exif_portrait_codes = codes.clone();
        }
        if let Some(orientation) = &overrides.orientation {
            self.orientation = Some(orientation.parse()?);
        }
        if let Some(jobs) = overrides.jobs {
            self.jobs = jobs;
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.transcode_timeout_secs = (timeout > 0).then_some(timeout);
        }
        if let Some(ffmpeg) = &overrides.ffmpeg {
            self.ffmpeg_path = ffmpeg.clone();
        }
        if let Some(ffprobe) = &overrides.ffprobe {
            self.ffprobe_path = ffprobe.clone();
        }
        Ok(())
    }

    pub fn validate(&self) -> WatermarkResult<()> {
        self.scale_ratios()?;
        if self.relevant_media_types.is_empty() {
            return Err(WatermarkError::config("no relevant media types configured"));
        }
        Ok(())
    }

    pub fn scale_ratios(&self) -> WatermarkResult<ScaleRatios> {
        ScaleRatios::new(self.watermark_to_height_ratio, self.watermark_to_width_ratio)
    }

    pub fn transcode_timeout(&self) -> Option<Duration> {
        self.transcode_timeout_secs.map(Duration::from_secs)
    }

    pub fn worker_count(&self) -> usize {
        match self.jobs {
            0 => *CURRENT_NUM_THREADS,
            jobs => jobs,
        }
    }
}

/// Optional settings coming from the environment or the command line.
///
/// Margins stay textual so `none` and non-numeric values can clear them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigOverrides {
    pub position: Option<String>,
    pub margin_nord: Option<String>,
    pub margin_south: Option<String>,
    pub margin_east: Option<String>,
    pub margin_west: Option<String>,
    pub height_ratio: Option<f64>,
    pub width_ratio: Option<f64>,
    pub media_types: Option<Vec<String>>,
    pub exif_portrait_codes: Option<Vec<u32>>,
    pub orientation: Option<String>,
    pub jobs: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub ffmpeg: Option<String>,
    pub ffprobe: Option<String>,
}

impl ConfigOverrides {
    /// `WATERMARK_*` variables, after loading `.env` if present.
    pub fn from_env() -> WatermarkResult<Self> {
        dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> WatermarkResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX)
            .from_iter(vars)
            .map_err(|err| WatermarkError::config(format!("invalid {ENV_PREFIX}* variable: {err}")))
    }
}

/// The paths and prefix of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchPaths {
    pub input_directory: PathBuf,
    pub watermark: PathBuf,
    pub prefix: String,
    pub output_directory: Option<PathBuf>,
}

impl BatchPaths {
    pub fn new(
        input_directory: impl Into<PathBuf>,
        watermark: impl Into<PathBuf>,
        prefix: impl Into<String>,
        output_directory: Option<PathBuf>,
    ) -> Self {
        Self {
            input_directory: input_directory.into().clean(),
            watermark: watermark.into().clean(),
            prefix: prefix.into(),
            output_directory: output_directory.map(|dir| dir.clean()),
        }
    }

    /// Reject runs that could not watermark anything.
    pub fn validate(&self) -> WatermarkResult<()> {
        if !self.input_directory.is_dir() {
            return Err(WatermarkError::config(format!(
                "Input media files directory path [{}] doesn't exist",
                self.input_directory.display()
            )));
        }
        if !self.watermark.is_file() {
            return Err(WatermarkError::config(format!(
                "Watermark file path [{}] doesn't exist",
                self.watermark.display()
            )));
        }
        if self.prefix.is_empty() {
            return Err(WatermarkError::config("Prefix empty or not specified"));
        }
        Ok(())
    }
}
