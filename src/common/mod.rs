pub mod errors;

pub const DEFAULT_MARGIN_SOUTH: f64 = 15.0;

pub const DEFAULT_MARGIN_WEST: f64 = 15.0;

pub const WATERMARK_TO_HEIGHT_RATIO: f64 = 0.05;

pub const WATERMARK_TO_WIDTH_RATIO: f64 = 0.2;

pub const RELEVANT_MEDIA_TYPES: &'static [&'static str] = &["image", "video"];

/// EXIF orientation codes that involve a 90/270 degree turn.
pub const EXIF_PORTRAIT_CODES: &'static [u32] = &[5, 6, 7, 8];

/// Prefix of the environment variables read by the config loader.
pub const ENV_PREFIX: &str = "WATERMARK_";

use std::sync::LazyLock;

pub static CURRENT_NUM_THREADS: LazyLock<usize> = LazyLock::new(|| rayon::current_num_threads());
