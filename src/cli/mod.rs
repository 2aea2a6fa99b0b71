use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::config::{BatchPaths, ConfigOverrides};

#[derive(Parser, Debug)]
#[command(name = "batch-watermark")]
#[command(version, about = "Add a watermark to a batch of images and videos.", long_about = None)]
pub struct Cli {
    /// Input media files directory path
    #[arg(short = 'i', long)]
    pub input_directory: PathBuf,

    /// Watermark file path
    #[arg(short = 'w', long)]
    pub watermark: PathBuf,

    /// Prefix of the new file. OutputFilename = {prefix}{InputFilename}
    #[arg(short = 'p', long)]
    pub prefix: String,

    /// Output directory, created if missing. Defaults to next to each input
    #[arg(short = 'o', long)]
    pub output_directory: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Watermark anchor: NE NC NW SE SC SW C CE CW
    #[arg(long)]
    pub position: Option<String>,

    /// Top margin in pixels, or `none`
    #[arg(long, allow_hyphen_values = true)]
    pub margin_nord: Option<String>,

    /// Bottom margin in pixels, or `none`
    #[arg(long, allow_hyphen_values = true)]
    pub margin_south: Option<String>,

    /// Left margin in pixels, or `none`
    #[arg(long, allow_hyphen_values = true)]
    pub margin_east: Option<String>,

    /// Right margin in pixels, or `none`
    #[arg(long, allow_hyphen_values = true)]
    pub margin_west: Option<String>,

    /// Watermark height relative to the frame height (landscape)
    #[arg(long)]
    pub height_ratio: Option<f64>,

    /// Watermark width relative to the frame width (portrait)
    #[arg(long)]
    pub width_ratio: Option<f64>,

    /// Comma separated mime top-level types to watermark
    #[arg(long, value_delimiter = ',')]
    pub media_types: Option<Vec<String>>,

    /// Comma separated EXIF orientation codes treated as portrait
    #[arg(long, value_delimiter = ',')]
    pub exif_portrait_codes: Option<Vec<u32>>,

    /// Force `landscape` or `portrait` for every file
    #[arg(long)]
    pub orientation: Option<String>,

    /// Files processed in parallel, 0 for one per core
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,

    /// Per-file transcode timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// ffmpeg binary
    #[arg(long)]
    pub ffmpeg: Option<String>,

    /// ffprobe binary
    #[arg(long)]
    pub ffprobe: Option<String>,

    /// Plan and log filter graphs without running ffmpeg
    #[arg(long)]
    pub dry_run: bool,

    /// Show a progress bar
    #[arg(long)]
    pub progress: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            position: self.position.clone(),
            margin_nord: self.margin_nord.clone(),
            margin_south: self.margin_south.clone(),
            margin_east: self.margin_east.clone(),
            margin_west: self.margin_west.clone(),
            height_ratio: self.height_ratio,
            width_ratio: self.width_ratio,
            media_types: self.media_types.clone(),
            exif_portrait_codes: self.exif_portrait_codes.clone(),
            orientation: self.orientation.clone(),
            jobs: self.jobs,
            timeout_secs: self.timeout,
            ffmpeg: self.ffmpeg.clone(),
            ffprobe: self.ffprobe.clone(),
        }
    }

    pub fn batch_paths(&self) -> BatchPaths {
        BatchPaths::new(
            &self.input_directory,
            &self.watermark,
            self.prefix.clone(),
            self.output_directory.clone(),
        )
    }
}
