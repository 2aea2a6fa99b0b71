//! Video processing module - handles all ffprobe related logic
//!
//! Includes:
//! - Stream width/height via ffprobe
//! - Rotation from the legacy `rotate` tag or the display matrix side data
//! - FFmpeg/FFprobe command helpers

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::{collections::BTreeMap, path::Path, process::Command};

use crate::models::media::MediaDimensions;

// ────────────────────────────────────────────────────────────────
// ffprobe output
// ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    width: Option<u32>,
    height: Option<u32>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
    #[serde(default)]
    side_data_list: Vec<FfprobeSideData>,
}

#[derive(Debug, Deserialize)]
struct FfprobeSideData {
    rotation: Option<f64>,
}

/// First video stream of a file as seen by ffprobe.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VideoStreamInfo {
    pub dimensions: Option<MediaDimensions>,
    pub rotation: Option<i32>,
}

// ────────────────────────────────────────────────────────────────
// Public API
// ────────────────────────────────────────────────────────────────

/// Probe the first video stream of `path` for its size and rotation.
pub fn generate_video_stream_info(ffprobe: &str, path: &Path) -> Result<VideoStreamInfo> {
    let output = Command::new(ffprobe)
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height:stream_tags=rotate:stream_side_data=rotation",
            "-of",
            "json",
        ])
        .arg(path)
        .output()
        .context(format!("Fail to spawn ffprobe for {:?}", path))?;

    if !output.status.success() {
        return Err(anyhow!(
            "ffprobe failed for {:?} with status code {:?}: {}",
            path,
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }

    parse_ffprobe_output(&output.stdout).context(format!("Fail to parse ffprobe output for {:?}", path))
}

pub fn parse_ffprobe_output(stdout: &[u8]) -> Result<VideoStreamInfo> {
    let parsed: FfprobeOutput = serde_json::from_slice(stdout)?;
    let Some(stream) = parsed.streams.into_iter().next() else {
        return Ok(VideoStreamInfo::default());
    };

    let dimensions = match (stream.width, stream.height) {
        (Some(width), Some(height)) => MediaDimensions::new(width, height),
        _ => None,
    };

    let rotation = stream
        .tags
        .get("rotate")
        .and_then(|rotate| rotate.trim().parse::<i32>().ok())
        .or_else(|| {
            stream
                .side_data_list
                .iter()
                .find_map(|side_data| side_data.rotation)
                .map(|rotation| rotation.round() as i32)
        });

    Ok(VideoStreamInfo {
        dimensions,
        rotation,
    })
}

// ────────────────────────────────────────────────────────────────
// FFmpeg/FFprobe Utilities
// ────────────────────────────────────────────────────────────────

/// Creates a base `ffmpeg` command that only reports errors on stderr.
pub fn create_silent_ffmpeg_command(ffmpeg: &str) -> Command {
    let mut cmd = Command::new(ffmpeg);
    // These global options must come before the input/output options.
    cmd.args(["-v", "error", "-hide_banner", "-nostats", "-nostdin"]);
    cmd
}
