use std::path::Path;

use crate::{common::errors::WatermarkResult, models::media::MediaProbe};

// ────────────────────────────────────────────────────────────────
// Collaborators
// ────────────────────────────────────────────────────────────────

/// Reads what the planner needs to know about a media file.
pub trait MediaProber: Send + Sync {
    /// Mime type used by the walker's relevance filter. `None` if unknown.
    fn mime_type(&self, path: &Path) -> Option<String>;

    fn probe(&self, path: &Path) -> WatermarkResult<MediaProbe>;
}

/// Runs a filter graph over `input` (stream 0) and `watermark` (stream 1).
pub trait Transcoder: Send + Sync {
    fn transcode(
        &self,
        input: &Path,
        watermark: &Path,
        filter_complex: &str,
        output: &Path,
    ) -> WatermarkResult<()>;
}
