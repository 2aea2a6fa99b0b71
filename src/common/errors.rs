use std::path::PathBuf;

use log::error;
use thiserror::Error;

/// Every way a single file, or the run as a whole, can fail.
///
/// Per-file variants are collected by the batch loop and never abort it;
/// `Configuration` (and parse failures raised while loading the config) abort
/// the run before any file is touched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WatermarkError {
    #[error("invalid watermark position: {0:?} (expected one of NE NC NW SE SC SW C CE CW)")]
    InvalidPosition(String),

    #[error("unknown orientation: {0:?}")]
    UnknownOrientation(String),

    #[error("not enough metadata to determine {0}")]
    InsufficientMetadata(&'static str),

    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("could not read metadata of {path:?}: {reason}")]
    MetadataFetchFailure { path: PathBuf, reason: String },

    #[error("transcoding failed ({reason}); command: [{command}]")]
    TranscodeFailure { command: String, reason: String },

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl WatermarkError {
    pub fn metadata(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::MetadataFetchFailure {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        Self::Configuration(reason.into())
    }
}

pub type WatermarkResult<T> = std::result::Result<T, WatermarkError>;

/// Log the full context chain of an application-level error and hand it back.
pub fn handle_error(error: anyhow::Error) -> anyhow::Error {
    let mut message = format!("{error}");
    for cause in error.chain().skip(1) {
        message.push_str(&format!("\n  caused by: {cause}"));
    }
    error!("{}", message);
    error
}
