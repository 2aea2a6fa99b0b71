//! Processors module - domain-specific processing logic
//!
//! This module contains the following submodules:
//! - `orientation`: landscape/portrait classification
//! - `scale`: watermark render size
//! - `position`: overlay placement terms
//! - `plan`: composition of the above into a filter plan
//! - `image`: still image metadata (header size, EXIF orientation)
//! - `video`: ffprobe metadata and ffmpeg command helpers
//! - `probe`: the media prober used by the batch
//! - `transcode`: ffmpeg invocation with timeout
//! - `setup`: initialization (logger, ffmpeg check, output folder)

pub mod image;
pub mod orientation;
pub mod plan;
pub mod position;
pub mod probe;
pub mod scale;
pub mod setup;
pub mod transcode;
pub mod video;
