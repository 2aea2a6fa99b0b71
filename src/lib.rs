//! Batch watermarking of images and videos through ffmpeg.

pub mod cli;
pub mod common;
pub mod config;
pub mod models;
pub mod utils;
pub mod workflow;
