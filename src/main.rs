use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::process::ExitCode;

use batch_watermark::{
    cli::Cli,
    common::errors::handle_error,
    config::AppConfig,
    workflow::{
        flows::run_batch,
        processors::{
            probe::ToolProber,
            setup::{check_ffmpeg_and_ffprobe, initialize_logger},
            transcode::{DryRunTranscoder, FfmpegTranscoder},
        },
        types::Transcoder,
    },
};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    initialize_logger(cli.verbose);

    let config = AppConfig::load(cli.config.as_deref(), &cli.overrides())
        .context("Failed to load configuration")
        .map_err(handle_error)?;
    check_ffmpeg_and_ffprobe(&config.ffmpeg_path, &config.ffprobe_path);

    let prober = ToolProber::new(config.ffprobe_path.clone());
    let transcoder: Box<dyn Transcoder> = if cli.dry_run {
        info!("Dry run: ffmpeg will not be invoked");
        Box::new(DryRunTranscoder)
    } else {
        Box::new(FfmpegTranscoder::new(
            config.ffmpeg_path.clone(),
            config.transcode_timeout(),
        ))
    };

    let report = run_batch(
        &config,
        &cli.batch_paths(),
        &prober,
        transcoder.as_ref(),
        cli.progress,
    )
    .map_err(handle_error)?;

    if report.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        for failure in &report.failures {
            warn!("Failed: [{}] {}", failure.path.display(), failure.error);
        }
        Ok(ExitCode::FAILURE)
    }
}
