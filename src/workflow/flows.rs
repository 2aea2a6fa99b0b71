//! The batch loop.
//!
//! Setup failures (bad paths, unreadable watermark, thread pool) abort the run;
//! anything that goes wrong with a single file is logged, recorded in the
//! report and the loop moves on.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use rayon::{ThreadPoolBuilder, prelude::*};
use std::{path::PathBuf, time::Instant};

use crate::{
    common::errors::{WatermarkError, WatermarkResult},
    config::{AppConfig, BatchPaths},
    models::media::AspectRatio,
    utils::{fs_utils::collect_relevant_files, output_path},
    workflow::{
        processors::setup::initialize_output_folder,
        tasks::watermark::{WatermarkContext, WatermarkTask},
        types::{MediaProber, Transcoder},
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: WatermarkError,
}

/// Outcome of one run, in scan order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub watermarked: Vec<PathBuf>,
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.watermarked.len() + self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub fn run_batch(
    config: &AppConfig,
    paths: &BatchPaths,
    prober: &dyn MediaProber,
    transcoder: &dyn Transcoder,
    show_progress: bool,
) -> Result<BatchReport> {
    paths.validate()?;
    if let Some(output_directory) = &paths.output_directory {
        initialize_output_folder(output_directory)?;
    }

    let aspect = watermark_aspect_ratio(prober, paths)
        .context(format!("Fail to read watermark {:?}", paths.watermark))?;
    let ctx = WatermarkContext {
        config,
        ratios: config.scale_ratios()?,
        aspect,
        watermark: &paths.watermark,
        prober,
        transcoder,
    };

    info!("Scanning [{}] for relevant files", paths.input_directory.display());
    let tasks: Vec<WatermarkTask> = collect_relevant_files(
        &paths.input_directory,
        &config.relevant_media_types,
        |path| prober.mime_type(path),
    )
    .into_iter()
    .map(|source| {
        let output = output_path(&source, &paths.prefix, paths.output_directory.as_deref());
        WatermarkTask::new(source, output)
    })
    .collect();
    info!("Found {} relevant files", tasks.len());

    let progress_bar = create_progress_bar(tasks.len() as u64, show_progress);
    let process = |task: &WatermarkTask| {
        let outcome = process_one(&ctx, task);
        progress_bar.inc(1);
        outcome
    };

    let workers = config.worker_count();
    let outcomes: Vec<(PathBuf, WatermarkResult<()>)> = if workers <= 1 {
        tasks.iter().map(process).collect()
    } else {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("watermark-worker-{}", i))
            .build()
            .context("Failed to build watermark thread pool")?;
        pool.install(|| tasks.par_iter().map(process).collect())
    };
    progress_bar.finish_and_clear();

    let mut report = BatchReport::default();
    for (path, outcome) in outcomes {
        match outcome {
            Ok(()) => report.watermarked.push(path),
            Err(error) => report.failures.push(FileFailure { path, error }),
        }
    }

    info!(
        "Watermarking finished: {} succeeded, {} failed",
        report.watermarked.len(),
        report.failures.len()
    );
    Ok(report)
}

fn watermark_aspect_ratio(prober: &dyn MediaProber, paths: &BatchPaths) -> WatermarkResult<AspectRatio> {
    prober
        .probe(&paths.watermark)?
        .dimensions
        .map(AspectRatio::of)
        .ok_or(WatermarkError::InsufficientMetadata("watermark dimensions"))
}

fn process_one(ctx: &WatermarkContext, task: &WatermarkTask) -> (PathBuf, WatermarkResult<()>) {
    let timer_start = Instant::now();
    let outcome = task.run(ctx);
    match &outcome {
        Ok(()) => info!(
            duration = &*format!("{:.1?}", timer_start.elapsed());
            "Watermarked [{}] -> [{}]",
            task.source_path().display(),
            task.output_path().display()
        ),
        Err(err) => error!(
            "Could not watermark file [{}]. Skipping ... Error: {}",
            task.source_path().display(),
            err
        ),
    }
    (task.source_path().to_path_buf(), outcome)
}

fn create_progress_bar(len: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
    {
        bar.set_style(style);
    }
    bar
}
