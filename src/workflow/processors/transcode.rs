//! Transcoding - runs ffmpeg with the planned filter graph.

use log::{debug, info, trace};
use regex::Regex;
use std::{
    ffi::OsStr,
    io::{self, BufRead, BufReader, Read},
    path::Path,
    process::{Child, Command, ExitStatus, Stdio},
    sync::LazyLock,
    thread,
    time::{Duration, Instant},
};

use crate::{
    common::errors::{WatermarkError, WatermarkResult},
    workflow::{processors::video::create_silent_ffmpeg_command, types::Transcoder},
};

// ────────────────────────────────────────────────────────────────
// Constants & Statics
// ────────────────────────────────────────────────────────────────

static REGEX_OUT_TIME_US: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"out_time_us=(\d+)").unwrap());

const FFMPEG_PROGRESS_PIPE: &str = "pipe:1";
const POLL_INTERVAL: Duration = Duration::from_millis(50);

// ────────────────────────────────────────────────────────────────
// FFmpeg
// ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    ffmpeg: String,
    timeout: Option<Duration>,
}

impl FfmpegTranscoder {
    pub fn new(ffmpeg: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            timeout,
        }
    }

    pub fn build_command(
        &self,
        input: &Path,
        watermark: &Path,
        filter_complex: &str,
        output: &Path,
    ) -> Command {
        let mut cmd = create_silent_ffmpeg_command(&self.ffmpeg);
        cmd.arg("-y")
            .arg("-i")
            .arg(input)
            .arg("-i")
            .arg(watermark)
            .args(["-filter_complex", filter_complex])
            // Send machine-readable progress to stdout, errors stay on stderr.
            .args(["-progress", FFMPEG_PROGRESS_PIPE])
            .arg(output);
        cmd
    }
}

impl Transcoder for FfmpegTranscoder {
    fn transcode(
        &self,
        input: &Path,
        watermark: &Path,
        filter_complex: &str,
        output: &Path,
    ) -> WatermarkResult<()> {
        let mut cmd = self.build_command(input, watermark, filter_complex, output);
        let command = render_command(&cmd);
        debug!("Running [{}]", command);

        let failure = |reason: String| WatermarkError::TranscodeFailure {
            command: command.clone(),
            reason,
        };

        let mut child = cmd
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| failure(format!("failed to spawn ffmpeg: {err}")))?;

        let label = input.display().to_string();
        let progress = child
            .stdout
            .take()
            .map(|stdout| thread::spawn(move || log_progress(stdout, &label)));
        let errors = child.stderr.take().map(|stderr| {
            thread::spawn(move || {
                let mut text = String::new();
                let _ = BufReader::new(stderr).read_to_string(&mut text);
                text
            })
        });

        let status = wait_with_timeout(&mut child, self.timeout);

        if let Some(handle) = progress {
            let _ = handle.join();
        }
        let stderr = errors
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        match status {
            Ok(Some(status)) if status.success() => Ok(()),
            Ok(Some(status)) => Err(failure(format!(
                "ffmpeg exited with code {}: {}",
                status.code().unwrap_or(-1),
                stderr.trim()
            ))),
            Ok(None) => Err(failure(format!(
                "ffmpeg timed out after {:?}",
                self.timeout.unwrap_or_default()
            ))),
            Err(err) => Err(failure(format!("failed to wait for ffmpeg: {err}"))),
        }
    }
}

/// Wait for `child`, killing it once `timeout` has elapsed.
///
/// Returns `Ok(None)` if the child had to be killed.
pub fn wait_with_timeout(child: &mut Child, timeout: Option<Duration>) -> io::Result<Option<ExitStatus>> {
    let Some(timeout) = timeout else {
        return child.wait().map(Some);
    };

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            child.wait()?;
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn log_progress(stdout: impl Read, label: &str) {
    let reader = BufReader::new(stdout);
    for line in reader.lines().map_while(Result::ok) {
        if let Some(caps) = REGEX_OUT_TIME_US.captures(&line) {
            if let Ok(microseconds) = caps[1].parse::<f64>() {
                trace!("{}: {:.1}s encoded", label, microseconds / 1_000_000.0);
            }
        }
    }
}

/// Shell-like rendering of a command for diagnostics.
pub fn render_command(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(quote_arg)
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote_arg(arg: &OsStr) -> String {
    let text = arg.to_string_lossy();
    if text.is_empty() || text.contains(|c: char| c.is_whitespace() || "\"';[]".contains(c)) {
        format!("\"{}\"", text.replace('"', "\\\""))
    } else {
        text.into_owned()
    }
}

// ────────────────────────────────────────────────────────────────
// Dry run
// ────────────────────────────────────────────────────────────────

/// Logs the planned filter graph instead of running ffmpeg.
#[derive(Debug, Clone, Default)]
pub struct DryRunTranscoder;

impl Transcoder for DryRunTranscoder {
    fn transcode(
        &self,
        input: &Path,
        _watermark: &Path,
        filter_complex: &str,
        output: &Path,
    ) -> WatermarkResult<()> {
        info!("Dry run: [{:?}] -> [{:?}] with [{}]", input, output, filter_complex);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_places_inputs_and_filter_in_order() {
        let transcoder = FfmpegTranscoder::new("ffmpeg", None);
        let cmd = transcoder.build_command(
            Path::new("in dir/a.jpg"),
            Path::new("logo.png"),
            "[1:v]scale=50:25[wtrmrk];[0:v][wtrmrk]overlay=0:0",
            Path::new("out/wm_a.jpg"),
        );
        assert_eq!(
            render_command(&cmd),
            "ffmpeg -v error -hide_banner -nostats -nostdin -y -i \"in dir/a.jpg\" -i logo.png \
             -filter_complex \"[1:v]scale=50:25[wtrmrk];[0:v][wtrmrk]overlay=0:0\" \
             -progress pipe:1 out/wm_a.jpg"
        );
    }

    #[test]
    fn spawn_failure_reports_the_command() {
        let transcoder = FfmpegTranscoder::new("definitely-not-ffmpeg", None);
        let err = transcoder
            .transcode(
                Path::new("a.jpg"),
                Path::new("logo.png"),
                "overlay=0:0",
                Path::new("wm_a.jpg"),
            )
            .unwrap_err();
        match err {
            WatermarkError::TranscodeFailure { command, reason } => {
                assert!(command.starts_with("definitely-not-ffmpeg "));
                assert!(reason.contains("failed to spawn"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_a_failure() {
        let transcoder = FfmpegTranscoder::new("false", None);
        let err = transcoder
            .transcode(
                Path::new("a.jpg"),
                Path::new("logo.png"),
                "overlay=0:0",
                Path::new("wm_a.jpg"),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            WatermarkError::TranscodeFailure { ref reason, .. } if reason.contains("exited with code 1")
        ));
    }

    #[cfg(unix)]
    #[test]
    fn hung_process_is_killed_after_timeout() {
        let mut child = Command::new("sleep").arg("5").spawn().unwrap();
        let started = Instant::now();
        let status = wait_with_timeout(&mut child, Some(Duration::from_millis(100))).unwrap();
        assert_eq!(status, None);
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn dry_run_always_succeeds() {
        assert!(
            DryRunTranscoder
                .transcode(Path::new("a"), Path::new("b"), "c", Path::new("d"))
                .is_ok()
        );
    }
}
