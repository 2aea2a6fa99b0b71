//! Setup/initialization module - handles application startup tasks
//!
//! Includes:
//! - Logger initialization
//! - FFmpeg/FFprobe availability check
//! - Output folder creation

use anstyle::{AnsiColor, Color, Style};
use env_logger::Builder;
use log::{LevelFilter, error, info, kv::Key};
use std::{io::Write, path::Path, process::Command};

use crate::common::errors::{WatermarkError, WatermarkResult};

const DIM: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack)));
const HIGHLIGHT: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan)));

// ────────────────────────────────────────────────────────────────
// Logger Initialization
// ────────────────────────────────────────────────────────────────

pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Initialize the global logger. `RUST_LOG`, when set, wins over `verbose`.
pub fn initialize_logger(verbose: u8) {
    let mut builder = Builder::new();

    builder.format(|buf, record| {
        let ts = buf.timestamp();
        let level_style = buf.default_level_style(record.level());

        // Extract raw duration and pad it to a fixed width column
        let dur = record
            .key_values()
            .get(Key::from("duration"))
            .map(|v| format!("{:>10}", v.to_string()))
            .unwrap_or_else(|| " ".repeat(10));

        writeln!(
            buf,
            "{}{}{} {}{:<5}{} {}{}{} {}",
            DIM.render(),
            ts,
            DIM.render_reset(),
            level_style.render(),
            record.level(),
            level_style.render_reset(),
            HIGHLIGHT.render(),
            dur,
            HIGHLIGHT.render_reset(),
            record.args()
        )
    });

    if std::env::var_os("RUST_LOG").is_some() {
        builder.parse_default_env();
    } else {
        builder.filter(None, level_for_verbosity(verbose));
    }

    // A second initialization (tests, embedding) keeps the first logger.
    let _ = builder.try_init();
}

// ────────────────────────────────────────────────────────────────
// FFmpeg Check
// ────────────────────────────────────────────────────────────────

/// Log the version of each external tool, or why it cannot be used.
pub fn check_ffmpeg_and_ffprobe(ffmpeg: &str, ffprobe: &str) {
    for command in [ffmpeg, ffprobe] {
        match Command::new(command).arg("-version").output() {
            Ok(output) if output.status.success() => {
                let version_info = String::from_utf8_lossy(&output.stdout);
                let version_number = version_info
                    .lines()
                    .next()
                    .unwrap_or("Unknown version")
                    .split_whitespace()
                    .nth(2)
                    .unwrap_or("Unknown");
                info!("{} version: {}", command, version_number);
            }
            Ok(_) => {
                error!(
                    "`{}` command was found, but it returned an error. Please ensure it's correctly installed.",
                    command
                );
            }
            Err(_) => {
                error!(
                    "`{}` is not installed or not available in PATH. Please install it before running the application.",
                    command
                );
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────
// Folder Initialization
// ────────────────────────────────────────────────────────────────

/// Create the output directory (and parents) if missing.
pub fn initialize_output_folder(dir: &Path) -> WatermarkResult<()> {
    std::fs::create_dir_all(dir).map_err(|err| {
        WatermarkError::config(format!(
            "Error while trying to create output directory path [{}]: {}",
            dir.display(),
            err
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(level_for_verbosity(0), LevelFilter::Info);
        assert_eq!(level_for_verbosity(1), LevelFilter::Debug);
        assert_eq!(level_for_verbosity(5), LevelFilter::Trace);
    }

    #[test]
    fn output_folder_creation_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a/b/c");
        initialize_output_folder(&out).unwrap();
        initialize_output_folder(&out).unwrap();
        assert!(out.is_dir());
    }

    #[test]
    fn output_folder_under_a_file_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file");
        std::fs::write(&file, b"x").unwrap();
        assert!(matches!(
            initialize_output_folder(&file.join("out")),
            Err(WatermarkError::Configuration(_))
        ));
    }
}
