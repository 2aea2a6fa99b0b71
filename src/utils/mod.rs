pub mod fs_utils;

use std::path::{Path, PathBuf};

use path_clean::PathClean;

/// Where the watermarked copy of `source` is written:
/// `<output_dir or source dir>/<prefix><file name>`.
pub fn output_path(source: &Path, prefix: &str, output_dir: Option<&Path>) -> PathBuf {
    let file_name = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => source.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    dir.join(format!("{prefix}{file_name}")).clean()
}
