use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::models::media::mime_top_level;

/// Mime type guessed from the file extension, e.g. `image/jpeg`.
pub fn detect_mime(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
}

/// Whether a mime string belongs to one of the relevant top-level types.
pub fn is_relevant(mime: &str, relevant_types: &[String]) -> bool {
    mime_top_level(mime)
        .map(|top| relevant_types.iter().any(|relevant| relevant == top))
        .unwrap_or(false)
}

/// Every file below `root` whose mime type is relevant, in file-name order.
///
/// Entries that cannot be read are logged and skipped.
pub fn collect_relevant_files<F>(root: &Path, relevant_types: &[String], mime_of: F) -> Vec<PathBuf>
where
    F: Fn(&Path) -> Option<String>,
{
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Skipping unreadable entry under {:?}: {}", root, err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        match mime_of(entry.path()) {
            Some(mime) if is_relevant(&mime, relevant_types) => files.push(entry.into_path()),
            Some(mime) => debug!("Ignoring {:?} ({})", entry.path(), mime),
            None => debug!("Can't get media type of {:?}", entry.path()),
        }
    }
    files
}
