//! Recursive discovery and loading of `.nfo` metadata files.
//!
//! # Example
//!
//! ```no_run
//! use pluginlist::scanner::scan_folder;
//! use std::path::Path;
//!
//! let outcome = scan_folder(Path::new("Installed/Effects/Fruity"));
//! println!("{} parsed, {} skipped", outcome.records.len(), outcome.skipped.len());
//! ```

use crate::error::PluginListError;
use crate::model::PluginRecord;
use crate::parser::parse_nfo_file;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extension of plugin metadata files, compared case-insensitively.
pub const METADATA_EXTENSION: &str = ".nfo";

/// Result of scanning one folder.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Parsed records, in sorted path order.
    pub records: Vec<PluginRecord>,
    /// Files that could not be read or parsed.
    pub skipped: Vec<(PathBuf, PluginListError)>,
}

/// Returns every metadata file below `folder`, sorted lexicographically.
///
/// A missing folder yields an empty list.
pub fn find_nfo_files(folder: &Path) -> Vec<PathBuf> {
    if !folder.is_dir() {
        tracing::debug!(folder = %folder.display(), "scan folder does not exist");
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkDir::new(folder)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                tracing::warn!("skipping unreadable entry: {}", err);
                None
            }
        })
        // Symlinked files count; symlinked directories are not descended into
        .filter(|e| is_metadata_file(e.path()) && e.path().is_file())
        .map(|e| e.into_path())
        .collect();

    files.sort();
    files
}

fn is_metadata_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| {
            name.to_string_lossy()
                .to_lowercase()
                .ends_with(METADATA_EXTENSION)
        })
        .unwrap_or(false)
}

/// Finds and parses all metadata files below `folder`.
///
/// A file that fails to parse is logged and skipped; the rest of the scan
/// continues.
pub fn scan_folder(folder: &Path) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();

    for path in find_nfo_files(folder) {
        match parse_nfo_file(&path) {
            Ok(record) => outcome.records.push(record),
            Err(err) => {
                tracing::warn!("skipping {}: {}", path.display(), err);
                outcome.skipped.push((path, err));
            }
        }
    }

    outcome
}
