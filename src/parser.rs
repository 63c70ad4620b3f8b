//! Parser for `.nfo` plugin metadata files.
//!
//! Each non-blank line is `key = value`. Whitespace around key and value is
//! trimmed and the first `=` is the separator, so values may contain `=`.

use crate::error::{PluginListError, Result};
use crate::model::PluginRecord;
use std::fs;
use std::path::Path;

/// Reads and parses one metadata file.
///
/// # Errors
///
/// Returns [`PluginListError::Io`] if the file cannot be read and
/// [`PluginListError::Parse`] for a non-blank line without `=`.
pub fn parse_nfo_file(path: &Path) -> Result<PluginRecord> {
    let bytes = fs::read(path).map_err(|e| PluginListError::io(path, e))?;
    // Vendor files are not reliably UTF-8
    let content = String::from_utf8_lossy(&bytes);
    parse_nfo_str(&content, path)
}

/// Parses metadata text. `path` is only used for error reporting.
pub fn parse_nfo_str(content: &str, path: &Path) -> Result<PluginRecord> {
    let mut record = PluginRecord::new();

    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let (key, value) = line.split_once('=').ok_or_else(|| PluginListError::Parse {
            path: path.to_path_buf(),
            line: idx + 1,
            content: line.to_string(),
        })?;

        record.insert(key.trim(), value.trim());
    }

    Ok(record)
}
