//! Export of collected plugin lists.
//!
//! - [`csv`] - flat tables, full records or names only, combined or per category
//! - [`json`] - products grouped by manufacturer
//! - [`table`] - terminal listing

pub mod csv;
pub mod json;
pub mod table;

pub use self::csv::{export_csv, render_full, render_names, COMBINED_CSV};
pub use self::json::{export_json, group_by_manufacturer, ManufacturerEntry, JSON_FILE};
pub use self::table::print_plugin_table;

use crate::error::{PluginListError, Result};
use std::fs;
use std::path::Path;

/// CSV export shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Write one plugin name per line instead of full records.
    pub names_only: bool,
    /// Write `<Category>.csv` per category instead of one `plugins.csv`.
    pub separate_files: bool,
}

/// Writes one export file and logs it.
pub(crate) fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| PluginListError::io(path, e))?;
    tracing::info!("Saved {}", path.display());
    Ok(())
}
