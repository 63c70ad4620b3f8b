//! CSV rendering.
//!
//! Fields are written with `QuoteStyle::Never`, so a value containing a comma
//! shifts the columns of its row.

use super::{write_file, ExportOptions};
use crate::error::{PluginListError, Result};
use crate::model::{Category, PluginList, PluginRecord};
use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};
use std::path::{Path, PathBuf};

/// File name of the combined export.
pub const COMBINED_CSV: &str = "plugins.csv";

fn writer() -> Writer<Vec<u8>> {
    WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(Vec::new())
}

fn finish(writer: Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| PluginListError::Csv(csv::Error::from(e.into_error())))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Renders full records: a header from the first record's keys, then one row
/// per record with values in header order. Keys missing from a later record
/// produce empty cells; keys the first record lacks are not exported.
pub fn render_full(records: &[PluginRecord]) -> Result<String> {
    let Some(first) = records.first() else {
        return Ok(String::new());
    };

    let keys: Vec<&str> = first.keys().collect();
    let mut wtr = writer();
    wtr.write_record(&keys)?;

    for record in records {
        wtr.write_record(keys.iter().map(|k| record.get(k).unwrap_or("")))?;
    }

    finish(wtr)
}

/// Renders one plugin name per line, without a header.
pub fn render_names(records: &[PluginRecord]) -> Result<String> {
    let mut wtr = writer();
    for record in records {
        wtr.write_record([record.require_name()?])?;
    }
    finish(wtr)
}

fn render(records: &[PluginRecord], options: ExportOptions) -> Result<String> {
    if options.names_only {
        render_names(records)
    } else {
        render_full(records)
    }
}

/// Writes the CSV export into `output_dir` and returns the written paths.
///
/// # Errors
///
/// Returns [`PluginListError::EmptyCategory`] when there are no effects at
/// all; nothing is written in that case. Categories other than effects that
/// are empty are left out of the export.
pub fn export_csv(
    list: &PluginList,
    options: ExportOptions,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    if list.get(Category::Effects).map_or(true, <[_]>::is_empty) {
        return Err(PluginListError::EmptyCategory {
            category: Category::Effects.to_string(),
        });
    }

    let mut written = Vec::new();
    let mut combined = String::new();

    for (category, records) in list.iter() {
        if records.is_empty() {
            tracing::warn!("No {} plugins found, skipping", category);
            continue;
        }

        let rendered = render(records, options)?;
        if options.separate_files {
            let path = output_dir.join(format!("{}.csv", category));
            write_file(&path, &rendered)?;
            written.push(path);
        } else {
            combined.push_str(&rendered);
        }
    }

    if !options.separate_files {
        let path = output_dir.join(COMBINED_CSV);
        write_file(&path, &combined)?;
        written.push(path);
    }

    Ok(written)
}
