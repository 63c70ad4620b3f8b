use super::write_file;
use crate::error::Result;
use crate::model::PluginList;
use indexmap::IndexMap;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// File name of the grouped JSON export.
pub const JSON_FILE: &str = "plugins.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManufacturerEntry {
    pub manufacturer: String,
    pub products: Vec<String>,
}

/// Groups plugin names by vendor across all categories.
///
/// Vendors appear in first-seen order and products keep their collection
/// order. Records without a vendor or a name are left out.
pub fn group_by_manufacturer(list: &PluginList) -> Vec<ManufacturerEntry> {
    let mut groups: IndexMap<&str, Vec<String>> = IndexMap::new();

    for (_, records) in list.iter() {
        for record in records {
            if let (Some(vendor), Some(name)) = (record.vendor(), record.name()) {
                groups.entry(vendor).or_default().push(name.to_string());
            }
        }
    }

    groups
        .into_iter()
        .map(|(manufacturer, products)| ManufacturerEntry {
            manufacturer: manufacturer.to_string(),
            products,
        })
        .collect()
}

/// Writes `plugins.json` into `output_dir` and returns its path.
pub fn export_json(list: &PluginList, output_dir: &Path) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(&group_by_manufacturer(list))?;
    let path = output_dir.join(JSON_FILE);
    write_file(&path, &json)?;
    Ok(path)
}
