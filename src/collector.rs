//! Collection of plugin records across the plugin database.
//!
//! The database root (the vendor's `Installed` folder) is laid out as:
//!
//! ```text
//! Installed/
//! ├── VerifiedIDs.nfo
//! ├── Effects/
//! │   ├── Fruity/   native, never verified
//! │   ├── VST/
//! │   └── VST3/
//! └── Generators/
//!     └── ...
//! ```

use crate::dedup::remove_duplicates;
use crate::error::Result;
use crate::model::{Category, FormatFolder, PluginList, PluginRecord};
use crate::scanner::scan_folder;
use crate::verify::VerifiedIds;
use std::path::{Path, PathBuf};

/// Scans, verifies and deduplicates every category under one database root.
#[derive(Debug, Clone)]
pub struct Collector {
    root: PathBuf,
}

impl Collector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Collects all categories.
    ///
    /// # Errors
    ///
    /// Fails if the verified index cannot be read or a collected record has
    /// no name. Individual unparseable metadata files are skipped.
    pub fn collect(&self) -> Result<PluginList> {
        let verified = VerifiedIds::load(&self.root)?;
        let mut list = PluginList::new();

        for category in Category::ALL {
            let records = self.collect_category(category, &verified)?;
            list.insert(category, records);
        }

        Ok(list)
    }

    fn collect_category(
        &self,
        category: Category,
        verified: &VerifiedIds,
    ) -> Result<Vec<PluginRecord>> {
        let mut records = Vec::new();

        for format in FormatFolder::ALL {
            let folder = self.root.join(category.as_str()).join(format.as_str());
            let outcome = scan_folder(&folder);

            if format.is_native() {
                records.extend(outcome.records);
            } else {
                tracing::debug!(%category, %format, "verifying cross-platform plugins");
                records.extend(verified.filter(outcome.records).kept);
            }
        }

        tracing::info!("Found {} {} plugins.", records.len(), category);
        remove_duplicates(records)
    }
}
