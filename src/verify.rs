//! Verification of cross-platform plugins against the vendor's index.
//!
//! `VerifiedIDs.nfo` at the root of the plugin database lists every VST and
//! VST3 plugin the host has validated. Lines are colon-separated; the third
//! field is a `key=value` pair whose value is the path of the plugin's own
//! `.nfo` file:
//!
//! ```text
//! 1:0x5A3F:ps_file_path=%FLPluginDBPath%\Installed\Effects\VST\Valhalla Room.nfo
//! ```
//!
//! Native plugins are absent from the index and must not be filtered.

use crate::error::{PluginListError, Result};
use crate::model::PluginRecord;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// File name of the verified index, relative to the scan root.
pub const VERIFIED_IDS_FILE: &str = "VerifiedIDs.nfo";

fn nfo_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)[\\/]([^\\/]+)\.nfo$").expect("verified index pattern is valid")
    })
}

/// Set of plugin names present in the verified index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifiedIds {
    names: HashSet<String>,
}

/// Result of filtering one batch of records.
#[derive(Debug, Default)]
pub struct FilterOutcome {
    pub kept: Vec<PluginRecord>,
    /// Names of dropped records, `None` for records without a name.
    pub dropped: Vec<Option<String>>,
}

impl VerifiedIds {
    /// Loads `VerifiedIDs.nfo` from the scan root.
    ///
    /// # Errors
    ///
    /// Returns [`PluginListError::Io`] if the index cannot be read.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(VERIFIED_IDS_FILE);
        let bytes = fs::read(&path).map_err(|e| PluginListError::io(&path, e))?;
        let ids = Self::parse(&String::from_utf8_lossy(&bytes));
        tracing::debug!(count = ids.len(), "loaded verified plugin index");
        Ok(ids)
    }

    /// Extracts names from index text. Lines that don't match are ignored.
    pub fn parse(content: &str) -> Self {
        let names = content.lines().filter_map(parse_index_line).collect();
        Self { names }
    }

    pub fn from_names<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Keeps the records whose name is in the index, preserving order.
    pub fn filter(&self, records: Vec<PluginRecord>) -> FilterOutcome {
        let mut outcome = FilterOutcome::default();

        for record in records {
            if record.name().is_some_and(|name| self.contains(name)) {
                outcome.kept.push(record);
            } else {
                outcome.dropped.push(record.name().map(str::to_string));
            }
        }

        tracing::info!(
            kept = outcome.kept.len(),
            dropped = outcome.dropped.len(),
            "verified plugin records"
        );
        for name in &outcome.dropped {
            tracing::debug!(
                "dropped unverified plugin: {}",
                name.as_deref().unwrap_or("<unnamed>")
            );
        }

        outcome
    }
}

fn parse_index_line(line: &str) -> Option<String> {
    // Drive letters in the path would split further, so cap at three fields
    let field = line.trim().splitn(3, ':').nth(2)?;
    let (_, value) = field.split_once('=')?;
    let captures = nfo_name_pattern().captures(value.trim())?;
    Some(captures[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NAME_KEY;

    fn named(name: &str) -> PluginRecord {
        PluginRecord::from_pairs([(NAME_KEY, name)])
    }

    #[test]
    fn test_parse_index_lines() {
        let ids = VerifiedIds::parse(
            "1:0x01:ps_file_path=%FLPluginDBPath%\\Installed\\Effects\\VST\\Valhalla Room.nfo\n\
             2:0x02:ps_file_path=C:\\Plugins\\Installed\\Generators\\VST3\\Serum.NFO\n\
             3:0x03:ps_file_path=/Users/me/Installed/Effects/VST3/Pro-Q 3.nfo\n\
             malformed line\n\
             4:0x04:no separator here\n\
             \n",
        );

        assert_eq!(ids.len(), 3);
        assert!(ids.contains("Valhalla Room"));
        assert!(ids.contains("Serum"));
        assert!(ids.contains("Pro-Q 3"));
    }

    #[test]
    fn test_filter_keeps_verified_in_order() {
        let ids = VerifiedIds::from_names(["Serum", "Vital"]);
        let outcome = ids.filter(vec![
            named("Vital"),
            named("Cracked Thing"),
            PluginRecord::from_pairs([("other", "x")]),
            named("Serum"),
        ]);

        let kept: Vec<_> = outcome.kept.iter().filter_map(|r| r.name()).collect();
        assert_eq!(kept, vec!["Vital", "Serum"]);
        assert_eq!(outcome.dropped, vec![Some("Cracked Thing".to_string()), None]);
    }

    #[test]
    fn test_filter_output_is_subset_of_index() {
        let ids = VerifiedIds::from_names(["A", "C"]);
        let input: Vec<_> = ["A", "B", "C", "D", "A"].into_iter().map(named).collect();
        let outcome = ids.filter(input.clone());

        assert!(outcome.kept.len() <= input.len());
        for record in &outcome.kept {
            assert!(input.contains(record));
            assert!(ids.contains(record.name().unwrap()));
        }
    }

    #[test]
    fn test_load_missing_index() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            VerifiedIds::load(dir.path()),
            Err(PluginListError::Io { .. })
        ));
    }
}
