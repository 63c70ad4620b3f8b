use crate::error::Result;
use crate::model::PluginRecord;
use std::collections::HashSet;

/// Removes records whose name was already seen, keeping the first occurrence.
///
/// # Errors
///
/// Every record must carry a name; the first one without it aborts with
/// [`PluginListError::MissingKey`](crate::PluginListError::MissingKey).
pub fn remove_duplicates(records: Vec<PluginRecord>) -> Result<Vec<PluginRecord>> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(records.len());

    for record in records {
        let name = record.require_name()?.to_string();
        if seen.insert(name) {
            unique.push(record);
        }
    }

    Ok(unique)
}
