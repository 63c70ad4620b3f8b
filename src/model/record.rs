use crate::error::{PluginListError, Result};
use crate::model::Category;
use indexmap::IndexMap;

/// Key whose value names a plugin for verification and deduplication.
pub const NAME_KEY: &str = "ps_file_name_0";

/// Key holding the plugin vendor.
pub const VENDOR_KEY: &str = "ps_file_vendorname_0";

/// One parsed metadata file. Keys keep the order they appear in the file;
/// everything other than the name and vendor is passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginRecord {
    fields: IndexMap<String, String>,
}

impl PluginRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Sets `key`. A repeated key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.get(NAME_KEY)
    }

    /// Like [`name`](Self::name), for callers where the key is mandatory.
    pub fn require_name(&self) -> Result<&str> {
        self.name()
            .ok_or(PluginListError::MissingKey { key: NAME_KEY })
    }

    pub fn vendor(&self) -> Option<&str> {
        self.get(VENDOR_KEY)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Renders the record back into `.nfo` form, one `key=value` per line.
    pub fn to_nfo_string(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{}={}\n", k, v))
            .collect()
    }
}

/// Collected records per category, in collection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PluginList {
    categories: IndexMap<Category, Vec<PluginRecord>>,
}

impl PluginList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: Category, records: Vec<PluginRecord>) {
        self.categories.insert(category, records);
    }

    pub fn get(&self, category: Category) -> Option<&[PluginRecord]> {
        self.categories.get(&category).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[PluginRecord])> {
        self.categories.iter().map(|(c, r)| (*c, r.as_slice()))
    }

    pub fn total(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
