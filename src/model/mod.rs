//! Core data types for plugin metadata and collection results.
//!
//! - [`PluginRecord`] - The key/value pairs of one `.nfo` metadata file
//! - [`Category`] - Top-level plugin grouping (Effects, Generators)
//! - [`FormatFolder`] - Packaging convention subfolder inside a category
//! - [`PluginList`] - Collected records per category
//!
//! # Example
//!
//! ```
//! use pluginlist::{Category, PluginList, PluginRecord};
//!
//! let record = PluginRecord::from_pairs([("ps_file_name_0", "Fruity Limiter")]);
//! let mut list = PluginList::new();
//! list.insert(Category::Effects, vec![record]);
//!
//! assert_eq!(list.total(), 1);
//! ```

mod category;
mod record;

pub use category::*;
pub use record::*;
