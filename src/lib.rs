pub mod collector;
pub mod config;
pub mod dedup;
pub mod error;
pub mod model;
pub mod output;
pub mod parser;
pub mod platform;
pub mod scanner;
pub mod service;
pub mod verify;

pub use collector::Collector;
pub use config::Preferences;
pub use error::{PluginListError, Result};
pub use model::{Category, FormatFolder, PluginList, PluginRecord};
pub use service::RefreshService;
pub use verify::VerifiedIds;
