//! Error types shared by the scanning, export and serving layers.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PluginListError {
    /// A non-blank metadata line without a `=` separator.
    #[error("{}:{line}: expected `key = value`, found {content:?}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        content: String,
    },

    #[error("plugin record is missing required key `{key}`")]
    MissingKey { key: &'static str },

    #[error("no {category} plugins found")]
    EmptyCategory { category: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("connection error: {message}")]
    Connection { message: String, disconnected: bool },
}

impl PluginListError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the peer is gone and further sends are pointless.
    pub fn is_disconnect(&self) -> bool {
        matches!(
            self,
            Self::Connection {
                disconnected: true,
                ..
            }
        )
    }
}

pub type Result<T> = std::result::Result<T, PluginListError>;
