//! Saved user preferences.
//!
//! Preferences are stored as JSON in `pluginpreferences.json` in the working
//! directory, created on the first run and overwritten on every run after
//! that.
//!
//! # Example Preferences
//!
//! ```json
//! {
//!   "installed_folder": "C:\\Users\\me\\Documents\\Image-Line\\FL Studio\\Presets\\Plugin database\\Installed",
//!   "names_only": false,
//!   "separate_files": true
//! }
//! ```

use crate::output::ExportOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the preferences file.
pub const PREFERENCES_FILE: &str = "pluginpreferences.json";

/// Persisted scan and export settings.
///
/// Missing keys fall back to their defaults, so files written by older
/// versions (or by hand) still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Path of the plugin database `Installed` folder.
    pub installed_folder: Option<PathBuf>,

    /// Export plugin names only.
    ///
    /// Default: false
    pub names_only: bool,

    /// Export one file per category.
    ///
    /// Default: false
    pub separate_files: bool,
}

impl Preferences {
    /// Loads preferences from `path`, or defaults if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read preferences: {}", path.display()))?;
        let prefs = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse preferences: {}", path.display()))?;
        Ok(prefs)
    }

    /// Writes preferences to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write preferences: {}", path.display()))?;
        Ok(())
    }

    /// Returns the preferences path in the current working directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from(PREFERENCES_FILE)
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            names_only: self.names_only,
            separate_files: self.separate_files,
        }
    }

    /// Pretty JSON of the default preferences, for `config --init` output.
    pub fn generate_default() -> String {
        serde_json::to_string_pretty(&Preferences::default()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::load(&dir.path().join(PREFERENCES_FILE)).unwrap();
        assert_eq!(prefs, Preferences::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE);
        let prefs = Preferences {
            installed_folder: Some(PathBuf::from("/data/Installed")),
            names_only: true,
            separate_files: false,
        };

        prefs.save(&path).unwrap();
        assert_eq!(Preferences::load(&path).unwrap(), prefs);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE);
        fs::write(&path, r#"{"installed_folder": "/data/Installed"}"#).unwrap();

        let prefs = Preferences::load(&path).unwrap();
        assert_eq!(prefs.installed_folder, Some(PathBuf::from("/data/Installed")));
        assert!(!prefs.names_only);
        assert!(!prefs.separate_files);
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE);
        fs::write(&path, "not json").unwrap();
        assert!(Preferences::load(&path).is_err());
    }

    #[test]
    fn test_export_options() {
        let prefs = Preferences {
            installed_folder: None,
            names_only: false,
            separate_files: true,
        };
        assert_eq!(
            prefs.export_options(),
            ExportOptions {
                names_only: false,
                separate_files: true
            }
        );
    }
}
