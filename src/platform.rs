//! Platform-specific location of the plugin database.
//!
//! FL Studio keeps its plugin database under the user's documents folder:
//! - Windows: `%USERPROFILE%\Documents\Image-Line\FL Studio\Presets\Plugin database\Installed`
//! - macOS: `~/Documents/Image-Line/FL Studio/Presets/Plugin database/Installed`

use std::path::{Path, PathBuf};

/// Returns the default `Installed` folder path.
///
/// Returns `None` if the documents folder can't be determined or the
/// database doesn't exist there.
pub fn default_installed_folder() -> Option<PathBuf> {
    let documents = dirs::document_dir()?;
    let path = installed_folder_under(&documents);
    if path.exists() {
        Some(path)
    } else {
        None
    }
}

fn installed_folder_under(documents: &Path) -> PathBuf {
    documents
        .join("Image-Line")
        .join("FL Studio")
        .join("Presets")
        .join("Plugin database")
        .join("Installed")
}
