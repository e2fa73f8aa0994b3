use std::path::{Path, PathBuf};

use super::config::SplitConfig;

/// A loaded carve.toml and where it lives
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Directory holding carve.toml; relative config paths resolve here
    pub root: PathBuf,
    /// The config file itself (normally `<root>/carve.toml`)
    pub config_file: PathBuf,
    /// Parsed carve.toml
    pub config: SplitConfig,
}

impl Workspace {
    pub fn source_path(&self) -> PathBuf {
        self.config.source_path(&self.root)
    }

    pub fn output_path(&self) -> PathBuf {
        self.config.output_path(&self.root)
    }

    pub fn backup_path(&self) -> Option<PathBuf> {
        self.config.backup_path(&self.root)
    }

    /// File name of the source, used for the `{source}` placeholder.
    pub fn source_label(&self) -> String {
        label_for(&self.config.source)
    }
}

/// Last path component, or the whole path if there is none.
pub fn label_for(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
