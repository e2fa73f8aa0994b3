use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::model::region::Region;

/// Configuration from carve.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Source file, relative to the directory holding carve.toml
    pub source: PathBuf,
    /// Output directory, relative to the directory holding carve.toml
    pub output_dir: PathBuf,
    /// Default: see src/cli/handlers/init.rs
    #[serde(default = "default_extension")]
    pub extension: String,
    pub template: TemplateConfig,
    /// Where `carve run --backup` copies files it is about to replace,
    /// relative to the directory holding carve.toml. Setting it turns
    /// backups on for every run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<PathBuf>,
    #[serde(default)]
    pub regions: Vec<Region>,
}

/// The pieces of the fixed output shape a caller may change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// First line of every output file
    pub import: String,
    /// Optional annotation: `export const x: <type> = ...`
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_annotation: Option<String>,
    /// Comment lines above the provenance line
    #[serde(default = "default_header")]
    pub header: Vec<String>,
}

/// Default: see src/cli/handlers/init.rs
fn default_extension() -> String {
    "ts".to_string()
}

/// Default: see src/cli/handlers/init.rs
fn default_header() -> Vec<String> {
    vec!["{name} data".to_string()]
}

impl SplitConfig {
    /// Resolve `source` against the config directory.
    pub fn source_path(&self, base: &Path) -> PathBuf {
        base.join(&self.source)
    }

    /// Resolve `output_dir` against the config directory.
    pub fn output_path(&self, base: &Path) -> PathBuf {
        base.join(&self.output_dir)
    }

    /// Resolve `backup_dir` against the config directory, if set.
    pub fn backup_path(&self, base: &Path) -> Option<PathBuf> {
        self.backup_dir.as_ref().map(|dir| base.join(dir))
    }
}
