use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::model::config::SplitConfig;
use crate::model::document::SourceDocument;
use crate::model::workspace::Workspace;

/// Name of the config file looked up during discovery
pub const CONFIG_FILE: &str = "carve.toml";

/// Errors in setup shared by every region. Any of these aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("no carve.toml found in this directory or any parent (run `carve init`)")]
    NoConfig,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ConfigParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("{path}: [template] import must not be empty")]
    EmptyImport { path: PathBuf },
    #[error("could not create output directory {path}: {source}")]
    OutputDirError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not back up {path}: {source}")]
    BackupError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Find the directory holding carve.toml by walking up from `start`.
pub fn discover_workspace(start: &Path) -> Result<PathBuf, SetupError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).is_file() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(SetupError::NoConfig);
        }
    }
}

/// Load a workspace from an explicit config file path.
pub fn load_workspace_file(config_file: &Path) -> Result<Workspace, SetupError> {
    let text = fs::read_to_string(config_file).map_err(|e| SetupError::ReadError {
        path: config_file.to_path_buf(),
        source: e,
    })?;
    let config: SplitConfig =
        toml::from_str(&text).map_err(|e| SetupError::ConfigParseError {
            path: config_file.to_path_buf(),
            source: e,
        })?;
    // An empty import line would make the missing-import check a no-op
    if config.template.import.trim().is_empty() {
        return Err(SetupError::EmptyImport {
            path: config_file.to_path_buf(),
        });
    }
    let root = match config_file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    debug!(
        config = %config_file.display(),
        regions = config.regions.len(),
        "loaded config"
    );
    Ok(Workspace {
        root,
        config_file: config_file.to_path_buf(),
        config,
    })
}

/// Discover carve.toml from `start` and load it.
pub fn load_workspace(start: &Path) -> Result<Workspace, SetupError> {
    let root = discover_workspace(start)?;
    load_workspace_file(&root.join(CONFIG_FILE))
}

/// Read the whole source document. Failure here aborts the run.
pub fn load_document(path: &Path) -> Result<SourceDocument, SetupError> {
    let text = fs::read_to_string(path).map_err(|e| SetupError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let document = SourceDocument::from_text(&text);
    debug!(source = %path.display(), lines = document.len(), "loaded source document");
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CONFIG: &str = r#"source = "big.ts"
output_dir = "parts"

[template]
import = "import { Subject } from './types';"

[[regions]]
name = "One"
key = "one"
start = 1
end = 2
"#;

    #[test]
    fn test_discovers_from_nested_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), CONFIG).unwrap();
        let nested = tmp.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();

        let root = discover_workspace(&nested).unwrap();
        assert_eq!(root, tmp.path());

        let ws = load_workspace(&nested).unwrap();
        assert_eq!(ws.config.regions.len(), 1);
        assert_eq!(ws.source_path(), tmp.path().join("big.ts"));
        assert_eq!(ws.output_path(), tmp.path().join("parts"));
        assert_eq!(ws.source_label(), "big.ts");
    }

    #[test]
    fn test_missing_config_is_no_config() {
        let tmp = TempDir::new().unwrap();
        let err = discover_workspace(tmp.path()).unwrap_err();
        assert!(matches!(err, SetupError::NoConfig));
    }

    #[test]
    fn test_bad_toml_names_the_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        fs::write(&path, "source = \n").unwrap();
        let err = load_workspace_file(&path).unwrap_err();
        assert!(matches!(err, SetupError::ConfigParseError { .. }));
        assert!(err.to_string().contains("custom.toml"));
    }

    #[test]
    fn test_empty_import_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        let blank = CONFIG.replace(
            "import = \"import { Subject } from './types';\"",
            "import = \"   \"",
        );
        assert_ne!(blank, CONFIG);
        fs::write(&path, blank).unwrap();
        let err = load_workspace_file(&path).unwrap_err();
        assert!(matches!(err, SetupError::EmptyImport { .. }));
        assert!(err.to_string().contains("import must not be empty"));
    }

    #[test]
    fn test_explicit_config_file_sets_root() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("split.toml");
        fs::write(&path, CONFIG).unwrap();
        let ws = load_workspace_file(&path).unwrap();
        assert_eq!(ws.root, tmp.path());
        assert_eq!(ws.config_file, path);
    }

    #[test]
    fn test_missing_source_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_document(&tmp.path().join("nope.ts")).unwrap_err();
        assert!(matches!(err, SetupError::ReadError { .. }));
    }

    #[test]
    fn test_loads_document_lines() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("big.ts");
        fs::write(&path, "a\nb\nc\n").unwrap();
        assert_eq!(load_document(&path).unwrap().len(), 3);
    }
}
