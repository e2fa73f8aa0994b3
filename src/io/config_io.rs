use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::io::output_io::atomic_write;
use crate::model::config::SplitConfig;

/// Error type for editing carve.toml in place
#[derive(Debug, thiserror::Error)]
pub enum ConfigEditError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {message}")]
    ParseError { path: PathBuf, message: String },
    #[error("region \"{key}\": {field} would move from {from} to {to}, below line 1")]
    BoundaryUnderflow {
        key: String,
        field: &'static str,
        from: i64,
        to: i64,
    },
    #[error("region \"{key}\": {field} = {from} cannot move by {by}, the result does not fit")]
    BoundaryOverflow {
        key: String,
        field: &'static str,
        from: i64,
        by: i64,
    },
    #[error("{path} already exists (use --force to overwrite)")]
    AlreadyExists { path: PathBuf },
}

/// Read the config, returning both the parsed config and the raw
/// toml_edit Document for round-trip-safe editing.
pub fn read_config(path: &Path) -> Result<(SplitConfig, toml_edit::DocumentMut), ConfigEditError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigEditError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let parse_error = |message: String| ConfigEditError::ParseError {
        path: path.to_path_buf(),
        message,
    };
    let config: SplitConfig = toml::from_str(&text).map_err(|e| parse_error(e.to_string()))?;
    let doc: toml_edit::DocumentMut = text
        .parse()
        .map_err(|e: toml_edit::TomlError| parse_error(e.to_string()))?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(path: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigEditError> {
    atomic_write(path, doc.to_string().as_bytes()).map_err(|e| ConfigEditError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Create a new config file from `contents`. Refuses to replace an existing
/// file unless `force` is set.
pub fn create_config(path: &Path, contents: &str, force: bool) -> Result<(), ConfigEditError> {
    if path.exists() && !force {
        return Err(ConfigEditError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }
    fs::write(path, contents).map_err(|e| ConfigEditError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Move every region boundary at or after line `at` by `by` lines.
///
/// Use after inserting (`by > 0`) or deleting (`by < 0`) lines in the source.
/// Only the edited integers change; comments and layout are kept. Nothing in
/// `doc` is modified if any boundary would drop below line 1. Returns the
/// number of boundaries moved.
pub fn shift_regions(
    doc: &mut toml_edit::DocumentMut,
    at: i64,
    by: i64,
) -> Result<usize, ConfigEditError> {
    let Some(regions) = doc
        .get_mut("regions")
        .and_then(|item| item.as_array_of_tables_mut())
    else {
        return Ok(0);
    };

    // Plan first so a bad shift leaves the document untouched
    let mut plan: Vec<(usize, &'static str, i64)> = Vec::new();
    for (i, table) in regions.iter().enumerate() {
        for field in ["start", "end"] {
            let Some(current) = table.get(field).and_then(|v| v.as_integer()) else {
                continue;
            };
            if current < at {
                continue;
            }
            let key = || {
                table
                    .get("key")
                    .and_then(|v| v.as_str())
                    .unwrap_or("?")
                    .to_string()
            };
            let Some(moved) = current.checked_add(by) else {
                return Err(ConfigEditError::BoundaryOverflow {
                    key: key(),
                    field,
                    from: current,
                    by,
                });
            };
            if moved < 1 {
                return Err(ConfigEditError::BoundaryUnderflow {
                    key: key(),
                    field,
                    from: current,
                    to: moved,
                });
            }
            plan.push((i, field, moved));
        }
    }

    for (i, field, moved) in &plan {
        if let Some(value) = regions
            .get_mut(*i)
            .and_then(|t| t.get_mut(field))
            .and_then(|item| item.as_value_mut())
        {
            let decor = value.decor().clone();
            *value = toml_edit::Value::from(*moved);
            *value.decor_mut() = decor;
        }
    }
    debug!(at, by, moved = plan.len(), "shifted region boundaries");
    Ok(plan.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_config() -> &'static str {
        r#"source = "jhs-data.ts"
output_dir = "subjects"

[template]
import = 'import { Subject } from "@/types/subjects";'

[[regions]]
name = "English Language"
key = "english-language"
start = 21
end = 6353  # ends right before Mathematics

[[regions]]
name = "Mathematics"
key = "core-mathematics"
start = 6354
end = 7425
"#
    }

    #[test]
    fn test_round_trip_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("carve.toml");
        fs::write(&path, sample_config()).unwrap();

        let (config, doc) = read_config(&path).unwrap();
        assert_eq!(config.regions.len(), 2);
        write_config(&path, &doc).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), sample_config());
    }

    #[test]
    fn test_shift_after_insert() {
        let mut doc: toml_edit::DocumentMut = sample_config().parse().unwrap();
        let moved = shift_regions(&mut doc, 6000, 5).unwrap();
        assert_eq!(moved, 3);

        let expected = sample_config()
            .replace("end = 6353  #", "end = 6358  #")
            .replace("start = 6354", "start = 6359")
            .replace("end = 7425", "end = 7430");
        assert_eq!(doc.to_string(), expected);
    }

    #[test]
    fn test_shift_after_delete() {
        let mut doc: toml_edit::DocumentMut = sample_config().parse().unwrap();
        shift_regions(&mut doc, 1, -20).unwrap();
        let config: SplitConfig = toml::from_str(&doc.to_string()).unwrap();
        assert_eq!(config.regions[0].start, 1);
        assert_eq!(config.regions[0].end, 6333);
        assert_eq!(config.regions[1].start, 6334);
    }

    #[test]
    fn test_shift_underflow_leaves_doc_untouched() {
        let mut doc: toml_edit::DocumentMut = sample_config().parse().unwrap();
        let err = shift_regions(&mut doc, 1, -21).unwrap_err();
        assert!(matches!(
            err,
            ConfigEditError::BoundaryUnderflow {
                field: "start",
                from: 21,
                to: 0,
                ..
            }
        ));
        assert_eq!(doc.to_string(), sample_config());
    }

    #[test]
    fn test_shift_overflow_leaves_doc_untouched() {
        let mut doc: toml_edit::DocumentMut = sample_config().parse().unwrap();
        let err = shift_regions(&mut doc, 1, i64::MAX).unwrap_err();
        assert!(matches!(
            err,
            ConfigEditError::BoundaryOverflow {
                field: "start",
                from: 21,
                by: i64::MAX,
                ..
            }
        ));
        assert!(err.to_string().contains("english-language"));
        assert_eq!(doc.to_string(), sample_config());
    }

    #[test]
    fn test_shift_without_regions() {
        let mut doc: toml_edit::DocumentMut = "source = \"a\"\n".parse().unwrap();
        assert_eq!(shift_regions(&mut doc, 1, 3).unwrap(), 0);
    }

    #[test]
    fn test_create_refuses_overwrite() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("carve.toml");
        create_config(&path, "a = 1\n", false).unwrap();
        let err = create_config(&path, "a = 2\n", false).unwrap_err();
        assert!(matches!(err, ConfigEditError::AlreadyExists { .. }));
        create_config(&path, "a = 2\n", true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a = 2\n");
    }
}
