use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::io::workspace_io::SetupError;
use crate::model::region::Region;

/// A region's output file could not be written
#[derive(Debug, thiserror::Error)]
#[error("could not write {path}: {source}")]
pub struct WriteError {
    pub path: PathBuf,
    pub source: io::Error,
}

/// Create the output directory (and parents) if missing. Idempotent.
pub fn ensure_output_dir(output_root: &Path) -> Result<(), SetupError> {
    fs::create_dir_all(output_root).map_err(|e| SetupError::OutputDirError {
        path: output_root.to_path_buf(),
        source: e,
    })
}

/// `<output_root>/<key>.<extension>`
pub fn output_file(output_root: &Path, region: &Region, extension: &str) -> PathBuf {
    let ext = extension.trim_start_matches('.');
    if ext.is_empty() {
        output_root.join(&region.key)
    } else {
        output_root.join(format!("{}.{}", region.key, ext))
    }
}

/// Write `text` as the output file for `region`, replacing any existing file.
///
/// The file's directory is created if missing (keys may contain `/`). Keys
/// that would land outside `output_root` are refused.
pub fn write_region(
    output_root: &Path,
    region: &Region,
    extension: &str,
    text: &str,
) -> Result<PathBuf, WriteError> {
    let path = output_file(output_root, region, extension);
    let wrap = |e: io::Error| WriteError {
        path: path.clone(),
        source: e,
    };
    if !region.key_stays_inside() {
        return Err(wrap(io::Error::new(
            io::ErrorKind::InvalidInput,
            "key must be a relative path inside the output directory",
        )));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(wrap)?;
    }
    atomic_write(&path, text.as_bytes()).map_err(wrap)?;
    debug!(region = %region.name, path = %path.display(), bytes = text.len(), "wrote region");
    Ok(path)
}

/// `<output_root>-backup`, next to the output directory.
pub fn default_backup_dir(output_root: &Path) -> PathBuf {
    match output_root.file_name() {
        Some(name) => output_root.with_file_name(format!("{}-backup", name.to_string_lossy())),
        None => output_root.join("carve-backup"),
    }
}

/// Copy every region output that already exists under `output_root` into
/// `backup_dir`, keeping the same relative names. Call once per run, before
/// the first write. Returns the backup copies made.
pub fn backup_existing(
    output_root: &Path,
    backup_dir: &Path,
    regions: &[Region],
    extension: &str,
) -> Result<Vec<PathBuf>, SetupError> {
    let mut copied: Vec<PathBuf> = Vec::new();
    for region in regions.iter().filter(|r| r.key_stays_inside()) {
        let existing = output_file(output_root, region, extension);
        if !existing.is_file() {
            continue;
        }
        let dest = output_file(backup_dir, region, extension);
        if copied.contains(&dest) {
            continue;
        }
        let wrap = |e: io::Error| SetupError::BackupError {
            path: existing.clone(),
            source: e,
        };
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(wrap)?;
        }
        fs::copy(&existing, &dest).map_err(wrap)?;
        debug!(from = %existing.display(), to = %dest.display(), "backed up output");
        copied.push(dest);
    }
    Ok(copied)
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
