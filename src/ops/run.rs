use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::io::output_io::{self, WriteError};
use crate::io::workspace_io::SetupError;
use crate::model::document::SourceDocument;
use crate::model::region::Region;
use crate::ops::extract::{ExtractError, extract_region};
use crate::ops::template::Template;
use crate::ops::validate::{ValidationIssue, validate_output};

/// Why a single region failed outright
#[derive(Debug, thiserror::Error)]
pub enum RegionError {
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Write(#[from] WriteError),
}

impl RegionError {
    /// Short name, as used in `--json` output.
    pub fn code(&self) -> &'static str {
        match self {
            RegionError::Extract(ExtractError::OutOfRange { .. }) => "out-of-range",
            RegionError::Write(_) => "write-failed",
        }
    }
}

/// What happened to one region. Built once, never changed afterwards.
#[derive(Debug)]
pub struct ExtractionResult {
    pub name: String,
    pub key: String,
    /// Produced text. Empty when extraction failed.
    pub text: String,
    /// Source lines consumed. 0 when extraction failed.
    pub line_count: usize,
    pub issues: Vec<ValidationIssue>,
    pub failure: Option<RegionError>,
    /// Where the file went; `None` on failure or dry run
    pub path: Option<PathBuf>,
}

impl ExtractionResult {
    pub fn success(&self) -> bool {
        self.failure.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Extract and validate, but write nothing
    pub dry_run: bool,
    /// Copy outputs that are about to be replaced here before the first write
    pub backup_dir: Option<PathBuf>,
}

/// Hooks called around each region while a run is in progress.
pub trait Progress {
    fn region_started(&mut self, _region: &Region) {}
    fn region_finished(&mut self, _region: &Region, _result: &ExtractionResult) {}
}

impl Progress for () {}

/// Ordered per-region results plus the counters for the final report.
#[derive(Debug, Default)]
pub struct RunReport {
    pub results: Vec<ExtractionResult>,
    /// Sum of line counts over regions that extracted successfully
    pub total_lines: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Regions that produced text carrying validation issues
    pub with_issues: usize,
    /// Backup copies made before the first write
    pub backed_up: Vec<PathBuf>,
}

impl RunReport {
    fn push(&mut self, result: ExtractionResult) {
        if result.success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        if !result.issues.is_empty() {
            self.with_issues += 1;
        }
        self.total_lines += result.line_count;
        self.results.push(result);
    }
}

/// Extract, write and validate every region in order.
///
/// Only setup can fail the whole call: the output directory cannot be
/// created, or a backup copy fails. Per-region failures are recorded on that
/// region's result and processing moves on, so there is always one result
/// per region.
pub fn run_all(
    document: &SourceDocument,
    regions: &[Region],
    output_root: &Path,
    extension: &str,
    template: &Template,
    options: &RunOptions,
) -> Result<RunReport, SetupError> {
    run_all_with(document, regions, output_root, extension, template, options, &mut ())
}

/// [`run_all`], telling `progress` when each region starts and finishes.
pub fn run_all_with(
    document: &SourceDocument,
    regions: &[Region],
    output_root: &Path,
    extension: &str,
    template: &Template,
    options: &RunOptions,
    progress: &mut impl Progress,
) -> Result<RunReport, SetupError> {
    let mut report = RunReport::default();
    if !options.dry_run {
        output_io::ensure_output_dir(output_root)?;
        if let Some(backup_dir) = &options.backup_dir {
            report.backed_up =
                output_io::backup_existing(output_root, backup_dir, regions, extension)?;
            info!(
                files = report.backed_up.len(),
                dir = %backup_dir.display(),
                "backed up existing outputs"
            );
        }
    }

    for region in regions {
        progress.region_started(region);
        let result = run_region(document, region, output_root, extension, template, options);
        match &result.failure {
            Some(e) => warn!(region = %region.name, error = %e, "region failed"),
            None if !result.issues.is_empty() => warn!(
                region = %region.name,
                issues = result.issues.len(),
                "region has validation issues"
            ),
            None => debug!(region = %region.name, lines = result.line_count, "region done"),
        }
        progress.region_finished(region, &result);
        report.push(result);
    }

    info!(
        regions = regions.len(),
        succeeded = report.succeeded,
        failed = report.failed,
        lines = report.total_lines,
        "run complete"
    );
    Ok(report)
}

fn run_region(
    document: &SourceDocument,
    region: &Region,
    output_root: &Path,
    extension: &str,
    template: &Template,
    options: &RunOptions,
) -> ExtractionResult {
    let mut result = ExtractionResult {
        name: region.name.clone(),
        key: region.key.clone(),
        text: String::new(),
        line_count: 0,
        issues: Vec::new(),
        failure: None,
        path: None,
    };

    let extraction = match extract_region(document, region, template) {
        Ok(ex) => ex,
        Err(e) => {
            result.failure = Some(e.into());
            return result;
        }
    };
    result.line_count = extraction.line_count;

    if !options.dry_run {
        match output_io::write_region(output_root, region, extension, &extraction.text) {
            Ok(path) => result.path = Some(path),
            Err(e) => result.failure = Some(e.into()),
        }
    }

    result.issues = validate_output(&extraction.text, region, template);
    result.text = extraction.text;
    result
}
