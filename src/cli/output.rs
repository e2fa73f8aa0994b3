use std::path::Path;

use serde::Serialize;

use crate::ops::check::{CheckError, CheckWarning};
use crate::ops::report::{LineTable, format_count};
use crate::ops::run::{ExtractionResult, RunReport};
use crate::ops::validate::ValidationIssue;
use crate::util::unicode::pad_to_width;

/// Width of the name column in the line-count table
const NAME_COLUMN: usize = 30;
const RULE_WIDTH: usize = 60;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct RunJson {
    pub source: String,
    pub output_dir: String,
    pub dry_run: bool,
    pub regions: Vec<RegionResultJson>,
    pub total_lines: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub with_issues: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub backed_up: Vec<String>,
}

#[derive(Serialize)]
pub struct RegionResultJson {
    pub name: String,
    pub key: String,
    pub lines: usize,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub issues: Vec<ValidationIssue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RegionErrorJson>,
}

#[derive(Serialize)]
pub struct RegionErrorJson {
    pub kind: &'static str,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn result_to_json(result: &ExtractionResult) -> RegionResultJson {
    RegionResultJson {
        name: result.name.clone(),
        key: result.key.clone(),
        lines: result.line_count,
        success: result.success(),
        path: result.path.as_ref().map(|p| p.display().to_string()),
        issues: result.issues.clone(),
        error: result.failure.as_ref().map(|e| RegionErrorJson {
            kind: e.code(),
            message: e.to_string(),
        }),
    }
}

pub fn run_to_json(report: &RunReport, source: &Path, output_dir: &Path, dry_run: bool) -> RunJson {
    RunJson {
        source: source.display().to_string(),
        output_dir: output_dir.display().to_string(),
        dry_run,
        regions: report.results.iter().map(result_to_json).collect(),
        total_lines: report.total_lines,
        succeeded: report.succeeded,
        failed: report.failed,
        with_issues: report.with_issues,
        backed_up: report
            .backed_up
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// One progress line for a finished region.
pub fn format_progress(result: &ExtractionResult, file_name: &str, dry_run: bool) -> String {
    match &result.failure {
        Some(e) => format!("  error: {}", e),
        None if dry_run => format!(
            "  would create {} ({} lines)",
            file_name,
            format_count(result.line_count)
        ),
        None => format!(
            "  created {} ({} lines)",
            file_name,
            format_count(result.line_count)
        ),
    }
}

/// Validation status block, one line per region plus one per issue.
pub fn format_validation(results: &[(String, &ExtractionResult)]) -> String {
    let mut out = String::new();
    for (file_name, result) in results {
        let status = if !result.success() {
            "failed"
        } else if result.issues.is_empty() {
            "ok"
        } else {
            "issues"
        };
        out.push_str(&format!("  {:<7} {}\n", status, file_name));
        for issue in &result.issues {
            out.push_str(&format!("          - {}\n", issue));
        }
    }
    out
}

/// Fixed-width table of per-region line counts with a total row.
pub fn format_line_table(table: &LineTable) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    out.push_str(&rule);
    out.push('\n');
    for row in &table.rows {
        out.push_str(&format!(
            "{} {:>8} lines\n",
            pad_to_width(&row.name, NAME_COLUMN),
            format_count(row.lines)
        ));
    }
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!(
        "{} {:>8} lines\n",
        pad_to_width("TOTAL", NAME_COLUMN),
        format_count(table.total)
    ));
    out
}

/// One line naming where replaced outputs were copied, if any were.
pub fn format_backup(report: &RunReport, backup_dir: &Path) -> Option<String> {
    match report.backed_up.len() {
        0 => None,
        1 => Some(format!("Backed up 1 existing file to {}", backup_dir.display())),
        n => Some(format!("Backed up {} existing files to {}", n, backup_dir.display())),
    }
}

pub fn format_summary(report: &RunReport) -> String {
    format!(
        "{} succeeded, {} failed, {} with issues",
        report.succeeded, report.failed, report.with_issues
    )
}

pub fn format_check_error(err: &CheckError) -> String {
    match err {
        CheckError::OutOfRange {
            key,
            start,
            end,
            len,
        } => format!(
            "  [{}] lines {}-{} out of range (document has {} lines)",
            key, start, end, len
        ),
        CheckError::DuplicateKey { key, names } => {
            format!("  {} is used by several regions: {}", key, names.join(", "))
        }
        CheckError::DuplicateExport { export, keys } => {
            format!("  export {} is used by: {}", export, keys.join(", "))
        }
        CheckError::KeyOutsideOutput { key, name } => format!(
            "  [{}] ({}) would write outside the output directory",
            key, name
        ),
    }
}

pub fn format_check_warning(warn: &CheckWarning) -> String {
    match warn {
        CheckWarning::Overlap {
            first,
            second,
            start,
            end,
        } => format!("  [{}] overlaps [{}] on lines {}-{}", first, second, start, end),
        CheckWarning::Gap {
            after,
            before,
            start,
            end,
        } => format!(
            "  lines {}-{} between [{}] and [{}] belong to no region",
            start, end, after, before
        ),
    }
}
