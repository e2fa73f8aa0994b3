use std::fmt;

use serde::Serialize;

use crate::model::region::Region;
use crate::ops::template::Template;

/// A heuristic smoke-test failure on a produced file.
///
/// None of these prove or disprove that the output is valid source code.
/// They catch the obvious mistakes (a boundary that cut an object literal in
/// half, a template that lost its import) before the real compiler runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ValidationIssue {
    /// The template's import line is not in the text, or the template has
    /// no import line at all
    MissingImport,
    /// `export const <export>` is not in the text
    MissingExport,
    /// `{` and `}` counts differ
    UnbalancedBraces { open: usize, close: usize },
}

impl ValidationIssue {
    /// Stable short name, as used in `--json` output.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationIssue::MissingImport => "missing-import",
            ValidationIssue::MissingExport => "missing-export",
            ValidationIssue::UnbalancedBraces { .. } => "unbalanced-braces",
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingImport => write!(f, "missing import statement"),
            ValidationIssue::MissingExport => write!(f, "missing export statement"),
            ValidationIssue::UnbalancedBraces { open, close } => {
                write!(f, "unbalanced braces ({open} open, {close} close)")
            }
        }
    }
}

/// Run the three smoke checks on `text`. An empty result means
/// "heuristically valid", nothing more.
pub fn validate_output(text: &str, region: &Region, template: &Template) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let import = template.import_marker(region);
    if import.trim().is_empty() || !text.contains(import.as_str()) {
        issues.push(ValidationIssue::MissingImport);
    }
    if !text.contains(template.export_marker(region).as_str()) {
        issues.push(ValidationIssue::MissingExport);
    }

    let (open, close) = count_braces(text);
    if open != close {
        issues.push(ValidationIssue::UnbalancedBraces { open, close });
    }

    issues
}

fn count_braces(text: &str) -> (usize, usize) {
    text.bytes().fold((0, 0), |(open, close), b| match b {
        b'{' => (open + 1, close),
        b'}' => (open, close + 1),
        _ => (open, close),
    })
}
