use std::collections::HashMap;

use serde::Serialize;

use crate::model::document::SourceDocument;
use crate::model::region::Region;

/// Structured result from `carve check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// A problem that will make `carve run` fail or clobber output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    /// Range starts at 0, is inverted, or runs past the document
    #[serde(rename = "out_of_range")]
    OutOfRange {
        key: String,
        start: usize,
        end: usize,
        len: usize,
    },
    /// Several regions would write the same file
    #[serde(rename = "duplicate_key")]
    DuplicateKey { key: String, names: Vec<String> },
    /// Several regions would export the same identifier
    #[serde(rename = "duplicate_export")]
    DuplicateExport { export: String, keys: Vec<String> },
    /// Key is absolute or climbs out with `..`
    #[serde(rename = "key_outside_output")]
    KeyOutsideOutput { key: String, name: String },
}

/// Something that is probably a mistake but does not stop a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    /// Two ranges share lines
    #[serde(rename = "overlap")]
    Overlap {
        first: String,
        second: String,
        start: usize,
        end: usize,
    },
    /// Lines between two consecutive ranges that no region covers
    #[serde(rename = "gap")]
    Gap {
        after: String,
        before: String,
        start: usize,
        end: usize,
    },
}

// ---------------------------------------------------------------------------
// Main check entry point
// ---------------------------------------------------------------------------

/// Lint a region table against the document it will be run on.
///
/// This is a read-only operation, it writes nothing.
///
/// Checks performed:
/// 1. Every range satisfies `1 <= start <= end <= len`
/// 2. No two regions share an output key
/// 3. No two regions share an export identifier
/// 4. Every key names a file inside the output directory
/// 5. Warnings for overlapping ranges and for gaps between consecutive ranges
pub fn check_regions(document: &SourceDocument, regions: &[Region]) -> CheckResult {
    let mut result = CheckResult::default();
    let len = document.len();

    for r in regions {
        if document.slice(r.start, r.end).is_none() {
            result.errors.push(CheckError::OutOfRange {
                key: r.key.clone(),
                start: r.start,
                end: r.end,
                len,
            });
        }
    }

    for (key, names) in duplicates(regions.iter().map(|r| (r.key.clone(), r.name.clone()))) {
        result.errors.push(CheckError::DuplicateKey { key, names });
    }
    for (export, keys) in duplicates(regions.iter().map(|r| (r.export_name(), r.key.clone()))) {
        result.errors.push(CheckError::DuplicateExport { export, keys });
    }

    for r in regions.iter().filter(|r| !r.key_stays_inside()) {
        result.errors.push(CheckError::KeyOutsideOutput {
            key: r.key.clone(),
            name: r.name.clone(),
        });
    }

    // Overlaps and gaps only make sense for well-formed ranges
    let mut ordered: Vec<&Region> = regions
        .iter()
        .filter(|r| r.start >= 1 && r.start <= r.end)
        .collect();
    ordered.sort_by_key(|r| (r.start, r.end));

    for (i, a) in ordered.iter().enumerate() {
        for b in &ordered[i + 1..] {
            if b.start > a.end {
                break;
            }
            if a.overlaps(b) {
                result.warnings.push(CheckWarning::Overlap {
                    first: a.key.clone(),
                    second: b.key.clone(),
                    start: b.start,
                    end: a.end.min(b.end),
                });
            }
        }
    }

    let mut covered_to = 0;
    let mut last_key: Option<&str> = None;
    for r in &ordered {
        if let Some(prev) = last_key {
            if r.start > covered_to + 1 {
                result.warnings.push(CheckWarning::Gap {
                    after: prev.to_string(),
                    before: r.key.clone(),
                    start: covered_to + 1,
                    end: r.start - 1,
                });
            }
        }
        if r.end >= covered_to {
            covered_to = r.end;
            last_key = Some(r.key.as_str());
        }
    }

    result.valid = result.errors.is_empty();
    result
}

/// Group `(id, label)` pairs by id, keeping ids seen more than once in
/// first-seen order.
fn duplicates(pairs: impl Iterator<Item = (String, String)>) -> Vec<(String, Vec<String>)> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<String>> = HashMap::new();
    for (id, label) in pairs {
        let entry = groups.entry(id.clone()).or_default();
        if entry.is_empty() {
            order.push(id);
        }
        entry.push(label);
    }
    order
        .into_iter()
        .filter_map(|id| {
            let labels = groups.remove(&id)?;
            (labels.len() > 1).then_some((id, labels))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(lines: usize) -> SourceDocument {
        let text: String = (1..=lines).map(|i| format!("{i}\n")).collect();
        SourceDocument::from_text(&text)
    }

    #[test]
    fn test_clean_contiguous_table() {
        let regions = vec![
            Region::new("A", "a", 1, 10),
            Region::new("B", "b", 11, 20),
            Region::new("C", "c", 21, 30),
        ];
        let result = check_regions(&doc(30), &regions);
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_out_of_range_and_inverted() {
        let regions = vec![
            Region::new("A", "a", 1, 10),
            Region::new("Inverted", "inv", 8, 4),
            Region::new("Late", "late", 25, 31),
        ];
        let result = check_regions(&doc(30), &regions);
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec![
                CheckError::OutOfRange {
                    key: "inv".to_string(),
                    start: 8,
                    end: 4,
                    len: 30
                },
                CheckError::OutOfRange {
                    key: "late".to_string(),
                    start: 25,
                    end: 31,
                    len: 30
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_keys_and_exports() {
        let regions = vec![
            Region::new("A", "a", 1, 10).with_export("shared"),
            Region::new("B", "b", 11, 20).with_export("shared"),
            Region::new("A again", "a", 21, 30),
        ];
        let result = check_regions(&doc(30), &regions);
        assert_eq!(
            result.errors,
            vec![
                CheckError::DuplicateKey {
                    key: "a".to_string(),
                    names: vec!["A".to_string(), "A again".to_string()],
                },
                CheckError::DuplicateExport {
                    export: "shared".to_string(),
                    keys: vec!["a".to_string(), "b".to_string()],
                },
            ]
        );
    }

    #[test]
    fn test_keys_outside_output_dir_are_errors() {
        let regions = vec![
            Region::new("A", "jhs/a", 1, 10),
            Region::new("Up", "../up", 11, 20),
            Region::new("Root", "/etc/root", 21, 30),
        ];
        let result = check_regions(&doc(30), &regions);
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec![
                CheckError::KeyOutsideOutput {
                    key: "../up".to_string(),
                    name: "Up".to_string(),
                },
                CheckError::KeyOutsideOutput {
                    key: "/etc/root".to_string(),
                    name: "Root".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_overlap_and_gap_are_warnings() {
        let regions = vec![
            Region::new("C", "c", 25, 30),
            Region::new("A", "a", 1, 10),
            Region::new("B", "b", 8, 20),
        ];
        let result = check_regions(&doc(30), &regions);
        assert!(result.valid);
        assert_eq!(
            result.warnings,
            vec![
                CheckWarning::Overlap {
                    first: "a".to_string(),
                    second: "b".to_string(),
                    start: 8,
                    end: 10,
                },
                CheckWarning::Gap {
                    after: "b".to_string(),
                    before: "c".to_string(),
                    start: 21,
                    end: 24,
                },
            ]
        );
    }

    #[test]
    fn test_nested_range_is_overlap_not_gap() {
        let regions = vec![
            Region::new("Outer", "outer", 1, 20),
            Region::new("Inner", "inner", 5, 6),
            Region::new("Next", "next", 21, 30),
        ];
        let result = check_regions(&doc(30), &regions);
        assert_eq!(result.warnings.len(), 1);
        assert!(matches!(result.warnings[0], CheckWarning::Overlap { .. }));
    }

    #[test]
    fn test_json_shape() {
        let regions = vec![Region::new("A", "a", 3, 1)];
        let result = check_regions(&doc(5), &regions);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["errors"][0]["type"], "out_of_range");
        assert_eq!(json["errors"][0]["key"], "a");
    }
}
