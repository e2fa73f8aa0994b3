use std::path::{Component, Path};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A named, contiguous line range of the source document that becomes its
/// own output file.
///
/// Line numbers are 1-indexed and inclusive on both ends. Nothing here checks
/// `start <= end` or the document length; that happens at extraction time so a
/// bad entry only fails its own region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Human-readable name, used in the header comment and the report
    pub name: String,
    /// Output file stem (`<key>.<extension>`)
    pub key: String,
    pub start: usize,
    pub end: usize,
    /// Export identifier. Defaults to the camel-cased key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export: Option<String>,
    /// Extra template placeholders, in declaration order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub meta: IndexMap<String, String>,
}

impl Region {
    pub fn new(name: &str, key: &str, start: usize, end: usize) -> Self {
        Region {
            name: name.to_string(),
            key: key.to_string(),
            start,
            end,
            export: None,
            meta: IndexMap::new(),
        }
    }

    pub fn with_export(mut self, export: &str) -> Self {
        self.export = Some(export.to_string());
        self
    }

    pub fn with_meta(mut self, key: &str, value: &str) -> Self {
        self.meta.insert(key.to_string(), value.to_string());
        self
    }

    /// The identifier bound by the `export const` line.
    pub fn export_name(&self) -> String {
        match &self.export {
            Some(e) if !e.is_empty() => e.clone(),
            _ => camel_case(&self.key),
        }
    }

    /// Number of lines the range spans, or 0 for an inverted range.
    pub fn span_len(&self) -> usize {
        if self.end < self.start {
            0
        } else {
            self.end - self.start + 1
        }
    }

    /// True when the two inclusive ranges share at least one line.
    pub fn overlaps(&self, other: &Region) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// True when `key` names a path inside the output directory: relative,
    /// non-empty, and made only of plain segments (no `..`, `.` or root).
    pub fn key_stays_inside(&self) -> bool {
        let mut components = Path::new(&self.key).components().peekable();
        components.peek().is_some() && components.all(|c| matches!(c, Component::Normal(_)))
    }
}

/// `core-mathematics` → `coreMathematics`. Any non-alphanumeric character is
/// treated as a word separator.
fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let words = key
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty());
    for (i, word) in words.enumerate() {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            if i == 0 {
                out.extend(first.to_lowercase());
            } else {
                out.extend(first.to_uppercase());
            }
            out.push_str(chars.as_str());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_defaults_to_camel_cased_key() {
        let r = Region::new("Core Mathematics", "core-mathematics", 1, 2);
        assert_eq!(r.export_name(), "coreMathematics");

        let r = Region::new("RME", "rme", 1, 2);
        assert_eq!(r.export_name(), "rme");

        let r = Region::new("Arts", "creative_arts-design", 1, 2);
        assert_eq!(r.export_name(), "creativeArtsDesign");
    }

    #[test]
    fn test_explicit_export_wins() {
        let r = Region::new("Maths", "core-mathematics", 1, 2).with_export("mathematicsSubject");
        assert_eq!(r.export_name(), "mathematicsSubject");
    }

    #[test]
    fn test_empty_export_falls_back() {
        let r = Region::new("Maths", "maths", 1, 2).with_export("");
        assert_eq!(r.export_name(), "maths");
    }

    #[test]
    fn test_span_len_is_inclusive() {
        assert_eq!(Region::new("a", "a", 2, 4).span_len(), 3);
        assert_eq!(Region::new("a", "a", 7, 7).span_len(), 1);
        assert_eq!(Region::new("a", "a", 5, 3).span_len(), 0);
    }

    #[test]
    fn test_key_must_stay_inside_output_dir() {
        assert!(Region::new("A", "english", 1, 2).key_stays_inside());
        assert!(Region::new("A", "jhs/english", 1, 2).key_stays_inside());
        assert!(!Region::new("A", "../escaped", 1, 2).key_stays_inside());
        assert!(!Region::new("A", "jhs/../../escaped", 1, 2).key_stays_inside());
        assert!(!Region::new("A", "/abs/path", 1, 2).key_stays_inside());
        assert!(!Region::new("A", "./here", 1, 2).key_stays_inside());
        assert!(!Region::new("A", "", 1, 2).key_stays_inside());
    }

    #[test]
    fn test_overlap_is_inclusive() {
        let a = Region::new("a", "a", 1, 10);
        let b = Region::new("b", "b", 10, 20);
        let c = Region::new("c", "c", 11, 20);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }
}
