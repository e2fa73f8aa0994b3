/// The file being split, held as lines with their original terminators.
///
/// Concatenating every line gives back the exact input text, so slicing never
/// alters content or line endings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceDocument {
    lines: Vec<String>,
}

impl SourceDocument {
    pub fn from_text(text: &str) -> Self {
        SourceDocument {
            lines: text.split_inclusive('\n').map(str::to_string).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines `start..=end`, 1-indexed. `None` if the range is empty, starts at
    /// zero, or runs past the last line.
    pub fn slice(&self, start: usize, end: usize) -> Option<&[String]> {
        if start == 0 || start > end || end > self.lines.len() {
            return None;
        }
        Some(&self.lines[start - 1..end])
    }
}
