use tracing::debug;

use crate::model::document::SourceDocument;
use crate::model::region::Region;
use crate::ops::template::Template;

/// Error type for slicing a region out of the source document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("lines {start}-{end} are out of range for a document of {len} lines")]
    OutOfRange { start: usize, end: usize, len: usize },
}

/// A region's produced text and how many source lines went into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub text: String,
    pub line_count: usize,
}

/// Slice `region` out of `document` and wrap it in `template`.
///
/// Lines are copied verbatim, terminators included. Fails when the range
/// starts at 0, is inverted, or runs past the last line. Performs no I/O.
pub fn extract_region(
    document: &SourceDocument,
    region: &Region,
    template: &Template,
) -> Result<Extraction, ExtractError> {
    let lines = document
        .slice(region.start, region.end)
        .ok_or(ExtractError::OutOfRange {
            start: region.start,
            end: region.end,
            len: document.len(),
        })?;

    let content = lines.concat();
    debug!(
        region = %region.name,
        start = region.start,
        end = region.end,
        bytes = content.len(),
        "sliced region"
    );

    Ok(Extraction {
        text: template.render(region, &content),
        line_count: lines.len(),
    })
}
