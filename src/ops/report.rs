use serde::Serialize;

use crate::model::region::Region;

/// One row of the line-count report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineRow {
    pub name: String,
    pub key: String,
    pub lines: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineTable {
    pub rows: Vec<LineRow>,
    pub total: usize,
}

/// Line counts straight from the region table, without reading the source.
/// Inverted ranges count as 0.
pub fn line_table(regions: &[Region]) -> LineTable {
    let rows: Vec<LineRow> = regions
        .iter()
        .map(|r| LineRow {
            name: r.name.clone(),
            key: r.key.clone(),
            lines: r.span_len(),
        })
        .collect();
    let total = rows.iter().map(|r| r.lines).sum();
    LineTable { rows, total }
}

/// `6333` → `6,333`
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_match_rows() {
        let regions = vec![
            Region::new("English Language", "english-language", 21, 6353),
            Region::new("Mathematics", "core-mathematics", 6354, 7425),
            Region::new("Broken", "broken", 10, 5),
        ];
        let table = line_table(&regions);
        assert_eq!(table.rows[0].lines, 6333);
        assert_eq!(table.rows[1].lines, 1072);
        assert_eq!(table.rows[2].lines, 0);
        assert_eq!(table.total, 6333 + 1072);
    }

    #[test]
    fn test_thousands_separator() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(6333), "6,333");
        assert_eq!(format_count(1234567), "1,234,567");
    }
}
