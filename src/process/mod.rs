// src/process/mod.rs
pub mod coords;
pub mod utils;

use serde::Serialize;
use tracing::{debug, trace};

pub use coords::{CoordinateRepair, FlowCoords, LongitudeRepair};
pub use utils::coerce_value;

/// One parsed cell. `Missing` is never stored in a row; it is what a lookup
/// of a header the row never received returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Missing,
}

impl CellValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

static MISSING: CellValue = CellValue::Missing;

/// A header-keyed row in first-insertion column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawRow {
    cells: Vec<(String, CellValue)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`; a repeated key overwrites the earlier value in place.
    pub fn insert(&mut self, key: &str, value: CellValue) {
        match self.cells.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => *slot = value,
            None => self.cells.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> &CellValue {
        self.cells
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
            .unwrap_or(&MISSING)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.cells.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Header plus rows of one parsed table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Split a data line into raw field strings.
///
/// A `"` toggles the quoted state and is not kept; commas only separate
/// fields outside quotes. An unterminated quote stays open to end of line.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut within_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => within_quotes = !within_quotes,
            ',' if !within_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

/// Parse delimited text into headers and typed rows.
///
/// Blank lines (CR or LF separated) are skipped everywhere. The first
/// surviving line is the header; excess fields on a row are dropped and
/// short rows simply lack the trailing columns. A leading UTF-8 byte-order
/// mark is ignored.
#[tracing::instrument(level = "debug", skip(text), fields(bytes = text.len()))]
pub fn parse_table(text: &str) -> ParsedTable {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text
        .split(|c| c == '\r' || c == '\n')
        .filter(|l| !l.trim().is_empty());

    let headers: Vec<String> = match lines.next() {
        Some(h) => h.split(',').map(|s| s.trim().to_string()).collect(),
        None => {
            debug!("no non-blank lines; empty table");
            return ParsedTable::default();
        }
    };

    let mut rows = Vec::new();
    for (idx, line) in lines.enumerate() {
        let fields = split_fields(line);
        if fields.len() != headers.len() {
            trace!(
                line = idx + 2,
                fields = fields.len(),
                headers = headers.len(),
                "field count differs from header"
            );
        }

        let mut row = RawRow::new();
        for (header, field) in headers.iter().zip(fields.iter()) {
            row.insert(header, coerce_value(field));
        }
        rows.push(row);
    }

    debug!(columns = headers.len(), rows = rows.len(), "parsed table");
    ParsedTable { headers, rows }
}

/// Row-only view of [`parse_table`].
pub fn parse_rows(text: &str) -> Vec<RawRow> {
    parse_table(text).rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(parse_rows("").is_empty());
        assert!(parse_rows("\n\r\n   \n").is_empty());
        assert!(parse_table("  \n").headers.is_empty());
    }

    #[test]
    fn test_header_only() {
        let t = parse_table(" a , b \n");
        assert_eq!(t.headers, vec!["a", "b"]);
        assert!(t.rows.is_empty());
    }

    #[test]
    fn test_quoted_comma() {
        let rows = parse_rows("name,value\n\"A, B\",5\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name"), &CellValue::Text("A, B".into()));
        assert_eq!(rows[0].get("value"), &CellValue::Number(5.0));
    }

    #[test]
    fn test_quoted_number_is_number() {
        let rows = parse_rows("v\n\"42\"");
        assert_eq!(rows[0].get("v"), &CellValue::Number(42.0));
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let rows = parse_rows("a,b\r\n\r\n1,2\r\n\r\n3,4\r\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("a"), &CellValue::Number(3.0));
        assert_eq!(rows[1].get("b"), &CellValue::Number(4.0));
    }

    #[test]
    fn test_short_row_leaves_missing() {
        let rows = parse_rows("a,b,c\n1,2");
        assert_eq!(rows[0].len(), 2);
        assert!(!rows[0].contains("c"));
        assert!(rows[0].get("c").is_missing());
    }

    #[test]
    fn test_excess_fields_dropped() {
        let rows = parse_rows("a,b\n1,2,3,4");
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[0].get("b"), &CellValue::Number(2.0));
    }

    #[test]
    fn test_only_delimiters() {
        let rows = parse_rows("a,b,c\n,,");
        assert_eq!(rows[0].len(), 3);
        for (_, v) in rows[0].iter() {
            assert_eq!(v, &CellValue::Text(String::new()));
        }
    }

    #[test]
    fn test_duplicate_header_last_write_wins() {
        let t = parse_table("x,y,x\n1,2,3");
        let row = &t.rows[0];
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("x"), &CellValue::Number(3.0));
        let keys: Vec<&str> = row.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["x", "y"]);
    }

    #[test]
    fn test_unterminated_quote_swallows_rest_of_line() {
        let rows = parse_rows("a,b,c\n\"open,1,2\n3,4,5");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("a"), &CellValue::Text("open,1,2".into()));
        assert!(rows[0].get("b").is_missing());
        assert_eq!(rows[1].get("c"), &CellValue::Number(5.0));
    }

    #[test]
    fn test_leading_bom_stripped() {
        let t = parse_table("\u{feff}year,origin_name\r\n2021,A\r\n");
        assert_eq!(t.headers, vec!["year", "origin_name"]);
        assert_eq!(t.rows[0].get("year"), &CellValue::Number(2021.0));

        // only the leading mark is special
        let t = parse_table("a\n\u{feff}x");
        assert_eq!(t.rows[0].get("a"), &CellValue::Text("\u{feff}x".into()));
    }

    #[test]
    fn test_reparse_is_identical() {
        let text = "a,b\n\"x, y\",1\n2,\n";
        assert_eq!(parse_table(text), parse_table(text));
    }
}
