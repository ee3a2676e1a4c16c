//! In-memory tabular view of a decoded export file.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;

use crate::error::{ParseError, Result};

/// A single decoded cell.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

static EMPTY_CELL: RawCell = RawCell::Empty;

impl RawCell {
    /// Deterministic text rendering used for keys and for text parsing.
    pub fn raw_text(&self) -> String {
        match self {
            RawCell::Empty => String::new(),
            RawCell::Text(s) => s.trim().to_string(),
            RawCell::Number(n) => format!("{}", n),
            RawCell::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for RawCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw_text())
    }
}

/// Header names plus data rows, with lookup by column name.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<RawCell>>,
    index: HashMap<String, usize>,
}

impl RawTable {
    /// Build a table, dropping rows whose cells are all empty.
    ///
    /// Header names are trimmed. On duplicate names the first column wins.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<RawCell>>) -> Self {
        let headers: Vec<String> = headers.into_iter().map(|h| h.trim().to_string()).collect();
        let mut index = HashMap::new();
        for (i, name) in headers.iter().enumerate() {
            index.entry(name.clone()).or_insert(i);
        }
        let rows = rows
            .into_iter()
            .filter(|row| !row.iter().all(RawCell::is_empty))
            .collect();
        Self {
            headers,
            rows,
            index,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Fail with a decode error naming every missing column.
    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        let missing: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| !self.index.contains_key(*name))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ParseError::Decode(format!(
                "missing required columns: {}",
                missing.join(", ")
            )))
        }
    }

    /// Iterate rows with their 1-based data row number.
    pub fn iter_rows(&self) -> impl Iterator<Item = RawRow<'_>> {
        self.rows.iter().enumerate().map(move |(i, cells)| RawRow {
            table: self,
            cells,
            line: i + 1,
        })
    }
}

/// Borrowed view of one row.
#[derive(Debug, Clone, Copy)]
pub struct RawRow<'a> {
    table: &'a RawTable,
    cells: &'a [RawCell],
    line: usize,
}

impl<'a> RawRow<'a> {
    /// Cell by column name; absent columns and short rows read as empty.
    pub fn get(&self, column: &str) -> &'a RawCell {
        self.table
            .column_index(column)
            .and_then(|i| self.cells.get(i))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn text(&self, column: &str) -> String {
        self.get(column).raw_text()
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawCell {
        RawCell::Text(s.to_string())
    }

    #[test]
    fn test_raw_text_rendering() {
        assert_eq!(RawCell::Empty.raw_text(), "");
        assert_eq!(text("  Migros  ").raw_text(), "Migros");
        assert_eq!(RawCell::Number(12.5).raw_text(), "12.5");
        assert_eq!(RawCell::Number(100.0).raw_text(), "100");
        let d = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(RawCell::Date(d).raw_text(), "2024-03-09");
    }

    #[test]
    fn test_empty_rows_dropped() {
        let table = RawTable::new(
            vec!["a".into(), "b".into()],
            vec![
                vec![text("1"), text("2")],
                vec![RawCell::Empty, text("   ")],
                vec![text("3"), RawCell::Empty],
            ],
        );
        assert_eq!(table.len(), 2);
        let lines: Vec<usize> = table.iter_rows().map(|r| r.line()).collect();
        assert_eq!(lines, vec![1, 2]);
    }

    #[test]
    fn test_row_lookup_by_name() {
        let table = RawTable::new(
            vec![" Datum ".into(), "Betrag".into()],
            vec![vec![text("01.02.2024")]],
        );
        let row = table.iter_rows().next().unwrap();
        assert_eq!(row.text("Datum"), "01.02.2024");
        assert!(row.get("Betrag").is_empty());
        assert!(row.get("Nope").is_empty());
    }

    #[test]
    fn test_require_columns_lists_missing() {
        let table = RawTable::new(vec!["a".into()], vec![]);
        table.require_columns(&["a"]).unwrap();
        let err = table.require_columns(&["a", "b", "c"]).unwrap_err();
        assert!(err.to_string().contains("b, c"));
    }
}
