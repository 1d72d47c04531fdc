//! # pagegrid-records
//!
//! Maps recovered tables to header-keyed records. Header rows are detected
//! from the top of the table, merged per column and deduplicated into keys;
//! each column is typed numeric when every filled body cell parses under the
//! configured decimal separator.

pub mod headers;
pub mod value;

use indexmap::IndexMap;
use pagegrid_layout::Table;
use serde::{Deserialize, Serialize};

pub use value::{parse_number, RecordValue};

/// Header-keyed rows derived from one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabularObjectSet {
    pub page_index: usize,
    pub headers: Vec<String>,
    pub rows: Vec<IndexMap<String, Option<RecordValue>>>,
}

impl TabularObjectSet {
    /// Build records from `table`, reading numbers with `separator` as the
    /// decimal mark.
    pub fn from_table(table: &Table, separator: char) -> Self {
        let texts: Vec<Vec<String>> = table
            .row_texts()
            .into_iter()
            .map(|row| row.into_iter().map(|text| text.trim().to_string()).collect())
            .collect();
        let width = table.column_count();
        let header_count = headers::header_row_count(&texts, separator).min(texts.len());
        let (header_rows, body) = texts.split_at(header_count);

        let headers = headers::unique_keys(&headers::merge_header_rows(header_rows, width));
        let numeric: Vec<bool> = (0..width)
            .map(|column| is_numeric_column(body, column, separator))
            .collect();
        tracing::debug!(
            page_index = table.page_index,
            header_rows = header_count,
            numeric_columns = numeric.iter().filter(|n| **n).count(),
            "mapped table to records"
        );

        let rows = body
            .iter()
            .map(|row| {
                headers
                    .iter()
                    .enumerate()
                    .map(|(column, key)| {
                        let text = row.get(column).map_or("", String::as_str);
                        (key.clone(), map_cell(text, numeric[column], separator))
                    })
                    .collect()
            })
            .collect();

        Self {
            page_index: table.page_index,
            headers,
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column in row order.
    pub fn column(&self, header: &str) -> Option<Vec<Option<&RecordValue>>> {
        if !self.headers.iter().any(|h| h == header) {
            return None;
        }
        Some(
            self.rows
                .iter()
                .map(|row| row.get(header).and_then(Option::as_ref))
                .collect(),
        )
    }
}

/// Map every table in order.
pub fn to_object_sets(tables: &[Table], separator: char) -> Vec<TabularObjectSet> {
    tables
        .iter()
        .map(|table| TabularObjectSet::from_table(table, separator))
        .collect()
}

fn is_numeric_column(body: &[Vec<String>], column: usize, separator: char) -> bool {
    let mut filled = body
        .iter()
        .filter_map(|row| row.get(column))
        .filter(|text| !text.is_empty())
        .peekable();
    filled.peek().is_some() && filled.all(|text| parse_number(text, separator).is_some())
}

fn map_cell(text: &str, numeric: bool, separator: char) -> Option<RecordValue> {
    if numeric {
        parse_number(text, separator).map(RecordValue::Number)
    } else {
        Some(RecordValue::Text(text.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(values: &[&[&str]]) -> Vec<Vec<String>> {
        values
            .iter()
            .map(|row| row.iter().map(|s| (*s).to_string()).collect())
            .collect()
    }

    #[test]
    fn test_numeric_column_needs_a_value() {
        let rows = body(&[&["1,0", ""], &["2,5", ""], &["", ""]]);
        assert!(is_numeric_column(&rows, 0, ','));
        assert!(!is_numeric_column(&rows, 1, ','));
    }

    #[test]
    fn test_one_bad_cell_makes_column_text() {
        let rows = body(&[&["1"], &["n/a"]]);
        assert!(!is_numeric_column(&rows, 0, '.'));
    }

    #[test]
    fn test_map_cell() {
        assert_eq!(map_cell("", true, '.'), None);
        assert_eq!(map_cell("4.5", true, '.'), Some(RecordValue::Number(4.5)));
        assert_eq!(
            map_cell("4.5", false, '.'),
            Some(RecordValue::Text("4.5".to_string()))
        );
        assert_eq!(map_cell("", false, '.'), Some(RecordValue::Text(String::new())));
    }
}
