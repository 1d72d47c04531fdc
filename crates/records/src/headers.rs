//! Header detection and key naming.

use std::collections::HashSet;

use crate::value::{is_year_month, parse_number};

/// Number of leading header rows in `rows`.
///
/// The first row with enough numeric (or `YYYY-MM`) cells ends the header:
/// at least `max(2, ceil(half of its non-empty cells))`. When no row looks
/// like data, only the first row is a header.
pub fn header_row_count(rows: &[Vec<String>], separator: char) -> usize {
    rows.iter()
        .position(|row| is_data_row(row, separator))
        .unwrap_or(1)
        .max(1)
}

fn is_data_row(row: &[String], separator: char) -> bool {
    let filled: Vec<&str> = row
        .iter()
        .map(|text| text.trim())
        .filter(|text| !text.is_empty())
        .collect();
    let numeric = filled
        .iter()
        .filter(|text| parse_number(text, separator).is_some() || is_year_month(text))
        .count();
    let needed = filled.len().div_ceil(2).max(2);
    numeric >= needed
}

/// Joins the non-empty header texts of each column with single spaces.
pub fn merge_header_rows(header_rows: &[Vec<String>], width: usize) -> Vec<String> {
    (0..width)
        .map(|column| {
            header_rows
                .iter()
                .filter_map(|row| row.get(column))
                .flat_map(|text| text.split_whitespace())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

/// Turns merged header texts into unique keys: blanks become `columnN`
/// (1-based) and repeats get `_2`, `_3`, ... in first-seen order.
pub fn unique_keys(headers: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut keys = Vec::with_capacity(headers.len());

    for (index, header) in headers.iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("column{}", index + 1)
        } else {
            header.clone()
        };

        let mut key = base.clone();
        let mut suffix = 2;
        while seen.contains(&key) {
            key = format!("{base}_{suffix}");
            suffix += 1;
        }
        seen.insert(key.clone());
        keys.push(key);
    }

    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(values: &[&[&str]]) -> Vec<Vec<String>> {
        values
            .iter()
            .map(|row| row.iter().map(|s| (*s).to_string()).collect())
            .collect()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_unique_keys() {
        assert_eq!(
            unique_keys(&strings(&["", "Name", "Name"])),
            vec!["column1", "Name", "Name_2"]
        );
        assert_eq!(
            unique_keys(&strings(&["a", "a", "a_2", "a"])),
            vec!["a", "a_2", "a_2_2", "a_3"]
        );
        assert_eq!(
            unique_keys(&strings(&["column2", ""])),
            vec!["column2", "column2_2"]
        );
    }

    #[test]
    fn test_single_header_row() {
        let table = rows(&[&["Region", "Q1", "Q2"], &["North", "10", "20"]]);
        assert_eq!(header_row_count(&table, '.'), 1);
    }

    #[test]
    fn test_two_header_rows() {
        let table = rows(&[
            &["", "Sales", "Sales"],
            &["Region", "2024-01", "2024-02"],
            &["North", "1,5", "2,0"],
        ]);
        // "2024-01" and "2024-02" are period labels, so row 1 reads as data.
        assert_eq!(header_row_count(&table, ','), 1);

        let table = rows(&[
            &["", "Unit", "Total"],
            &["Region", "cost", "cost"],
            &["North", "1,5", "2,0"],
        ]);
        assert_eq!(header_row_count(&table, ','), 2);
    }

    #[test]
    fn test_text_only_table_has_one_header_row() {
        let table = rows(&[&["Name", "City"], &["Ann", "Oslo"], &["Bo", "Rome"]]);
        assert_eq!(header_row_count(&table, '.'), 1);
    }

    #[test]
    fn test_numeric_first_row_still_one_header() {
        let table = rows(&[&["1", "2"], &["3", "4"]]);
        assert_eq!(header_row_count(&table, '.'), 1);
    }

    #[test]
    fn test_merge_header_rows() {
        let headers = rows(&[&["", "Unit  ", "Total"], &["Region", " cost", ""]]);
        assert_eq!(
            merge_header_rows(&headers, 3),
            vec!["Region", "Unit cost", "Total"]
        );
    }
}
