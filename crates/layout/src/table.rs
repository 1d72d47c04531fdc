//! Grid tables recovered from a page.

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, TextFragment};

/// One cell of a recovered table. Empty cells are kept and carry no bbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub row_index: usize,
    pub column_index: usize,
    pub text: String,
    pub bbox: Option<Rect>,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A rectangular table: every row holds one cell per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub page_index: usize,
    pub bbox: Rect,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Cell texts as a plain matrix.
    pub fn row_texts(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.text.clone()).collect())
            .collect()
    }

    /// Texts of the first row, empty when the table has no rows.
    pub fn header_texts(&self) -> Vec<&str> {
        self.rows
            .first()
            .map(|row| row.iter().map(|cell| cell.text.as_str()).collect())
            .unwrap_or_default()
    }

    /// Checks that every row has the same width and that row/column indices
    /// are contiguous from zero.
    pub fn is_rectangular(&self) -> bool {
        let width = self.column_count();
        self.rows.iter().enumerate().all(|(row_index, row)| {
            row.len() == width
                && row.iter().enumerate().all(|(column_index, cell)| {
                    cell.row_index == row_index && cell.column_index == column_index
                })
        })
    }

    /// Builds a new table holding `self`'s rows followed by `rows`, renumbered
    /// to continue after the existing rows. Page index and bbox are kept.
    pub(crate) fn concat_rows(self, rows: Vec<Vec<Cell>>) -> Table {
        let Table {
            page_index,
            bbox,
            rows: mut merged,
        } = self;
        for row in rows {
            let row_index = merged.len();
            merged.push(
                row.into_iter()
                    .map(|cell| Cell { row_index, ..cell })
                    .collect(),
            );
        }
        Table {
            page_index,
            bbox,
            rows: merged,
        }
    }
}

/// Text and extent gathered for a single grid slot before indices are fixed.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct CellContent {
    pub text: String,
    pub bbox: Option<Rect>,
}

impl CellContent {
    /// Joins fragments left-to-right without a separator.
    pub fn from_fragments(mut fragments: Vec<&TextFragment>) -> Self {
        fragments.sort_by(|a, b| a.bbox.left().total_cmp(&b.bbox.left()));
        let text: String = fragments.iter().map(|f| f.text.as_str()).collect();
        let bbox = Rect::enclosing(fragments.iter().map(|f| &f.bbox));
        if text.is_empty() {
            return Self::default();
        }
        Self { text, bbox }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Turns a content grid into a `Table` with contiguous indices. Returns
/// `None` when the grid has no columns or no non-empty cell.
pub(crate) fn build_table(page_index: usize, grid: Vec<Vec<CellContent>>) -> Option<Table> {
    let width = grid.first().map_or(0, Vec::len);
    if width == 0 || grid.iter().any(|row| row.len() != width) {
        return None;
    }

    let bbox = Rect::enclosing(grid.iter().flatten().filter_map(|c| c.bbox.as_ref()))?;
    let rows = grid
        .into_iter()
        .enumerate()
        .map(|(row_index, row)| {
            row.into_iter()
                .enumerate()
                .map(|(column_index, content)| Cell {
                    row_index,
                    column_index,
                    text: content.text,
                    bbox: content.bbox,
                })
                .collect()
        })
        .collect();

    Some(Table {
        page_index,
        bbox,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(text: &str, x: f64) -> CellContent {
        if text.is_empty() {
            return CellContent::default();
        }
        CellContent {
            text: text.to_string(),
            bbox: Some(Rect::new(x, 0.0, 4.0, 10.0)),
        }
    }

    #[test]
    fn test_fragments_join_left_to_right() {
        let right = TextFragment::new("world", Rect::new(20.0, 0.0, 10.0, 5.0));
        let left = TextFragment::new("hello ", Rect::new(0.0, 0.0, 12.0, 5.0));
        let cell = CellContent::from_fragments(vec![&right, &left]);
        assert_eq!(cell.text, "hello world");
        assert_eq!(cell.bbox, Some(Rect::new(0.0, 0.0, 30.0, 5.0)));
    }

    #[test]
    fn test_no_fragments_means_empty_cell() {
        let cell = CellContent::from_fragments(Vec::new());
        assert!(cell.is_empty());
        assert_eq!(cell.bbox, None);
    }

    #[test]
    fn test_build_table_indices() {
        let grid = vec![
            vec![content("a", 0.0), content("b", 10.0)],
            vec![content("", 0.0), content("c", 10.0)],
        ];
        let table = build_table(3, grid).expect("table");
        assert_eq!(table.page_index, 3);
        assert!(table.is_rectangular());
        assert_eq!(table.rows[1][0].text, "");
        assert_eq!(table.rows[1][0].bbox, None);
        assert_eq!(table.rows[1][1].row_index, 1);
        assert_eq!(table.bbox, Rect::new(0.0, 0.0, 14.0, 10.0));
    }

    #[test]
    fn test_build_table_rejects_empty_grid() {
        assert!(build_table(0, Vec::new()).is_none());
        assert!(build_table(0, vec![vec![content("", 0.0)]]).is_none());
    }

    #[test]
    fn test_concat_rows_renumbers() {
        let first = build_table(0, vec![vec![content("h", 0.0)]]).expect("first");
        let second = build_table(1, vec![vec![content("x", 0.0)], vec![content("y", 0.0)]])
            .expect("second");
        let merged = first.concat_rows(second.rows);
        assert_eq!(merged.page_index, 0);
        assert_eq!(merged.row_count(), 3);
        assert!(merged.is_rectangular());
        assert_eq!(merged.row_texts(), vec![vec!["h"], vec!["x"], vec!["y"]]);
    }
}
