//! Assigns fragments to a fixed row/column lattice and prunes spurious
//! columns and rows.

use crate::cluster::nearest_band;
use crate::geometry::TextFragment;
use crate::table::{build_table, CellContent, Table};

/// Share of the busiest column's row count a column needs to survive the
/// usage filter.
const COLUMN_USAGE_RATIO: f64 = 0.5;

/// Builds a table from `fragments` given row bands (top-to-bottom) and
/// column bands (left-to-right).
///
/// Returns `None` when no bands exist, every row is empty, or no column
/// survives header filtering.
pub fn build_grid(
    page_index: usize,
    fragments: &[TextFragment],
    rows: &[f64],
    columns: &[f64],
) -> Option<Table> {
    if rows.is_empty() || columns.is_empty() {
        return None;
    }

    let grid = assign_cells(fragments, rows, columns);
    let kept = filter_columns(&grid);
    let grid = project_columns(grid, &kept);
    let grid = trim_leading_empty_rows(grid);
    if grid.is_empty() {
        tracing::trace!(page_index, "all grid rows empty");
        return None;
    }

    let kept = header_columns(&grid);
    if kept.is_empty() {
        tracing::trace!(page_index, "no column survived the header filter");
        return None;
    }
    build_table(page_index, project_columns(grid, &kept))
}

fn assign_cells(fragments: &[TextFragment], rows: &[f64], columns: &[f64]) -> Vec<Vec<CellContent>> {
    let mut slots: Vec<Vec<Vec<&TextFragment>>> = vec![vec![Vec::new(); columns.len()]; rows.len()];
    for fragment in fragments {
        let row = nearest_band(rows, fragment.bbox.center_y());
        let column = nearest_band(columns, fragment.bbox.center_x());
        if let (Some(row), Some(column)) = (row, column) {
            slots[row][column].push(fragment);
        }
    }

    slots
        .into_iter()
        .map(|row| row.into_iter().map(CellContent::from_fragments).collect())
        .collect()
}

/// Indices of the columns to keep, by usage first and then by template row.
fn filter_columns(grid: &[Vec<CellContent>]) -> Vec<usize> {
    let width = grid.first().map_or(0, Vec::len);
    let all: Vec<usize> = (0..width).collect();

    let usage: Vec<usize> = (0..width)
        .map(|column| grid.iter().filter(|row| !row[column].is_empty()).count())
        .collect();
    let max_usage = usage.iter().copied().max().unwrap_or(0);
    let by_usage: Vec<usize> = all
        .iter()
        .copied()
        .filter(|&column| usage[column] as f64 >= COLUMN_USAGE_RATIO * max_usage as f64)
        .collect();
    if reduces(&by_usage, width) {
        return by_usage;
    }

    let template = grid
        .iter()
        .enumerate()
        .max_by(|(ia, a), (ib, b)| {
            populated(a)
                .cmp(&populated(b))
                // Prefer the earlier row on ties.
                .then_with(|| ib.cmp(ia))
        })
        .map(|(_, row)| row);
    if let Some(template) = template {
        let by_template: Vec<usize> = all
            .iter()
            .copied()
            .filter(|&column| !template[column].is_empty())
            .collect();
        if reduces(&by_template, width) {
            return by_template;
        }
    }

    all
}

fn reduces(kept: &[usize], width: usize) -> bool {
    !kept.is_empty() && kept.len() < width
}

fn populated(row: &[CellContent]) -> usize {
    row.iter().filter(|cell| !cell.is_empty()).count()
}

fn project_columns(grid: Vec<Vec<CellContent>>, kept: &[usize]) -> Vec<Vec<CellContent>> {
    grid.into_iter()
        .map(|mut row| {
            kept.iter()
                .map(|&column| std::mem::take(&mut row[column]))
                .collect()
        })
        .collect()
}

fn trim_leading_empty_rows(grid: Vec<Vec<CellContent>>) -> Vec<Vec<CellContent>> {
    grid.into_iter()
        .skip_while(|row| populated(row) == 0)
        .collect()
}

/// Columns to keep with the first row treated as the header.
///
/// Columns empty everywhere are dropped. Otherwise a column stays when its
/// header is non-empty, or when it is the first column and every body cell
/// below its empty header is filled (an index column).
fn header_columns(grid: &[Vec<CellContent>]) -> Vec<usize> {
    let Some((header, body)) = grid.split_first() else {
        return Vec::new();
    };

    (0..header.len())
        .filter(|&column| {
            let used = grid.iter().any(|row| !row[column].is_empty());
            if !used {
                return false;
            }
            if !header[column].is_empty() {
                return true;
            }
            column == 0 && body.iter().all(|row| !row[column].is_empty())
        })
        .collect()
}
