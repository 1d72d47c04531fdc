//! Stitches tables that continue across consecutive pages.

use crate::table::Table;

/// Merges page tables, in order, into the running last table whenever the
/// column counts agree. A repeated header row on the incoming table is
/// dropped.
pub fn merge_tables<I>(tables: I) -> Vec<Table>
where
    I: IntoIterator<Item = Table>,
{
    let mut merged: Vec<Table> = Vec::new();

    for table in tables {
        let Some(last) = merged.pop() else {
            merged.push(table);
            continue;
        };

        if !compatible(&last, &table) {
            merged.push(last);
            merged.push(table);
            continue;
        }

        let skip = usize::from(repeats_header(&last, &table));
        tracing::debug!(
            from_page = table.page_index,
            into_page = last.page_index,
            header_dropped = skip == 1,
            "merging table across pages"
        );
        let rows = table.rows.into_iter().skip(skip).collect();
        merged.push(last.concat_rows(rows));
    }

    merged
}

fn compatible(running: &Table, incoming: &Table) -> bool {
    let width = running.column_count();
    width > 0 && width == incoming.column_count()
}

/// True when both first rows carry text and match cell for cell.
fn repeats_header(running: &Table, incoming: &Table) -> bool {
    let first = running.header_texts();
    let second = incoming.header_texts();
    let has_text = |row: &[&str]| row.iter().any(|text| !text.is_empty());
    has_text(&first) && has_text(&second) && first == second
}
