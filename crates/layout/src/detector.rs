use crate::cluster::row_bands;
use crate::columns::select_columns;
use crate::geometry::TextFragment;
use crate::grid::build_grid;
use crate::header::extract_with_headers;
use crate::options::ExtractionOptions;
use crate::table::Table;

/// Finds at most one table per page.
///
/// Header-guided extraction runs first when labels are configured; automatic
/// row/column inference is the fallback.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    options: ExtractionOptions,
}

impl TableDetector {
    pub fn new(options: ExtractionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExtractionOptions {
        &self.options
    }

    pub fn detect_table(&self, page_index: usize, fragments: &[TextFragment]) -> Option<Table> {
        if let Some(labels) = self.options.header_labels() {
            if let Some(table) = extract_with_headers(page_index, fragments, labels, &self.options)
            {
                tracing::debug!(page_index, rows = table.row_count(), "header-guided table");
                return Some(table);
            }
            tracing::debug!(page_index, "header labels not matched, inferring columns");
        }

        let table = self.infer_table(page_index, fragments);
        if let Some(table) = &table {
            tracing::debug!(
                page_index,
                rows = table.row_count(),
                columns = table.column_count(),
                "inferred table"
            );
        }
        table
    }

    fn infer_table(&self, page_index: usize, fragments: &[TextFragment]) -> Option<Table> {
        let fragments: Vec<TextFragment> = fragments
            .iter()
            .filter(|fragment| !fragment.is_blank())
            .cloned()
            .collect();
        if fragments.is_empty() {
            return None;
        }

        let rows = row_bands(&fragments, self.options.y_tolerance);
        let columns = select_columns(&fragments, &self.options)?;
        build_grid(page_index, &fragments, &rows, &columns.centers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn at(text: &str, x: f64, y: f64, width: f64) -> TextFragment {
        TextFragment::new(text, Rect::new(x, y, width, 10.0))
    }

    #[test]
    fn test_empty_page_has_no_table() {
        let detector = TableDetector::default();
        assert!(detector.detect_table(0, &[]).is_none());
        assert!(detector
            .detect_table(0, &[at("   ", 0.0, 0.0, 5.0)])
            .is_none());
    }

    #[test]
    fn test_falls_back_when_headers_missing() {
        let fragments = vec![
            at("Name", 0.0, 10.0, 4.0),
            at("Age", 10.0, 10.0, 3.0),
            at("Ann", 0.0, 0.0, 4.0),
            at("41", 10.0, 0.0, 2.0),
        ];
        let options = ExtractionOptions::default()
            .with_tolerances(2.0, 2.0)
            .with_column_headers(["Surname"]);
        let table = TableDetector::new(options)
            .detect_table(4, &fragments)
            .expect("fallback table");
        assert_eq!(table.page_index, 4);
        assert_eq!(
            table.row_texts(),
            vec![vec!["Name", "Age"], vec!["Ann", "41"]]
        );
    }

    #[test]
    fn test_prefers_header_guided() {
        let fragments = vec![
            at("Item", 0.0, 100.0, 20.0),
            at("Unit", 40.0, 100.0, 10.0),
            at("Cost", 40.0, 110.0, 10.0),
            at("Pen", 0.0, 88.0, 15.0),
            at("2", 42.0, 88.0, 5.0),
        ];
        let options = ExtractionOptions::default().with_column_headers(["Item", "Unit\nCost"]);
        let table = TableDetector::new(options)
            .detect_table(0, &fragments)
            .expect("table");
        assert_eq!(
            table.row_texts(),
            vec![vec!["Item", "Unit Cost"], vec!["Pen", "2"]]
        );
    }
}
