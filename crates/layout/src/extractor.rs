use crate::detector::TableDetector;
use crate::error::{LayoutError, Result};
use crate::geometry::TextFragment;
use crate::merge::merge_tables;
use crate::options::ExtractionOptions;
use crate::table::Table;

/// Runs per-page detection over a document and stitches the results.
pub struct TableExtractor {
    detector: TableDetector,
}

impl TableExtractor {
    /// Validates `options` and builds an extractor.
    pub fn new(options: ExtractionOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            detector: TableDetector::new(options),
        })
    }

    pub fn options(&self) -> &ExtractionOptions {
        self.detector.options()
    }

    /// Detects at most one table per page, in page order. Pages without a
    /// table yield `None`.
    pub fn detect_pages<P>(&self, pages: &[P]) -> Result<Vec<Option<Table>>>
    where
        P: AsRef<[TextFragment]>,
    {
        pages
            .iter()
            .enumerate()
            .map(|(page_index, page)| {
                let fragments = page.as_ref();
                check_fragments(page_index, fragments)?;
                Ok(self.detector.detect_table(page_index, fragments))
            })
            .collect()
    }

    /// Detects page tables and merges those that continue across pages.
    pub fn extract_tables<P>(&self, pages: &[P]) -> Result<Vec<Table>>
    where
        P: AsRef<[TextFragment]>,
    {
        let detected = self.detect_pages(pages)?;
        let found = detected.iter().filter(|table| table.is_some()).count();
        tracing::debug!(pages = pages.len(), found, "page detection finished");

        let tables = merge_tables(detected.into_iter().flatten());
        tracing::debug!(tables = tables.len(), "merged page tables");
        Ok(tables)
    }
}

fn check_fragments(page_index: usize, fragments: &[TextFragment]) -> Result<()> {
    match fragments.iter().find(|fragment| !fragment.bbox.is_finite()) {
        Some(fragment) => Err(LayoutError::NonFiniteFragment {
            page: page_index,
            text: fragment.text.clone(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    #[test]
    fn test_invalid_options_rejected() {
        let options = ExtractionOptions::default().with_column_range(3, 1);
        assert!(matches!(
            TableExtractor::new(options),
            Err(LayoutError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_non_finite_fragment_rejected() {
        let extractor = TableExtractor::new(ExtractionOptions::default()).expect("extractor");
        let pages = vec![vec![TextFragment::new(
            "bad",
            Rect::new(f64::NAN, 0.0, 1.0, 1.0),
        )]];
        let err = extractor.extract_tables(&pages).unwrap_err();
        assert!(matches!(err, LayoutError::NonFiniteFragment { page: 0, .. }));
    }

    #[test]
    fn test_pages_without_tables_are_skipped() {
        let extractor = TableExtractor::new(ExtractionOptions::default()).expect("extractor");
        let pages: Vec<Vec<TextFragment>> = vec![Vec::new(), Vec::new()];
        let detected = extractor.detect_pages(&pages).expect("detect");
        assert_eq!(detected, vec![None, None]);
        assert!(extractor.extract_tables(&pages).expect("extract").is_empty());
    }
}
