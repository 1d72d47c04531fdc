//! # pagegrid-layout
//!
//! Recovers tables from pages of positioned text fragments using geometry
//! alone: rows and columns are inferred from fragment positions, or anchored
//! to known header labels, and tables continuing across pages are merged.
//!
//! Obtaining the fragments (for example from a PDF text layer) is left to the
//! caller.

pub mod cluster;
pub mod columns;
pub mod detector;
pub mod error;
pub mod extractor;
pub mod geometry;
pub mod grid;
pub mod header;
pub mod merge;
pub mod options;
pub mod table;

/// Extract tables from `pages` using default options
pub fn extract_tables<P>(pages: &[P]) -> Result<Vec<Table>>
where
    P: AsRef<[TextFragment]>,
{
    extract_tables_with_options(pages, ExtractionOptions::default())
}

/// Extract tables from `pages` with custom options
pub fn extract_tables_with_options<P>(pages: &[P], options: ExtractionOptions) -> Result<Vec<Table>>
where
    P: AsRef<[TextFragment]>,
{
    TableExtractor::new(options)?.extract_tables(pages)
}

// Re-export commonly used types
pub use cluster::cluster_positions;
pub use columns::{select_columns, ColumnModel};
pub use detector::TableDetector;
pub use error::{LayoutError, Result};
pub use extractor::TableExtractor;
pub use geometry::{Rect, TextFragment};
pub use header::{resolve_header_anchors, HeaderAnchor};
pub use merge::merge_tables;
pub use options::ExtractionOptions;
pub use table::{Cell, Table};
