//! Header-guided extraction.
//!
//! Columns are anchored to caller-supplied header labels found verbatim on
//! the page instead of being inferred from geometry. Each column starts as
//! the horizontal extent of its label and widens as body fragments are
//! assigned to it. Scanning stops when a fragment straddles two columns or
//! when the vertical gap before a new row exceeds the configured whitespace.

use crate::geometry::{Rect, TextFragment};
use crate::options::ExtractionOptions;
use crate::table::{build_table, CellContent, Table};

/// A header label located on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderAnchor {
    /// Label parts joined with single spaces
    pub label: String,
    pub bbox: Rect,
}

/// Finds every label in `fragments`, ordered left-to-right by anchor.
///
/// Returns `None` if any label part is missing or no label resolves.
pub fn resolve_header_anchors(
    fragments: &[TextFragment],
    labels: &[String],
) -> Option<Vec<HeaderAnchor>> {
    match_labels(fragments, labels).map(|(anchors, _)| anchors)
}

/// Greedily matches label parts to unused fragments in load order. Also
/// returns which fragments were consumed.
fn match_labels(
    fragments: &[TextFragment],
    labels: &[String],
) -> Option<(Vec<HeaderAnchor>, Vec<bool>)> {
    let mut used = vec![false; fragments.len()];
    let mut anchors = Vec::with_capacity(labels.len());

    for label in labels {
        let parts: Vec<&str> = label
            .lines()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            tracing::debug!(?label, "header label has no text");
            return None;
        }

        let mut bbox: Option<Rect> = None;
        for part in &parts {
            let Some(index) = fragments
                .iter()
                .enumerate()
                .position(|(index, f)| !used[index] && f.text.trim() == *part)
            else {
                tracing::debug!(?label, part, "header label part not found");
                return None;
            };
            used[index] = true;
            let rect = fragments[index].bbox;
            bbox = Some(bbox.map_or(rect, |b| b.union(&rect)));
        }

        anchors.push(HeaderAnchor {
            label: parts.join(" "),
            bbox: bbox?,
        });
    }

    if anchors.is_empty() {
        return None;
    }
    anchors.sort_by(|a, b| a.bbox.left().total_cmp(&b.bbox.left()));
    Some((anchors, used))
}

/// Vertical extent of the row being filled.
struct RowSpan {
    top: f64,
    bottom: f64,
}

/// Extracts the table under the configured header labels.
///
/// The first row holds the resolved labels; body rows follow. Returns
/// `None` when the labels cannot all be matched, so the caller can fall back
/// to automatic inference.
pub fn extract_with_headers(
    page_index: usize,
    fragments: &[TextFragment],
    labels: &[String],
    options: &ExtractionOptions,
) -> Option<Table> {
    let (anchors, used) = match_labels(fragments, labels)?;

    let header_bottom = anchors
        .iter()
        .map(|anchor| anchor.bbox.bottom())
        .fold(f64::INFINITY, f64::min);
    let mut bands: Vec<(f64, f64)> = anchors
        .iter()
        .map(|anchor| (anchor.bbox.left(), anchor.bbox.right()))
        .collect();

    let mut body: Vec<&TextFragment> = fragments
        .iter()
        .enumerate()
        .filter(|(index, f)| !used[*index] && !f.is_blank() && f.bbox.center_y() <= header_bottom)
        .map(|(_, f)| f)
        .collect();
    body.sort_by(|a, b| {
        b.bbox
            .top()
            .total_cmp(&a.bbox.top())
            .then_with(|| a.bbox.left().total_cmp(&b.bbox.left()))
    });

    // The header acts as the row above the first body row.
    let mut span = RowSpan {
        top: anchors
            .iter()
            .map(|anchor| anchor.bbox.top())
            .fold(f64::NEG_INFINITY, f64::max),
        bottom: header_bottom,
    };
    let mut rows: Vec<Vec<Vec<&TextFragment>>> = Vec::new();

    for fragment in body {
        let overlapping: Vec<usize> = bands
            .iter()
            .enumerate()
            .filter(|(_, (left, right))| fragment.bbox.horizontal_overlap(*left, *right) > 0.0)
            .map(|(column, _)| column)
            .collect();
        let column = match overlapping.as_slice() {
            [] => continue,
            [column] => *column,
            _ => {
                tracing::debug!(page_index, text = %fragment.text, "fragment spans columns, table ends");
                break;
            }
        };

        let starts_row = rows.is_empty() || span.top - fragment.bbox.top() > options.y_tolerance;
        if starts_row {
            let gap = span.bottom - fragment.bbox.top();
            if options
                .end_of_table_whitespace
                .is_some_and(|limit| gap > limit)
            {
                tracing::debug!(page_index, gap, "whitespace gap, table ends");
                break;
            }
            rows.push(vec![Vec::new(); bands.len()]);
            span = RowSpan {
                top: fragment.bbox.top(),
                bottom: fragment.bbox.bottom(),
            };
        } else {
            span.bottom = span.bottom.min(fragment.bbox.bottom());
        }

        if let Some(row) = rows.last_mut() {
            row[column].push(fragment);
        }
        let (left, right) = &mut bands[column];
        *left = left.min(fragment.bbox.left());
        *right = right.max(fragment.bbox.right());
    }

    let header_row: Vec<CellContent> = anchors
        .into_iter()
        .map(|anchor| CellContent {
            text: anchor.label,
            bbox: Some(anchor.bbox),
        })
        .collect();
    let mut grid = vec![header_row];
    grid.extend(
        rows.into_iter()
            .map(|row| row.into_iter().map(CellContent::from_fragments).collect()),
    );

    build_table(page_index, grid)
}
