//! Column-count model selection.
//!
//! When no header labels anchor the columns, the number of columns is chosen
//! by fitting 1-D k-means layouts for every plausible `k` and keeping the
//! cheapest one under a weighted cost over all fragments on the page.

use std::collections::BTreeSet;

use crate::cluster::{cluster_positions, nearest_band, row_bands};
use crate::geometry::TextFragment;
use crate::options::ExtractionOptions;

const MAX_ITERATIONS: usize = 30;
const CONVERGENCE_SHIFT: f64 = 0.1;

const COMPACTNESS_WEIGHT: f64 = 1.0;
const EMPTY_COLUMN_WEIGHT: f64 = 5.0;
const ROW_USAGE_WEIGHT: f64 = 0.5;
const COMPLEXITY_WEIGHT: f64 = 0.1;

/// Chosen column layout: ascending centers and the cost it scored.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnModel {
    pub centers: Vec<f64>,
    pub cost: f64,
}

impl ColumnModel {
    pub fn column_count(&self) -> usize {
        self.centers.len()
    }
}

/// Picks the column count and centers for `fragments`.
///
/// Returns `None` when there are no horizontal candidates at all.
pub fn select_columns(fragments: &[TextFragment], options: &ExtractionOptions) -> Option<ColumnModel> {
    let x_centers: Vec<f64> = fragments.iter().map(|f| f.bbox.center_x()).collect();
    let candidates = cluster_positions(&x_centers, options.x_tolerance);
    if candidates.is_empty() {
        return None;
    }

    let max_k = options.max_column_count.min(candidates.len()).max(1);
    let min_k = options.min_column_count.min(max_k).max(1);
    let rows = row_bands(fragments, options.y_tolerance);

    if min_k == max_k {
        let centers = kmeans(&candidates, min_k);
        let cost = layout_cost(&centers, fragments, &rows);
        return Some(ColumnModel { centers, cost });
    }

    let best = cheapest((min_k..=max_k).map(|k| {
        let centers = kmeans(&candidates, k);
        let cost = layout_cost(&centers, fragments, &rows);
        tracing::trace!(k, cost, "scored column layout");
        ColumnModel { centers, cost }
    }));

    if let Some(model) = &best {
        tracing::debug!(
            columns = model.column_count(),
            cost = model.cost,
            candidates = candidates.len(),
            "selected column count"
        );
    }
    best
}

/// Lowest-cost model; the earliest one wins ties.
fn cheapest<I>(models: I) -> Option<ColumnModel>
where
    I: IntoIterator<Item = ColumnModel>,
{
    let mut best: Option<ColumnModel> = None;
    for model in models {
        if best.as_ref().is_none_or(|current| model.cost < current.cost) {
            best = Some(model);
        }
    }
    best
}

/// Lloyd's algorithm over sorted 1-D `points`, seeded at evenly spaced
/// quantiles. Requires `1 <= k <= points.len()`.
pub(crate) fn kmeans(points: &[f64], k: usize) -> Vec<f64> {
    let n = points.len();
    if n == 0 || k == 0 {
        return Vec::new();
    }
    let k = k.min(n);

    let mut means: Vec<f64> = if k == 1 {
        vec![points[(n - 1) / 2]]
    } else {
        (0..k).map(|i| points[i * (n - 1) / (k - 1)]).collect()
    };

    for _ in 0..MAX_ITERATIONS {
        let mut sums = vec![0.0; k];
        let mut counts = vec![0usize; k];
        for &point in points {
            if let Some(index) = nearest_band(&means, point) {
                sums[index] += point;
                counts[index] += 1;
            }
        }

        let mut max_shift: f64 = 0.0;
        for (index, mean) in means.iter_mut().enumerate() {
            if counts[index] == 0 {
                continue;
            }
            let updated = sums[index] / counts[index] as f64;
            max_shift = max_shift.max((updated - *mean).abs());
            *mean = updated;
        }

        if max_shift < CONVERGENCE_SHIFT {
            break;
        }
    }

    means.sort_by(f64::total_cmp);
    means
}

/// Weighted cost of assigning every fragment to its nearest center.
fn layout_cost(centers: &[f64], fragments: &[TextFragment], rows: &[f64]) -> f64 {
    if fragments.is_empty() || centers.is_empty() {
        return f64::INFINITY;
    }

    let n = fragments.len() as f64;
    let mut members = vec![0usize; centers.len()];
    let mut row_columns: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); rows.len()];
    let mut squared = 0.0;

    for fragment in fragments {
        let x = fragment.bbox.center_x();
        let Some(column) = nearest_band(centers, x) else {
            continue;
        };
        let distance = x - centers[column];
        squared += distance * distance;
        members[column] += 1;

        if let Some(row) = nearest_band(rows, fragment.bbox.center_y()) {
            row_columns[row].insert(column);
        }
    }

    let compactness = squared / n;
    let min_members = (0.01 * n).max(2.0);
    let empty_columns = members
        .iter()
        .filter(|&&count| (count as f64) < min_members)
        .count() as f64;
    let usage: Vec<f64> = row_columns.iter().map(|set| set.len() as f64).collect();
    let complexity = centers.len() as f64;

    COMPACTNESS_WEIGHT * compactness
        + EMPTY_COLUMN_WEIGHT * empty_columns
        + ROW_USAGE_WEIGHT * variance(&usage)
        + COMPLEXITY_WEIGHT * complexity
}

/// Population variance; zero for fewer than two values.
fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}
