//! One-dimensional tolerance clustering of fragment positions into bands.

use crate::geometry::TextFragment;

/// Groups `positions` into bands and returns each band's mean, ascending.
///
/// Positions are sorted and scanned once. Each band is anchored at its first
/// member, and a later position joins the band while it stays within
/// `tolerance` of that anchor. Membership is tested against the anchor, not
/// the running mean, so a band may span more than `2 * tolerance`.
pub fn cluster_positions(positions: &[f64], tolerance: f64) -> Vec<f64> {
    let mut sorted = positions.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut bands = Vec::new();
    let mut anchor: Option<f64> = None;
    let mut sum = 0.0;
    let mut count = 0usize;

    for position in sorted {
        match anchor {
            Some(start) if (position - start).abs() <= tolerance => {
                sum += position;
                count += 1;
            }
            _ => {
                if count > 0 {
                    bands.push(sum / count as f64);
                }
                anchor = Some(position);
                sum = position;
                count = 1;
            }
        }
    }
    if count > 0 {
        bands.push(sum / count as f64);
    }

    bands
}

/// Row bands for `fragments`, ordered top-to-bottom (descending y).
pub fn row_bands(fragments: &[TextFragment], y_tolerance: f64) -> Vec<f64> {
    let centers: Vec<f64> = fragments.iter().map(|f| f.bbox.center_y()).collect();
    let mut bands = cluster_positions(&centers, y_tolerance);
    bands.reverse();
    bands
}

/// Index of the band closest to `value`; the first band wins ties.
pub fn nearest_band(bands: &[f64], value: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, band) in bands.iter().enumerate() {
        let distance = (band - value).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((index, distance)),
        }
    }
    best.map(|(index, _)| index)
}
