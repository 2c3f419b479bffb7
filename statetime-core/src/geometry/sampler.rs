use super::distance::cumulative_arc_length;
use crate::model::Coordinate;

/// returns `n` coordinates spaced evenly by arc length (not point index)
/// along `points[begin..=end]`, interpolating linearly between bracketing
/// polyline vertices. `begin` and `end` may arrive in either order. a
/// degenerate span (`end <= begin`) yields the single point at `begin`,
/// and a zero-length segment yields its first point.
pub fn sample_fixed_count(
    points: &[Coordinate],
    begin: usize,
    end: usize,
    n: usize,
) -> Vec<Coordinate> {
    let Some((begin, end)) = normalize_span(points.len(), begin, end) else {
        return vec![];
    };
    if end <= begin || n == 0 {
        return vec![points[begin]];
    }
    let segment = &points[begin..=end];
    let distances = cumulative_arc_length(segment);
    let total = distances[distances.len() - 1];
    if total <= 0.0 {
        return vec![segment[0]];
    }
    (0..n)
        .map(|k| {
            let target = (k + 1) as f64 * total / (n + 1) as f64;
            point_at_distance(segment, &distances, target)
        })
        .collect()
}

/// returns coordinates sampled at approximately `step_meters` spacing
/// along `points[begin..=end]`, with at least `min_samples` subdivisions
/// regardless of segment length so that short, curvy spans are still
/// observed. indices may arrive in either order. a single-point span
/// yields that point; a zero-length segment yields its midpoint vertex.
pub fn sample_fixed_spacing(
    points: &[Coordinate],
    begin: usize,
    end: usize,
    step_meters: f64,
    min_samples: usize,
) -> Vec<Coordinate> {
    let Some((begin, end)) = normalize_span(points.len(), begin, end) else {
        return vec![];
    };
    let segment = &points[begin..=end];
    if segment.len() == 1 {
        return vec![segment[0]];
    }
    let distances = cumulative_arc_length(segment);
    let total = distances[distances.len() - 1];
    if total <= 0.0 {
        return vec![segment[segment.len() / 2]];
    }
    let steps = ((total / step_meters) as usize).max(min_samples);
    (0..=steps)
        .map(|k| {
            let target = k as f64 * total / steps as f64;
            point_at_distance(segment, &distances, target)
        })
        .collect()
}

/// swaps reversed indices and clamps both into `[0, num_points)`. None
/// when there are no points to sample from.
fn normalize_span(num_points: usize, begin: usize, end: usize) -> Option<(usize, usize)> {
    if num_points == 0 {
        return None;
    }
    let (begin, end) = if end < begin { (end, begin) } else { (begin, end) };
    Some((begin.min(num_points - 1), end.min(num_points - 1)))
}

/// locates the point at arc-length `target` within a segment, given its
/// cumulative distances, interpolating between the bracketing vertices.
fn point_at_distance(segment: &[Coordinate], distances: &[f64], target: f64) -> Coordinate {
    for k in 1..distances.len() {
        if distances[k] >= target {
            let length = distances[k] - distances[k - 1];
            if length <= 0.0 {
                return segment[k - 1];
            }
            let frac = (target - distances[k - 1]) / length;
            return segment[k - 1].lerp(&segment[k], frac);
        }
    }
    segment[segment.len() - 1]
}
