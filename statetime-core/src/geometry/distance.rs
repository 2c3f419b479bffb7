use crate::model::Coordinate;

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// great-circle distance between two WGS84 points in meters via the
/// haversine formula. symmetric, and zero for coincident points.
pub fn great_circle_meters(a: &Coordinate, b: &Coordinate) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lon - a.lon).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_METERS * c
}

/// running sum of consecutive great-circle distances along a point
/// sequence. the result has the same length as `points`, begins at 0.0,
/// and is monotonically non-decreasing.
pub fn cumulative_arc_length(points: &[Coordinate]) -> Vec<f64> {
    if points.is_empty() {
        return vec![];
    }
    let mut result = Vec::with_capacity(points.len());
    result.push(0.0);
    for pair in points.windows(2) {
        let last = result[result.len() - 1];
        result.push(last + great_circle_meters(&pair[0], &pair[1]));
    }
    result
}
