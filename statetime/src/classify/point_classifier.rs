use statetime_core::model::{Coordinate, RegionCode};

/// the external point-classification capability: resolve a coordinate to
/// the region that contains it. infallible by contract; any transport
/// failure or timeout degrades to the unknown sentinel, never an error,
/// so a dropped call costs one unknown classification and not the batch.
pub trait PointClassifier: Send + Sync {
    fn classify_point(&self, coordinate: &Coordinate) -> RegionCode;
}
