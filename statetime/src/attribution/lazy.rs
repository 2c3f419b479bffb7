use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use statetime_core::geometry::{polyline, sample_fixed_count};
use statetime_core::model::route::RouteDocument;
use statetime_core::model::{Coordinate, RegionCode};

use super::strategy::majority_region;
use super::{AttributionError, AttributionStrategy, TripTable};
use crate::classify::PointClassifier;
use crate::index::SpatialMembershipIndex;

pub const DEFAULT_SAMPLES_PER_MANEUVER: usize = 5;

/// Cache-accelerated attribution: each maneuver is sampled at a small fixed
/// count, every sample is classified through the shared grid index, and the
/// maneuver's whole duration goes to the majority region. Index misses fall
/// through to the point classifier and the answer is written back, so the
/// index warms up as routes flow through.
pub struct LazyStrategy<C: PointClassifier> {
    index: Arc<RwLock<SpatialMembershipIndex>>,
    classifier: C,
    samples_per_maneuver: usize,
}

impl<C: PointClassifier> LazyStrategy<C> {
    pub fn new(index: Arc<RwLock<SpatialMembershipIndex>>, classifier: C) -> LazyStrategy<C> {
        LazyStrategy {
            index,
            classifier,
            samples_per_maneuver: DEFAULT_SAMPLES_PER_MANEUVER,
        }
    }

    pub fn with_samples_per_maneuver(mut self, samples_per_maneuver: usize) -> LazyStrategy<C> {
        self.samples_per_maneuver = samples_per_maneuver;
        self
    }

    /// classifies one sample through the index, falling back to the point
    /// classifier on a miss. the read lock is released before the fallback
    /// call so a slow classifier never blocks other workers' lookups; if
    /// two workers race on the same cell, the second write wins and both
    /// answers came from the same classifier.
    fn classify(&self, sample: &Coordinate) -> RegionCode {
        let cell = {
            let index = match self.index.read() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            match index.cell_for(sample) {
                Ok(cell) => {
                    if let Some(region) = index.classify_cell(&cell) {
                        return region.clone();
                    }
                    Some(cell)
                }
                Err(e) => {
                    log::debug!("sample {sample} has no grid cell: {e}");
                    None
                }
            }
        };
        let region = self.classifier.classify_point(sample);
        if let Some(cell) = cell {
            let mut index = match self.index.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            index.insert(cell, region.clone());
        }
        region
    }
}

impl<C: PointClassifier> AttributionStrategy for LazyStrategy<C> {
    fn name(&self) -> &'static str {
        "lazy"
    }

    fn attribute(&self, route: &RouteDocument) -> Result<TripTable, AttributionError> {
        let leg = route.first_leg()?;
        let points = polyline::decode(leg.shape_str(), polyline::SHAPE_PRECISION)?;
        let mut totals: HashMap<RegionCode, f64> = HashMap::new();
        let mut maneuver_seconds = 0.0;
        for maneuver in leg.maneuvers.iter() {
            let Some(span) = maneuver.span(points.len()) else {
                continue;
            };
            let samples =
                sample_fixed_count(&points, span.begin, span.end, self.samples_per_maneuver);
            let votes: Vec<RegionCode> = samples.iter().map(|s| self.classify(s)).collect();
            let Some(region) = majority_region(&votes) else {
                continue;
            };
            *totals.entry(region).or_insert(0.0) += span.seconds;
            maneuver_seconds += span.seconds;
        }
        let leg_seconds = leg.summary_seconds(maneuver_seconds);
        Ok(TripTable::from_totals(
            &route.vehicle_id,
            &route.trip_id,
            &totals,
            leg_seconds,
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use h3o::Resolution;
    use statetime_core::model::route::{Leg, Maneuver, Summary, Trip};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FnClassifier<F: Fn(&Coordinate) -> RegionCode + Send + Sync> {
        f: F,
        calls: AtomicUsize,
    }

    impl<F: Fn(&Coordinate) -> RegionCode + Send + Sync> FnClassifier<F> {
        fn new(f: F) -> FnClassifier<F> {
            FnClassifier {
                f,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl<F: Fn(&Coordinate) -> RegionCode + Send + Sync> PointClassifier for &FnClassifier<F> {
        fn classify_point(&self, coordinate: &Coordinate) -> RegionCode {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.f)(coordinate)
        }
    }

    fn route_with_shape(
        points: &[(f64, f64)],
        maneuvers: Vec<Maneuver>,
        summary_seconds: Option<f64>,
    ) -> RouteDocument {
        let shape = polyline::encode(points, polyline::SHAPE_PRECISION);
        let leg = Leg {
            shape: Some(shape),
            maneuvers,
            summary: summary_seconds.map(|time| Summary { time: Some(time) }),
        };
        RouteDocument::new(
            "truck1".to_string(),
            "run1".to_string(),
            Trip { legs: vec![leg] },
        )
    }

    fn maneuver(begin: i64, end: i64, time: f64) -> Maneuver {
        Maneuver {
            begin_shape_index: Some(begin),
            end_shape_index: Some(end),
            time: Some(time),
        }
    }

    fn california_segment() -> Vec<(f64, f64)> {
        (0..5)
            .map(|k| (36.5 + 0.01 * k as f64, -119.5))
            .collect()
    }

    #[test]
    fn test_single_region_maneuver() {
        let index = Arc::new(RwLock::new(SpatialMembershipIndex::new(Resolution::Nine)));
        let classifier = FnClassifier::new(|_: &Coordinate| RegionCode::from("US:California"));
        let strategy = LazyStrategy::new(index.clone(), &classifier);

        let route = route_with_shape(&california_segment(), vec![maneuver(0, 4, 600.0)], None);
        let table = strategy.attribute(&route).unwrap();

        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].region.as_str(), "US:California");
        assert_eq!(table.records[0].drive_seconds, 600);
        assert_eq!(table.records[0].leg_seconds_total, 600);
        // every miss was backfilled into the index
        let guard = index.read().unwrap();
        assert!(!guard.is_empty());
    }

    #[test]
    fn test_second_pass_hits_the_index() {
        let index = Arc::new(RwLock::new(SpatialMembershipIndex::new(Resolution::Nine)));
        let classifier = FnClassifier::new(|_: &Coordinate| RegionCode::from("US:California"));
        let strategy = LazyStrategy::new(index, &classifier);
        let route = route_with_shape(&california_segment(), vec![maneuver(0, 4, 600.0)], None);

        strategy.attribute(&route).unwrap();
        let calls_after_first = classifier.calls.load(Ordering::SeqCst);
        assert!(calls_after_first > 0);

        strategy.attribute(&route).unwrap();
        assert_eq!(classifier.calls.load(Ordering::SeqCst), calls_after_first);
    }

    #[test]
    fn test_reversed_indices_and_zero_duration() {
        let index = Arc::new(RwLock::new(SpatialMembershipIndex::new(Resolution::Nine)));
        let classifier = FnClassifier::new(|_: &Coordinate| RegionCode::from("US:Oregon"));
        let strategy = LazyStrategy::new(index, &classifier);

        let points: Vec<(f64, f64)> = (0..20).map(|k| (44.0 + 0.005 * k as f64, -121.0)).collect();

        let reversed = route_with_shape(&points, vec![maneuver(10, 3, 120.0)], None);
        let table = strategy.attribute(&reversed).unwrap();
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].drive_seconds, 120);

        let zero_time = route_with_shape(&points, vec![maneuver(0, 10, 0.0)], None);
        let table = strategy.attribute(&zero_time).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_summary_overrides_maneuver_total() {
        let index = Arc::new(RwLock::new(SpatialMembershipIndex::new(Resolution::Nine)));
        let classifier = FnClassifier::new(|_: &Coordinate| RegionCode::from("US:California"));
        let strategy = LazyStrategy::new(index, &classifier);

        let route = route_with_shape(
            &california_segment(),
            vec![maneuver(0, 4, 600.0)],
            Some(630.0),
        );
        let table = strategy.attribute(&route).unwrap();
        assert_eq!(table.records[0].leg_seconds_total, 630);
    }
}
