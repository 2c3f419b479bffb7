use std::collections::HashMap;

use statetime_core::geometry::{polyline, sample_fixed_spacing};
use statetime_core::model::route::RouteDocument;
use statetime_core::model::{Coordinate, RegionCode};

use super::strategy::region_weights;
use super::{AttributionError, AttributionStrategy, TripTable};
use crate::classify::{CoordinateMemo, PointClassifier};

pub const DEFAULT_STEP_METERS: f64 = 500.0;
pub const DEFAULT_MIN_SAMPLES: usize = 3;

/// Dense-sampling attribution: each maneuver is sampled at a fixed spatial
/// interval and its duration is split across regions in proportion to the
/// sample counts. Every sample goes through the point classifier, memoized
/// on rounded coordinates so repeated vertices cost one lookup.
pub struct PreciseStrategy<C: PointClassifier> {
    classifier: C,
    memo: CoordinateMemo,
    step_meters: f64,
    min_samples: usize,
}

impl<C: PointClassifier> PreciseStrategy<C> {
    pub fn new(classifier: C) -> PreciseStrategy<C> {
        PreciseStrategy {
            classifier,
            memo: CoordinateMemo::new(),
            step_meters: DEFAULT_STEP_METERS,
            min_samples: DEFAULT_MIN_SAMPLES,
        }
    }

    pub fn with_step_meters(mut self, step_meters: f64) -> PreciseStrategy<C> {
        self.step_meters = step_meters;
        self
    }

    pub fn with_min_samples(mut self, min_samples: usize) -> PreciseStrategy<C> {
        self.min_samples = min_samples;
        self
    }

    fn classify(&self, sample: &Coordinate) -> RegionCode {
        if let Some(region) = self.memo.get(sample) {
            return region;
        }
        let region = self.classifier.classify_point(sample);
        self.memo.put(sample, region.clone());
        region
    }
}

impl<C: PointClassifier> AttributionStrategy for PreciseStrategy<C> {
    fn name(&self) -> &'static str {
        "precise"
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
            let samples = sample_fixed_spacing(
                &points,
                span.begin,
                span.end,
                self.step_meters,
                self.min_samples,
            );
            let votes: Vec<RegionCode> = samples.iter().map(|s| self.classify(s)).collect();
            for (region, weight) in region_weights(&votes) {
                *totals.entry(region).or_insert(0.0) += span.seconds * weight;
            }
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
