use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use statetime_core::model::RegionCode;

use crate::attribution::AttributionRecord;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// fleet-wide drive time per region, descending by hours.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionTotalsRow {
    pub region: RegionCode,
    pub total_drive_seconds: i64,
    pub num_trips: usize,
    pub total_drive_hours: f64,
    pub avg_hours_per_trip: f64,
}

/// per-trip totals: duration and how many distinct regions the trip touched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TripSummaryRow {
    pub vehicle_id: String,
    pub trip_id: String,
    pub total_drive_seconds: i64,
    pub num_states: usize,
    pub total_drive_hours: f64,
}

/// one (trip, region) pair that accumulated at least an hour of drive time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignificantSegmentRow {
    pub vehicle_id: String,
    pub trip_id: String,
    pub region: RegionCode,
    pub drive_seconds: i64,
    pub drive_hours: f64,
}

pub fn region_totals(rows: &[AttributionRecord]) -> Vec<RegionTotalsRow> {
    let mut seconds: HashMap<&RegionCode, i64> = HashMap::new();
    let mut trips: HashMap<&RegionCode, HashSet<(&str, &str)>> = HashMap::new();
    for row in rows.iter() {
        *seconds.entry(&row.region).or_insert(0) += row.drive_seconds;
        trips
            .entry(&row.region)
            .or_default()
            .insert((row.vehicle_id.as_str(), row.trip_id.as_str()));
    }
    let mut totals: Vec<RegionTotalsRow> = seconds
        .into_iter()
        .map(|(region, total)| {
            let num_trips = trips.get(region).map(|t| t.len()).unwrap_or(0);
            let hours = total as f64 / SECONDS_PER_HOUR;
            RegionTotalsRow {
                region: region.clone(),
                total_drive_seconds: total,
                num_trips,
                total_drive_hours: hours,
                avg_hours_per_trip: if num_trips > 0 {
                    hours / num_trips as f64
                } else {
                    0.0
                },
            }
        })
        .collect();
    totals.sort_by(|a, b| {
        b.total_drive_hours
            .partial_cmp(&a.total_drive_hours)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.region.cmp(&b.region))
    });
    totals
}

pub fn trip_summary(rows: &[AttributionRecord]) -> Vec<TripSummaryRow> {
    let mut seconds: HashMap<(&str, &str), i64> = HashMap::new();
    let mut regions: HashMap<(&str, &str), HashSet<&RegionCode>> = HashMap::new();
    for row in rows.iter() {
        let key = (row.vehicle_id.as_str(), row.trip_id.as_str());
        *seconds.entry(key).or_insert(0) += row.drive_seconds;
        regions.entry(key).or_default().insert(&row.region);
    }
    let mut summary: Vec<TripSummaryRow> = seconds
        .into_iter()
        .map(|((vehicle_id, trip_id), total)| TripSummaryRow {
            vehicle_id: vehicle_id.to_string(),
            trip_id: trip_id.to_string(),
            total_drive_seconds: total,
            num_states: regions
                .get(&(vehicle_id, trip_id))
                .map(|r| r.len())
                .unwrap_or(0),
            total_drive_hours: total as f64 / SECONDS_PER_HOUR,
        })
        .collect();
    summary.sort_by(|a, b| {
        b.total_drive_hours
            .partial_cmp(&a.total_drive_hours)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.vehicle_id.cmp(&b.vehicle_id))
            .then_with(|| a.trip_id.cmp(&b.trip_id))
    });
    summary
}

pub fn significant_segments(rows: &[AttributionRecord]) -> Vec<SignificantSegmentRow> {
    let mut segments: Vec<SignificantSegmentRow> = rows
        .iter()
        .filter(|row| row.drive_seconds as f64 >= SECONDS_PER_HOUR)
        .map(|row| SignificantSegmentRow {
            vehicle_id: row.vehicle_id.clone(),
            trip_id: row.trip_id.clone(),
            region: row.region.clone(),
            drive_seconds: row.drive_seconds,
            drive_hours: row.drive_seconds as f64 / SECONDS_PER_HOUR,
        })
        .collect();
    segments.sort_by(|a, b| {
        a.vehicle_id
            .cmp(&b.vehicle_id)
            .then_with(|| a.trip_id.cmp(&b.trip_id))
            .then_with(|| a.region.cmp(&b.region))
    });
    segments
}
