use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use statetime_core::model::RegionCode;

use super::AttributionError;

/// One region's share of drive time for a single trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttributionRecord {
    pub vehicle_id: String,
    pub trip_id: String,
    pub region: RegionCode,
    pub drive_seconds: i64,
    pub leg_seconds_total: i64,
}

/// Per-trip attribution table, one row per region touched by the trip.
#[derive(Debug, Clone)]
pub struct TripTable {
    pub vehicle_id: String,
    pub trip_id: String,
    pub records: Vec<AttributionRecord>,
}

impl TripTable {
    /// builds a table from accumulated per-region second totals. fractional
    /// seconds are carried through accumulation and rounded only here.
    pub fn from_totals(
        vehicle_id: &str,
        trip_id: &str,
        totals: &HashMap<RegionCode, f64>,
        leg_seconds_total: f64,
    ) -> TripTable {
        let mut regions: Vec<&RegionCode> = totals.keys().collect();
        regions.sort();
        let leg_total = leg_seconds_total.round() as i64;
        let records = regions
            .into_iter()
            .map(|region| AttributionRecord {
                vehicle_id: String::from(vehicle_id),
                trip_id: String::from(trip_id),
                region: region.clone(),
                drive_seconds: totals[region].round() as i64,
                leg_seconds_total: leg_total,
            })
            .collect();
        TripTable {
            vehicle_id: String::from(vehicle_id),
            trip_id: String::from(trip_id),
            records,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// writes the table as CSV via a temp file and atomic rename.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), AttributionError> {
        let path = path.as_ref();
        let path_str = path.to_string_lossy().to_string();
        let tmp_path = path.with_extension("csv.tmp");
        let mut writer = csv::Writer::from_path(&tmp_path)
            .map_err(|e| AttributionError::TableWriteError(path_str.clone(), e.to_string()))?;
        for record in self.records.iter() {
            writer
                .serialize(record)
                .map_err(|e| AttributionError::TableWriteError(path_str.clone(), e.to_string()))?;
        }
        writer
            .flush()
            .map_err(|e| AttributionError::TableWriteError(path_str.clone(), e.to_string()))?;
        std::fs::rename(&tmp_path, path)
            .map_err(|e| AttributionError::TableWriteError(path_str, e.to_string()))?;
        Ok(())
    }
}
