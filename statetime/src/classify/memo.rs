use statetime_core::model::{Coordinate, RegionCode};
use std::collections::HashMap;
use std::sync::Mutex;

/// ephemeral per-run memo of geocoder answers, keyed by coordinate rounded
/// to four decimal places (~11 m). never persisted: entries are rounded
/// approximations that stay within a single run. the guarding mutex is
/// held only for the lookup or insert itself, never across a geocoder
/// call.
#[derive(Debug, Default)]
pub struct CoordinateMemo {
    entries: Mutex<HashMap<(i64, i64), RegionCode>>,
}

impl CoordinateMemo {
    pub fn new() -> CoordinateMemo {
        CoordinateMemo::default()
    }

    fn key(coordinate: &Coordinate) -> (i64, i64) {
        (
            (coordinate.lat * 1e4).round() as i64,
            (coordinate.lon * 1e4).round() as i64,
        )
    }

    pub fn get(&self, coordinate: &Coordinate) -> Option<RegionCode> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(&Self::key(coordinate)).cloned())
    }

    pub fn put(&self, coordinate: &Coordinate, region: RegionCode) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(Self::key(coordinate), region);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
