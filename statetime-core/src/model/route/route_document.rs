use super::{Maneuver, RouteError};
use serde::Deserialize;
use std::path::Path;

/// one trip's routing-engine output: the `trip` object of a Valhalla route
/// response, plus vehicle/trip identifiers derived from the source file
/// name. read once per run and treated as immutable. only the first leg is
/// consumed.
#[derive(Debug, Clone)]
pub struct RouteDocument {
    pub vehicle_id: String,
    pub trip_id: String,
    pub trip: Trip,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Trip {
    #[serde(default)]
    pub legs: Vec<Leg>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Leg {
    pub shape: Option<String>,
    #[serde(default)]
    pub maneuvers: Vec<Maneuver>,
    pub summary: Option<Summary>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Summary {
    pub time: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
struct RouteResponse {
    #[serde(default)]
    trip: Trip,
}

impl RouteDocument {
    pub fn new(vehicle_id: String, trip_id: String, trip: Trip) -> RouteDocument {
        RouteDocument {
            vehicle_id,
            trip_id,
            trip,
        }
    }

    /// parses a route response JSON body into a document with the given
    /// identifiers.
    pub fn from_json(
        vehicle_id: String,
        trip_id: String,
        json: &str,
    ) -> Result<RouteDocument, RouteError> {
        let response: RouteResponse = serde_json::from_str(json)?;
        Ok(RouteDocument::new(vehicle_id, trip_id, response.trip))
    }

    /// reads a route document from a `<vehicle>_<trip>.json` file, deriving
    /// the identifiers from the file stem.
    pub fn from_file(path: &Path) -> Result<RouteDocument, RouteError> {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let (vehicle_id, trip_id) = ids_from_stem(&stem);
        let json = std::fs::read_to_string(path)
            .map_err(|e| RouteError::ReadError(path.to_string_lossy().to_string(), e))?;
        RouteDocument::from_json(vehicle_id, trip_id, &json)
    }

    /// the leg this document contributes to attribution. documents with no
    /// legs, no shape, or no maneuvers are structurally empty and should be
    /// skipped by the caller with a warning.
    pub fn first_leg(&self) -> Result<&Leg, RouteError> {
        let leg = self
            .trip
            .legs
            .first()
            .ok_or_else(|| RouteError::NoLegs(self.trip_id.clone()))?;
        if leg.shape.as_deref().unwrap_or_default().is_empty() {
            return Err(RouteError::NoShape(self.trip_id.clone()));
        }
        if leg.maneuvers.is_empty() {
            return Err(RouteError::NoManeuvers(self.trip_id.clone()));
        }
        Ok(leg)
    }
}

impl Leg {
    pub fn shape_str(&self) -> &str {
        self.shape.as_deref().unwrap_or_default()
    }

    /// the leg's total duration from its summary, or `fallback` (typically
    /// the sum of maneuver durations) when the summary is absent.
    pub fn summary_seconds(&self, fallback: f64) -> f64 {
        self.summary
            .as_ref()
            .and_then(|s| s.time)
            .unwrap_or(fallback)
    }
}

/// splits a route file stem into (vehicle_id, trip_id) at the first
/// underscore; stems without an underscore belong to the default vehicle.
fn ids_from_stem(stem: &str) -> (String, String) {
    match stem.split_once('_') {
        Some((vehicle, trip)) => (vehicle.to_string(), trip.to_string()),
        None => (String::from("veh"), stem.to_string()),
    }
}
