use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// a WGS84 latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Coordinate {
        Coordinate { lat, lon }
    }

    /// linear interpolation in coordinate space. adequate between adjacent
    /// polyline vertices, where segment lengths are far below the scale at
    /// which great-circle curvature matters.
    pub fn lerp(&self, other: &Coordinate, frac: f64) -> Coordinate {
        Coordinate {
            lat: self.lat + frac * (other.lat - self.lat),
            lon: self.lon + frac * (other.lon - self.lon),
        }
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}
