mod maneuver;
mod route_document;
mod route_error;

pub use maneuver::{Maneuver, ManeuverSpan};
pub use route_document::{Leg, RouteDocument, Summary, Trip};
pub use route_error::RouteError;
