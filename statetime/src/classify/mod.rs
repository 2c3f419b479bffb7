mod classify_error;
mod memo;
mod point_classifier;
mod reverse_geocoder;

pub use classify_error::ClassifyError;
pub use memo::CoordinateMemo;
pub use point_classifier::PointClassifier;
pub use reverse_geocoder::{ReverseGeocoder, DEFAULT_GEOCODE_TIMEOUT};
