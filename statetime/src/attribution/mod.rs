mod attribution_error;
mod lazy;
mod precise;
mod record;
mod strategy;

pub use attribution_error::AttributionError;
pub use lazy::{LazyStrategy, DEFAULT_SAMPLES_PER_MANEUVER};
pub use precise::{PreciseStrategy, DEFAULT_MIN_SAMPLES, DEFAULT_STEP_METERS};
pub use record::{AttributionRecord, TripTable};
pub use strategy::AttributionStrategy;
