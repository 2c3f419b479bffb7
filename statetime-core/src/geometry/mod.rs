mod distance;
mod sampler;

pub mod polyline;

pub use distance::{cumulative_arc_length, great_circle_meters, EARTH_RADIUS_METERS};
pub use sampler::{sample_fixed_count, sample_fixed_spacing};
