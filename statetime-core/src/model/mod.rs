mod coordinate;
mod region_code;

pub mod route;

pub use coordinate::Coordinate;
pub use region_code::RegionCode;
