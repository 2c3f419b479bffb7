mod coverage;
mod index_error;
mod membership_index;
mod region_id_table;
mod region_source;

pub use coverage::{CoverageBuilder, DEFAULT_SCAN_STEP_DEGREES};
pub use index_error::IndexError;
pub use membership_index::SpatialMembershipIndex;
pub use region_id_table::RegionIdTable;
pub use region_source::load_polygon_dir;
