mod analytics_error;
mod reconcile;
mod rollup;
mod table_io;

pub use analytics_error::AnalyticsError;
pub use reconcile::{reconcile, ReconciliationReport, ReconciliationRow, ReconciliationSummary};
pub use rollup::{
    region_totals, significant_segments, trip_summary, RegionTotalsRow, SignificantSegmentRow,
    TripSummaryRow,
};
pub use table_io::{load_rows, load_trip_rows, write_rows};
