use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use clap::{Parser, Subcommand, ValueEnum};
use h3o::Resolution;
use serde::{Deserialize, Serialize};

use super::{batch_ops, AppError};
use crate::analytics::{
    load_rows, load_trip_rows, reconcile, region_totals, significant_segments, trip_summary,
    write_rows,
};
use crate::attribution::{LazyStrategy, PreciseStrategy};
use crate::classify::{ReverseGeocoder, DEFAULT_GEOCODE_TIMEOUT};
use crate::index::{
    load_polygon_dir, CoverageBuilder, SpatialMembershipIndex, DEFAULT_SCAN_STEP_DEGREES,
};

/// Command line tool for attributing fleet drive time to the states and
/// provinces each route traverses
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct StateTimeApp {
    #[command(subcommand)]
    pub op: StateTimeOperation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum CoverageMode {
    /// polygon-fill cell coverage via the H3 tiler
    Tiler,
    /// bounding-box scan with neighbor expansion, for very large polygons
    BboxScan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum StrategyKind {
    /// majority-vote attribution through the shared grid index
    Lazy,
    /// dense-sampling proportional attribution through the geocoder
    Precise,
}

#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum StateTimeOperation {
    /// build a grid membership index from a directory of region polygons
    BuildIndex {
        /// directory of `CC_RegionName.geojson` polygon files
        polygons: PathBuf,
        /// destination for the persisted cell table
        output: PathBuf,
        /// H3 resolution of the index cells
        #[arg(long, default_value_t = 9)]
        resolution: u8,
        /// cell coverage method
        #[arg(long, value_enum, default_value_t = CoverageMode::Tiler)]
        coverage: CoverageMode,
        /// scan step in degrees, used by the bbox-scan coverage method
        #[arg(long, default_value_t = DEFAULT_SCAN_STEP_DEGREES)]
        scan_step_degrees: f64,
    },
    /// attribute a directory of route documents to per-trip region tables
    Process {
        /// directory of `<vehicle>_<trip>.json` route documents
        routes: PathBuf,
        /// directory receiving one attribution CSV per trip
        output: PathBuf,
        /// attribution strategy
        #[arg(long, value_enum, default_value_t = StrategyKind::Lazy)]
        strategy: StrategyKind,
        /// persisted grid index, required by the lazy strategy. updated in
        /// place with the cells learned during the run
        #[arg(long)]
        index: Option<PathBuf>,
        /// H3 resolution the index was built at
        #[arg(long, default_value_t = 9)]
        resolution: u8,
        /// reverse geocoding service base url
        #[arg(long, default_value = "http://localhost:8080")]
        geocoder_url: String,
    },
    /// aggregate per-trip attribution tables into fleet rollups
    Rollup {
        /// directory of per-trip attribution CSVs
        trips: PathBuf,
        /// directory receiving the rollup tables
        output: PathBuf,
    },
    /// join two strategies' outputs and report their disagreement
    Compare {
        /// combined analytics CSV from a lazy-strategy rollup
        lazy: PathBuf,
        /// combined analytics CSV from a precise-strategy rollup
        precise: PathBuf,
        /// destination for the reconciliation table
        output: PathBuf,
    },
}

impl StateTimeOperation {
    pub fn run(self) -> Result<(), AppError> {
        match self {
            StateTimeOperation::BuildIndex {
                polygons,
                output,
                resolution,
                coverage,
                scan_step_degrees,
            } => {
                let resolution = parse_resolution(resolution)?;
                let builder = match coverage {
                    CoverageMode::Tiler => CoverageBuilder::Tiler,
                    CoverageMode::BboxScan => CoverageBuilder::BboxScan {
                        step_degrees: scan_step_degrees,
                    },
                };
                let regions = load_polygon_dir(&polygons)?;
                let index =
                    SpatialMembershipIndex::build_from_polygons(&regions, resolution, &builder)?;
                index.persist(&output)?;
                let ids = index.region_ids();
                log::info!(
                    "wrote {} cells across {} region codes (unknown id {}) to '{}'",
                    index.len(),
                    ids.len(),
                    ids.unknown_id(),
                    output.to_string_lossy()
                );
                Ok(())
            }
            StateTimeOperation::Process {
                routes,
                output,
                strategy,
                index,
                resolution,
                geocoder_url,
            } => {
                let geocoder = ReverseGeocoder::new(&geocoder_url, DEFAULT_GEOCODE_TIMEOUT)?;
                match strategy {
                    StrategyKind::Lazy => {
                        let index_path = index.ok_or_else(|| {
                            AppError::InvalidArgument(String::from(
                                "the lazy strategy requires --index",
                            ))
                        })?;
                        let resolution = parse_resolution(resolution)?;
                        let loaded = SpatialMembershipIndex::load(&index_path, resolution)?;
                        let cells_before = loaded.len();
                        let shared = Arc::new(RwLock::new(loaded));
                        let lazy = LazyStrategy::new(shared.clone(), geocoder);
                        batch_ops::run_batch(&lazy, &routes, &output)?;
                        let index = match shared.read() {
                            Ok(guard) => guard,
                            Err(poisoned) => poisoned.into_inner(),
                        };
                        index.persist(&index_path)?;
                        log::info!(
                            "index grew from {cells_before} to {} cells",
                            index.len()
                        );
                    }
                    StrategyKind::Precise => {
                        let precise = PreciseStrategy::new(geocoder);
                        batch_ops::run_batch(&precise, &routes, &output)?;
                    }
                }
                Ok(())
            }
            StateTimeOperation::Rollup { trips, output } => {
                let rows = load_trip_rows(&trips)?;
                std::fs::create_dir_all(&output).map_err(|e| {
                    AppError::InternalError(format!(
                        "failure creating output directory '{}': {e}",
                        output.to_string_lossy()
                    ))
                })?;
                write_rows(output.join("analytics.csv"), &rows)?;
                write_rows(output.join("region_totals.csv"), &region_totals(&rows))?;
                write_rows(output.join("trip_summary.csv"), &trip_summary(&rows))?;
                write_rows(
                    output.join("significant_segments.csv"),
                    &significant_segments(&rows),
                )?;
                log::info!(
                    "rolled up {} attribution rows into '{}'",
                    rows.len(),
                    output.to_string_lossy()
                );
                Ok(())
            }
            StateTimeOperation::Compare {
                lazy,
                precise,
                output,
            } => {
                let lazy_rows = load_rows(&lazy)?;
                let precise_rows = load_rows(&precise)?;
                let report = reconcile(&lazy_rows, &precise_rows);
                write_rows(&output, &report.rows)?;
                log::info!(
                    "reconciled {} (trip, region) pairs: max |diff| {}s, mean |diff| {:.1}s",
                    report.summary.rows,
                    report.summary.max_abs_diff_sec,
                    report.summary.mean_abs_diff_sec
                );
                if let (Some(max_pct), Some(mean_pct)) = (
                    report.summary.max_abs_pct_diff,
                    report.summary.mean_abs_pct_diff,
                ) {
                    log::info!("max |pct_diff| {max_pct:.2}%, mean |pct_diff| {mean_pct:.2}%");
                }
                Ok(())
            }
        }
    }
}

fn parse_resolution(resolution: u8) -> Result<Resolution, AppError> {
    Resolution::try_from(resolution)
        .map_err(|e| AppError::InvalidArgument(format!("invalid H3 resolution {resolution}: {e}")))
}
