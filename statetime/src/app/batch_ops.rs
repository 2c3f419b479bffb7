use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use kdam::{Bar, BarExt};
use rayon::prelude::*;
use statetime_core::model::route::RouteDocument;

use super::AppError;
use crate::attribution::AttributionStrategy;

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchSummary {
    pub processed: usize,
    pub skipped: usize,
}

/// attributes every `.json` route document under `routes_dir` in parallel,
/// writing one `<vehicle>_<trip>.csv` table per trip into `output_dir`.
/// malformed or structurally empty documents are logged and skipped so one
/// bad trip never sinks a fleet run; write failures are fatal.
pub fn run_batch<S: AttributionStrategy>(
    strategy: &S,
    routes_dir: &Path,
    output_dir: &Path,
) -> Result<BatchSummary, AppError> {
    let files = list_route_files(routes_dir)?;
    std::fs::create_dir_all(output_dir).map_err(|e| {
        AppError::InternalError(format!(
            "failure creating output directory '{}': {e}",
            output_dir.to_string_lossy()
        ))
    })?;

    log::info!(
        "attributing {} route documents with the {} strategy",
        files.len(),
        strategy.name()
    );
    let bar = Arc::new(Mutex::new(
        Bar::builder()
            .desc(strategy.name())
            .total(files.len())
            .build()
            .map_err(AppError::InternalError)?,
    ));

    let results: Vec<Result<bool, AppError>> = files
        .par_iter()
        .map(|file| {
            if let Ok(mut bar) = bar.clone().lock() {
                let _ = bar.update(1);
            }
            let route = match RouteDocument::from_file(file) {
                Ok(route) => route,
                Err(e) => {
                    log::warn!("skipping '{}': {e}", file.to_string_lossy());
                    return Ok(false);
                }
            };
            let table = match strategy.attribute(&route) {
                Ok(table) => table,
                Err(e) => {
                    log::warn!("skipping '{}': {e}", file.to_string_lossy());
                    return Ok(false);
                }
            };
            if table.is_empty() {
                log::warn!(
                    "trip {} produced no attributable drive time, skipping",
                    route.trip_id
                );
                return Ok(false);
            }
            let out_path =
                output_dir.join(format!("{}_{}.csv", table.vehicle_id, table.trip_id));
            table.write_csv(&out_path)?;
            Ok(true)
        })
        .collect();
    eprintln!();

    let mut summary = BatchSummary::default();
    for result in results {
        match result? {
            true => summary.processed += 1,
            false => summary.skipped += 1,
        }
    }
    log::info!(
        "attribution complete: {} trips written, {} skipped",
        summary.processed,
        summary.skipped
    );
    Ok(summary)
}

/// all `.json` files under `dir`, sorted by name. an empty directory is an
/// argument error rather than a silently successful no-op run.
fn list_route_files(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        AppError::InvalidArgument(format!(
            "failure reading routes directory '{}': {e}",
            dir.to_string_lossy()
        ))
    })?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "json").unwrap_or(false))
        .collect();
    files.sort();
    if files.is_empty() {
        return Err(AppError::InvalidArgument(format!(
            "no .json route documents found in '{}'",
            dir.to_string_lossy()
        )));
    }
    Ok(files)
}

#[cfg(test)]
mod test {
    use super::*;
    use statetime_core::model::RegionCode;
    use std::path::PathBuf;

    struct ConstantStrategy;

    impl AttributionStrategy for ConstantStrategy {
        fn name(&self) -> &'static str {
            "constant"
        }

        fn attribute(
            &self,
            route: &RouteDocument,
        ) -> Result<crate::attribution::TripTable, crate::attribution::AttributionError> {
            let _ = route.first_leg()?;
            let mut totals = std::collections::HashMap::new();
            totals.insert(RegionCode::from("US:Nebraska"), 60.0);
            Ok(crate::attribution::TripTable::from_totals(
                &route.vehicle_id,
                &route.trip_id,
                &totals,
                60.0,
            ))
        }
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("statetime_batch_{}_{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn valid_route_json() -> String {
        let shape = statetime_core::geometry::polyline::encode(
            &[(41.0, -96.0), (41.01, -96.0)],
            statetime_core::geometry::polyline::SHAPE_PRECISION,
        );
        format!(
            r#"{{"trip": {{"legs": [{{"shape": "{shape}", "maneuvers": [{{"begin_shape_index": 0, "end_shape_index": 1, "time": 60.0}}]}}]}}}}"#
        )
    }

    #[test]
    fn test_batch_writes_tables_and_skips_bad_documents() {
        let routes = temp_dir("routes");
        let output = temp_dir("output");
        std::fs::write(routes.join("truck1_omaha.json"), valid_route_json()).unwrap();
        std::fs::write(routes.join("truck2_lincoln.json"), valid_route_json()).unwrap();
        std::fs::write(routes.join("truck3_broken.json"), "{not json").unwrap();

        let summary = run_batch(&ConstantStrategy, &routes, &output).unwrap();
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.skipped, 1);
        assert!(output.join("truck1_omaha.csv").exists());
        assert!(output.join("truck2_lincoln.csv").exists());

        std::fs::remove_dir_all(&routes).unwrap();
        std::fs::remove_dir_all(&output).unwrap();
    }

    #[test]
    fn test_empty_routes_directory_is_an_error() {
        let routes = temp_dir("no_routes");
        let output = temp_dir("no_output");
        let result = run_batch(&ConstantStrategy, &routes, &output);
        std::fs::remove_dir_all(&routes).unwrap();
        let _ = std::fs::remove_dir_all(&output);
        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
    }
}
