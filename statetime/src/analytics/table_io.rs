use std::path::Path;

use serde::Serialize;

use super::AnalyticsError;
use crate::attribution::AttributionRecord;

/// reads every per-trip attribution CSV under `dir` into one flat row set,
/// sorted by file name so downstream output is stable across runs.
pub fn load_trip_rows(dir: &Path) -> Result<Vec<AttributionRecord>, AnalyticsError> {
    let dir_name = dir.to_string_lossy().to_string();
    let entries = std::fs::read_dir(dir)
        .map_err(|e| AnalyticsError::ReadError(dir_name.clone(), e.to_string()))?;
    let mut files: Vec<std::path::PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "csv").unwrap_or(false))
        .collect();
    files.sort();
    if files.is_empty() {
        return Err(AnalyticsError::ReadError(
            dir_name,
            String::from("no .csv attribution tables found"),
        ));
    }
    let mut rows: Vec<AttributionRecord> = Vec::new();
    for file in files.iter() {
        let name = file.to_string_lossy().to_string();
        let mut reader = csv::Reader::from_path(file)
            .map_err(|e| AnalyticsError::ReadError(name.clone(), e.to_string()))?;
        for row in reader.deserialize() {
            let record: AttributionRecord =
                row.map_err(|e| AnalyticsError::ReadError(name.clone(), e.to_string()))?;
            rows.push(record);
        }
    }
    Ok(rows)
}

/// reads one combined attribution CSV, as written by the rollup operation.
pub fn load_rows(path: &Path) -> Result<Vec<AttributionRecord>, AnalyticsError> {
    let name = path.to_string_lossy().to_string();
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| AnalyticsError::ReadError(name.clone(), e.to_string()))?;
    let mut rows: Vec<AttributionRecord> = Vec::new();
    for row in reader.deserialize() {
        let record: AttributionRecord =
            row.map_err(|e| AnalyticsError::ReadError(name.clone(), e.to_string()))?;
        rows.push(record);
    }
    Ok(rows)
}

/// writes any serializable row set as CSV via a temp file and rename.
pub fn write_rows<T: Serialize, P: AsRef<Path>>(path: P, rows: &[T]) -> Result<(), AnalyticsError> {
    let path = path.as_ref();
    let name = path.to_string_lossy().to_string();
    let tmp = path.with_extension("csv.tmp");
    let mut writer = csv::Writer::from_path(&tmp)
        .map_err(|e| AnalyticsError::WriteError(name.clone(), e.to_string()))?;
    for row in rows.iter() {
        writer
            .serialize(row)
            .map_err(|e| AnalyticsError::WriteError(name.clone(), e.to_string()))?;
    }
    writer
        .flush()
        .map_err(|e| AnalyticsError::WriteError(name.clone(), e.to_string()))?;
    std::fs::rename(&tmp, path).map_err(|e| AnalyticsError::WriteError(name, e.to_string()))
}

#[cfg(test)]
mod test {
    use super::*;
    use statetime_core::model::RegionCode;
    use std::path::PathBuf;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("statetime_io_{}_{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn record(trip: &str, region: &str, seconds: i64) -> AttributionRecord {
        AttributionRecord {
            vehicle_id: "veh".to_string(),
            trip_id: trip.to_string(),
            region: RegionCode::from(region),
            drive_seconds: seconds,
            leg_seconds_total: seconds,
        }
    }

    #[test]
    fn test_write_then_load_dir() {
        let dir = temp_dir("round_trip");
        write_rows(dir.join("veh_a.csv"), &[record("a", "US:Iowa", 100)]).unwrap();
        write_rows(dir.join("veh_b.csv"), &[record("b", "US:Ohio", 200)]).unwrap();

        let rows = load_trip_rows(&dir).unwrap();
        let single = load_rows(&dir.join("veh_a.csv")).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(single.len(), 1);
        assert_eq!(rows.len(), 2);
        // file-name order
        assert_eq!(rows[0].trip_id, "a");
        assert_eq!(rows[1].trip_id, "b");
    }

    #[test]
    fn test_empty_dir_is_an_error() {
        let dir = temp_dir("empty");
        let result = load_trip_rows(&dir);
        std::fs::remove_dir_all(&dir).unwrap();
        assert!(matches!(result, Err(AnalyticsError::ReadError(_, _))));
    }
}
