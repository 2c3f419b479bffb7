use super::{CoverageBuilder, IndexError, RegionIdTable};
use h3o::{CellIndex, LatLng, Resolution};
use itertools::Itertools;
use statetime_core::model::{Coordinate, RegionCode};
use std::collections::HashMap;
use std::path::Path;

/// maps a coordinate, via its H3 grid cell at one fixed resolution per
/// run, to the region that owns the cell. built once at process start from
/// region polygons or a persisted table; grown incrementally by the lazy
/// strategy on classification misses; persisted back to storage on demand.
#[derive(Debug, Clone)]
pub struct SpatialMembershipIndex {
    resolution: Resolution,
    cells: HashMap<CellIndex, RegionCode>,
}

impl SpatialMembershipIndex {
    pub fn new(resolution: Resolution) -> SpatialMembershipIndex {
        SpatialMembershipIndex {
            resolution,
            cells: HashMap::new(),
        }
    }

    /// builds coverage for each region polygon. a cell claimed by more than
    /// one region (possible at shared borders) is last-write-wins in input
    /// order; per-region cell counts are logged so overwrites are
    /// observable.
    pub fn build_from_polygons(
        regions: &[(RegionCode, geo::MultiPolygon)],
        resolution: Resolution,
        builder: &CoverageBuilder,
    ) -> Result<SpatialMembershipIndex, IndexError> {
        let mut index = SpatialMembershipIndex::new(resolution);
        for (region, multipolygon) in regions {
            let mut covered = 0;
            for polygon in multipolygon.iter() {
                let cells = builder.cover(polygon, resolution)?;
                covered += cells.len();
                for cell in cells {
                    index.cells.insert(cell, region.clone());
                }
            }
            log::info!("region {region}: {covered} cells at resolution {resolution}");
        }
        Ok(index)
    }

    /// rebuilds an index from a persisted cell table. classification
    /// behavior is identical to the index that was persisted. any read or
    /// parse failure is an error; a run that requires a pre-built index
    /// must not silently fall back to an empty one.
    pub fn load(path: &Path, resolution: Resolution) -> Result<SpatialMembershipIndex, IndexError> {
        let name = path.to_string_lossy().to_string();
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| IndexError::LoadError(name.clone(), e.to_string()))?;
        let mut cells: HashMap<CellIndex, RegionCode> = HashMap::new();
        for (row_idx, row) in reader.records().enumerate() {
            let record = row.map_err(|e| IndexError::LoadError(name.clone(), e.to_string()))?;
            let cell_str = record.get(0).ok_or_else(|| {
                IndexError::LoadError(name.clone(), format!("row {row_idx} missing cell_id"))
            })?;
            let cell = cell_str.parse::<CellIndex>().map_err(|e| {
                IndexError::LoadError(name.clone(), format!("row {row_idx}: {e}"))
            })?;
            if cell.resolution() != resolution {
                return Err(IndexError::LoadError(
                    name,
                    format!(
                        "row {row_idx} cell {cell} has resolution {} but the run expects {resolution}",
                        cell.resolution()
                    ),
                ));
            }
            let region = record.get(1).ok_or_else(|| {
                IndexError::LoadError(name.clone(), format!("row {row_idx} missing region_code"))
            })?;
            cells.insert(cell, RegionCode::new(region));
        }
        Ok(SpatialMembershipIndex { resolution, cells })
    }

    /// serializes the full cell table as CSV rows `(cell_id, region_code)`
    /// sorted by cell id. the file is written to a temp path and renamed
    /// so downstream readers never observe a partial table.
    pub fn persist(&self, path: &Path) -> Result<(), IndexError> {
        let name = path.to_string_lossy().to_string();
        let tmp = path.with_extension("csv.tmp");
        {
            let mut writer = csv::Writer::from_path(&tmp)
                .map_err(|e| IndexError::PersistError(name.clone(), e.to_string()))?;
            writer
                .write_record(["cell_id", "region_code"])
                .map_err(|e| IndexError::PersistError(name.clone(), e.to_string()))?;
            for (cell, region) in self.cells.iter().sorted_by_key(|(cell, _)| u64::from(**cell)) {
                writer
                    .write_record([cell.to_string().as_str(), region.as_str()])
                    .map_err(|e| IndexError::PersistError(name.clone(), e.to_string()))?;
            }
            writer
                .flush()
                .map_err(|e| IndexError::PersistError(name.clone(), e.to_string()))?;
        }
        std::fs::rename(&tmp, path).map_err(|e| IndexError::PersistError(name, e.to_string()))
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// the grid cell for a coordinate at this index's resolution.
    pub fn cell_for(&self, coordinate: &Coordinate) -> Result<CellIndex, IndexError> {
        let latlng = LatLng::new(coordinate.lat, coordinate.lon)
            .map_err(|e| IndexError::InvalidCoordinate(format!("{coordinate}: {e}")))?;
        Ok(latlng.to_cell(self.resolution))
    }

    /// O(1) cell lookup. a miss is a valid, expected outcome, not an
    /// error, and does not mutate the index.
    pub fn classify_cell(&self, cell: &CellIndex) -> Option<&RegionCode> {
        self.cells.get(cell)
    }

    /// idempotent upsert, used by the lazy strategy to backfill misses.
    pub fn insert(&mut self, cell: CellIndex, region: RegionCode) {
        self.cells.insert(cell, region);
    }

    /// derives the dense integer id table for the regions currently
    /// present, the contract batch point-classification callers encode
    /// results against. inserts change the id space, so callers must
    /// re-derive after any index mutation rather than caching ids.
    pub fn region_ids(&self) -> RegionIdTable {
        RegionIdTable::from_regions(self.cells.values())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::path::PathBuf;

    fn cell_at(lat: f64, lon: f64, resolution: Resolution) -> CellIndex {
        LatLng::new(lat, lon).unwrap().to_cell(resolution)
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("statetime_index_{}_{name}", std::process::id()))
    }

    #[test]
    fn test_classify_miss_then_insert() {
        let mut index = SpatialMembershipIndex::new(Resolution::Nine);
        let cell = cell_at(39.7392, -104.9903, Resolution::Nine);
        assert_eq!(index.classify_cell(&cell), None);
        index.insert(cell, RegionCode::new("US:Colorado"));
        assert_eq!(
            index.classify_cell(&cell),
            Some(&RegionCode::new("US:Colorado"))
        );
        // upsert is idempotent
        index.insert(cell, RegionCode::new("US:Colorado"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_persist_load_round_trip() {
        let mut index = SpatialMembershipIndex::new(Resolution::Nine);
        let denver = cell_at(39.7392, -104.9903, Resolution::Nine);
        let reno = cell_at(39.5296, -119.8138, Resolution::Nine);
        index.insert(denver, RegionCode::new("US:Colorado"));
        index.insert(reno, RegionCode::new("US:Nevada"));

        let path = temp_path("round_trip.csv");
        index.persist(&path).unwrap();
        let loaded = SpatialMembershipIndex::load(&path, Resolution::Nine).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.len(), index.len());
        for (cell, region) in index.cells.iter() {
            assert_eq!(loaded.classify_cell(cell), Some(region));
        }
    }

    #[test]
    fn test_load_missing_table_is_fatal() {
        let result =
            SpatialMembershipIndex::load(Path::new("/nonexistent/index.csv"), Resolution::Nine);
        assert!(matches!(result, Err(IndexError::LoadError(_, _))));
    }

    #[test]
    fn test_load_rejects_resolution_mismatch() {
        let mut index = SpatialMembershipIndex::new(Resolution::Nine);
        index.insert(
            cell_at(39.7392, -104.9903, Resolution::Nine),
            RegionCode::new("US:Colorado"),
        );
        let path = temp_path("res_mismatch.csv");
        index.persist(&path).unwrap();
        let result = SpatialMembershipIndex::load(&path, Resolution::Eight);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(IndexError::LoadError(_, _))));
    }

    #[test]
    fn test_region_ids_rederived_after_insert() {
        let mut index = SpatialMembershipIndex::new(Resolution::Nine);
        index.insert(
            cell_at(39.7392, -104.9903, Resolution::Nine),
            RegionCode::new("US:Colorado"),
        );
        let ids = index.region_ids();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids.region_to_id(&RegionCode::new("US:Colorado")), 0);
        assert_eq!(ids.unknown_id(), 1);

        // an insert shifts the id space; a fresh derivation reflects it
        index.insert(
            cell_at(39.5296, -119.8138, Resolution::Nine),
            RegionCode::new("US:California"),
        );
        let ids = index.region_ids();
        assert_eq!(ids.region_to_id(&RegionCode::new("US:California")), 0);
        assert_eq!(ids.region_to_id(&RegionCode::new("US:Colorado")), 1);
        assert_eq!(ids.unknown_id(), 2);
    }

    #[test]
    fn test_build_from_polygons_last_write_wins() {
        let polygon = geo::Polygon::new(
            geo::LineString::from(vec![
                (-105.01, 39.99),
                (-105.0, 39.99),
                (-105.0, 40.0),
                (-105.01, 40.0),
                (-105.01, 39.99),
            ]),
            vec![],
        );
        let regions = vec![
            (
                RegionCode::new("US:First"),
                geo::MultiPolygon(vec![polygon.clone()]),
            ),
            (RegionCode::new("US:Second"), geo::MultiPolygon(vec![polygon])),
        ];
        let index = SpatialMembershipIndex::build_from_polygons(
            &regions,
            Resolution::Nine,
            &CoverageBuilder::Tiler,
        )
        .unwrap();
        // identical coverage: the later region owns every contested cell
        for region in index.cells.values() {
            assert_eq!(region, &RegionCode::new("US:Second"));
        }
        assert!(!index.is_empty());
    }
}
