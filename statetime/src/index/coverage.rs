use super::IndexError;
use geo::BoundingRect;
use h3o::geom::{ContainmentMode, TilerBuilder};
use h3o::{CellIndex, LatLng, Resolution};
use std::collections::HashSet;

pub const DEFAULT_SCAN_STEP_DEGREES: f64 = 0.25;

/// how a region polygon is converted to grid-cell coverage, resolved once
/// at index build time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoverageBuilder {
    /// native H3 tiling of the polygon's outer ring. holes are ignored:
    /// inner rings do not carve cells out of the coverage.
    Tiler,
    /// approximation for when native tiling is unavailable: scan the outer
    /// ring's bounding box on a fixed-degree step, seed one cell per scan
    /// point, expand each seed to its one-ring of neighbors, and keep the
    /// cells whose center falls inside the outer ring by ray casting.
    /// slivers narrower than one scan step (less the one-ring expansion)
    /// can be missed, and hole interiors are claimed by the surrounding
    /// region.
    BboxScan { step_degrees: f64 },
}

impl CoverageBuilder {
    /// the set of grid cells covering one polygon at the given resolution.
    pub fn cover(
        &self,
        polygon: &geo::Polygon,
        resolution: Resolution,
    ) -> Result<HashSet<CellIndex>, IndexError> {
        match self {
            CoverageBuilder::Tiler => tiler_coverage(polygon, resolution),
            CoverageBuilder::BboxScan { step_degrees } => {
                scan_coverage(polygon, resolution, *step_degrees)
            }
        }
    }
}

fn tiler_coverage(
    polygon: &geo::Polygon,
    resolution: Resolution,
) -> Result<HashSet<CellIndex>, IndexError> {
    let outer = geo::Polygon::new(polygon.exterior().clone(), vec![]);
    let mut tiler = TilerBuilder::new(resolution)
        .containment_mode(ContainmentMode::IntersectsBoundary)
        .build();
    tiler
        .add(outer)
        .map_err(|e| IndexError::BuildError(format!("failure adding polygon to h3 tiler: {e}")))?;
    Ok(tiler.into_coverage().collect())
}

fn scan_coverage(
    polygon: &geo::Polygon,
    resolution: Resolution,
    step_degrees: f64,
) -> Result<HashSet<CellIndex>, IndexError> {
    if step_degrees <= 0.0 {
        return Err(IndexError::BuildError(format!(
            "bbox scan step must be positive, got {step_degrees}"
        )));
    }
    let ring = polygon.exterior();
    let bounds = ring.bounding_rect().ok_or_else(|| {
        IndexError::BuildError(String::from("polygon outer ring has no bounding box"))
    })?;

    let mut seeds: HashSet<CellIndex> = HashSet::new();
    let mut lat = bounds.min().y;
    while lat <= bounds.max().y + 1e-9 {
        let mut lon = bounds.min().x;
        while lon <= bounds.max().x + 1e-9 {
            let latlng = LatLng::new(lat, lon).map_err(|e| {
                IndexError::InvalidCoordinate(format!("scan point ({lat}, {lon}): {e}"))
            })?;
            seeds.insert(latlng.to_cell(resolution));
            lon += step_degrees;
        }
        lat += step_degrees;
    }

    let mut candidates: HashSet<CellIndex> = HashSet::new();
    for seed in seeds {
        candidates.insert(seed);
        candidates.extend(seed.grid_disk::<Vec<_>>(1));
    }

    Ok(candidates
        .into_iter()
        .filter(|cell| {
            let center = LatLng::from(*cell);
            point_in_ring(center.lng(), center.lat(), ring)
        })
        .collect())
}

/// ray-casting membership test of a point against one closed ring. edges
/// are walked without the closing segment since geojson rings repeat the
/// first vertex last.
pub(crate) fn point_in_ring(lon: f64, lat: f64, ring: &geo::LineString) -> bool {
    let coords = &ring.0;
    let mut inside = false;
    for i in 0..coords.len().saturating_sub(1) {
        let (x1, y1) = (coords[i].x, coords[i].y);
        let (x2, y2) = (coords[i + 1].x, coords[i + 1].y);
        if ((y1 > lat) != (y2 > lat)) && (lon < (x2 - x1) * (lat - y1) / (y2 - y1 + 1e-18) + x1) {
            inside = !inside;
        }
    }
    inside
}
