use super::IndexError;
use statetime_core::model::RegionCode;
use std::path::Path;

/// loads region polygons from a directory of `<CC_Name>.geojson` geometry
/// files, where the file stem is the region code with `:` written as `_`
/// (for example `US_Colorado.geojson`). files that fail to parse or do not
/// contain polygonal geometry are skipped with a warning, not an error.
pub fn load_polygon_dir(dir: &Path) -> Result<Vec<(RegionCode, geo::MultiPolygon)>, IndexError> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| {
            IndexError::BuildError(format!(
                "failure listing polygon directory '{}': {e}",
                dir.display()
            ))
        })?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|ext| ext == "geojson").unwrap_or(false))
        .collect();
    paths.sort();

    let mut regions = Vec::with_capacity(paths.len());
    for path in paths {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let region = RegionCode::new(stem.replacen('_', ":", 1));
        match load_polygon_file(&path) {
            Ok(Some(multipolygon)) => regions.push((region, multipolygon)),
            Ok(None) => log::warn!(
                "skipping '{}': geometry is not a Polygon or MultiPolygon",
                path.display()
            ),
            Err(e) => log::warn!("skipping '{}': {e}", path.display()),
        }
    }
    if regions.is_empty() {
        return Err(IndexError::BuildError(format!(
            "no usable region polygons found in '{}'",
            dir.display()
        )));
    }
    Ok(regions)
}

fn load_polygon_file(path: &Path) -> Result<Option<geo::MultiPolygon>, IndexError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| IndexError::BuildError(format!("read failure: {e}")))?;
    let geojson = text
        .parse::<geojson::GeoJson>()
        .map_err(|e| IndexError::BuildError(format!("geojson parse failure: {e}")))?;
    let geometry = match geojson {
        geojson::GeoJson::Geometry(g) => g,
        geojson::GeoJson::Feature(f) => match f.geometry {
            Some(g) => g,
            None => return Ok(None),
        },
        geojson::GeoJson::FeatureCollection(_) => return Ok(None),
    };
    let geometry: geo::Geometry = geo::Geometry::try_from(geometry)
        .map_err(|e| IndexError::BuildError(format!("geometry conversion failure: {e}")))?;
    match geometry {
        geo::Geometry::Polygon(polygon) => Ok(Some(geo::MultiPolygon(vec![polygon]))),
        geo::Geometry::MultiPolygon(multipolygon) => Ok(Some(multipolygon)),
        _ => Ok(None),
    }
}
