//! Area polygons from an ESRI shapefile.
//!
//! Reads the `.shp`/`.dbf` pair, coerces the key column to a string and
//! picks up the CRS from the `.prj` sidecar when there is one.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use festival_map_geography_models::{AreaLayer, AreaShape, Crs};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use shapefile::dbase::FieldValue;
use shapefile::{PolygonRing, Shape};

use crate::{GeoError, crs};

/// Loads every polygon of the shapefile at `path`.
///
/// `crs_override` (an `EPSG:` code or WKT) takes precedence over the `.prj`
/// sidecar.
///
/// # Errors
///
/// Returns [`GeoError`] if the shapefile cannot be read or the CRS is
/// unsupported. Shapes without a key or without polygon geometry are
/// skipped with a warning.
pub fn load_areas(
    path: &Path,
    key_column: &str,
    crs_override: Option<&str>,
) -> Result<AreaLayer, GeoError> {
    let crs = match crs_override {
        Some(definition) => Some(crs::parse_crs(definition)?),
        None => read_prj(path)?,
    };

    let mut reader = shapefile::Reader::from_path(path)?;
    let mut shapes = Vec::new();
    let mut skipped = 0usize;

    for (index, item) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) = item?;
        let mut attributes: BTreeMap<String, String> = HashMap::<String, FieldValue>::from(record)
            .into_iter()
            .filter_map(|(name, value)| field_to_string(value).map(|v| (name, v)))
            .collect();

        let Some(key) = attributes.remove(key_column) else {
            log::warn!("Skipping shape #{index} with no value in key column '{key_column}'");
            skipped += 1;
            continue;
        };

        let Some(geometry) = shape_to_multipolygon(&shape) else {
            log::warn!("Skipping non-polygon shape #{index} (key {key})");
            skipped += 1;
            continue;
        };

        shapes.push(AreaShape {
            key,
            attributes,
            geometry,
        });
    }

    log::info!(
        "Loaded {} area polygons from {} ({skipped} skipped, CRS: {})",
        shapes.len(),
        path.display(),
        crs.as_ref().map_or_else(|| "unknown".to_string(), |c| format!("{c:?}"))
    );

    Ok(AreaLayer { shapes, crs })
}

/// Reads the `.prj` next to the shapefile, if present.
fn read_prj(path: &Path) -> Result<Option<Crs>, GeoError> {
    let prj_path = path.with_extension("prj");
    if !prj_path.exists() {
        return Ok(None);
    }

    let wkt = std::fs::read_to_string(&prj_path).map_err(|source| GeoError::Io {
        path: prj_path.display().to_string(),
        source,
    })?;
    crs::from_wkt(&wkt).map(Some)
}

/// Formats a dBase value as a string. Integral numbers drop their
/// fractional part so `17201.0` joins against `"17201"`.
fn field_to_string(value: FieldValue) -> Option<String> {
    match value {
        FieldValue::Character(s) => s
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        FieldValue::Numeric(n) => n.map(format_number),
        FieldValue::Float(f) => f.map(|f| format_number(f64::from(f))),
        FieldValue::Integer(i) => Some(i.to_string()),
        FieldValue::Double(d) | FieldValue::Currency(d) => Some(format_number(d)),
        FieldValue::Logical(b) => b.map(|b| b.to_string()),
        FieldValue::Memo(m) => Some(m),
        _ => None,
    }
}

/// Formats a number the way the population table spells keys.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// Converts polygon shapes to a [`MultiPolygon`]. Each outer ring starts a
/// new polygon; the inner rings after it become its holes.
fn shape_to_multipolygon(shape: &Shape) -> Option<MultiPolygon<f64>> {
    match shape {
        Shape::Polygon(p) => rings_to_multipolygon(p.rings(), |pt| Coord { x: pt.x, y: pt.y }),
        Shape::PolygonM(p) => rings_to_multipolygon(p.rings(), |pt| Coord { x: pt.x, y: pt.y }),
        Shape::PolygonZ(p) => rings_to_multipolygon(p.rings(), |pt| Coord { x: pt.x, y: pt.y }),
        _ => None,
    }
}

fn rings_to_multipolygon<P>(
    rings: &[PolygonRing<P>],
    to_coord: impl Fn(&P) -> Coord<f64>,
) -> Option<MultiPolygon<f64>> {
    let mut polygons: Vec<(LineString<f64>, Vec<LineString<f64>>)> = Vec::new();

    for ring in rings {
        match ring {
            PolygonRing::Outer(points) => {
                let exterior: LineString<f64> = points.iter().map(&to_coord).collect();
                polygons.push((exterior, Vec::new()));
            }
            PolygonRing::Inner(points) => {
                let interior: LineString<f64> = points.iter().map(&to_coord).collect();
                if let Some((_, holes)) = polygons.last_mut() {
                    holes.push(interior);
                } else {
                    // A hole with no shell; treat it as a shell of its own.
                    polygons.push((interior, Vec::new()));
                }
            }
        }
    }

    if polygons.is_empty() {
        return None;
    }

    Some(MultiPolygon(
        polygons
            .into_iter()
            .map(|(exterior, holes)| Polygon::new(exterior, holes))
            .collect(),
    ))
}
