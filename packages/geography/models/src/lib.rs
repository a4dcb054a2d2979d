#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Area polygon and population types.
//!
//! An area starts as an [`AreaShape`] read from the shapefile, is joined
//! with a [`PopulationRow`] on the shared key, and ends up as an
//! [`AreaRecord`] carrying the derived `log_pop` value that drives the
//! choropleth.

use std::collections::BTreeMap;

use geo::MultiPolygon;
use serde::{Deserialize, Serialize};

/// One polygon read from the shapefile, before the population join.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaShape {
    /// Join key, coerced to a string.
    pub key: String,
    /// Remaining dBase attributes, formatted as strings.
    pub attributes: BTreeMap<String, String>,
    /// Polygon geometry in the layer's CRS.
    pub geometry: MultiPolygon<f64>,
}

/// Every shape of a shapefile plus its coordinate reference system.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaLayer {
    pub shapes: Vec<AreaShape>,
    /// `None` when the shapefile has no `.prj` sidecar.
    pub crs: Option<Crs>,
}

/// One row of the population table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationRow {
    /// Join key, coerced to a string.
    pub key: String,
    /// Every other column, raw.
    pub values: BTreeMap<String, String>,
}

/// An area after the population join.
///
/// Constructed once at load time and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaRecord {
    pub key: String,
    /// Shape attributes merged with population columns. Names present on
    /// both sides carry `_x` (shape) and `_y` (population) suffixes.
    pub attributes: BTreeMap<String, String>,
    pub geometry: MultiPolygon<f64>,
    /// `log10(pop_a + pop_b + 1)`. NaN when either population is missing.
    pub log_pop: f64,
}

impl AreaRecord {
    /// Parses an attribute as a number. Missing or non-numeric values are
    /// NaN.
    #[must_use]
    pub fn number(&self, column: &str) -> f64 {
        self.attributes
            .get(column)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .unwrap_or(f64::NAN)
    }
}

/// The two population columns summed into `log_pop`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationColumns {
    pub a: String,
    pub b: String,
}

impl Default for PopulationColumns {
    fn default() -> Self {
        Self {
            a: "pop14".to_string(),
            b: "pop9".to_string(),
        }
    }
}

/// Supported coordinate reference systems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Crs {
    /// Longitude/latitude in degrees on a WGS84-compatible datum (WGS84,
    /// JGD2000, JGD2011). Treated as EPSG:4326.
    Geographic {
        /// Human-readable name (e.g. `"EPSG:4326"`, `"GCS_JGD_2011"`).
        name: String,
    },
    /// Projected metres on a Transverse Mercator grid (UTM, Japan Plane
    /// Rectangular).
    TransverseMercator(TransverseMercator),
}

impl Crs {
    /// The EPSG:4326 target every layer is displayed in.
    #[must_use]
    pub fn wgs84() -> Self {
        Self::Geographic {
            name: "EPSG:4326".to_string(),
        }
    }

    /// Whether coordinates are already longitude/latitude degrees.
    #[must_use]
    pub const fn is_geographic(&self) -> bool {
        matches!(self, Self::Geographic { .. })
    }
}

/// Transverse Mercator projection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransverseMercator {
    /// Name for logs (e.g. `"EPSG:6675"`).
    pub name: String,
    pub latitude_of_origin: f64,
    pub central_meridian: f64,
    pub scale_factor: f64,
    pub false_easting: f64,
    pub false_northing: f64,
    /// Ellipsoid semi-major axis in metres.
    pub semi_major_axis: f64,
    /// Ellipsoid inverse flattening.
    pub inverse_flattening: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    fn record(attributes: &[(&str, &str)]) -> AreaRecord {
        AreaRecord {
            key: "17201".to_string(),
            attributes: attributes
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            geometry: MultiPolygon(vec![polygon![
                (x: 0.0, y: 0.0),
                (x: 1.0, y: 0.0),
                (x: 1.0, y: 1.0),
            ]]),
            log_pop: f64::NAN,
        }
    }

    #[test]
    fn parses_numeric_attribute() {
        let area = record(&[("pop14", " 120 ")]);
        assert!((area.number("pop14") - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_or_bad_attribute_is_nan() {
        let area = record(&[("pop14", "-")]);
        assert!(area.number("pop14").is_nan());
        assert!(area.number("pop9").is_nan());
    }

    #[test]
    fn wgs84_is_geographic() {
        assert!(Crs::wgs84().is_geographic());
    }
}
