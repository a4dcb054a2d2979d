//! Coordinate reference system detection and re-projection to EPSG:4326.
//!
//! Area layers for Japan usually come in one of three flavours: plain
//! longitude/latitude (JGD2000/JGD2011, close enough to WGS84 for a web
//! map), a Japan Plane Rectangular zone, or UTM. The two projected ones
//! are both Transverse Mercator, so a single inverse handles them.

use festival_map_geography_models::{Crs, TransverseMercator};
use geo::{Coord, MapCoords as _, MultiPolygon};
use regex::Regex;

use crate::GeoError;

const WGS84_SEMI_MAJOR: f64 = 6_378_137.0;
const WGS84_INVERSE_FLATTENING: f64 = 298.257_223_563;
const GRS80_SEMI_MAJOR: f64 = 6_378_137.0;
const GRS80_INVERSE_FLATTENING: f64 = 298.257_222_101;

/// Origins `(lat, lon)` of the Japan Plane Rectangular zones I through XIX.
const JAPAN_PLANE_ORIGINS: [(f64, f64); 19] = [
    (33.0, 129.5),
    (33.0, 131.0),
    (36.0, 132.0 + 10.0 / 60.0),
    (33.0, 133.5),
    (36.0, 134.0 + 20.0 / 60.0),
    (36.0, 136.0),
    (36.0, 137.0 + 10.0 / 60.0),
    (36.0, 138.5),
    (36.0, 139.0 + 50.0 / 60.0),
    (40.0, 140.0 + 50.0 / 60.0),
    (44.0, 140.25),
    (44.0, 142.25),
    (44.0, 144.25),
    (26.0, 142.0),
    (26.0, 127.5),
    (26.0, 124.0),
    (26.0, 131.0),
    (20.0, 136.0),
    (26.0, 154.0),
];

/// Parses a CRS given as `EPSG:<code>` or as ESRI/OGC WKT.
///
/// # Errors
///
/// Returns [`GeoError::UnsupportedCrs`] if the CRS is neither geographic
/// nor Transverse Mercator.
pub fn parse_crs(definition: &str) -> Result<Crs, GeoError> {
    let trimmed = definition.trim();
    let upper = trimmed.to_ascii_uppercase();

    if let Some(code) = upper.strip_prefix("EPSG:") {
        let code: u32 = code
            .trim()
            .parse()
            .map_err(|_| GeoError::UnsupportedCrs(trimmed.to_string()))?;
        return from_epsg(code);
    }

    from_wkt(trimmed)
}

/// Builds a CRS from an EPSG code.
///
/// # Errors
///
/// Returns [`GeoError::UnsupportedCrs`] for codes outside the supported
/// geographic, UTM north, and Japan Plane Rectangular families.
pub fn from_epsg(code: u32) -> Result<Crs, GeoError> {
    let name = format!("EPSG:{code}");
    match code {
        // WGS84, JGD2000, JGD2011
        4326 | 4612 | 6668 => Ok(Crs::Geographic { name }),
        32601..=32660 => Ok(utm(name, code - 32600, WGS84_INVERSE_FLATTENING)),
        // JGD2011 / UTM zones 51N-55N
        6688..=6692 => Ok(utm(name, code - 6688 + 51, GRS80_INVERSE_FLATTENING)),
        // JGD2000 / Japan Plane Rectangular CS I-XIX
        2443..=2461 => Ok(japan_plane(name, code - 2443)),
        // JGD2011 / Japan Plane Rectangular CS I-XIX
        6669..=6687 => Ok(japan_plane(name, code - 6669)),
        _ => Err(GeoError::UnsupportedCrs(name)),
    }
}

fn utm(name: String, zone: u32, inverse_flattening: f64) -> Crs {
    Crs::TransverseMercator(TransverseMercator {
        name,
        latitude_of_origin: 0.0,
        central_meridian: f64::from(zone).mul_add(6.0, -183.0),
        scale_factor: 0.9996,
        false_easting: 500_000.0,
        false_northing: 0.0,
        semi_major_axis: WGS84_SEMI_MAJOR,
        inverse_flattening,
    })
}

fn japan_plane(name: String, zone_index: u32) -> Crs {
    let (lat, lon) = JAPAN_PLANE_ORIGINS[zone_index as usize];
    Crs::TransverseMercator(TransverseMercator {
        name,
        latitude_of_origin: lat,
        central_meridian: lon,
        scale_factor: 0.9999,
        false_easting: 0.0,
        false_northing: 0.0,
        semi_major_axis: GRS80_SEMI_MAJOR,
        inverse_flattening: GRS80_INVERSE_FLATTENING,
    })
}

/// Builds a CRS from the WKT found in a `.prj` sidecar.
///
/// # Errors
///
/// Returns [`GeoError::UnsupportedCrs`] if the WKT describes a projection
/// other than Transverse Mercator, or lacks a central meridian.
pub fn from_wkt(wkt: &str) -> Result<Crs, GeoError> {
    let trimmed = wkt.trim();
    let upper = trimmed.to_ascii_uppercase();
    let name = first_quoted(trimmed).unwrap_or_else(|| "unnamed".to_string());

    if upper.starts_with("GEOGCS") || upper.starts_with("GEOGCRS") {
        return Ok(Crs::Geographic { name });
    }

    let is_transverse_mercator = upper.contains("TRANSVERSE_MERCATOR")
        || upper.contains("TRANSVERSE MERCATOR")
        || upper.contains("GAUSS_KRUGER");
    if !upper.starts_with("PROJCS") || !is_transverse_mercator {
        return Err(GeoError::UnsupportedCrs(name));
    }

    let parameter_re = Regex::new(r#"(?i)PARAMETER\[\s*"([^"]+)"\s*,\s*([-+0-9.eE]+)\s*\]"#)
        .unwrap_or_else(|_| unreachable!());
    let parameter = |wanted: &str| {
        parameter_re
            .captures_iter(trimmed)
            .find(|caps| caps[1].eq_ignore_ascii_case(wanted))
            .and_then(|caps| caps[2].parse::<f64>().ok())
    };

    let spheroid_re =
        Regex::new(r#"(?i)(?:SPHEROID|ELLIPSOID)\[\s*"[^"]*"\s*,\s*([-+0-9.eE]+)\s*,\s*([-+0-9.eE]+)"#)
            .unwrap_or_else(|_| unreachable!());
    let (semi_major_axis, inverse_flattening) = spheroid_re
        .captures(trimmed)
        .and_then(|caps| Some((caps[1].parse().ok()?, caps[2].parse().ok()?)))
        .unwrap_or((GRS80_SEMI_MAJOR, GRS80_INVERSE_FLATTENING));

    let central_meridian = parameter("central_meridian")
        .or_else(|| parameter("longitude_of_origin"))
        .ok_or_else(|| GeoError::UnsupportedCrs(format!("{name}: no central meridian")))?;

    Ok(Crs::TransverseMercator(TransverseMercator {
        name,
        latitude_of_origin: parameter("latitude_of_origin").unwrap_or(0.0),
        central_meridian,
        scale_factor: parameter("scale_factor").unwrap_or(1.0),
        false_easting: parameter("false_easting").unwrap_or(0.0),
        false_northing: parameter("false_northing").unwrap_or(0.0),
        semi_major_axis,
        inverse_flattening,
    }))
}

fn first_quoted(s: &str) -> Option<String> {
    let start = s.find('"')? + 1;
    let len = s[start..].find('"')?;
    Some(s[start..start + len].to_string())
}

/// Meridional arc length from the equator to latitude `phi` (radians).
fn meridian_arc(a: f64, e2: f64, phi: f64) -> f64 {
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    a * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
        - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
        + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
        - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
}

/// Inverse Transverse Mercator: projected `(x, y)` metres to
/// `(lon, lat)` degrees.
#[must_use]
#[allow(clippy::suboptimal_flops, clippy::many_single_char_names)]
pub fn inverse_transverse_mercator(tm: &TransverseMercator, x: f64, y: f64) -> (f64, f64) {
    let a = tm.semi_major_axis;
    let f = 1.0 / tm.inverse_flattening;
    let e2 = f * (2.0 - f);
    let ep2 = e2 / (1.0 - e2);
    let k0 = tm.scale_factor;

    let m0 = meridian_arc(a, e2, tm.latitude_of_origin.to_radians());
    let m = m0 + (y - tm.false_northing) / k0;

    let e4 = e2 * e2;
    let e6 = e4 * e2;
    let mu = m / (a * (1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));
    let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());
    let j1 = 3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0;
    let j2 = 21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0;
    let j3 = 151.0 * e1.powi(3) / 96.0;
    let j4 = 1097.0 * e1.powi(4) / 512.0;
    let fp = mu
        + j1 * (2.0 * mu).sin()
        + j2 * (4.0 * mu).sin()
        + j3 * (6.0 * mu).sin()
        + j4 * (8.0 * mu).sin();

    let sin_fp = fp.sin();
    let c1 = ep2 * fp.cos().powi(2);
    let t1 = fp.tan().powi(2);
    let r1 = a * (1.0 - e2) / (1.0 - e2 * sin_fp * sin_fp).powf(1.5);
    let n1 = a / (1.0 - e2 * sin_fp * sin_fp).sqrt();
    let d = (x - tm.false_easting) / (n1 * k0);

    let lat = fp
        - (n1 * fp.tan() / r1)
            * (d * d / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d.powi(4) / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1)
                    * d.powi(6)
                    / 720.0);
    let lon = (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
        + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1) * d.powi(5)
            / 120.0)
        / fp.cos();

    (tm.central_meridian + lon.to_degrees(), lat.to_degrees())
}

/// Re-projects a geometry from `crs` to EPSG:4326.
#[must_use]
pub fn to_wgs84(crs: &Crs, geometry: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    match crs {
        Crs::Geographic { .. } => geometry.clone(),
        Crs::TransverseMercator(tm) => geometry.map_coords(|Coord { x, y }| {
            let (lon, lat) = inverse_transverse_mercator(tm, x, y);
            Coord { x: lon, y: lat }
        }),
    }
}
