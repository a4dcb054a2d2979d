//! Circle markers for festival records.

use festival_map_festival_models::{FestivalRecord, MarkerColor};
use serde::Serialize;

pub const MARKER_FILL_OPACITY: f64 = 0.7;
pub const MARKER_WEIGHT: f64 = 1.0;

/// Marker radius in pixels for a size code.
#[must_use]
pub fn marker_radius(size_code: f64) -> f64 {
    size_code.mul_add(3.0, 2.0)
}

/// A circle marker, stroke and fill in the same color.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleMarker {
    pub lat: f64,
    pub lng: f64,
    pub radius: f64,
    pub color: MarkerColor,
    /// Festival type code of the record.
    #[serde(rename = "type")]
    pub festival_type: u8,
    pub fill_opacity: f64,
    pub weight: f64,
    /// District name, empty when missing.
    pub tooltip: String,
    /// Video link, empty when missing.
    pub popup: String,
}

impl CircleMarker {
    /// Builds the marker for `record`, or `None` if it lacks a coordinate
    /// or a size code.
    #[must_use]
    pub fn from_record(record: &FestivalRecord) -> Option<Self> {
        let (lat, lng) = record.coordinates()?;
        let size_code = record.size_code?;

        Some(Self {
            lat,
            lng,
            radius: marker_radius(size_code),
            color: record.marker_color(),
            festival_type: record.festival_type().code(),
            fill_opacity: MARKER_FILL_OPACITY,
            weight: MARKER_WEIGHT,
            tooltip: record.district.clone().unwrap_or_default(),
            popup: record.video_url.clone().unwrap_or_default(),
        })
    }
}
