//! The map document: view, layers, and HTML rendering.

use festival_map_festival_models::FestivalRecord;
use festival_map_geography_models::{AreaRecord, Crs};
use serde::{Deserialize, Serialize};

use crate::MapError;
use crate::choropleth::ChoroplethLayer;
use crate::markers::CircleMarker;
use crate::template::MAP_TEMPLATE;

/// Rotates the choropleth legend to vertical and pins it to the right
/// edge, vertically centered.
pub const LEGEND_CSS: &str = r"<style>
.legend {
    transform: rotate(90deg);
    transform-origin: top right;
    top: 50% !important;
    right: 30px !important;
    background-color: white;
    opacity: 0.8;
    padding: 10px;
    border-radius: 5px;
}
</style>";

/// A geographic coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Fixed view settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct MapOptions {
    pub zoom: u8,
    /// Used when no festival has coordinates.
    pub fallback_center: LatLng,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            zoom: 9,
            fallback_center: LatLng {
                lat: 37.3,
                lng: 137.0,
            },
        }
    }
}

/// Mean latitude and longitude of `records`.
///
/// Each axis is averaged over the records that have it, so a record with
/// only a latitude still counts toward the latitude mean. `None` when
/// either axis has no values.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean_center(records: &[FestivalRecord]) -> Option<LatLng> {
    fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
        let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
        (count > 0).then(|| sum / count as f64)
    }

    Some(LatLng {
        lat: mean(records.iter().filter_map(|r| r.lat))?,
        lng: mean(records.iter().filter_map(|r| r.lon))?,
    })
}

/// Creates the map view centered on the mean coordinate of `festivals`.
///
/// Pass the full festival set here, not the filtered one: the center does
/// not move when the sidebar filters change.
#[must_use]
pub fn build_map(festivals: &[FestivalRecord], options: &MapOptions) -> MapDocument {
    let center = mean_center(festivals).unwrap_or_else(|| {
        log::warn!("No festival coordinates; centering on fallback");
        options.fallback_center
    });
    log::debug!("Map center: {}, {}", center.lat, center.lng);
    MapDocument::new(center, options.zoom)
}

/// An interactive map: base tiles, an optional choropleth, markers, and
/// extra `<style>` blocks for the document head.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDocument {
    pub center: LatLng,
    pub zoom: u8,
    pub choropleth: Option<ChoroplethLayer>,
    pub markers: Vec<CircleMarker>,
    #[serde(skip)]
    head_styles: Vec<String>,
}

impl MapDocument {
    #[must_use]
    pub const fn new(center: LatLng, zoom: u8) -> Self {
        Self {
            center,
            zoom,
            choropleth: None,
            markers: Vec::new(),
            head_styles: Vec::new(),
        }
    }

    /// Overlays the population choropleth and injects the legend CSS.
    pub fn add_choropleth(&mut self, areas: &[AreaRecord], source_crs: Option<&Crs>) {
        self.choropleth = Some(ChoroplethLayer::from_areas(areas, source_crs));
        self.add_head_style(LEGEND_CSS);
    }

    /// Adds a raw `<style>` block to the document head. Adding the same
    /// block twice has no effect.
    pub fn add_head_style(&mut self, css: &str) {
        if !self.head_styles.iter().any(|s| s == css) {
            self.head_styles.push(css.to_string());
        }
    }

    #[must_use]
    pub fn head_styles(&self) -> &[String] {
        &self.head_styles
    }

    /// Adds one marker per record with both coordinates. Records missing a
    /// coordinate are skipped silently. Returns the number of markers
    /// added.
    pub fn add_markers(&mut self, records: &[FestivalRecord]) -> usize {
        let before = self.markers.len();
        self.markers
            .extend(records.iter().filter_map(CircleMarker::from_record));
        let added = self.markers.len() - before;
        log::debug!("Added {added} of {} festival markers", records.len());
        added
    }

    /// Renders a standalone Leaflet HTML page.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Json`] if the map data cannot be serialized.
    pub fn render_html(&self) -> Result<String, MapError> {
        let data = serde_json::to_string(self)?;
        Ok(MAP_TEMPLATE
            .replace("{{HEAD_STYLES}}", &self.head_styles.join("\n"))
            .replace("{{MAP_DATA}}", &escape_script(&data)))
    }
}

/// Keeps embedded JSON inert inside the surrounding `<script>`.
///
/// `<` only ever appears inside JSON strings, where `\u003c` decodes to the
/// same character, so no `</script>` or `<!--` sequence reaches the parser.
fn escape_script(json: &str) -> String {
    json.replace('<', "\\u003c")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn festival(lat: Option<f64>, lon: Option<f64>) -> FestivalRecord {
        FestivalRecord {
            category: Some("キリコ".to_string()),
            lat,
            lon,
            size_code: Some(1.0),
            ..FestivalRecord::default()
        }
    }

    #[test]
    fn center_is_per_axis_mean() {
        let records = vec![
            festival(Some(37.0), Some(136.8)),
            festival(Some(37.4), Some(137.2)),
            festival(Some(37.2), None),
        ];
        let center = mean_center(&records).unwrap();
        assert!((center.lat - 37.2).abs() < 1e-12);
        assert!((center.lng - 137.0).abs() < 1e-12);
    }

    #[test]
    fn center_without_coordinates_uses_fallback() {
        let map = build_map(&[festival(None, None)], &MapOptions::default());
        assert_eq!(map.center, MapOptions::default().fallback_center);
        assert_eq!(map.zoom, 9);
    }

    #[test]
    fn markers_skip_missing_coordinates() {
        let records = vec![
            festival(Some(37.0), Some(136.8)),
            festival(None, Some(137.2)),
            festival(Some(37.2), None),
        ];
        let mut map = build_map(&records, &MapOptions::default());
        assert_eq!(map.add_markers(&records), 1);
        assert_eq!(map.markers.len(), 1);
    }

    #[test]
    fn legend_css_is_injected_once() {
        let mut map = MapDocument::new(LatLng { lat: 0.0, lng: 0.0 }, 9);
        map.add_choropleth(&[], None);
        map.add_choropleth(&[], None);
        assert_eq!(map.head_styles(), &[LEGEND_CSS.to_string()]);

        let html = map.render_html().unwrap();
        assert_eq!(html.matches("transform: rotate(90deg)").count(), 1);
    }

    #[test]
    fn rendered_html_embeds_markers_and_view() {
        let records = vec![FestivalRecord {
            district: Some("</script><b>".to_string()),
            ..festival(Some(37.0), Some(136.8))
        }];
        let mut map = build_map(&records, &MapOptions::default());
        map.add_markers(&records);

        let html = map.render_html().unwrap();
        assert!(html.contains("leaflet"));
        assert!(html.contains("\"zoom\":9"));
        assert!(html.contains("\"color\":\"blue\""));
        assert!(!html.contains("</script><b>"));
        assert!(!html.contains("{{MAP_DATA}}"));
        assert!(!html.contains("{{HEAD_STYLES}}"));
    }

    #[test]
    fn every_angle_bracket_in_data_is_escaped() {
        let records = vec![
            FestivalRecord {
                district: Some("<!--<script>".to_string()),
                ..festival(Some(37.0), Some(136.8))
            },
            FestivalRecord {
                district: Some("</script><b>".to_string()),
                ..festival(Some(37.1), Some(136.9))
            },
        ];
        let mut map = build_map(&records, &MapOptions::default());
        map.add_markers(&records);

        let html = map.render_html().unwrap();
        assert!(!html.contains("<!--<script"));
        assert!(!html.contains("</script><b>"));
        assert!(html.contains("\\u003c!--\\u003cscript>"));
        assert!(html.contains("\\u003c/script>\\u003cb>"));
    }
}
