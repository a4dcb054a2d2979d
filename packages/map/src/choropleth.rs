//! Population choropleth layer.
//!
//! Areas are converted to a `GeoJSON` `FeatureCollection` whose features
//! carry their precomputed fill color, so the page only has to apply the
//! style.

use festival_map_geography::crs;
use festival_map_geography_models::{AreaRecord, Crs};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use serde::Serialize;

use crate::color::ColorScale;

/// Fixed styling of the choropleth layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoroplethStyle {
    pub fill_opacity: f64,
    pub line_weight: f64,
    pub line_opacity: f64,
    pub line_color: &'static str,
    pub legend_name: &'static str,
}

impl Default for ChoroplethStyle {
    fn default() -> Self {
        Self {
            fill_opacity: 0.5,
            line_weight: 0.0,
            line_opacity: 0.0,
            line_color: "transparent",
            legend_name: "Log Population",
        }
    }
}

/// Areas shaded by `log_pop`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoroplethLayer {
    pub features: FeatureCollection,
    pub scale: ColorScale,
    pub style: ChoroplethStyle,
}

impl ChoroplethLayer {
    /// Builds the layer, re-projecting to EPSG:4326 when `source_crs` is
    /// known and is not already geographic.
    #[must_use]
    pub fn from_areas(areas: &[AreaRecord], source_crs: Option<&Crs>) -> Self {
        let scale = ColorScale::yl_gn(areas.iter().map(|a| a.log_pop));
        let reproject = source_crs.filter(|c| !c.is_geographic());
        if let Some(crs) = reproject {
            log::debug!("Re-projecting {} areas from {crs:?}", areas.len());
        }

        let features = areas
            .iter()
            .map(|area| {
                let geometry = reproject.map_or_else(
                    || area.geometry.clone(),
                    |crs| crs::to_wgs84(crs, &area.geometry),
                );

                let mut properties = JsonObject::new();
                properties.insert("KEY".to_string(), area.key.clone().into());
                properties.insert("log_pop".to_string(), serde_json::json!(area.log_pop));
                properties.insert(
                    "fillColor".to_string(),
                    scale.color_for(area.log_pop).into(),
                );

                Feature {
                    bbox: None,
                    geometry: Some(Geometry::new(geojson::Value::from(&geometry))),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        Self {
            features: FeatureCollection {
                bbox: None,
                features,
                foreign_members: None,
            },
            scale,
            style: ChoroplethStyle::default(),
        }
    }
}
