#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map rendering for the festival dashboard.
//!
//! Builds a [`MapDocument`] centered on the festivals, overlays a
//! population choropleth and one circle marker per festival, and renders
//! the whole thing as a standalone Leaflet HTML page.

pub mod choropleth;
pub mod color;
pub mod document;
pub mod markers;
mod template;

pub use document::{LatLng, MapDocument, MapOptions, build_map, mean_center};

use thiserror::Error;

/// Errors that can occur while rendering a map.
#[derive(Debug, Error)]
pub enum MapError {
    /// Serializing the map payload failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
