#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the festival map server.
//!
//! These types are serialized to JSON for the dashboard. They are kept
//! separate from the festival records so the page contract can evolve
//! independently of the spreadsheet layout.

use festival_map_festival_models::{MONTH_MAX, MONTH_MIN, MonthRange};
use serde::{Deserialize, Serialize};

/// Label shown for festivals whose category cell is empty.
pub const UNKNOWN_TOWN_LABEL: &str = "(不明)";

/// Query parameters for the map endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapQueryParams {
    /// Comma-separated indices into [`ApiOptions::towns`]. Absent selects
    /// every town; present but empty selects none.
    pub towns: Option<String>,
    /// First month of the range (inclusive).
    pub start: Option<u8>,
    /// Last month of the range (inclusive).
    pub stop: Option<u8>,
}

/// Query parameters for the video endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoQueryParams {
    /// Link pasted into the video field.
    #[serde(default)]
    pub url: String,
}

/// One entry of the town multi-select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTownOption {
    /// Position in the option list, used in map queries.
    pub index: usize,
    /// Text shown to the user.
    pub label: String,
    /// Underlying category value; `None` for a missing category.
    pub value: Option<String>,
}

impl ApiTownOption {
    #[must_use]
    pub fn new(index: usize, value: Option<String>) -> Self {
        Self {
            index,
            label: value
                .clone()
                .unwrap_or_else(|| UNKNOWN_TOWN_LABEL.to_string()),
            value,
        }
    }
}

/// Sidebar control configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOptions {
    /// Town multi-select options, all selected initially.
    pub towns: Vec<ApiTownOption>,
    /// Lower bound of the month slider.
    pub month_min: u8,
    /// Upper bound of the month slider.
    pub month_max: u8,
    /// Initial slider start.
    pub default_start: u8,
    /// Initial slider stop.
    pub default_stop: u8,
}

impl ApiOptions {
    /// Builds the options from the distinct town values, in order.
    #[must_use]
    pub fn new(towns: Vec<Option<String>>) -> Self {
        let defaults = MonthRange::default();
        Self {
            towns: towns
                .into_iter()
                .enumerate()
                .map(|(index, value)| ApiTownOption::new(index, value))
                .collect(),
            month_min: MONTH_MIN,
            month_max: MONTH_MAX,
            default_start: defaults.start(),
            default_stop: defaults.stop(),
        }
    }
}

/// How the page should play a pasted link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ApiVideo {
    /// A YouTube video, played in an embedded iframe.
    #[serde(rename_all = "camelCase")]
    Youtube { id: String, embed_url: String },
    /// A direct media file, played in a `<video>` element.
    File { src: String },
    /// Something that is not recognizably playable; shown as a link.
    Link { url: String },
    /// Nothing was entered.
    None,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}
