#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Area boundary and population data management.
//!
//! Reads area polygons from a shapefile and population counts from a
//! locale-encoded CSV, joins them on a shared string key, and re-projects
//! the polygons to longitude/latitude for display.

pub mod boundaries;
pub mod crs;
pub mod join;
pub mod population;

use thiserror::Error;

/// Errors that can occur during geography operations.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Reading an input file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// File being read.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The shapefile or its dBase table is malformed.
    #[error("Shapefile error: {0}")]
    Shapefile(#[from] shapefile::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The coordinate reference system is not supported.
    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),

    /// Data conversion error.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}
