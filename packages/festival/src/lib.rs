#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Festival spreadsheet loading, classification, and sidebar filtering.
//!
//! Reads the festival workbook into [`FestivalRecord`]s, keeps only the
//! active festivals, and narrows them by the town and month selectors.
//! Every operation returns a new subset; the loaded records are never
//! mutated.
//!
//! [`FestivalRecord`]: festival_map_festival_models::FestivalRecord

pub mod classify;
pub mod filter;
pub mod load;

use thiserror::Error;

/// Errors that can occur while loading festival data.
#[derive(Debug, Error)]
pub enum FestivalError {
    /// The workbook could not be opened or read.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// The workbook has no worksheet to read from.
    #[error("Workbook {path} contains no worksheets")]
    NoWorksheet {
        /// Path of the workbook.
        path: String,
    },

    /// A required column is absent from the header row.
    #[error("Missing required column '{column}'")]
    MissingColumn {
        /// Name of the absent column.
        column: String,
    },

    /// Data conversion error.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}
