//! Population table loader.
//!
//! Census tables from e-Stat ship as Shift_JIS CSV with a title line above
//! the header, so the loader decodes the raw bytes with a configurable
//! encoding and skips a configurable number of leading lines before
//! handing the text to the CSV parser.

use std::path::Path;

use encoding_rs::Encoding;
use festival_map_geography_models::PopulationRow;

use crate::GeoError;

/// How to read a population table.
#[derive(Debug, Clone, Copy)]
pub struct PopulationOptions<'a> {
    /// Text encoding of the file.
    pub encoding: &'static Encoding,
    /// Lines to drop before the header row.
    pub skip_rows: usize,
    /// Column holding the join key.
    pub key_column: &'a str,
}

impl<'a> PopulationOptions<'a> {
    /// Resolves an encoding label such as `"shift-jis"` or `"utf-8"`.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Conversion`] if the label is unknown.
    pub fn new(
        encoding_label: &str,
        skip_rows: usize,
        key_column: &'a str,
    ) -> Result<Self, GeoError> {
        let encoding =
            Encoding::for_label(encoding_label.trim().as_bytes()).ok_or_else(|| {
                GeoError::Conversion {
                    message: format!("Unknown text encoding '{encoding_label}'"),
                }
            })?;
        Ok(Self {
            encoding,
            skip_rows,
            key_column,
        })
    }
}

/// Loads the population table at `path`.
///
/// # Errors
///
/// Returns [`GeoError`] if the file cannot be read, is not valid in the
/// configured encoding, is not valid CSV, or lacks the key column.
pub fn load_population(
    path: &Path,
    options: &PopulationOptions<'_>,
) -> Result<Vec<PopulationRow>, GeoError> {
    let bytes = std::fs::read(path).map_err(|source| GeoError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let rows = parse_population(&bytes, options)?;
    log::info!(
        "Loaded {} population rows from {} ({})",
        rows.len(),
        path.display(),
        options.encoding.name()
    );
    Ok(rows)
}

/// Parses population CSV bytes.
///
/// # Errors
///
/// See [`load_population`].
pub fn parse_population(
    bytes: &[u8],
    options: &PopulationOptions<'_>,
) -> Result<Vec<PopulationRow>, GeoError> {
    let (text, _, had_errors) = options.encoding.decode(bytes);
    if had_errors {
        return Err(GeoError::Conversion {
            message: format!(
                "Population table is not valid {}",
                options.encoding.name()
            ),
        });
    }

    let body = skip_lines(&text, options.skip_rows);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    let key_idx = headers
        .iter()
        .position(|h| h == options.key_column)
        .ok_or_else(|| GeoError::Conversion {
            message: format!(
                "Population table has no '{}' column (found: {})",
                options.key_column,
                headers.join(", ")
            ),
        })?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let Some(key) = record.get(key_idx).map(str::trim).filter(|k| !k.is_empty()) else {
            log::debug!("Skipping population row without a key");
            continue;
        };

        let values = headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != key_idx)
            .filter_map(|(idx, name)| {
                record
                    .get(idx)
                    .map(|v| (name.clone(), v.trim().to_owned()))
            })
            .collect();

        rows.push(PopulationRow {
            key: key.to_owned(),
            values,
        });
    }

    Ok(rows)
}

/// Returns `text` without its first `n` lines.
fn skip_lines(text: &str, n: usize) -> &str {
    let mut rest = text;
    for _ in 0..n {
        match rest.find('\n') {
            Some(idx) => rest = &rest[idx + 1..],
            None => return "",
        }
    }
    rest
}
