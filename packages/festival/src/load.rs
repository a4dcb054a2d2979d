//! Festival workbook loader.
//!
//! Reads the first worksheet of the festival spreadsheet. The first row is
//! the header; columns are located by name, so their order in the sheet
//! does not matter.

use std::path::Path;

use calamine::{Data, Reader as _, open_workbook_auto};
use festival_map_festival_models::FestivalRecord;

use crate::FestivalError;

/// Category column, also used as the town selector.
pub const COL_CATEGORY: &str = "FES0";
/// Severity/size code column.
pub const COL_SIZE_CODE: &str = "fes";
pub const COL_MONTH: &str = "month";
pub const COL_LAT: &str = "lat";
pub const COL_LON: &str = "lon";
pub const COL_DISTRICT: &str = "district";
pub const COL_VIDEO: &str = "Youtube";
/// Festival name. Optional; older sheets do not have it.
pub const COL_NAME: &str = "FESname";

/// Columns that must be present in the header row.
pub const REQUIRED_COLUMNS: &[&str] = &[
    COL_CATEGORY,
    COL_SIZE_CODE,
    COL_MONTH,
    COL_LAT,
    COL_LON,
    COL_DISTRICT,
    COL_VIDEO,
];

/// Loads every festival row from the first worksheet of `path`.
///
/// # Errors
///
/// Returns [`FestivalError`] if the workbook cannot be opened, has no
/// worksheets, or lacks a required column.
pub fn load_festivals(path: &Path) -> Result<Vec<FestivalRecord>, FestivalError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| FestivalError::NoWorksheet {
            path: path.display().to_string(),
        })??;

    let records = records_from_rows(range.rows())?;
    log::info!(
        "Loaded {} festival records from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

/// Column positions resolved from the header row.
struct ColumnIndex {
    category: usize,
    size_code: usize,
    month: usize,
    lat: usize,
    lon: usize,
    district: usize,
    video: usize,
    name: Option<usize>,
}

impl ColumnIndex {
    fn from_header(header: &[Data]) -> Result<Self, FestivalError> {
        let names: Vec<String> = header
            .iter()
            .map(|cell| text(cell).unwrap_or_default())
            .collect();
        let find = |column: &str| names.iter().position(|n| n == column);
        let require = |column: &str| {
            find(column).ok_or_else(|| FestivalError::MissingColumn {
                column: column.to_string(),
            })
        };

        Ok(Self {
            category: require(COL_CATEGORY)?,
            size_code: require(COL_SIZE_CODE)?,
            month: require(COL_MONTH)?,
            lat: require(COL_LAT)?,
            lon: require(COL_LON)?,
            district: require(COL_DISTRICT)?,
            video: require(COL_VIDEO)?,
            name: find(COL_NAME),
        })
    }
}

/// Converts worksheet rows (header first) into festival records.
///
/// Rows where every cell is empty are skipped. Short rows are padded with
/// empty cells.
///
/// # Errors
///
/// Returns [`FestivalError`] if the header row is missing or lacks a
/// required column.
pub fn records_from_rows<'a, I>(rows: I) -> Result<Vec<FestivalRecord>, FestivalError>
where
    I: IntoIterator<Item = &'a [Data]>,
{
    let mut rows = rows.into_iter();
    let header = rows.next().ok_or_else(|| FestivalError::Conversion {
        message: "Festival sheet has no header row".to_string(),
    })?;
    let columns = ColumnIndex::from_header(header)?;

    let records = rows
        .filter(|row| row.iter().any(|cell| !matches!(cell, Data::Empty)))
        .map(|row| {
            let cell = |idx: usize| row.get(idx).unwrap_or(&Data::Empty);
            FestivalRecord {
                category: verbatim_text(cell(columns.category)),
                name: columns.name.and_then(|idx| text(cell(idx))),
                district: text(cell(columns.district)),
                lat: number(cell(columns.lat)),
                lon: number(cell(columns.lon)),
                month: whole_number(cell(columns.month)),
                size_code: number(cell(columns.size_code)),
                video_url: text(cell(columns.video)),
            }
        })
        .collect();

    Ok(records)
}

/// Reads a category cell. The text is kept as written, surrounding spaces
/// included, since categories are matched exactly. Only empty and error
/// cells are `None`.
fn verbatim_text(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        other => text(other),
    }
}

/// Reads a cell as trimmed text. Blank cells and error cells are `None`.
fn text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Reads a cell as a number. Text cells are parsed; anything else that is
/// not numeric is `None`.
#[allow(clippy::cast_precision_loss)]
fn number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(i) => Some(*i as f64),
        Data::Float(f) if f.is_finite() => Some(*f),
        Data::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Reads a cell as an integer. Fractional values are `None`.
#[allow(clippy::cast_possible_truncation)]
fn whole_number(cell: &Data) -> Option<i64> {
    let value = number(cell)?;
    if value.fract() == 0.0 {
        Some(value as i64)
    } else {
        log::debug!("Ignoring fractional month value {value}");
        None
    }
}

#[cfg(test)]
mod tests {
    use festival_map_festival_models::{FestivalType, MarkerColor};

    use super::*;

    fn header() -> Vec<Data> {
        ["FES0", "FESname", "district", "lat", "lon", "month", "fes", "Youtube"]
            .iter()
            .map(|s| Data::String((*s).to_string()))
            .collect()
    }

    fn load(rows: &[Vec<Data>]) -> Result<Vec<FestivalRecord>, FestivalError> {
        records_from_rows(rows.iter().map(Vec::as_slice))
    }

    #[test]
    fn reads_a_full_row() {
        let rows = vec![
            header(),
            vec![
                Data::String("獅子舞".to_string()),
                Data::String("春祭り".to_string()),
                Data::String("宇出津".to_string()),
                Data::Float(37.3),
                Data::Float(137.1),
                Data::Int(5),
                Data::Float(1.0),
                Data::String("https://youtu.be/abcdefghijk".to_string()),
            ],
        ];

        let records = load(&rows).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.category.as_deref(), Some("獅子舞"));
        assert_eq!(record.name.as_deref(), Some("春祭り"));
        assert_eq!(record.district.as_deref(), Some("宇出津"));
        assert_eq!(record.coordinates(), Some((37.3, 137.1)));
        assert_eq!(record.month, Some(5));
        assert_eq!(record.size_code, Some(1.0));
        assert_eq!(
            record.video_url.as_deref(),
            Some("https://youtu.be/abcdefghijk")
        );
    }

    #[test]
    fn blank_cells_become_none() {
        let rows = vec![
            header(),
            vec![
                Data::Empty,
                Data::Empty,
                Data::String("   ".to_string()),
                Data::Empty,
                Data::Float(137.0),
                Data::Float(0.0),
                Data::Int(2),
            ],
        ];

        let record = &load(&rows).unwrap()[0];
        assert!(record.category.is_none());
        assert!(record.district.is_none());
        assert!(record.lat.is_none());
        assert_eq!(record.month, Some(0));
        // Short row: the video column is padded as empty.
        assert!(record.video_url.is_none());
    }

    #[test]
    fn category_text_is_kept_verbatim() {
        let row = |category: &str| {
            vec![
                Data::String(category.to_string()),
                Data::Empty,
                Data::String(" 宇出津 ".to_string()),
                Data::Float(37.3),
                Data::Float(137.1),
                Data::Int(7),
                Data::Float(1.0),
            ]
        };
        let rows = vec![header(), row(" 獅子舞"), row("   "), row("獅子舞"), row("")];

        let records = load(&rows).unwrap();
        assert_eq!(records[0].category.as_deref(), Some(" 獅子舞"));
        assert_eq!(records[0].festival_type(), FestivalType::Other);
        assert_eq!(records[0].marker_color(), MarkerColor::Gray);
        assert_eq!(records[0].district.as_deref(), Some("宇出津"));

        assert_eq!(records[1].category.as_deref(), Some("   "));
        assert_eq!(records[1].festival_type(), FestivalType::Other);

        assert_eq!(records[2].festival_type(), FestivalType::LionDance);
        assert_eq!(records[3].category, None);
        assert_eq!(records[3].festival_type(), FestivalType::Unknown);
    }

    #[test]
    fn skips_fully_empty_rows() {
        let rows = vec![header(), vec![Data::Empty; 8]];
        assert!(load(&rows).unwrap().is_empty());
    }

    #[test]
    fn name_column_is_optional() {
        let mut head = header();
        head.remove(1);
        let rows = vec![head, vec![Data::String("キリコ".to_string())]];
        let records = load(&rows).unwrap();
        assert!(records[0].name.is_none());
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let mut head = header();
        head.retain(|cell| !matches!(cell, Data::String(s) if s == "Youtube"));
        let err = load(&[head]).unwrap_err();
        assert!(
            matches!(err, FestivalError::MissingColumn { ref column } if column == "Youtube"),
            "{err}"
        );
    }

    #[test]
    fn numeric_text_cells_are_parsed() {
        let rows = vec![
            header(),
            vec![
                Data::String("キリコ".to_string()),
                Data::Empty,
                Data::Int(12),
                Data::String(" 37.25 ".to_string()),
                Data::String("n/a".to_string()),
                Data::Float(7.5),
            ],
        ];

        let record = &load(&rows).unwrap()[0];
        assert_eq!(record.district.as_deref(), Some("12"));
        assert_eq!(record.lat, Some(37.25));
        assert!(record.lon.is_none());
        assert!(record.month.is_none());
    }
}
