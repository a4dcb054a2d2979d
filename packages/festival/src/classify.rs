//! Festival classification and the "active festival" filter.

use festival_map_festival_models::{FestivalRecord, FestivalType};

/// Size codes at or above this value are excluded from the map.
pub const ACTIVE_SIZE_CODE_LIMIT: f64 = 3.0;

/// Maps a raw `FES0` category to its festival type.
///
/// Total over every input: missing → 7, `獅子舞` → 2, `キリコ` → 4,
/// `キリコ獅子舞` → 3, anything else → 5.
#[must_use]
pub fn classify_festival(category: Option<&str>) -> FestivalType {
    FestivalType::from_category(category)
}

/// Keeps records whose size code is present and below
/// [`ACTIVE_SIZE_CODE_LIMIT`].
#[must_use]
pub fn filter_active_festivals(records: &[FestivalRecord]) -> Vec<FestivalRecord> {
    let active: Vec<FestivalRecord> = records
        .iter()
        .filter(|r| r.size_code.is_some_and(|code| code < ACTIVE_SIZE_CODE_LIMIT))
        .cloned()
        .collect();

    log::info!(
        "{} of {} festival records are active (size code < {ACTIVE_SIZE_CODE_LIMIT})",
        active.len(),
        records.len()
    );
    active
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_size(size_code: Option<f64>) -> FestivalRecord {
        FestivalRecord {
            size_code,
            ..FestivalRecord::default()
        }
    }

    #[test]
    fn keeps_codes_below_three() {
        let records = vec![
            with_size(Some(0.0)),
            with_size(Some(1.0)),
            with_size(Some(2.0)),
            with_size(Some(2.9)),
        ];
        assert_eq!(filter_active_festivals(&records).len(), 4);
    }

    #[test]
    fn drops_three_and_above() {
        let records = vec![with_size(Some(3.0)), with_size(Some(4.0))];
        assert!(filter_active_festivals(&records).is_empty());
    }

    #[test]
    fn drops_missing_size_code() {
        assert!(filter_active_festivals(&[with_size(None)]).is_empty());
    }

    #[test]
    fn leaves_input_untouched() {
        let records = vec![with_size(Some(1.0)), with_size(Some(5.0))];
        let _ = filter_active_festivals(&records);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn lion_dance_size_one_is_active_type_two() {
        let record = FestivalRecord {
            category: Some("獅子舞".to_string()),
            size_code: Some(1.0),
            ..FestivalRecord::default()
        };
        let active = filter_active_festivals(std::slice::from_ref(&record));
        assert_eq!(active.len(), 1);
        assert_eq!(classify_festival(record.category.as_deref()).code(), 2);
    }

    #[test]
    fn missing_category_size_two_is_active_type_seven() {
        let record = with_size(Some(2.0));
        let active = filter_active_festivals(std::slice::from_ref(&record));
        assert_eq!(active.len(), 1);
        assert_eq!(classify_festival(None).code(), 7);
    }
}
