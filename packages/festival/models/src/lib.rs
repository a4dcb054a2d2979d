#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Festival record types and the fixed category lookup tables.
//!
//! The spreadsheet's `FES0` column names what a festival carries (lion
//! dance troupes, kiriko lantern floats, or both). The integer type code
//! and the marker color both depend on it and are exact-match lookups
//! defined here.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// `FES0` value for lion dance (shishimai) festivals.
pub const LION_DANCE: &str = "獅子舞";
/// `FES0` value for kiriko lantern festivals.
pub const KIRIKO: &str = "キリコ";
/// `FES0` value for festivals with both kiriko and lion dance.
pub const KIRIKO_LION_DANCE: &str = "キリコ獅子舞";
/// `FES0` value for flag-pole (wakubata) festivals.
pub const FLAG_POLE: &str = "枠旗";

/// Lowest selectable month. `0` means "unknown or no festival".
pub const MONTH_MIN: u8 = 0;
/// Highest selectable month.
pub const MONTH_MAX: u8 = 12;

/// Integer festival type derived from the `FES0` category.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum FestivalType {
    /// Lion dance only
    LionDance = 2,
    /// Kiriko together with lion dance
    KirikoLionDance = 3,
    /// Kiriko only
    Kiriko = 4,
    /// Any other recorded category
    Other = 5,
    /// No category recorded
    Unknown = 7,
}

impl FestivalType {
    /// Classifies a raw `FES0` value. Exact string match, no trimming or
    /// case folding.
    #[must_use]
    pub fn from_category(category: Option<&str>) -> Self {
        match category {
            None => Self::Unknown,
            Some(LION_DANCE) => Self::LionDance,
            Some(KIRIKO) => Self::Kiriko,
            Some(KIRIKO_LION_DANCE) => Self::KirikoLionDance,
            Some(_) => Self::Other,
        }
    }

    /// Returns the numeric type code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::LionDance,
            Self::KirikoLionDance,
            Self::Kiriko,
            Self::Other,
            Self::Unknown,
        ]
    }
}

/// Marker color keyed by the raw `FES0` value.
///
/// Note this is not derived from [`FestivalType`]: flag-pole festivals get
/// their own color even though they classify as [`FestivalType::Other`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MarkerColor {
    Red,
    Blue,
    Green,
    Yellow,
    Gray,
}

impl MarkerColor {
    /// Looks up the marker color for a raw `FES0` value.
    #[must_use]
    pub fn from_category(category: Option<&str>) -> Self {
        match category {
            Some(LION_DANCE) => Self::Red,
            Some(KIRIKO) => Self::Blue,
            Some(KIRIKO_LION_DANCE) => Self::Green,
            Some(FLAG_POLE) => Self::Yellow,
            _ => Self::Gray,
        }
    }
}

/// One row of the festival spreadsheet.
///
/// Every field is optional because the source sheet has blank cells; blank
/// text cells are stored as `None`, never as empty strings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FestivalRecord {
    /// `FES0`: festival category. Also used as the "town" selector column.
    pub category: Option<String>,
    /// `FESname`: festival name.
    pub name: Option<String>,
    /// `district`: district the festival belongs to.
    pub district: Option<String>,
    /// `lat`
    pub lat: Option<f64>,
    /// `lon`
    pub lon: Option<f64>,
    /// `month`: 0-12, 0 meaning unknown or none.
    pub month: Option<i64>,
    /// `fes`: severity/size code. Drives marker radius.
    pub size_code: Option<f64>,
    /// `Youtube`: video link.
    pub video_url: Option<String>,
}

impl FestivalRecord {
    /// Derived `type` attribute.
    #[must_use]
    pub fn festival_type(&self) -> FestivalType {
        FestivalType::from_category(self.category.as_deref())
    }

    #[must_use]
    pub fn marker_color(&self) -> MarkerColor {
        MarkerColor::from_category(self.category.as_deref())
    }

    /// Returns `(lat, lon)` when both are present.
    #[must_use]
    pub const fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Inclusive month range selected in the sidebar slider.
///
/// Deserialized ranges go through [`MonthRange::new`], so invalid bounds
/// are rejected there too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawMonthRange")]
pub struct MonthRange {
    start: u8,
    stop: u8,
}

impl MonthRange {
    /// Creates a range, validating both bounds against
    /// [`MONTH_MIN`]..=[`MONTH_MAX`].
    ///
    /// # Errors
    ///
    /// Returns an error if either bound is out of range or `start > stop`.
    pub const fn new(start: u8, stop: u8) -> Result<Self, InvalidMonthRangeError> {
        if start > MONTH_MAX || stop > MONTH_MAX || start > stop {
            return Err(InvalidMonthRangeError { start, stop });
        }
        Ok(Self { start, stop })
    }

    #[must_use]
    pub const fn start(self) -> u8 {
        self.start
    }

    #[must_use]
    pub const fn stop(self) -> u8 {
        self.stop
    }

    /// Whether `month` falls inside the range (both ends inclusive).
    #[must_use]
    pub const fn contains(self, month: i64) -> bool {
        month >= self.start as i64 && month <= self.stop as i64
    }
}

#[derive(Deserialize)]
struct RawMonthRange {
    start: u8,
    stop: u8,
}

impl TryFrom<RawMonthRange> for MonthRange {
    type Error = InvalidMonthRangeError;

    fn try_from(raw: RawMonthRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.stop)
    }
}

impl Default for MonthRange {
    /// April through October.
    fn default() -> Self {
        Self { start: 4, stop: 10 }
    }
}

/// Error returned when a [`MonthRange`] is built from invalid bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidMonthRangeError {
    pub start: u8,
    pub stop: u8,
}

impl std::fmt::Display for InvalidMonthRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid month range {}-{}: expected {MONTH_MIN} <= start <= stop <= {MONTH_MAX}",
            self.start, self.stop
        )
    }
}

impl std::error::Error for InvalidMonthRangeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_lion_dance() {
        assert_eq!(FestivalType::from_category(Some("獅子舞")).code(), 2);
    }

    #[test]
    fn classifies_kiriko_and_combined() {
        assert_eq!(FestivalType::from_category(Some("キリコ")).code(), 4);
        assert_eq!(FestivalType::from_category(Some("キリコ獅子舞")).code(), 3);
    }

    #[test]
    fn classifies_missing_as_seven() {
        assert_eq!(FestivalType::from_category(None).code(), 7);
    }

    #[test]
    fn classifies_everything_else_as_five() {
        for raw in ["枠旗", "", " 獅子舞", "キリコ ", "lion dance"] {
            assert_eq!(
                FestivalType::from_category(Some(raw)),
                FestivalType::Other,
                "{raw:?}"
            );
        }
    }

    #[test]
    fn type_codes_are_the_fixed_set() {
        let codes: Vec<u8> = FestivalType::all().iter().map(|t| t.code()).collect();
        assert_eq!(codes, vec![2, 3, 4, 5, 7]);
    }

    #[test]
    fn marker_colors_follow_category() {
        assert_eq!(MarkerColor::from_category(Some(LION_DANCE)), MarkerColor::Red);
        assert_eq!(MarkerColor::from_category(Some(KIRIKO)), MarkerColor::Blue);
        assert_eq!(
            MarkerColor::from_category(Some(KIRIKO_LION_DANCE)),
            MarkerColor::Green
        );
        assert_eq!(MarkerColor::from_category(Some(FLAG_POLE)), MarkerColor::Yellow);
        assert_eq!(MarkerColor::from_category(Some("太鼓")), MarkerColor::Gray);
        assert_eq!(MarkerColor::from_category(None), MarkerColor::Gray);
    }

    #[test]
    fn marker_color_displays_as_css_name() {
        assert_eq!(MarkerColor::Yellow.to_string(), "yellow");
    }

    #[test]
    fn flag_pole_is_other_type_but_yellow() {
        let record = FestivalRecord {
            category: Some(FLAG_POLE.to_string()),
            ..FestivalRecord::default()
        };
        assert_eq!(record.festival_type(), FestivalType::Other);
        assert_eq!(record.marker_color(), MarkerColor::Yellow);
    }

    #[test]
    fn coordinates_require_both_axes() {
        let record = FestivalRecord {
            lat: Some(37.3),
            ..FestivalRecord::default()
        };
        assert!(record.coordinates().is_none());
    }

    #[test]
    fn month_range_default_is_april_to_october() {
        let range = MonthRange::default();
        assert_eq!((range.start(), range.stop()), (4, 10));
    }

    #[test]
    fn month_range_is_inclusive() {
        let range = MonthRange::new(4, 10).unwrap();
        assert!(range.contains(4));
        assert!(range.contains(10));
        assert!(!range.contains(3));
        assert!(!range.contains(11));
    }

    #[test]
    fn month_range_rejects_bad_bounds() {
        assert!(MonthRange::new(0, 13).is_err());
        assert!(MonthRange::new(8, 7).is_err());
        assert!(MonthRange::new(0, 0).is_ok());
    }

    #[test]
    fn deserialized_month_range_is_validated() {
        let range: MonthRange = serde_json::from_str(r#"{"start":3,"stop":9}"#).unwrap();
        assert_eq!((range.start(), range.stop()), (3, 9));

        assert!(serde_json::from_str::<MonthRange>(r#"{"start":9,"stop":3}"#).is_err());
        assert!(serde_json::from_str::<MonthRange>(r#"{"start":0,"stop":13}"#).is_err());
    }
}
