//! Sidebar filters: town multi-select and month range.
//!
//! Both filters are pure: they read a slice of records and return a new
//! subset, so applying them twice, or in either order, yields the same
//! result.

use std::collections::BTreeSet;

use festival_map_festival_models::{FestivalRecord, MonthRange};

/// Warning shown instead of the map when no town is selected.
pub const NO_TOWNS_WARNING: &str = "市町村が選択されていません。";

/// Distinct values of the town selector column, in first-appearance order.
///
/// A missing category is a selectable value of its own and appears once.
#[must_use]
pub fn town_options(records: &[FestivalRecord]) -> Vec<Option<String>> {
    let mut seen = BTreeSet::new();
    records
        .iter()
        .filter(|r| seen.insert(r.category.clone()))
        .map(|r| r.category.clone())
        .collect()
}

/// Set of town values chosen in the multi-select.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TownSelection {
    towns: BTreeSet<Option<String>>,
}

impl TownSelection {
    /// Selects every option, the multi-select's initial state.
    #[must_use]
    pub fn all(records: &[FestivalRecord]) -> Self {
        town_options(records).into_iter().collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.towns.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.towns.len()
    }

    #[must_use]
    pub fn contains(&self, town: Option<&str>) -> bool {
        self.towns.contains(&town.map(str::to_string))
    }
}

impl FromIterator<Option<String>> for TownSelection {
    fn from_iter<T: IntoIterator<Item = Option<String>>>(iter: T) -> Self {
        Self {
            towns: iter.into_iter().collect(),
        }
    }
}

/// Result of a filter step that can halt the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome<T> {
    /// Filtering succeeded.
    Selected(T),
    /// The town selection was empty; nothing downstream should render.
    NoTownsSelected,
}

impl<T> FilterOutcome<T> {
    /// Applies `f` to the selected value, keeping the halt state.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FilterOutcome<U> {
        match self {
            Self::Selected(value) => FilterOutcome::Selected(f(value)),
            Self::NoTownsSelected => FilterOutcome::NoTownsSelected,
        }
    }
}

/// Keeps records whose category is in `selected`.
///
/// An empty selection halts instead of returning an empty subset.
#[must_use]
pub fn filter_by_town(
    records: &[FestivalRecord],
    selected: &TownSelection,
) -> FilterOutcome<Vec<FestivalRecord>> {
    if selected.is_empty() {
        log::debug!("No towns selected, halting");
        return FilterOutcome::NoTownsSelected;
    }

    FilterOutcome::Selected(
        records
            .iter()
            .filter(|r| selected.contains(r.category.as_deref()))
            .cloned()
            .collect(),
    )
}

/// Keeps records whose month is present and inside `range`.
#[must_use]
pub fn filter_by_month(records: &[FestivalRecord], range: MonthRange) -> Vec<FestivalRecord> {
    records
        .iter()
        .filter(|r| r.month.is_some_and(|m| range.contains(m)))
        .cloned()
        .collect()
}

/// Current state of both sidebar controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub towns: TownSelection,
    pub months: MonthRange,
}

impl FilterState {
    /// Initial state: every town, April through October.
    #[must_use]
    pub fn defaults(records: &[FestivalRecord]) -> Self {
        Self {
            towns: TownSelection::all(records),
            months: MonthRange::default(),
        }
    }

    /// Applies the town filter and then the month filter.
    #[must_use]
    pub fn apply(&self, records: &[FestivalRecord]) -> FilterOutcome<Vec<FestivalRecord>> {
        filter_by_town(records, &self.towns).map(|towns| filter_by_month(&towns, self.months))
    }
}
