//! Data pipeline behind the dashboard: load, join, classify, filter and
//! render.

use festival_map_festival::classify::filter_active_festivals;
use festival_map_festival::filter::{FilterOutcome, FilterState, NO_TOWNS_WARNING, TownSelection};
use festival_map_festival::load::load_festivals;
use festival_map_festival_models::{FestivalRecord, MonthRange};
use festival_map_geography::boundaries::load_areas;
use festival_map_geography::join::join_area_population;
use festival_map_geography::population::{PopulationOptions, load_population};
use festival_map_geography_models::{AreaRecord, Crs};
use festival_map_map::{MapOptions, build_map};
use festival_map_server_models::MapQueryParams;

use crate::ServerError;
use crate::config::AppConfig;

/// Everything the map needs, loaded from the input files.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Areas joined with their population.
    pub areas: Vec<AreaRecord>,
    /// CRS of the area geometries, if known.
    pub crs: Option<Crs>,
    /// Festivals that passed the size-code filter.
    pub festivals: Vec<FestivalRecord>,
}

impl Dataset {
    /// Distinct town values, in first-appearance order.
    #[must_use]
    pub fn town_options(&self) -> Vec<Option<String>> {
        festival_map_festival::filter::town_options(&self.festivals)
    }
}

/// Reads every input file named in `config`.
///
/// # Errors
///
/// Returns [`ServerError`] if any file is missing or malformed.
pub fn load_dataset(config: &AppConfig) -> Result<Dataset, ServerError> {
    let layer = load_areas(
        &config.areas.path,
        &config.areas.key_column,
        config.areas.crs.as_deref(),
    )?;

    let options = PopulationOptions::new(
        &config.population.encoding,
        config.population.skip_rows,
        &config.population.key_column,
    )?;
    let population = load_population(&config.population.path, &options)?;
    let areas = join_area_population(&layer.shapes, &population, &config.population.columns);

    let festivals = filter_active_festivals(&load_festivals(&config.festivals.path)?);
    log::info!(
        "Dataset ready: {} areas, {} active festivals",
        areas.len(),
        festivals.len()
    );

    Ok(Dataset {
        areas,
        crs: layer.crs,
        festivals,
    })
}

/// Builds the sidebar state from query parameters.
///
/// `towns` holds comma-separated indices into [`Dataset::town_options`].
/// Without it every town is selected; unparseable or out-of-range indices
/// are ignored. Missing months fall back to the default range.
///
/// # Errors
///
/// Returns [`ServerError::InvalidQuery`] if the month range is invalid.
pub fn filter_state_from_params(
    dataset: &Dataset,
    params: &MapQueryParams,
) -> Result<FilterState, ServerError> {
    let options = dataset.town_options();
    let towns = params.towns.as_deref().map_or_else(
        || options.iter().cloned().collect::<TownSelection>(),
        |s| {
            s.split(',')
                .filter_map(|i| i.trim().parse::<usize>().ok())
                .filter_map(|i| options.get(i).cloned())
                .collect()
        },
    );

    let defaults = MonthRange::default();
    let months = MonthRange::new(
        params.start.unwrap_or(defaults.start()),
        params.stop.unwrap_or(defaults.stop()),
    )
    .map_err(|e| ServerError::InvalidQuery(e.to_string()))?;

    Ok(FilterState { towns, months })
}

/// Result of running the pipeline for one filter state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// The rendered map page.
    Map(String),
    /// Rendering stopped; show this warning instead.
    Halted(&'static str),
}

/// Filters the festivals and renders the map page.
///
/// The map is centered on all festivals in the dataset, so moving the
/// filters never pans the view.
///
/// # Errors
///
/// Returns [`ServerError::Map`] if the page cannot be rendered.
pub fn render_map(
    dataset: &Dataset,
    filter: &FilterState,
    options: &MapOptions,
) -> Result<PipelineOutcome, ServerError> {
    let filtered = match filter.apply(&dataset.festivals) {
        FilterOutcome::Selected(records) => records,
        FilterOutcome::NoTownsSelected => return Ok(PipelineOutcome::Halted(NO_TOWNS_WARNING)),
    };

    let mut map = build_map(&dataset.festivals, options);
    map.add_choropleth(&dataset.areas, dataset.crs.as_ref());
    let markers = map.add_markers(&filtered);
    log::debug!(
        "Rendering map: {markers} markers for {} filtered festivals",
        filtered.len()
    );

    Ok(PipelineOutcome::Map(map.render_html()?))
}
