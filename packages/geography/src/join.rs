//! Area/population join and the derived `log_pop` metric.

use std::collections::BTreeMap;

use festival_map_geography_models::{AreaRecord, AreaShape, PopulationColumns, PopulationRow};

/// `log10(pop_a + pop_b + 1)`.
///
/// Monotonically increasing in `pop_a + pop_b`. A negative sum below `-1`
/// yields NaN; that is a data error upstream and is not guarded here.
#[must_use]
pub fn derive_log_population(pop_a: f64, pop_b: f64) -> f64 {
    (pop_a + pop_b + 1.0).log10()
}

/// Inner-joins shapes with population rows on their key.
///
/// Shapes without a matching population row are dropped. A key that
/// appears several times in the population table produces one record per
/// match. Attribute names present on both sides get `_x` (shape) and `_y`
/// (population) suffixes.
#[must_use]
pub fn join_area_population(
    shapes: &[AreaShape],
    population: &[PopulationRow],
    columns: &PopulationColumns,
) -> Vec<AreaRecord> {
    let mut by_key: BTreeMap<&str, Vec<&PopulationRow>> = BTreeMap::new();
    for row in population {
        by_key.entry(row.key.as_str()).or_default().push(row);
    }

    let mut records = Vec::new();
    let mut unmatched = 0usize;

    for shape in shapes {
        let Some(matches) = by_key.get(shape.key.as_str()) else {
            unmatched += 1;
            continue;
        };

        for row in matches {
            let attributes = merge_attributes(&shape.attributes, &row.values);
            let mut record = AreaRecord {
                key: shape.key.clone(),
                attributes,
                geometry: shape.geometry.clone(),
                log_pop: f64::NAN,
            };
            record.log_pop =
                derive_log_population(record.number(&columns.a), record.number(&columns.b));
            records.push(record);
        }
    }

    log::info!(
        "Joined {} area records ({unmatched} shapes without population data)",
        records.len()
    );
    records
}

fn merge_attributes(
    shape: &BTreeMap<String, String>,
    population: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut merged = BTreeMap::new();
    for (name, value) in shape {
        let name = if population.contains_key(name) {
            format!("{name}_x")
        } else {
            name.clone()
        };
        merged.insert(name, value.clone());
    }
    for (name, value) in population {
        let name = if shape.contains_key(name) {
            format!("{name}_y")
        } else {
            name.clone()
        };
        merged.insert(name, value.clone());
    }
    merged
}
