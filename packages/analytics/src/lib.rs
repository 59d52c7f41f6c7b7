#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dwelling fire risk analyses.
//!
//! Each public function runs one [`catalog::CatalogQuery`] through a
//! caching [`Gateway`] and decodes the result into typed rows. The
//! location comparison additionally runs the [`locations`] pipeline, and
//! [`views`] holds the ranking helpers the dashboard pages use.

pub mod catalog;
pub mod locations;
pub mod views;

#[cfg(test)]
mod test_support;

use fire_risk_analytics_models::{
    CauseHumanCost, LocationComparison, LocationCount, VehicleResponse,
};
use fire_risk_database::{DbError, Gateway, QueryExecutor};
use fire_risk_database_models::{Table, Value, columns};
use thiserror::Error;

use crate::catalog::CatalogQuery;

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Database operation failed.
    #[error(transparent)]
    Database(#[from] DbError),

    /// Data conversion error.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

impl AnalyticsError {
    /// Whether the underlying store or query could not be used at all.
    #[must_use]
    pub const fn is_data_unavailable(&self) -> bool {
        match self {
            Self::Database(e) => e.is_data_unavailable(),
            Self::Conversion { .. } => false,
        }
    }
}

/// Column lookup over one result table.
struct Columns<'a> {
    table: &'a Table,
}

impl<'a> Columns<'a> {
    const fn new(table: &'a Table) -> Self {
        Self { table }
    }

    fn index(&self, name: &str) -> Result<usize, AnalyticsError> {
        self.table
            .column_index(name)
            .ok_or_else(|| AnalyticsError::Conversion {
                message: format!("Missing column '{name}'"),
            })
    }

    fn cell(&self, row: usize, name: &str) -> Result<&'a Value, AnalyticsError> {
        self.index(name)?;
        self.table
            .get(row, name)
            .ok_or_else(|| AnalyticsError::Conversion {
                message: format!("Missing cell ({row}, '{name}')"),
            })
    }

    fn text(&self, row: usize, name: &str) -> Result<String, AnalyticsError> {
        let value = self.cell(row, name)?;
        value
            .as_str()
            .map(ToString::to_string)
            .ok_or_else(|| type_mismatch(row, name, "text", value))
    }

    fn count(&self, row: usize, name: &str) -> Result<u64, AnalyticsError> {
        let value = self.cell(row, name)?;
        value
            .as_i64()
            .and_then(|v| u64::try_from(v).ok())
            .ok_or_else(|| type_mismatch(row, name, "count", value))
    }

    /// Reads a float. SQL `NULL` (e.g. an average over no rows) reads as 0.
    fn float(&self, row: usize, name: &str) -> Result<f64, AnalyticsError> {
        let value = self.cell(row, name)?;
        if value.is_null() {
            return Ok(0.0);
        }
        value
            .as_f64()
            .ok_or_else(|| type_mismatch(row, name, "number", value))
    }
}

fn type_mismatch(row: usize, name: &str, expected: &str, actual: &Value) -> AnalyticsError {
    AnalyticsError::Conversion {
        message: format!("Expected {expected} in row {row}, column '{name}', found {actual}"),
    }
}

/// Decodes every row of `table` with `decode`.
fn decode_rows<T>(
    table: &Table,
    decode: impl Fn(&Columns<'_>, usize) -> Result<T, AnalyticsError>,
) -> Result<Vec<T>, AnalyticsError> {
    let cols = Columns::new(table);
    (0..table.len()).map(|row| decode(&cols, row)).collect()
}

/// Incident count and mean attending vehicles per dwelling type, highest
/// mean first.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the query fails or returns an unexpected
/// shape.
pub fn vehicles_by_dwelling<E: QueryExecutor>(
    gateway: &Gateway<E>,
) -> Result<Vec<VehicleResponse>, AnalyticsError> {
    let table = gateway.execute(CatalogQuery::VehiclesByDwelling.sql())?;

    decode_rows(&table, |cols, row| {
        Ok(VehicleResponse {
            dwelling_type: cols.text(row, columns::DWELLING_TYPE)?,
            number_of_incidents: cols.count(row, columns::NUMBER_OF_INCIDENTS)?,
            avg_vehicles: cols.float(row, columns::AVG_VEHICLES)?,
        })
    })
}

/// Raw incident counts per dwelling type and fire-start location.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the query fails or returns an unexpected
/// shape.
pub fn location_counts<E: QueryExecutor>(
    gateway: &Gateway<E>,
) -> Result<Vec<LocationCount>, AnalyticsError> {
    let table = gateway.execute(CatalogQuery::FireStartLocations.sql())?;

    decode_rows(&table, |cols, row| {
        Ok(LocationCount {
            dwelling_type: cols.text(row, columns::DWELLING_TYPE)?,
            fire_start_location: cols.text(row, columns::FIRE_START_LOCATION)?,
            number_of_incidents: cols.count(row, columns::NUMBER_OF_INCIDENTS)?,
        })
    })
}

/// House vs. purpose-built flats fire-start location comparison.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the underlying query fails or returns an
/// unexpected shape.
pub fn location_comparison<E: QueryExecutor>(
    gateway: &Gateway<E>,
) -> Result<LocationComparison, AnalyticsError> {
    let counts = location_counts(gateway)?;
    Ok(locations::compare_locations(&counts))
}

/// Casualty, spread and rescue figures per ignition cause with more than
/// [`catalog::MIN_CAUSE_INCIDENTS`] qualifying incidents.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the query fails or returns an unexpected
/// shape.
pub fn human_cost_by_cause<E: QueryExecutor>(
    gateway: &Gateway<E>,
) -> Result<Vec<CauseHumanCost>, AnalyticsError> {
    let table = gateway.execute(CatalogQuery::HumanCostByCause.sql())?;

    decode_rows(&table, |cols, row| {
        Ok(CauseHumanCost {
            cause_of_fire: cols.text(row, columns::CAUSE_OF_FIRE)?,
            number_of_incidents: cols.count(row, columns::NUMBER_OF_INCIDENTS)?,
            avg_spread_rank: cols.float(row, columns::AVG_SPREAD_RANK)?,
            total_incidents_with_casualties: cols
                .count(row, columns::TOTAL_INCIDENTS_WITH_CASUALTIES)?,
            pct_chance_of_casualty: cols.float(row, columns::PCT_CHANCE_OF_CASUALTY)?,
            avg_rescues_per_incident: cols.float(row, columns::AVG_RESCUES_PER_INCIDENT)?,
        })
    })
}

#[cfg(test)]
mod tests {
    use fire_risk_analytics_models::HumanCostMetric;
    use fire_risk_fire_models::{BuildingGroup, LocationGroup};

    use super::*;
    use crate::test_support::{MemoryStore, empty_store, seeded_store};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn vehicles_are_ordered_by_mean_descending() {
        let gateway = Gateway::new(seeded_store());
        let rows = vehicles_by_dwelling(&gateway).unwrap();

        let summary: Vec<(&str, u64, f64)> = rows
            .iter()
            .map(|r| (r.dwelling_type.as_str(), r.number_of_incidents, r.avg_vehicles))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("Purpose Built Flats/Maisonettes - 10 or more storeys", 2, 5.0),
                ("Purpose Built Flats/Maisonettes - Up to 3 storeys", 2, 3.5),
                ("House - single occupancy", 4, 1.75),
            ]
        );
    }

    #[test]
    fn location_counts_skip_unknown_and_null() {
        let gateway = Gateway::new(seeded_store());
        let rows = location_counts(&gateway).unwrap();

        assert!(rows.iter().all(|r| r.fire_start_location != "Not known"));
        let total: u64 = rows.iter().map(|r| r.number_of_incidents).sum();
        assert_eq!(total, 207);

        let converted = rows
            .iter()
            .find(|r| r.dwelling_type == "Converted Flat/Maisonette")
            .unwrap();
        assert_eq!(converted.fire_start_location, "Kitchen");
        assert_eq!(converted.number_of_incidents, 7);
    }

    #[test]
    fn location_comparison_end_to_end() {
        let gateway = Gateway::new(seeded_store());
        let comparison = location_comparison(&gateway).unwrap();
        let pivot = &comparison.pivot;

        assert_eq!(
            pivot.building_groups,
            vec![BuildingGroup::House, BuildingGroup::PurposeBuiltFlats]
        );
        assert!(close(
            pivot.get(LocationGroup::Kitchen, BuildingGroup::House).unwrap(),
            66.7
        ));
        assert!(close(
            pivot
                .get(LocationGroup::LivingBedroom, BuildingGroup::House)
                .unwrap(),
            33.3
        ));
        assert!(close(
            pivot
                .get(LocationGroup::Kitchen, BuildingGroup::PurposeBuiltFlats)
                .unwrap(),
            60.0
        ));
        assert!(close(
            pivot
                .get(
                    LocationGroup::CommunalEscapeRoutes,
                    BuildingGroup::PurposeBuiltFlats
                )
                .unwrap(),
            40.0
        ));
        assert!(!pivot.location_groups().contains(&LocationGroup::OtherRoomExternal));
        assert_eq!(comparison.chart.len(), 6);
    }

    #[test]
    fn human_cost_keeps_only_causes_over_threshold() {
        let gateway = Gateway::new(seeded_store());
        let rows = human_cost_by_cause(&gateway).unwrap();

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.cause_of_fire, "Chip/ fat pan fires");
        assert_eq!(row.number_of_incidents, 101);
        assert_eq!(row.total_incidents_with_casualties, 26);
        assert!(close(row.pct_chance_of_casualty, 25.74));
        assert!(close(row.avg_spread_rank, 2.0));
        assert!(close(row.avg_rescues_per_incident, 0.1));
        assert!(close(HumanCostMetric::Rescues.value(row), 0.1));
    }

    #[test]
    fn repeated_calls_hit_the_cache() {
        let gateway = Gateway::new(seeded_store());

        vehicles_by_dwelling(&gateway).unwrap();
        vehicles_by_dwelling(&gateway).unwrap();
        location_comparison(&gateway).unwrap();
        location_counts(&gateway).unwrap();

        assert_eq!(gateway.executor().executions(), 2);
    }

    #[test]
    fn empty_store_yields_empty_results() {
        let gateway = Gateway::new(empty_store());

        assert!(vehicles_by_dwelling(&gateway).unwrap().is_empty());
        assert!(human_cost_by_cause(&gateway).unwrap().is_empty());
        let comparison = location_comparison(&gateway).unwrap();
        assert!(comparison.pivot.is_empty());
        assert!(comparison.chart.is_empty());
    }

    #[test]
    fn missing_tables_are_data_unavailable() {
        let gateway = Gateway::new(MemoryStore::blank());
        let err = vehicles_by_dwelling(&gateway).unwrap_err();
        assert!(err.is_data_unavailable());
        assert!(gateway.cache().is_empty());
    }

    #[test]
    fn unexpected_shape_is_a_conversion_error() {
        let table = Table::from_rows(
            [columns::DWELLING_TYPE],
            vec![vec![Value::Int(3)]],
        )
        .unwrap();
        let cols = Columns::new(&table);

        assert!(matches!(
            cols.text(0, columns::DWELLING_TYPE),
            Err(AnalyticsError::Conversion { .. })
        ));
        assert!(matches!(
            cols.count(0, columns::NUMBER_OF_INCIDENTS),
            Err(AnalyticsError::Conversion { .. })
        ));
        assert_eq!(cols.count(0, columns::DWELLING_TYPE).unwrap(), 3);
        assert!(!AnalyticsError::Conversion {
            message: String::new()
        }
        .is_data_unavailable());
    }
}
