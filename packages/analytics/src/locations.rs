//! House vs. flats fire-start location comparison.
//!
//! Turns the raw `(dwelling type, fire-start location, count)` rows into
//! per-building-group percentages. Each step is a pure function so it can
//! be checked in isolation:
//!
//! classify → retain compared → aggregate → normalize → pivot → drop noise
//! → unpivot
//!
//! Only houses and purpose-built flats are compared, and the
//! `Other Room/External` row is removed after percentages are computed, so
//! the remaining percentages of a building group may sum to less than 100.

use std::collections::{BTreeMap, BTreeSet};

use fire_risk_analytics_models::{
    LocationComparison, LocationCount, LocationPivot, LocationPivotRow, LocationShare,
};
use fire_risk_fire_models::{BuildingGroup, LocationGroup};

/// A raw count tagged with its building and location groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupedCount {
    /// Building group.
    pub building_group: BuildingGroup,
    /// Location group.
    pub location_group: LocationGroup,
    /// Incident count.
    pub number_of_incidents: u64,
}

/// An aggregated count with its share of the building group total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupedShare {
    /// Building group.
    pub building_group: BuildingGroup,
    /// Location group.
    pub location_group: LocationGroup,
    /// Incident count for this pair.
    pub number_of_incidents: u64,
    /// Incident count for the whole building group.
    pub group_total: u64,
    /// `100 * number_of_incidents / group_total`, 1 decimal.
    pub percentage: f64,
}

/// Rounds to 1 decimal, ties to even.
fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Tags each raw row with its building and location group.
#[must_use]
pub fn classify(rows: &[LocationCount]) -> Vec<GroupedCount> {
    rows.iter()
        .map(|row| GroupedCount {
            building_group: BuildingGroup::classify(&row.dwelling_type),
            location_group: LocationGroup::classify(&row.fire_start_location),
            number_of_incidents: row.number_of_incidents,
        })
        .collect()
}

/// Keeps only houses and purpose-built flats.
#[must_use]
pub fn retain_compared(rows: Vec<GroupedCount>) -> Vec<GroupedCount> {
    let before = rows.len();
    let kept: Vec<GroupedCount> = rows
        .into_iter()
        .filter(|row| row.building_group.is_compared())
        .collect();

    if kept.len() < before {
        log::debug!(
            "Dropped {} location rows outside the house/flats comparison",
            before - kept.len()
        );
    }

    kept
}

/// Sums counts per (building group, location group), ordered by building
/// group then location group.
#[must_use]
pub fn aggregate(rows: &[GroupedCount]) -> Vec<GroupedCount> {
    let mut totals: BTreeMap<(BuildingGroup, LocationGroup), u64> = BTreeMap::new();
    for row in rows {
        *totals
            .entry((row.building_group, row.location_group))
            .or_default() += row.number_of_incidents;
    }

    totals
        .into_iter()
        .map(|((building_group, location_group), number_of_incidents)| GroupedCount {
            building_group,
            location_group,
            number_of_incidents,
        })
        .collect()
}

/// Computes each row's percentage of its building group total.
///
/// A building group whose counts are all zero gets 0% everywhere.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn normalize(rows: &[GroupedCount]) -> Vec<GroupedShare> {
    let mut group_totals: BTreeMap<BuildingGroup, u64> = BTreeMap::new();
    for row in rows {
        *group_totals.entry(row.building_group).or_default() += row.number_of_incidents;
    }

    rows.iter()
        .map(|row| {
            let group_total = group_totals
                .get(&row.building_group)
                .copied()
                .unwrap_or_default();
            let percentage = if group_total == 0 {
                0.0
            } else {
                round1(100.0 * row.number_of_incidents as f64 / group_total as f64)
            };

            GroupedShare {
                building_group: row.building_group,
                location_group: row.location_group,
                number_of_incidents: row.number_of_incidents,
                group_total,
                percentage,
            }
        })
        .collect()
}

/// Pivots shares into a location-by-building-group table.
///
/// Rows and columns are the groups present in the input, in label order.
/// Missing combinations are 0.
#[must_use]
pub fn pivot(shares: &[GroupedShare]) -> LocationPivot {
    let building_groups: Vec<BuildingGroup> = shares
        .iter()
        .map(|s| s.building_group)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let location_groups: BTreeSet<LocationGroup> =
        shares.iter().map(|s| s.location_group).collect();

    let cells: BTreeMap<(LocationGroup, BuildingGroup), f64> = shares
        .iter()
        .map(|s| ((s.location_group, s.building_group), s.percentage))
        .collect();

    let rows = location_groups
        .into_iter()
        .map(|location_group| LocationPivotRow {
            location_group,
            percentages: building_groups
                .iter()
                .map(|b| cells.get(&(location_group, *b)).copied().unwrap_or(0.0))
                .collect(),
        })
        .collect();

    LocationPivot {
        building_groups,
        rows,
    }
}

/// Removes the `Other Room/External` row. No-op if it is absent.
#[must_use]
pub fn drop_noise(mut pivot: LocationPivot) -> LocationPivot {
    pivot.rows.retain(|row| !row.location_group.is_noise());
    pivot
}

/// Flattens a pivot into one row per (location, building) cell, column by
/// column.
#[must_use]
pub fn unpivot(pivot: &LocationPivot) -> Vec<LocationShare> {
    pivot
        .building_groups
        .iter()
        .enumerate()
        .flat_map(|(col, building_group)| {
            pivot.rows.iter().map(move |row| LocationShare {
                location_group: row.location_group,
                building_group: *building_group,
                percentage: row.percentages.get(col).copied().unwrap_or(0.0),
            })
        })
        .collect()
}

/// Runs the full comparison pipeline.
///
/// Returns empty outputs for empty input.
#[must_use]
pub fn compare_locations(rows: &[LocationCount]) -> LocationComparison {
    let grouped = retain_compared(classify(rows));
    let shares = normalize(&aggregate(&grouped));
    let pivot = drop_noise(pivot(&shares));
    let chart = unpivot(&pivot);

    LocationComparison { chart, pivot }
}
