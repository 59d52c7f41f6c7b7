#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types for the dwelling fire risk analyses.
//!
//! Field names match the column names produced by the query catalog and
//! the location transform, so every serialized row, pivot included,
//! carries the same snake_case keys as the underlying result columns.

use fire_risk_fire_models::{BuildingGroup, LocationGroup};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Average attending vehicles for one dwelling type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleResponse {
    /// Raw dwelling type label.
    pub dwelling_type: String,
    /// Incidents with a known vehicle count.
    pub number_of_incidents: u64,
    /// Mean vehicle midpoint, rounded to 2 decimals.
    pub avg_vehicles: f64,
}

/// Incident count for one (dwelling type, fire-start location) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationCount {
    /// Raw dwelling type label.
    pub dwelling_type: String,
    /// Raw fire-start location label.
    pub fire_start_location: String,
    /// Number of incidents.
    pub number_of_incidents: u64,
}

/// Share of a building group's incidents that started in one location
/// group (long form, one row per chart bar).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationShare {
    /// Location group.
    pub location_group: LocationGroup,
    /// Building group.
    pub building_group: BuildingGroup,
    /// Percentage of the building group's incidents, 1 decimal.
    pub percentage: f64,
}

/// One location row of the pivoted percentage table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationPivotRow {
    /// Location group indexing this row.
    pub location_group: LocationGroup,
    /// Percentages aligned with [`LocationPivot::building_groups`].
    pub percentages: Vec<f64>,
}

/// Location-by-building-group percentage table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationPivot {
    /// Column order.
    pub building_groups: Vec<BuildingGroup>,
    /// Rows in location group order.
    pub rows: Vec<LocationPivotRow>,
}

impl LocationPivot {
    /// Percentage for one cell, if both the row and the column exist.
    #[must_use]
    pub fn get(&self, location: LocationGroup, building: BuildingGroup) -> Option<f64> {
        let col = self.building_groups.iter().position(|b| *b == building)?;
        self.rows
            .iter()
            .find(|r| r.location_group == location)
            .and_then(|r| r.percentages.get(col).copied())
    }

    /// Location groups in row order.
    #[must_use]
    pub fn location_groups(&self) -> Vec<LocationGroup> {
        self.rows.iter().map(|r| r.location_group).collect()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Both outputs of the house vs. flats comparison.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationComparison {
    /// Long-form rows for charting.
    pub chart: Vec<LocationShare>,
    /// Pivoted percentage table.
    pub pivot: LocationPivot,
}

/// Casualty, spread and rescue figures for one ignition cause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CauseHumanCost {
    /// Ignition cause label.
    pub cause_of_fire: String,
    /// Qualifying incidents (always more than 100).
    pub number_of_incidents: u64,
    /// Mean spread rank, 2 decimals.
    pub avg_spread_rank: f64,
    /// Incidents with a fatality or casualty.
    pub total_incidents_with_casualties: u64,
    /// Percentage of incidents with a fatality or casualty, 2 decimals.
    pub pct_chance_of_casualty: f64,
    /// Mean rescues per incident, 2 decimals.
    pub avg_rescues_per_incident: f64,
}

/// Metric used to rank causes on the human vs. property risk page.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum HumanCostMetric {
    /// Percentage of incidents with a casualty.
    CasualtyChance,
    /// Mean fire spread rank.
    Spread,
    /// Mean rescues per incident.
    Rescues,
}

impl HumanCostMetric {
    /// Reads this metric from a row.
    #[must_use]
    pub const fn value(self, row: &CauseHumanCost) -> f64 {
        match self {
            Self::CasualtyChance => row.pct_chance_of_casualty,
            Self::Spread => row.avg_spread_rank,
            Self::Rescues => row.avg_rescues_per_incident,
        }
    }

    /// Number of rows the dashboard shows when ranking by this metric.
    #[must_use]
    pub const fn default_limit(self) -> usize {
        match self {
            Self::CasualtyChance => 10,
            Self::Spread | Self::Rescues => 5,
        }
    }
}
