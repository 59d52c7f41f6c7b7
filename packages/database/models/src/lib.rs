#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Query result types and star-schema names for the dwelling fire store.
//!
//! A [`Table`] is the materialized result of one query: an ordered list of
//! named columns and the rows returned for them. Tables are immutable once
//! built and are shared between cache readers behind an `Arc`.
//!
//! Table and column names live in [`tables`] and [`columns`] so that the
//! query catalog and the code reading its results cannot drift apart.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Table names in the dwelling fire star schema.
pub mod tables {
    /// One row per dwelling fire incident.
    pub const FACT_DWELLING_FIRE: &str = "fact_dwelling_fire";
    /// Dwelling type dimension.
    pub const DIM_DWELLING: &str = "dim_dwelling";
    /// Fire-start location dimension.
    pub const DIM_LOCATION: &str = "dim_location";
    /// Ignition cause dimension.
    pub const DIM_IGNITION: &str = "dim_ignition";
    /// Fire spread dimension.
    pub const DIM_SPREAD: &str = "dim_spread";
    /// Attending vehicle count dimension.
    pub const DIM_VEHICLES: &str = "dim_vehicles";
}

/// Column names, both from the star schema and produced by queries and
/// transforms.
pub mod columns {
    /// Surrogate identifier of an incident in the fact table.
    pub const FACT_DWELLING_FIRE_ID: &str = "fact_dwelling_fire_id";
    /// Foreign key into the dwelling dimension.
    pub const DWELLING_KEY: &str = "dwelling_key";
    /// Foreign key into the location dimension.
    pub const LOCATION_KEY: &str = "location_key";
    /// Foreign key into the ignition dimension.
    pub const IGNITION_KEY: &str = "ignition_key";
    /// Foreign key into the spread dimension.
    pub const SPREAD_KEY: &str = "spread_key";
    /// Foreign key into the vehicles dimension.
    pub const VEHICLES_KEY: &str = "vehicles_key";
    /// 0/1 flag: the incident had a fatality or casualty.
    pub const FATALITY_CASUALTY_FLAG: &str = "fatality_casualty_flag";
    /// Number of people rescued.
    pub const RESCUES: &str = "rescues";

    /// Dwelling type label.
    pub const DWELLING_TYPE: &str = "dwelling_type";
    /// Fire-start location label.
    pub const FIRE_START_LOCATION: &str = "fire_start_location";
    /// Ignition cause label.
    pub const CAUSE_OF_FIRE: &str = "cause_of_fire";
    /// Numeric rank of how far the fire spread.
    pub const SPREAD_RANK: &str = "spread_rank";
    /// Midpoint of the bucketed vehicle count.
    pub const VEHICLES_MIDPOINT: &str = "vehicles_midpoint";

    /// Incident count per group.
    pub const NUMBER_OF_INCIDENTS: &str = "number_of_incidents";
    /// Mean attending vehicles.
    pub const AVG_VEHICLES: &str = "avg_vehicles";
    /// Mean spread rank.
    pub const AVG_SPREAD_RANK: &str = "avg_spread_rank";
    /// Count of incidents with a fatality or casualty.
    pub const TOTAL_INCIDENTS_WITH_CASUALTIES: &str = "total_incidents_with_casualties";
    /// Percentage of incidents with a fatality or casualty.
    pub const PCT_CHANCE_OF_CASUALTY: &str = "pct_chance_of_casualty";
    /// Mean rescues per incident.
    pub const AVG_RESCUES_PER_INCIDENT: &str = "avg_rescues_per_incident";

    /// Coarse building group.
    pub const BUILDING_GROUP: &str = "building_group";
    /// Coarse location group.
    pub const LOCATION_GROUP: &str = "location_group";
    /// Within-building-group percentage.
    pub const PERCENTAGE: &str = "percentage";
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL `NULL`.
    Null,
    /// Boolean.
    Bool(bool),
    /// Any integer type that fits in an `i64`.
    Int(i64),
    /// Any floating-point or decimal type.
    Float(f64),
    /// Text.
    Text(String),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the value as an integer.
    ///
    /// Floats are accepted only when they hold an integral value.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            _ => None,
        }
    }

    /// Returns the value as a float, widening integers.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a string slice.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Error returned when a row does not have one value per column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeError {
    /// Index of the offending row.
    pub row: usize,
    /// Number of columns in the table.
    pub expected: usize,
    /// Number of values in the row.
    pub actual: usize,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {} has {} values but the table has {} columns",
            self.row, self.actual, self.expected
        )
    }
}

impl std::error::Error for ShapeError {}

/// An ordered, immutable query result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Creates a table with the given columns and no rows.
    #[must_use]
    pub fn empty<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Creates a table from column names and rows.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError`] if any row's length differs from the number
    /// of columns.
    pub fn from_rows<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: Vec<Vec<Value>>,
    ) -> Result<Self, ShapeError> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();

        if let Some((row, values)) = rows
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != columns.len())
        {
            return Err(ShapeError {
                row,
                expected: columns.len(),
                actual: values.len(),
            });
        }

        Ok(Self { columns, rows })
    }

    /// Column names in result order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in result order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the query returned no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the named column.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Value at `row` in the named column.
    #[must_use]
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }
}

impl fmt::Display for Table {
    /// Renders an aligned plain-text grid with a leading row index.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            writeln!(f, "Empty table")?;
            return write!(f, "Columns: [{}]", self.columns.join(", "));
        }

        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect();

        let index_width = (self.rows.len() - 1).to_string().len();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                cells
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:index_width$}", "")?;
        for (name, width) in self.columns.iter().zip(&widths) {
            write!(f, "  {name:>width$}")?;
        }

        for (i, row) in cells.iter().enumerate() {
            writeln!(f)?;
            write!(f, "{i:<index_width$}")?;
            for (cell, width) in row.iter().zip(&widths) {
                write!(f, "  {cell:>width$}")?;
            }
        }

        Ok(())
    }
}
