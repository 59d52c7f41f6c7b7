//! Fixed analytical queries against the dwelling fire star schema.
//!
//! Every query is parameterless and read-only, so its text alone
//! identifies its result for a given store snapshot. The text is built
//! once from the shared table and column names.

use std::sync::LazyLock;

use fire_risk_database_models::{columns, tables};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Minimum number of qualifying incidents a cause needs to be reported.
/// Causes with fewer incidents are too noisy to compare.
pub const MIN_CAUSE_INCIDENTS: u32 = 100;

/// Label the source data uses for an unrecorded location or cause.
pub const NOT_KNOWN: &str = "Not known";

/// A query in the catalog.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CatalogQuery {
    /// Incident count and mean attending vehicles per dwelling type.
    VehiclesByDwelling,
    /// Incident count per dwelling type and fire-start location.
    FireStartLocations,
    /// Casualty, spread and rescue figures per ignition cause.
    HumanCostByCause,
}

impl CatalogQuery {
    /// Every catalog entry.
    pub const ALL: &[Self] = &[
        Self::VehiclesByDwelling,
        Self::FireStartLocations,
        Self::HumanCostByCause,
    ];

    /// Short human-readable description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::VehiclesByDwelling => {
                "Incidents and average attending vehicles per dwelling type, highest first"
            }
            Self::FireStartLocations => "Incidents per dwelling type and fire-start location",
            Self::HumanCostByCause => {
                "Spread, casualty chance and rescues per ignition cause (more than 100 incidents)"
            }
        }
    }

    /// The SQL text. Also the cache key for this query.
    #[must_use]
    pub fn sql(self) -> &'static str {
        match self {
            Self::VehiclesByDwelling => &VEHICLES_BY_DWELLING_SQL,
            Self::FireStartLocations => &FIRE_START_LOCATIONS_SQL,
            Self::HumanCostByCause => &HUMAN_COST_BY_CAUSE_SQL,
        }
    }

    /// Output columns in result order.
    #[must_use]
    pub const fn output_columns(self) -> &'static [&'static str] {
        match self {
            Self::VehiclesByDwelling => &[
                columns::DWELLING_TYPE,
                columns::NUMBER_OF_INCIDENTS,
                columns::AVG_VEHICLES,
            ],
            Self::FireStartLocations => &[
                columns::DWELLING_TYPE,
                columns::FIRE_START_LOCATION,
                columns::NUMBER_OF_INCIDENTS,
            ],
            Self::HumanCostByCause => &[
                columns::CAUSE_OF_FIRE,
                columns::NUMBER_OF_INCIDENTS,
                columns::AVG_SPREAD_RANK,
                columns::TOTAL_INCIDENTS_WITH_CASUALTIES,
                columns::PCT_CHANCE_OF_CASUALTY,
                columns::AVG_RESCUES_PER_INCIDENT,
            ],
        }
    }
}

static VEHICLES_BY_DWELLING_SQL: LazyLock<String> = LazyLock::new(|| {
    let fact = tables::FACT_DWELLING_FIRE;
    let dim_dwelling = tables::DIM_DWELLING;
    let dim_vehicles = tables::DIM_VEHICLES;
    let id = columns::FACT_DWELLING_FIRE_ID;
    let dwelling_key = columns::DWELLING_KEY;
    let vehicles_key = columns::VEHICLES_KEY;
    let dwelling_type = columns::DWELLING_TYPE;
    let midpoint = columns::VEHICLES_MIDPOINT;
    let count = columns::NUMBER_OF_INCIDENTS;
    let avg_vehicles = columns::AVG_VEHICLES;

    format!(
        "SELECT
    d.{dwelling_type},
    COUNT(f.{id}) AS {count},
    ROUND(AVG(dv.{midpoint}), 2) AS {avg_vehicles}
FROM {fact} f
JOIN {dim_dwelling} d ON f.{dwelling_key} = d.{dwelling_key}
JOIN {dim_vehicles} dv ON f.{vehicles_key} = dv.{vehicles_key}
WHERE dv.{midpoint} IS NOT NULL
    AND d.{dwelling_type} IS NOT NULL
GROUP BY d.{dwelling_type}
ORDER BY {avg_vehicles} DESC, d.{dwelling_type}"
    )
});

static FIRE_START_LOCATIONS_SQL: LazyLock<String> = LazyLock::new(|| {
    let fact = tables::FACT_DWELLING_FIRE;
    let dim_dwelling = tables::DIM_DWELLING;
    let dim_location = tables::DIM_LOCATION;
    let id = columns::FACT_DWELLING_FIRE_ID;
    let dwelling_key = columns::DWELLING_KEY;
    let location_key = columns::LOCATION_KEY;
    let dwelling_type = columns::DWELLING_TYPE;
    let location = columns::FIRE_START_LOCATION;
    let count = columns::NUMBER_OF_INCIDENTS;

    format!(
        "SELECT
    d.{dwelling_type},
    dl.{location},
    COUNT(f.{id}) AS {count}
FROM {fact} f
JOIN {dim_dwelling} d ON f.{dwelling_key} = d.{dwelling_key}
JOIN {dim_location} dl ON f.{location_key} = dl.{location_key}
WHERE dl.{location} IS NOT NULL
    AND dl.{location} != '{NOT_KNOWN}'
    AND d.{dwelling_type} IS NOT NULL
GROUP BY d.{dwelling_type}, dl.{location}
ORDER BY d.{dwelling_type}, dl.{location}"
    )
});

static HUMAN_COST_BY_CAUSE_SQL: LazyLock<String> = LazyLock::new(|| {
    let fact = tables::FACT_DWELLING_FIRE;
    let dim_ignition = tables::DIM_IGNITION;
    let dim_spread = tables::DIM_SPREAD;
    let id = columns::FACT_DWELLING_FIRE_ID;
    let ignition_key = columns::IGNITION_KEY;
    let spread_key = columns::SPREAD_KEY;
    let cause = columns::CAUSE_OF_FIRE;
    let spread_rank = columns::SPREAD_RANK;
    let flag = columns::FATALITY_CASUALTY_FLAG;
    let rescues = columns::RESCUES;
    let count = columns::NUMBER_OF_INCIDENTS;
    let avg_spread = columns::AVG_SPREAD_RANK;
    let casualties = columns::TOTAL_INCIDENTS_WITH_CASUALTIES;
    let pct_casualty = columns::PCT_CHANCE_OF_CASUALTY;
    let avg_rescues = columns::AVG_RESCUES_PER_INCIDENT;

    format!(
        "SELECT
    di.{cause},
    COUNT(f.{id}) AS {count},
    ROUND(AVG(ds.{spread_rank}), 2) AS {avg_spread},
    SUM(f.{flag}) AS {casualties},
    ROUND(AVG(f.{flag}) * 100, 2) AS {pct_casualty},
    ROUND(AVG(f.{rescues}), 2) AS {avg_rescues}
FROM {fact} f
JOIN {dim_ignition} di ON f.{ignition_key} = di.{ignition_key}
JOIN {dim_spread} ds ON f.{spread_key} = ds.{spread_key}
WHERE ds.{spread_rank} IS NOT NULL
    AND f.{rescues} IS NOT NULL
    AND di.{cause} IS NOT NULL
    AND di.{cause} != '{NOT_KNOWN}'
GROUP BY di.{cause}
HAVING COUNT(f.{id}) > {MIN_CAUSE_INCIDENTS}
ORDER BY di.{cause}"
    )
});
