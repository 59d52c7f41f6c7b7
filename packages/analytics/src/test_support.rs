//! In-memory star schema fixtures.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use duckdb::Connection;
use fire_risk_database::store::fetch_table;
use fire_risk_database::{DbError, QueryExecutor};
use fire_risk_database_models::Table;

const SCHEMA: &str = "
CREATE TABLE dim_dwelling (dwelling_key INTEGER, dwelling_type VARCHAR);
CREATE TABLE dim_location (location_key INTEGER, fire_start_location VARCHAR);
CREATE TABLE dim_ignition (ignition_key INTEGER, cause_of_fire VARCHAR);
CREATE TABLE dim_spread (spread_key INTEGER, spread_rank INTEGER);
CREATE TABLE dim_vehicles (vehicles_key INTEGER, vehicles_midpoint DOUBLE);
CREATE TABLE fact_dwelling_fire (
    fact_dwelling_fire_id INTEGER,
    dwelling_key INTEGER,
    location_key INTEGER,
    ignition_key INTEGER,
    spread_key INTEGER,
    vehicles_key INTEGER,
    fatality_casualty_flag INTEGER,
    rescues INTEGER
);
";

const DIMENSIONS: &str = "
INSERT INTO dim_dwelling VALUES
    (1, 'House - single occupancy'),
    (2, 'Purpose Built Flats/Maisonettes - 10 or more storeys'),
    (3, 'Purpose Built Flats/Maisonettes - Up to 3 storeys'),
    (4, 'Converted Flat/Maisonette'),
    (5, NULL);
INSERT INTO dim_location VALUES
    (1, 'Kitchen'),
    (2, 'Living Room'),
    (3, 'Refuse Store'),
    (4, 'Not known'),
    (5, NULL);
INSERT INTO dim_ignition VALUES
    (1, 'Chip/ fat pan fires'),
    (2, 'Careless handling'),
    (3, 'Not known'),
    (4, NULL);
INSERT INTO dim_spread VALUES (1, 1), (2, 2), (3, 5), (4, NULL);
INSERT INTO dim_vehicles VALUES (1, 1.0), (2, 2.0), (3, 5.0), (4, NULL);
";

// Three disjoint groups of facts. Location facts have an unknown cause and
// no vehicle count; cause facts have an unknown location; vehicle facts
// have both unknown.
const FACTS: &str = "
INSERT INTO fact_dwelling_fire
SELECT 1000 + i, d, l, 3, 1, 4, 0, 0
FROM (VALUES
    (0, 100, 1, 1),
    (100, 150, 1, 2),
    (150, 170, 2, 1),
    (170, 180, 3, 1),
    (180, 200, 2, 3),
    (200, 207, 4, 1),
    (207, 210, 5, 1),
    (210, 212, 1, 5)
) AS g(lo, hi, d, l), range(0, 212) AS t(i)
WHERE i >= lo AND i < hi;

INSERT INTO fact_dwelling_fire
SELECT 2000 + i, 1, 4, 1, 2, 4,
    CASE WHEN i % 4 = 0 THEN 1 ELSE 0 END,
    CASE WHEN i < 10 THEN 1 ELSE 0 END
FROM range(0, 101) AS t(i);

INSERT INTO fact_dwelling_fire SELECT 3000 + i, 1, 4, 2, 3, 4, 0, 0 FROM range(0, 99) AS t(i);
INSERT INTO fact_dwelling_fire SELECT 3100 + i, 1, 4, 2, 3, 4, 0, NULL FROM range(0, 5) AS t(i);
INSERT INTO fact_dwelling_fire SELECT 3200 + i, 1, 4, 2, 4, 4, 0, 0 FROM range(0, 5) AS t(i);
INSERT INTO fact_dwelling_fire SELECT 4000 + i, 1, 4, 4, 1, 4, 1, 1 FROM range(0, 150) AS t(i);

INSERT INTO fact_dwelling_fire VALUES
    (5000, 1, 4, 3, 1, 2, 0, 0),
    (5001, 1, 4, 3, 1, 2, 0, 0),
    (5002, 1, 4, 3, 1, 2, 0, 0),
    (5003, 1, 4, 3, 1, 1, 0, 0),
    (5004, 2, 4, 3, 1, 3, 0, 0),
    (5005, 2, 4, 3, 1, 3, 0, 0),
    (5006, 3, 4, 3, 1, 2, 0, 0),
    (5007, 3, 4, 3, 1, 3, 0, 0),
    (5008, 5, 4, 3, 1, 3, 0, 0);
";

/// Executes against a private in-memory database and counts executions.
pub struct MemoryStore {
    conn: Mutex<Connection>,
    executions: AtomicUsize,
}

impl MemoryStore {
    /// A database with no tables at all.
    pub fn blank() -> Self {
        Self {
            conn: Mutex::new(Connection::open_in_memory().unwrap()),
            executions: AtomicUsize::new(0),
        }
    }

    fn with_batch(sql: &str) -> Self {
        let store = Self::blank();
        store.conn.lock().unwrap().execute_batch(sql).unwrap();
        store
    }

    pub fn executions(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }
}

impl QueryExecutor for MemoryStore {
    fn execute(&self, sql: &str) -> Result<Table, DbError> {
        self.executions.fetch_add(1, Ordering::SeqCst);
        let conn = self.conn.lock().unwrap();
        fetch_table(&conn, sql)
    }
}

/// The star schema with no rows.
pub fn empty_store() -> MemoryStore {
    MemoryStore::with_batch(SCHEMA)
}

/// The star schema with dimensions and facts loaded.
pub fn seeded_store() -> MemoryStore {
    MemoryStore::with_batch(&format!("{SCHEMA}{DIMENSIONS}{FACTS}"))
}
