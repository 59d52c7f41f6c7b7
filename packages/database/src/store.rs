//! Query execution against the `DuckDB` store.
//!
//! [`QueryExecutor`] is the seam between the caching gateway and the
//! store. [`DuckDbStore`] opens a read-only connection for the duration of
//! one call and closes it on every exit path, including failures.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use duckdb::types::Value as DuckValue;
use duckdb::{AccessMode, Config, Connection};
use fire_risk_database_models::{Table, Value};

use crate::DbError;

/// Runs a read-only query and materializes every row.
pub trait QueryExecutor: Send + Sync {
    /// Executes `sql` and returns the full result.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the store cannot be opened or the query
    /// fails.
    fn execute(&self, sql: &str) -> Result<Table, DbError>;
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for Arc<T> {
    fn execute(&self, sql: &str) -> Result<Table, DbError> {
        (**self).execute(sql)
    }
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for &T {
    fn execute(&self, sql: &str) -> Result<Table, DbError> {
        (**self).execute(sql)
    }
}

/// File-backed `DuckDB` store opened read-only per query.
#[derive(Debug, Clone)]
pub struct DuckDbStore {
    path: PathBuf,
}

impl DuckDbStore {
    /// Creates a store for the `DuckDB` file at `path`. Nothing is opened
    /// until the first query.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store at the configured default location.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(crate::paths::store_path())
    }

    /// Path of the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens a read-only connection to the store.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::StoreNotFound`] if the file does not exist, or
    /// [`DbError::DataUnavailable`] if `DuckDB` cannot open it.
    pub fn open(&self) -> Result<Connection, DbError> {
        if !self.path.is_file() {
            return Err(DbError::StoreNotFound {
                path: self.path.clone(),
            });
        }

        let config = Config::default().access_mode(AccessMode::ReadOnly)?;
        Ok(Connection::open_with_flags(&self.path, config)?)
    }
}

impl QueryExecutor for DuckDbStore {
    fn execute(&self, sql: &str) -> Result<Table, DbError> {
        let conn = self.open()?;
        fetch_table(&conn, sql)
    }
}

/// Executes `sql` on an open connection and collects the result.
///
/// # Errors
///
/// Returns [`DbError`] if preparation, execution, or row decoding fails.
pub fn fetch_table(conn: &Connection, sql: &str) -> Result<Table, DbError> {
    let mut stmt = conn.prepare(sql)?;
    stmt.raw_execute()?;

    let columns = stmt.column_names();
    let column_count = columns.len();

    let mut rows = Vec::new();
    let mut raw_rows = stmt.raw_query();
    while let Some(row) = raw_rows.next()? {
        let mut values = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            let value: DuckValue = row.get(idx)?;
            values.push(convert_value(value));
        }
        rows.push(values);
    }

    Table::from_rows(columns, rows).map_err(|e| DbError::Conversion {
        message: e.to_string(),
    })
}

/// Converts a `DuckDB` value into a cell value.
///
/// Integer types widen to `i64` (128-bit sums fall back to `f64` when out
/// of range), decimals become floats, and anything without a scalar
/// counterpart is rendered as text.
#[allow(clippy::cast_precision_loss)]
fn convert_value(value: DuckValue) -> Value {
    match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(v) => Value::Bool(v),
        DuckValue::TinyInt(v) => Value::Int(i64::from(v)),
        DuckValue::SmallInt(v) => Value::Int(i64::from(v)),
        DuckValue::Int(v) => Value::Int(i64::from(v)),
        DuckValue::BigInt(v) => Value::Int(v),
        DuckValue::HugeInt(v) => i64::try_from(v).map_or(Value::Float(v as f64), Value::Int),
        DuckValue::UTinyInt(v) => Value::Int(i64::from(v)),
        DuckValue::USmallInt(v) => Value::Int(i64::from(v)),
        DuckValue::UInt(v) => Value::Int(i64::from(v)),
        DuckValue::UBigInt(v) => i64::try_from(v).map_or(Value::Float(v as f64), Value::Int),
        DuckValue::Float(v) => Value::Float(f64::from(v)),
        DuckValue::Double(v) => Value::Float(v),
        DuckValue::Decimal(v) => v
            .to_string()
            .parse::<f64>()
            .map_or_else(|_| Value::Text(v.to_string()), Value::Float),
        DuckValue::Text(v) | DuckValue::Enum(v) => Value::Text(v),
        other => Value::Text(format!("{other:?}")),
    }
}
