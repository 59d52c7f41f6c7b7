//! Schema inspection for documentation reports.
//!
//! Lists the tables in a store, describes their columns, and samples a few
//! rows into a plain-text report.

use std::io::Write;

use duckdb::Connection;
use fire_risk_database_models::Table;

use crate::DbError;
use crate::store::fetch_table;

/// A column as reported by `DESCRIBE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// `DuckDB` type name (e.g. `INTEGER`, `VARCHAR`).
    pub data_type: String,
}

/// Quotes an identifier for interpolation into SQL.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Returns the names of all tables in the store, in `SHOW TABLES` order.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn list_tables(conn: &Connection) -> Result<Vec<String>, DbError> {
    let table = fetch_table(conn, "SHOW TABLES")?;
    Ok(table
        .rows()
        .iter()
        .filter_map(|row| row.first().and_then(|v| v.as_str()).map(ToString::to_string))
        .collect())
}

/// Describes the columns of `table_name`.
///
/// # Errors
///
/// Returns [`DbError`] if the table does not exist or `DESCRIBE` returns
/// an unexpected shape.
pub fn describe_table(conn: &Connection, table_name: &str) -> Result<Vec<ColumnInfo>, DbError> {
    let table = fetch_table(conn, &format!("DESCRIBE {}", quote_ident(table_name)))?;

    let name_idx = table.column_index("column_name").unwrap_or(0);
    let type_idx = table.column_index("column_type").unwrap_or(1);

    table
        .rows()
        .iter()
        .map(|row| {
            let cell = |idx: usize| {
                row.get(idx)
                    .and_then(|v| v.as_str())
                    .map(ToString::to_string)
                    .ok_or_else(|| DbError::Conversion {
                        message: format!("Unexpected DESCRIBE output for {table_name}"),
                    })
            };
            Ok(ColumnInfo {
                name: cell(name_idx)?,
                data_type: cell(type_idx)?,
            })
        })
        .collect()
}

/// Returns up to `limit` rows of `table_name`.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn sample_rows(conn: &Connection, table_name: &str, limit: usize) -> Result<Table, DbError> {
    fetch_table(
        conn,
        &format!("SELECT * FROM {} LIMIT {limit}", quote_ident(table_name)),
    )
}

/// Writes the schema report for every table to `out`.
///
/// A table whose sample cannot be read gets an error line in place of its
/// rows; the report continues with the next table.
///
/// # Errors
///
/// Returns [`DbError`] if listing or describing tables fails, or if
/// writing to `out` fails.
pub fn write_schema_report(
    conn: &Connection,
    out: &mut impl Write,
    sample_limit: usize,
) -> Result<(), DbError> {
    let tables = list_tables(conn)?;
    log::info!("Inspecting {} tables", tables.len());

    writeln!(out, "TABLES:")?;
    for table in &tables {
        writeln!(out, "- {table}")?;
    }
    writeln!(out)?;

    for table in &tables {
        writeln!(out, "--- SCHEMA FOR {table} ---")?;
        for column in describe_table(conn, table)? {
            writeln!(out, "{} ({})", column.name, column.data_type)?;
        }
        writeln!(out)?;

        writeln!(out, "--- SAMPLE DATA FOR {table} ---")?;
        match sample_rows(conn, table, sample_limit) {
            Ok(sample) => write!(out, "{sample}")?,
            Err(e) => {
                log::warn!("Failed to sample {table}: {e}");
                write!(out, "Error getting sample: {e}")?;
            }
        }
        writeln!(out)?;
        writeln!(out)?;
    }

    Ok(())
}
