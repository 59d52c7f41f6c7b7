//! Canonical file locations for the analytical store and reports.

use std::path::PathBuf;

/// Environment variable that overrides the store location.
pub const DB_PATH_ENV: &str = "FIRE_RISK_DB_PATH";

/// Store file name used when [`DB_PATH_ENV`] is unset.
pub const DEFAULT_DB_FILE: &str = "dwelling_fires.duckdb";

/// Default output file of the schema report.
pub const DEFAULT_SCHEMA_REPORT_FILE: &str = "schema_info.txt";

/// Returns the path of the dwelling fire `DuckDB` file.
///
/// Reads [`DB_PATH_ENV`], falling back to [`DEFAULT_DB_FILE`] in the
/// working directory. Empty values are treated as unset.
#[must_use]
pub fn store_path() -> PathBuf {
    resolve_store_path(std::env::var(DB_PATH_ENV).ok().as_deref())
}

fn resolve_store_path(configured: Option<&str>) -> PathBuf {
    configured
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_DB_FILE), PathBuf::from)
}
