#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Read-only access to the dwelling fire `DuckDB` star schema.
//!
//! The store is opened per query through [`store::DuckDbStore`], results are
//! materialized into [`fire_risk_database_models::Table`]s, and the
//! [`gateway::Gateway`] memoizes them per query text in an owned
//! [`cache::QueryCache`]. The [`inspect`] module backs the schema report
//! utility.

pub mod cache;
pub mod gateway;
pub mod inspect;
pub mod paths;
pub mod store;

pub use cache::QueryCache;
pub use gateway::Gateway;
pub use store::{DuckDbStore, QueryExecutor};

use std::path::PathBuf;

/// Errors that can occur while reading the analytical store.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// The store could not be opened or a query failed to execute.
    #[error("Data unavailable: {0}")]
    DataUnavailable(#[from] duckdb::Error),

    /// The configured store file does not exist.
    #[error("Data unavailable: store not found at {}", path.display())]
    StoreNotFound {
        /// Path that was checked.
        path: PathBuf,
    },

    /// I/O error while writing a report.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Data conversion error.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

impl DbError {
    /// Whether this error means the store or a query could not be used at
    /// all, as opposed to a problem with the returned data.
    #[must_use]
    pub const fn is_data_unavailable(&self) -> bool {
        matches!(self, Self::DataUnavailable(_) | Self::StoreNotFound { .. })
    }
}
