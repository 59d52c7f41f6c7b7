//! Caching data access gateway.

use std::sync::Arc;

use fire_risk_database_models::Table;

use crate::cache::{CacheStatus, QueryCache};
use crate::store::QueryExecutor;
use crate::DbError;

/// Executes catalog queries through a [`QueryExecutor`], memoizing each
/// result by its exact query text.
///
/// Results are deterministic for a fixed store snapshot, so an entry stays
/// valid until [`Self::invalidate`] or [`Self::clear`] is called or the
/// process exits. Failures are never cached and never retried here.
#[derive(Debug)]
pub struct Gateway<E> {
    executor: E,
    cache: QueryCache,
}

impl<E: QueryExecutor> Gateway<E> {
    /// Creates a gateway with an empty cache.
    #[must_use]
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            cache: QueryCache::new(),
        }
    }

    /// Returns the result of `sql`, executing it only if it is not cached.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the store cannot be opened or the query fails.
    pub fn execute(&self, sql: &str) -> Result<Arc<Table>, DbError> {
        let (table, status) = self
            .cache
            .get_or_try_insert_with(sql, || self.executor.execute(sql))
            .inspect_err(|e| log::error!("Query failed: {e}"))?;

        match status {
            CacheStatus::Hit => log::debug!("Cache hit ({} rows)", table.len()),
            CacheStatus::Miss => {
                log::info!(
                    "Executed query: {} rows, {} columns",
                    table.len(),
                    table.columns().len()
                );
            }
        }

        Ok(table)
    }

    /// Drops the cached result for `sql`. Returns whether one was cached.
    pub fn invalidate(&self, sql: &str) -> bool {
        self.cache.invalidate(sql)
    }

    /// Drops every cached result. Returns how many were dropped.
    pub fn clear(&self) -> usize {
        let cleared = self.cache.clear();
        log::info!("Cleared {cleared} cached query results");
        cleared
    }

    /// The underlying cache.
    #[must_use]
    pub const fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// The underlying executor.
    #[must_use]
    pub const fn executor(&self) -> &E {
        &self.executor
    }
}
