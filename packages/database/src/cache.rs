//! Query result cache keyed by exact query text.
//!
//! Each key owns a slot guarded by its own `Mutex`. The first caller for a
//! key holds the slot lock while computing, so concurrent callers for the
//! same key wait for that result instead of querying the store again.
//! Callers for different keys never block each other beyond the short map
//! lookup. Failed computations leave the slot empty and are retried by the
//! next caller.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};

use fire_risk_database_models::Table;

type Slot = Arc<Mutex<Option<Arc<Table>>>>;

/// Outcome of a cache lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// The value was already cached.
    Hit,
    /// The value was computed by this call.
    Miss,
}

/// Insert-if-absent cache of query results.
///
/// Owned by a [`crate::Gateway`]; construct one per gateway so tests get
/// isolated instances.
#[derive(Debug, Default)]
pub struct QueryCache {
    slots: Mutex<BTreeMap<String, Slot>>,
}

// Cached tables are never mutated after insertion, so a poisoned lock
// still guards consistent data.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// Whether `slot` holds a result, without waiting. A slot locked by an
// in-flight computation has no result yet.
fn is_filled(slot: &Slot) -> bool {
    match slot.try_lock() {
        Ok(guard) => guard.is_some(),
        Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().is_some(),
        Err(TryLockError::WouldBlock) => false,
    }
}

impl QueryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: &str) -> Slot {
        let mut slots = lock(&self.slots);
        if let Some(slot) = slots.get(key) {
            return Arc::clone(slot);
        }
        let slot = Slot::default();
        slots.insert(key.to_string(), Arc::clone(&slot));
        slot
    }

    /// Returns the cached table for `key`, computing and storing it with
    /// `compute` if absent.
    ///
    /// At most one `compute` runs per key at a time.
    ///
    /// # Errors
    ///
    /// Propagates the error from `compute`. Nothing is stored in that case.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: &str,
        compute: impl FnOnce() -> Result<Table, E>,
    ) -> Result<(Arc<Table>, CacheStatus), E> {
        let slot = self.slot(key);
        let mut guard = lock(&slot);

        if let Some(table) = guard.as_ref() {
            return Ok((Arc::clone(table), CacheStatus::Hit));
        }

        let table = Arc::new(compute()?);
        *guard = Some(Arc::clone(&table));
        drop(guard);

        Ok((table, CacheStatus::Miss))
    }

    /// Removes the entry for `key`. Returns whether a result was cached.
    ///
    /// Never waits for a computation in flight for `key`; that computation
    /// completes but its result is not visible to later callers, and it is
    /// not counted.
    pub fn invalidate(&self, key: &str) -> bool {
        let removed = lock(&self.slots).remove(key);
        removed.is_some_and(|slot| is_filled(&slot))
    }

    /// Removes every entry. Returns the number of cached results dropped.
    ///
    /// Like [`Self::invalidate`], never waits for in-flight computations.
    pub fn clear(&self) -> usize {
        let slots = std::mem::take(&mut *lock(&self.slots));
        slots.values().filter(|slot| is_filled(slot)).count()
    }

    /// Number of cached results, not counting computations in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        let slots: Vec<Slot> = lock(&self.slots).values().map(Arc::clone).collect();
        slots.iter().filter(|slot| is_filled(slot)).count()
    }

    /// Whether no results are cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    use fire_risk_database_models::Value;

    use super::*;

    fn table(n: i64) -> Table {
        Table::from_rows(["n"], vec![vec![Value::Int(n)]]).unwrap()
    }

    #[test]
    fn computes_once_per_key() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);
        let compute = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ()>(table(1))
        };

        let (first, status) = cache.get_or_try_insert_with("SELECT 1", compute).unwrap();
        assert_eq!(status, CacheStatus::Miss);
        let (second, status) = cache.get_or_try_insert_with("SELECT 1", compute).unwrap();
        assert_eq!(status, CacheStatus::Hit);

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failures_are_not_cached() {
        let cache = QueryCache::new();
        assert_eq!(
            cache.get_or_try_insert_with("q", || Err::<Table, _>("boom")),
            Err("boom")
        );
        assert!(cache.is_empty());

        let (value, status) = cache
            .get_or_try_insert_with("q", || Ok::<_, &str>(table(2)))
            .unwrap();
        assert_eq!(status, CacheStatus::Miss);
        assert_eq!(value.rows()[0][0], Value::Int(2));
    }

    #[test]
    fn invalidate_and_clear() {
        let cache = QueryCache::new();
        for key in ["a", "b", "c"] {
            cache
                .get_or_try_insert_with(key, || Ok::<_, ()>(table(0)))
                .unwrap();
        }

        assert!(cache.invalidate("a"));
        assert!(!cache.invalidate("a"));
        assert_eq!(cache.len(), 2);

        let (_, status) = cache
            .get_or_try_insert_with("a", || Ok::<_, ()>(table(0)))
            .unwrap();
        assert_eq!(status, CacheStatus::Miss);
        assert!(cache.invalidate("a"));

        assert_eq!(cache.clear(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn concurrent_callers_share_one_computation() {
        let cache = Arc::new(QueryCache::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    cache
                        .get_or_try_insert_with("SELECT slow", || {
                            calls.fetch_add(1, Ordering::SeqCst);
                            thread::sleep(Duration::from_millis(50));
                            Ok::<_, ()>(table(42))
                        })
                        .unwrap()
                        .0
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().rows()[0][0], Value::Int(42));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn clearing_does_not_wait_for_in_flight_queries() {
        let cache = Arc::new(QueryCache::new());
        cache
            .get_or_try_insert_with("SELECT fast", || Ok::<_, ()>(table(1)))
            .unwrap();

        let started = Arc::new(Barrier::new(2));
        let finished = Arc::new(AtomicBool::new(false));

        let worker = {
            let cache = Arc::clone(&cache);
            let started = Arc::clone(&started);
            let finished = Arc::clone(&finished);
            thread::spawn(move || {
                cache
                    .get_or_try_insert_with("SELECT slow", || {
                        started.wait();
                        thread::sleep(Duration::from_millis(500));
                        finished.store(true, Ordering::SeqCst);
                        Ok::<_, ()>(table(2))
                    })
                    .unwrap()
                    .0
            })
        };

        started.wait();
        assert_eq!(cache.len(), 1);
        assert!(!cache.invalidate("SELECT slow"));
        assert_eq!(cache.clear(), 1);
        assert!(!finished.load(Ordering::SeqCst));

        assert_eq!(worker.join().unwrap().rows()[0][0], Value::Int(2));
        assert!(cache.is_empty());
    }
}
