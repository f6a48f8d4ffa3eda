//! Shared cache store backing the cache pipe.
//!
//! The store maps string keys to type-erased result values. It is the only
//! shared mutable resource in the pipeline core: reads may occur
//! concurrently, and writes are atomic per key. A key is either absent or
//! holds exactly one value; no cross-key coordination exists.
//!
//! Entries are never expired or evicted, and an existing entry is never
//! overwritten: under a same-key race the first successful write is
//! retained and later writes are silently discarded (first-writer-wins).

use crate::pipe::PipeValue;
use dashmap::DashMap;

/// Key-value store mapping cache keys to type-erased results.
///
/// Values are held behind `Arc`, so different keys can store entirely
/// different result types. Interpreting a retrieved value as its concrete
/// type is the caller's contract; see
/// [`SluiceError::CacheTypeMismatch`](sluice_core::SluiceError).
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use sluice_pipeline::{CacheStore, PipeValue};
///
/// let store = CacheStore::new();
/// store.insert_if_absent("get-fruit", Arc::new("strawberry".to_string()) as PipeValue);
///
/// let value = store.get("get-fruit").unwrap();
/// assert_eq!(value.downcast_ref::<String>().unwrap(), "strawberry");
/// ```
#[derive(Default)]
pub struct CacheStore {
    entries: DashMap<String, PipeValue>,
}

impl CacheStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Returns the value stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<PipeValue> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Stores `value` under `key` unless the key is already populated.
    ///
    /// Returns the retained value: the one just inserted, or the earlier
    /// one if a concurrent writer got there first. The check and the insert
    /// are a single atomic step per key.
    pub fn insert_if_absent(&self, key: impl Into<String>, value: PipeValue) -> PipeValue {
        self.entries.entry(key.into()).or_insert(value).value().clone()
    }

    /// Returns whether `key` currently holds a value.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
