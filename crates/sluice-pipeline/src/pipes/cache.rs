//! Response caching pipe.
//!
//! Memoizes successful downstream results in a shared [`CacheStore`] under
//! the per-call cache key. Per invocation:
//!
//! 1. `no_cache` set → pass straight through, no store access
//! 2. no cache key → pass straight through, no store access
//! 3. key present: a hit returns the stored value immediately (downstream
//!    is skipped entirely); a miss invokes downstream and, on success,
//!    stores the result
//!
//! Failures are never cached. Two concurrent misses under the same key may
//! both invoke the operation; the store keeps whichever write lands first
//! and the other is discarded.

use crate::context::PipeContext;
use crate::pipe::{BoxFuture, Next, Pipe, PipeResult};
use crate::store::CacheStore;
use std::sync::Arc;

/// Pipe that serves memoized results and populates the store on misses.
///
/// Each pipe owns a store by default; use [`with_store`](Self::with_store)
/// to share one store between several pipelines.
pub struct CachePipe {
    store: Arc<CacheStore>,
}

impl CachePipe {
    /// Creates a cache pipe with its own empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(Arc::new(CacheStore::new()))
    }

    /// Creates a cache pipe backed by an existing store.
    #[must_use]
    pub fn with_store(store: Arc<CacheStore>) -> Self {
        Self { store }
    }

    /// Returns the backing store.
    #[must_use]
    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }
}

impl Default for CachePipe {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipe for CachePipe {
    fn name(&self) -> &'static str {
        "cache"
    }

    fn process<'a>(&'a self, ctx: &'a PipeContext, next: Next<'a>) -> BoxFuture<'a, PipeResult> {
        Box::pin(async move {
            if ctx.no_cache() {
                return next.run(ctx).await;
            }
            let Some(key) = ctx.cache_key() else {
                // No key means caching is meaningless for this call.
                return next.run(ctx).await;
            };

            if let Some(hit) = self.store.get(key) {
                tracing::debug!(invocation_id = %ctx.invocation_id(), key, "cache hit");
                return Ok(hit);
            }

            tracing::debug!(invocation_id = %ctx.invocation_id(), key, "cache miss");
            let value = next.run(ctx).await?;

            // First writer wins: under a same-key race the earlier value is
            // retained and this write is silently discarded.
            Ok(self.store.insert_if_absent(key, value))
        })
    }
}
