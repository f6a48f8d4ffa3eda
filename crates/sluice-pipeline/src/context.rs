//! Per-invocation context types.
//!
//! A fresh [`PipeContext`] is created by every [`Pipeline::run`] call and
//! dropped when the call returns. It carries the resolved per-call options
//! and is never shared between calls; a built pipeline itself holds no
//! per-call state.
//!
//! [`Pipeline::run`]: crate::Pipeline::run

use crate::options::PipeOptions;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Unique identifier for a single pipeline invocation.
///
/// UUID v7 incorporates a Unix timestamp, making IDs time-ordered. Pipes log
/// the invocation ID so events from one `run` call can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvocationId(Uuid);

impl InvocationId {
    /// Creates a new unique invocation ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for InvocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InvocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Context that flows through the pipe chain for one invocation.
///
/// The context is read-only during processing: pipes consult the per-call
/// options to decide their behavior but cannot alter them mid-flight.
///
/// # Example
///
/// ```
/// use sluice_pipeline::{PipeContext, PipeOptionsBuilder};
///
/// let mut opts = PipeOptionsBuilder::new();
/// opts.set_cache("get-fruit");
///
/// let ctx = PipeContext::new(opts.build());
/// assert_eq!(ctx.cache_key(), Some("get-fruit"));
/// assert!(!ctx.no_cache());
/// ```
#[derive(Debug)]
pub struct PipeContext {
    /// Unique identifier for this invocation.
    invocation_id: InvocationId,

    /// The resolved per-call options.
    options: PipeOptions,

    /// When the invocation started processing.
    started_at: Instant,
}

impl PipeContext {
    /// Creates a new context for a single invocation.
    #[must_use]
    pub fn new(options: PipeOptions) -> Self {
        Self {
            invocation_id: InvocationId::new(),
            options,
            started_at: Instant::now(),
        }
    }

    /// Returns the invocation ID.
    #[must_use]
    pub fn invocation_id(&self) -> InvocationId {
        self.invocation_id
    }

    /// Returns the resolved per-call options.
    #[must_use]
    pub fn options(&self) -> &PipeOptions {
        &self.options
    }

    /// Returns the cache key for this invocation, if one was supplied.
    #[must_use]
    pub fn cache_key(&self) -> Option<&str> {
        self.options.cache_key()
    }

    /// Returns whether caching was explicitly bypassed for this invocation.
    #[must_use]
    pub fn no_cache(&self) -> bool {
        self.options.no_cache()
    }

    /// Returns when the invocation started processing.
    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Returns the elapsed time since the invocation started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::PipeOptionsBuilder;

    #[test]
    fn test_invocation_ids_are_unique() {
        let a = InvocationId::new();
        let b = InvocationId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_invocation_id_display_matches_uuid() {
        let id = InvocationId::new();
        assert_eq!(id.to_string(), id.as_uuid().to_string());
    }

    #[test]
    fn test_default_context_has_no_cache_configuration() {
        let ctx = PipeContext::new(PipeOptions::default());
        assert!(ctx.cache_key().is_none());
        assert!(!ctx.no_cache());
    }

    #[test]
    fn test_context_exposes_configured_options() {
        let mut opts = PipeOptionsBuilder::new();
        opts.set_cache("get-hero").set_no_cache();

        let ctx = PipeContext::new(opts.build());
        assert_eq!(ctx.cache_key(), Some("get-hero"));
        assert!(ctx.no_cache());
        assert_eq!(ctx.options().cache_key(), Some("get-hero"));
    }

    #[test]
    fn test_elapsed_time_advances() {
        let ctx = PipeContext::new(PipeOptions::default());
        std::thread::sleep(Duration::from_millis(10));
        assert!(ctx.elapsed() >= Duration::from_millis(10));
    }
}
