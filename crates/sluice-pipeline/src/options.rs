//! Per-call pipe options.
//!
//! Options are resolved once per [`Pipeline::run`] call: `run` starts from
//! defaults (no cache key, caching not bypassed) and applies the caller's
//! configurator closure to a [`PipeOptionsBuilder`] before the chain starts.
//!
//! [`Pipeline::run`]: crate::Pipeline::run

/// Resolved options for a single pipeline invocation.
///
/// # Invariants
///
/// `no_cache == true` means cache lookup and cache write are both skipped
/// for this invocation, regardless of any configured cache key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipeOptions {
    /// Key under which the result may be memoized.
    cache_key: Option<String>,

    /// Explicit override forcing a cache bypass for this call.
    no_cache: bool,
}

impl PipeOptions {
    /// Returns the cache key, if one was supplied.
    #[must_use]
    pub fn cache_key(&self) -> Option<&str> {
        self.cache_key.as_deref()
    }

    /// Returns whether caching is explicitly bypassed.
    #[must_use]
    pub const fn no_cache(&self) -> bool {
        self.no_cache
    }
}

/// Builder handed to the configurator closure of every `run` call.
///
/// # Example
///
/// ```
/// use sluice_pipeline::PipeOptionsBuilder;
///
/// let mut opts = PipeOptionsBuilder::new();
/// opts.set_cache("get-fruit");
///
/// let options = opts.build();
/// assert_eq!(options.cache_key(), Some("get-fruit"));
/// ```
#[derive(Debug, Default)]
pub struct PipeOptionsBuilder {
    cache_key: Option<String>,
    no_cache: bool,
}

impl PipeOptionsBuilder {
    /// Creates a builder with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables memoization of the result under the given key.
    pub fn set_cache(&mut self, key: impl Into<String>) -> &mut Self {
        self.cache_key = Some(key.into());
        self
    }

    /// Forces a cache bypass for this call, even if a key is supplied.
    pub fn set_no_cache(&mut self) -> &mut Self {
        self.no_cache = true;
        self
    }

    /// Resolves the final options.
    #[must_use]
    pub fn build(self) -> PipeOptions {
        PipeOptions {
            cache_key: self.cache_key,
            no_cache: self.no_cache,
        }
    }
}
