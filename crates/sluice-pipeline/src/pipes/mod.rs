//! Built-in pipe implementations.
//!
//! Two pipes ship with the pipeline core:
//!
//! - [`TimerPipe`] - pure observation: measures elapsed wall-clock time of
//!   everything downstream
//! - [`CachePipe`] - may short-circuit: serves memoized results keyed by the
//!   per-call cache key

pub mod cache;
pub mod timer;

pub use cache::CachePipe;
pub use timer::TimerPipe;
