//! # Sluice Pipeline
//!
//! A generic, composable execution pipeline for invoking arbitrary
//! asynchronous operations through an ordered chain of cross-cutting pipes.
//!
//! Callers register pipes against a pipeline in the order they should wrap
//! the operation, build the pipeline once, then invoke any number of
//! operations through it with per-call options:
//!
//! ```text
//! run(op) → TimerPipe → CachePipe → op()
//!                          │
//!   result ←───────────────┴─ cache hit short-circuits, op never runs
//! ```
//!
//! Pipes execute in registration order on the way in and in reverse order on
//! the way out. A pipe that never invokes its [`Next`] continuation
//! short-circuits the chain; everything downstream, including the operation
//! itself, is skipped.
//!
//! ## Key Properties
//!
//! - **Immutable pipelines**: [`Pipeline`] holds no per-call state and is
//!   safe to share across concurrent invocations without locking
//! - **Per-call options**: a cache key or an explicit no-cache override,
//!   applied through a configurator closure on every [`Pipeline::run`]
//! - **Transparent failures**: an operation failure propagates unchanged
//!   through every pipe and is never cached
//!
//! ## Example
//!
//! ```
//! use std::convert::Infallible;
//! use sluice_pipeline::{CachePipe, PipelineBuilderFactory, TimerPipe};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let pipeline = PipelineBuilderFactory::new()
//!     .create()
//!     .add(TimerPipe::new())
//!     .add(CachePipe::new())
//!     .build();
//!
//! let fruit = pipeline
//!     .run(
//!         || async { Ok::<_, Infallible>("strawberry") },
//!         |opts| {
//!             opts.set_cache("get-fruit");
//!         },
//!     )
//!     .await
//!     .unwrap();
//!
//! assert_eq!(fruit, "strawberry");
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/sluice-pipeline/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod context;
pub mod options;
pub mod pipe;
pub mod pipeline;
pub mod pipes;
pub mod store;

// Re-export main types at crate root
pub use context::{InvocationId, PipeContext};
pub use options::{PipeOptions, PipeOptionsBuilder};
pub use pipe::{BoxFuture, FnPipe, Next, Pipe, PipeResult, PipeValue};
pub use pipeline::{BoxedPipe, Pipeline, PipelineBuilder, PipelineBuilderFactory};
pub use pipes::{CachePipe, TimerPipe};
pub use store::CacheStore;
