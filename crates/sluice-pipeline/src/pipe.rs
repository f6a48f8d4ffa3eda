//! Core pipe trait and continuation types.
//!
//! This module defines the [`Pipe`] trait that all pipeline stages implement.
//! A pipe observes an invocation on the way in, decides whether to call the
//! rest of the chain through its [`Next`] continuation, and observes the
//! result on the way out.
//!
//! # Invariants
//!
//! - A pipe MUST call `next.run()` at most once; [`Next`] is consumed by
//!   `run`, so the type system enforces this
//! - A pipe that never calls `next.run()` short-circuits the chain and the
//!   wrapped operation is never invoked
//! - A pipe SHOULD NOT suppress errors from downstream stages

use crate::context::PipeContext;
use sluice_core::SluiceError;
use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed future, as returned by pipe stages.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A type-erased invocation result.
///
/// The pipeline carries results through the chain behind `Arc<dyn Any>` so a
/// single cache store can hold heterogeneous value types across different
/// keys. [`Pipeline::run`](crate::Pipeline::run) converts back to the
/// caller's concrete type at the boundary.
pub type PipeValue = Arc<dyn Any + Send + Sync>;

/// The outcome of one pipe stage: a (type-erased) value or a failure.
pub type PipeResult = Result<PipeValue, SluiceError>;

/// The core pipe trait.
///
/// Pipes receive the per-call [`PipeContext`] and a [`Next`] continuation
/// representing everything downstream of them, ending in the wrapped
/// operation itself.
///
/// # Example
///
/// ```ignore
/// struct PassThroughPipe;
///
/// impl Pipe for PassThroughPipe {
///     fn name(&self) -> &'static str {
///         "pass-through"
///     }
///
///     fn process<'a>(
///         &'a self,
///         ctx: &'a PipeContext,
///         next: Next<'a>,
///     ) -> BoxFuture<'a, PipeResult> {
///         Box::pin(async move { next.run(ctx).await })
///     }
/// }
/// ```
pub trait Pipe: Send + Sync + 'static {
    /// Returns the unique name of this pipe.
    ///
    /// The name is used for logging and introspection.
    fn name(&self) -> &'static str;

    /// Processes one invocation through this pipe.
    ///
    /// Returns either the downstream result (after observing it) or a value
    /// produced by this pipe without invoking downstream at all.
    fn process<'a>(&'a self, ctx: &'a PipeContext, next: Next<'a>) -> BoxFuture<'a, PipeResult>;
}

/// Continuation for the remainder of the pipe chain.
///
/// Passed to every pipe; calling [`Next::run`] invokes the next pipe, or the
/// wrapped operation if this pipe is the last one. `run` consumes `self`, so
/// downstream can be invoked at most once per stage.
pub struct Next<'a> {
    inner: NextInner<'a>,
}

/// Internal representation of the remaining chain.
enum NextInner<'a> {
    /// More pipes to process.
    Chain {
        pipe: &'a dyn Pipe,
        next: Box<Next<'a>>,
    },
    /// End of chain - invoke the wrapped operation.
    Operation(Box<dyn FnOnce() -> BoxFuture<'static, PipeResult> + Send + 'a>),
}

impl<'a> Next<'a> {
    /// Creates a `Next` that will invoke the given pipe.
    pub(crate) fn new(pipe: &'a dyn Pipe, next: Next<'a>) -> Self {
        Self {
            inner: NextInner::Chain {
                pipe,
                next: Box::new(next),
            },
        }
    }

    /// Creates a terminal `Next` that invokes the wrapped operation.
    pub(crate) fn operation<F>(f: F) -> Self
    where
        F: FnOnce() -> BoxFuture<'static, PipeResult> + Send + 'a,
    {
        Self {
            inner: NextInner::Operation(Box::new(f)),
        }
    }

    /// Invokes the next pipe or the wrapped operation.
    ///
    /// Consumes `self` to ensure it can only be called once.
    pub async fn run(self, ctx: &PipeContext) -> PipeResult {
        match self.inner {
            NextInner::Chain { pipe, next } => pipe.process(ctx, *next).await,
            NextInner::Operation(operation) => operation().await,
        }
    }
}

/// Type of the function stored by [`FnPipe`].
type PipeHandler =
    Box<dyn for<'a> Fn(&'a PipeContext, Next<'a>) -> BoxFuture<'a, PipeResult> + Send + Sync>;

/// A pipe built from a plain function.
///
/// This allows defining simple stages without implementing [`Pipe`]
/// directly. The function receives the context and continuation exactly as
/// `process` would.
///
/// # Example
///
/// ```ignore
/// fn probe<'a>(ctx: &'a PipeContext, next: Next<'a>) -> BoxFuture<'a, PipeResult> {
///     Box::pin(async move { next.run(ctx).await })
/// }
///
/// let pipe = FnPipe::new("probe", probe);
/// ```
pub struct FnPipe {
    name: &'static str,
    func: PipeHandler,
}

impl FnPipe {
    /// Creates a new function-based pipe.
    pub fn new<F>(name: &'static str, func: F) -> Self
    where
        F: for<'a> Fn(&'a PipeContext, Next<'a>) -> BoxFuture<'a, PipeResult>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name,
            func: Box::new(func),
        }
    }
}

impl Pipe for FnPipe {
    fn name(&self) -> &'static str {
        self.name
    }

    fn process<'a>(&'a self, ctx: &'a PipeContext, next: Next<'a>) -> BoxFuture<'a, PipeResult> {
        (self.func)(ctx, next)
    }
}
