//! Ordered, immutable pipe pipeline.
//!
//! A [`Pipeline`] captures an ordered list of pipes at build time and then
//! invokes arbitrary asynchronous operations through that chain. The first
//! pipe added is the outermost wrapper and runs first; results flow back in
//! reverse order.
//!
//! ```text
//! run(op) → pipe[0] → pipe[1] → … → op()
//!   result ←──────── ←──────── ←
//! ```
//!
//! Pipelines are immutable once built and hold no per-call mutable state, so
//! a single instance can serve many concurrent `run` calls.

use crate::context::PipeContext;
use crate::options::PipeOptionsBuilder;
use crate::pipe::{BoxFuture, Next, Pipe, PipeResult, PipeValue};
use sluice_core::{BoxError, SluiceError, SluiceResult};
use std::future::Future;
use std::sync::Arc;

/// A type-erased pipe that can be stored in a pipeline.
pub type BoxedPipe = Arc<dyn Pipe>;

/// An ordered, immutable chain of pipes.
///
/// # Example
///
/// ```ignore
/// let pipeline = Pipeline::builder()
///     .add(TimerPipe::new())
///     .add(CachePipe::new())
///     .build();
///
/// let fruit = pipeline
///     .run(get_fruit, |opts| {
///         opts.set_cache("get-fruit");
///     })
///     .await?;
/// ```
pub struct Pipeline {
    /// Pipe stages in registration order (first = outermost).
    pipes: Vec<BoxedPipe>,
}

impl Pipeline {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Invokes `operation` through the pipe chain.
    ///
    /// Default options are built, the caller's `configure` closure is
    /// applied, and a fresh [`PipeContext`] is threaded through every pipe
    /// in registration order. The result is whatever terminates the chain:
    /// either a value served by a short-circuiting pipe (such as a cache
    /// hit, in which case `operation` is never invoked) or the operation's
    /// own result after flowing back out through the observing stages.
    ///
    /// Exactly one of {operation invoked once, stored value returned} occurs
    /// per call; the operation is never invoked twice. A failure raised by
    /// the operation propagates unchanged as [`SluiceError::Operation`].
    ///
    /// `T` must be `Clone` because memoized values are shared: every call
    /// that hits the same cache entry clones its own copy out of the store.
    pub async fn run<T, E, F, Fut, C>(&self, operation: F, configure: C) -> SluiceResult<T>
    where
        T: Clone + Send + Sync + 'static,
        E: Into<BoxError> + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        C: FnOnce(&mut PipeOptionsBuilder),
    {
        let mut options = PipeOptionsBuilder::new();
        configure(&mut options);
        let ctx = PipeContext::new(options.build());

        // Terminal stage: invoke the operation once and type-erase its result.
        let mut next = Next::operation(move || -> BoxFuture<'static, PipeResult> {
            Box::pin(async move {
                match operation().await {
                    Ok(value) => Ok(Arc::new(value) as PipeValue),
                    Err(err) => Err(SluiceError::Operation(err.into())),
                }
            })
        });

        // Wrap with pipes from last to first so that pipe[0] runs outermost.
        for pipe in self.pipes.iter().rev() {
            next = Next::new(pipe.as_ref(), next);
        }

        let value = next.run(&ctx).await?;
        match value.downcast::<T>() {
            Ok(value) => Ok((*value).clone()),
            Err(_) => Err(SluiceError::CacheTypeMismatch {
                key: ctx.cache_key().unwrap_or_default().to_string(),
            }),
        }
    }

    /// Returns the names of all pipes in registration order.
    #[must_use]
    pub fn pipe_names(&self) -> Vec<&'static str> {
        self.pipes.iter().map(|pipe| pipe.name()).collect()
    }

    /// Returns the number of pipes in this pipeline.
    #[must_use]
    pub fn pipe_count(&self) -> usize {
        self.pipes.len()
    }
}

/// Builder accumulating an ordered list of pipes.
///
/// Insertion order is call order. Duplicates are permitted and will run
/// twice. [`build`](Self::build) takes a defensive copy, so a builder stays
/// usable afterwards and later additions never affect already-built
/// pipelines.
#[derive(Default)]
pub struct PipelineBuilder {
    pipes: Vec<BoxedPipe>,
}

impl PipelineBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pipes: Vec::new() }
    }

    /// Appends a pipe to the chain.
    #[must_use]
    pub fn add<P: Pipe>(mut self, pipe: P) -> Self {
        self.pipes.push(Arc::new(pipe));
        self
    }

    /// Appends an already-shared pipe to the chain.
    ///
    /// Useful when a single pipe instance (for example a cache pipe with its
    /// store) should serve several pipelines.
    #[must_use]
    pub fn add_shared(mut self, pipe: BoxedPipe) -> Self {
        self.pipes.push(pipe);
        self
    }

    /// Materializes an immutable [`Pipeline`] from the current list.
    #[must_use]
    pub fn build(&self) -> Pipeline {
        Pipeline {
            pipes: self.pipes.clone(),
        }
    }
}

/// Process-wide entry point that creates fresh pipeline builders.
///
/// Stateless; every call to [`create`](Self::create) returns an independent
/// empty builder.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineBuilderFactory;

impl PipelineBuilderFactory {
    /// Creates a new factory.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Creates a fresh, empty pipeline builder.
    #[must_use]
    pub fn create(&self) -> PipelineBuilder {
        PipelineBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// A test pipe that records its invocation order.
    struct OrderTrackingPipe {
        name: &'static str,
        order: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Pipe for OrderTrackingPipe {
        fn name(&self) -> &'static str {
            self.name
        }

        fn process<'a>(
            &'a self,
            ctx: &'a PipeContext,
            next: Next<'a>,
        ) -> BoxFuture<'a, PipeResult> {
            Box::pin(async move {
                self.order.lock().unwrap().push(self.name);
                next.run(ctx).await
            })
        }
    }

    /// A test pipe that answers without invoking downstream.
    struct ShortCircuitPipe;

    impl Pipe for ShortCircuitPipe {
        fn name(&self) -> &'static str {
            "short-circuit"
        }

        fn process<'a>(
            &'a self,
            _ctx: &'a PipeContext,
            _next: Next<'a>,
        ) -> BoxFuture<'a, PipeResult> {
            Box::pin(async { Ok(Arc::new("intercepted".to_string()) as PipeValue) })
        }
    }

    #[tokio::test]
    async fn test_pipes_execute_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));

        let pipeline = Pipeline::builder()
            .add(OrderTrackingPipe {
                name: "first",
                order: order.clone(),
            })
            .add(OrderTrackingPipe {
                name: "second",
                order: order.clone(),
            })
            .add(OrderTrackingPipe {
                name: "third",
                order: order.clone(),
            })
            .build();

        let result: String = pipeline
            .run(
                || async { Ok::<_, Infallible>("done".to_string()) },
                |_opts| {},
            )
            .await
            .unwrap();

        assert_eq!(result, "done");
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_empty_pipeline_invokes_the_operation_directly() {
        let pipeline = Pipeline::builder().build();
        assert_eq!(pipeline.pipe_count(), 0);

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let result = pipeline
            .run(
                move || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, Infallible>(41 + 1)
                },
                |_opts| {},
            )
            .await
            .unwrap();

        assert_eq!(result, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_short_circuit_skips_the_operation() {
        let pipeline = Pipeline::builder().add(ShortCircuitPipe).build();

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let result: String = pipeline
            .run(
                move || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, Infallible>("never".to_string())
                },
                |_opts| {},
            )
            .await
            .unwrap();

        assert_eq!(result, "intercepted");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_operation_failure_surfaces_unchanged() {
        let pipeline = Pipeline::builder().build();

        let err = pipeline
            .run(
                || async { Err::<String, _>(std::io::Error::other("boom")) },
                |_opts| {},
            )
            .await
            .unwrap_err();

        let inner = err.as_operation().expect("should be an operation failure");
        assert_eq!(inner.to_string(), "boom");
        assert!(inner.downcast_ref::<std::io::Error>().is_some());
    }

    #[test]
    fn test_builder_mutation_does_not_affect_built_pipelines() {
        let order = Arc::new(Mutex::new(Vec::new()));

        let builder = PipelineBuilder::new().add(OrderTrackingPipe {
            name: "only",
            order: order.clone(),
        });
        let first = builder.build();

        let builder = builder.add(OrderTrackingPipe {
            name: "extra",
            order: order.clone(),
        });
        let second = builder.build();

        assert_eq!(first.pipe_count(), 1);
        assert_eq!(second.pipe_count(), 2);
        assert_eq!(first.pipe_names(), vec!["only"]);
        assert_eq!(second.pipe_names(), vec!["only", "extra"]);
    }

    #[test]
    fn test_factory_creates_independent_builders() {
        let factory = PipelineBuilderFactory::new();

        let one = factory.create().add(ShortCircuitPipe).build();
        let two = factory.create().build();

        assert_eq!(one.pipe_count(), 1);
        assert_eq!(two.pipe_count(), 0);
        assert_eq!(one.pipe_names(), vec!["short-circuit"]);
    }
}
