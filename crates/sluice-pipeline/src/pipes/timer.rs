//! Timing instrumentation pipe.
//!
//! Measures the elapsed wall-clock time of everything downstream of it (all
//! subsequent pipes plus the wrapped operation) and reports it as a pure
//! side effect. The measurement is taken even when downstream fails; the
//! original result or failure is then returned unchanged, so timing never
//! masks errors or alters values.
//!
//! # Pipeline Position
//!
//! Register the timer before the pipes it should measure. With
//! `[TimerPipe, CachePipe]` a cache hit is still timed, while the skipped
//! operation is not re-invoked.

use crate::context::PipeContext;
use crate::pipe::{BoxFuture, Next, Pipe, PipeResult};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Callback receiving the measured duration of each invocation.
///
/// Fire-and-forget: the pipe never inspects a return value and never lets
/// the observer alter the invocation outcome.
pub type ElapsedObserver = Arc<dyn Fn(Duration) + Send + Sync>;

/// Pipe that measures and reports downstream elapsed time.
///
/// Reports go to the `tracing` subscriber, and optionally to an observer
/// callback installed with [`with_observer`](Self::with_observer).
pub struct TimerPipe {
    observer: Option<ElapsedObserver>,
}

impl TimerPipe {
    /// Creates a timer that reports through `tracing` only.
    #[must_use]
    pub fn new() -> Self {
        Self { observer: None }
    }

    /// Creates a timer that additionally invokes `observer` with every
    /// measured duration.
    #[must_use]
    pub fn with_observer<F>(observer: F) -> Self
    where
        F: Fn(Duration) + Send + Sync + 'static,
    {
        Self {
            observer: Some(Arc::new(observer)),
        }
    }
}

impl Default for TimerPipe {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipe for TimerPipe {
    fn name(&self) -> &'static str {
        "timer"
    }

    fn process<'a>(&'a self, ctx: &'a PipeContext, next: Next<'a>) -> BoxFuture<'a, PipeResult> {
        Box::pin(async move {
            let start = Instant::now();

            // Must call next exactly once; the measurement covers everything
            // downstream, success or failure.
            let result = next.run(ctx).await;
            let elapsed = start.elapsed();

            if let Some(observer) = &self.observer {
                observer(elapsed);
            }

            let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
            match &result {
                Ok(_) => tracing::info!(
                    invocation_id = %ctx.invocation_id(),
                    elapsed_ms,
                    "downstream completed"
                ),
                Err(error) => tracing::warn!(
                    invocation_id = %ctx.invocation_id(),
                    elapsed_ms,
                    %error,
                    "downstream failed"
                ),
            }

            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::PipeOptions;
    use crate::pipe::PipeValue;
    use sluice_core::SluiceError;
    use std::sync::Mutex;

    fn ok_operation() -> Next<'static> {
        Next::operation(|| Box::pin(async { Ok(Arc::new("ok".to_string()) as PipeValue) }))
    }

    fn failing_operation() -> Next<'static> {
        Next::operation(|| {
            Box::pin(async { Err(SluiceError::operation(std::io::Error::other("boom"))) })
        })
    }

    fn recording_timer() -> (TimerPipe, Arc<Mutex<Vec<Duration>>>) {
        let observed = Arc::new(Mutex::new(Vec::new()));
        let sink = observed.clone();
        let pipe = TimerPipe::with_observer(move |elapsed| sink.lock().unwrap().push(elapsed));
        (pipe, observed)
    }

    #[test]
    fn test_pipe_name() {
        assert_eq!(TimerPipe::new().name(), "timer");
    }

    #[tokio::test]
    async fn test_reports_elapsed_time_on_success() {
        let (pipe, observed) = recording_timer();
        let ctx = PipeContext::new(PipeOptions::default());

        let result = pipe.process(&ctx, ok_operation()).await;

        assert!(result.is_ok());
        assert_eq!(observed.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reports_elapsed_time_and_reraises_on_failure() {
        let (pipe, observed) = recording_timer();
        let ctx = PipeContext::new(PipeOptions::default());

        let err = pipe.process(&ctx, failing_operation()).await.unwrap_err();

        // The elapsed duration is still observed, and the original failure
        // comes back untouched.
        assert_eq!(observed.lock().unwrap().len(), 1);
        let inner = err.as_operation().expect("should be an operation failure");
        assert_eq!(inner.to_string(), "boom");
    }

    #[tokio::test]
    async fn test_result_flows_through_unmodified() {
        let (pipe, _observed) = recording_timer();
        let ctx = PipeContext::new(PipeOptions::default());

        let value = pipe.process(&ctx, ok_operation()).await.unwrap();
        assert_eq!(value.downcast_ref::<String>().unwrap(), "ok");
    }
}
