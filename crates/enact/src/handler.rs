//! Erased handler plumbing shared by the shape builders.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use enact_trap::{trap_future, Outcome};

use crate::error::ActionError;

/// What a handler produces: an output value or an [`ActionError`].
///
/// Handlers may return any `Result<O, E>` with `E: Into<ActionError>`;
/// this alias is the common concrete annotation.
pub type HandlerResult<O> = Result<O, ActionError>;

/// Boxed future produced by the composed pipeline.
pub(crate) type RunFuture<O> = Pin<Box<dyn Future<Output = RunOutcome<O>> + Send + 'static>>;

/// The pipeline composed once at definition time: validated input in,
/// staged outcome out.
pub(crate) type RunFn<T, O> = Arc<dyn Fn(T) -> RunFuture<O> + Send + Sync>;

/// Observer invoked with each non-navigation failure before folding.
pub(crate) type ObserverFn = Arc<dyn Fn(&ActionError) + Send + Sync>;

/// Where an invocation ended up after the input stage.
#[derive(Debug)]
pub(crate) enum RunOutcome<O> {
    /// The handler completed with a value.
    Done(O),
    /// Principal resolution failed. Deliberately not trapped.
    AuthFailed(ActionError),
    /// The handler raised; the trap captured it.
    HandlerFailed(ActionError),
}

/// Runs the user's handler inside the trap.
///
/// `make` is called inside the trapped future, so a panic while building
/// the future is captured the same as one raised mid-execution.
pub(crate) async fn run_trapped<O, Fut, E>(make: impl FnOnce() -> Fut) -> RunOutcome<O>
where
    Fut: Future<Output = Result<O, E>>,
    E: Into<ActionError>,
{
    let outcome: Outcome<O, ActionError> =
        trap_future(async move { make().await.map_err(Into::into) }).await;
    match outcome {
        Outcome::Value(value) => RunOutcome::Done(value),
        Outcome::Failure(err) => RunOutcome::HandlerFailed(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_trapped_value() {
        let result: RunOutcome<i32> =
            run_trapped(|| async { Ok::<_, ActionError>(9) }).await;
        assert!(matches!(result, RunOutcome::Done(9)));
    }

    #[tokio::test]
    async fn test_run_trapped_error() {
        let result: RunOutcome<i32> =
            run_trapped(|| async { Err::<i32, _>(ActionError::message("bad")) }).await;
        match result {
            RunOutcome::HandlerFailed(err) => assert_eq!(err.to_string(), "bad"),
            other => panic!("expected HandlerFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_run_trapped_panic_during_future_construction() {
        let result: RunOutcome<i32> = run_trapped(
            || -> std::future::Ready<Result<i32, ActionError>> { panic!("eager fault") },
        )
        .await;
        match result {
            RunOutcome::HandlerFailed(err) => assert_eq!(err.to_string(), "eager fault"),
            other => panic!("expected HandlerFailed, got {other:?}"),
        }
    }
}
