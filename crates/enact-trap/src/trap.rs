//! Entry points that convert raised failures into [`Outcome`] values.
//!
//! Two forms, chosen statically at the call site: [`trap`] for a
//! zero-argument fallible computation, [`trap_future`] for a pending
//! future. Neither ever panics itself; `Err` returns and panics alike land
//! in the failure arm.

use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use futures_util::FutureExt;

use crate::outcome::Outcome;

/// A runtime fault captured by the trap.
///
/// The panic payload is reduced to a message: `&str` and `String` payloads
/// are kept verbatim, anything else becomes `"unknown panic"`. `Display`
/// is the bare message so downstream folding can surface it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Panicked {
    message: String,
}

impl Panicked {
    /// The message derived from the panic payload.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        Panicked { message }
    }
}

/// Runs a fallible computation, capturing any failure it raises.
///
/// An `Err` return becomes `Outcome::Failure` directly; a panic is caught
/// and carried as a [`Panicked`] converted into `E`. The caller needs no
/// enclosing catch.
///
/// ```
/// use enact_trap::{trap, Outcome, Panicked};
///
/// let outcome: Outcome<i32, Panicked> = trap(|| Ok(2 + 2));
/// assert_eq!(outcome.value(), Some(&4));
/// ```
pub fn trap<T, E, F>(op: F) -> Outcome<T, E>
where
    F: FnOnce() -> Result<T, E>,
    E: From<Panicked>,
{
    match panic::catch_unwind(AssertUnwindSafe(op)) {
        Ok(Ok(value)) => Outcome::Value(value),
        Ok(Err(err)) => Outcome::Failure(err),
        Err(payload) => Outcome::Failure(E::from(Panicked::from_payload(&*payload))),
    }
}

/// Awaits a future, capturing any failure it raises.
///
/// The async counterpart of [`trap`]: an `Err` output becomes
/// `Outcome::Failure`, and a panic at any poll is caught and carried as a
/// [`Panicked`] converted into `E`. The returned future itself never
/// panics and never rejects.
pub async fn trap_future<T, E, Fut>(fut: Fut) -> Outcome<T, E>
where
    Fut: Future<Output = Result<T, E>>,
    E: From<Panicked>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(Ok(value)) => Outcome::Value(value),
        Ok(Err(err)) => Outcome::Failure(err),
        Err(payload) => Outcome::Failure(E::from(Panicked::from_payload(&*payload))),
    }
}
