//! The two-armed result of a trapped computation.

/// Result of running a computation through [`trap`](crate::trap) or
/// [`trap_future`](crate::trap_future).
///
/// Exactly one arm is populated: `Value` holds the computation's result,
/// `Failure` holds whatever was raised. A `Value` may well look empty —
/// `Outcome::Value(0)`, `Outcome::Value("")` and an empty collection are all
/// successes, so callers discriminate on the arm, never on the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Outcome<T, E> {
    /// The computation completed and produced a value.
    Value(T),
    /// The computation raised; the failure was captured here.
    Failure(E),
}

impl<T, E> Outcome<T, E> {
    /// Returns true if the computation produced a value.
    #[must_use]
    pub fn is_value(&self) -> bool {
        matches!(self, Outcome::Value(_))
    }

    /// Returns true if the computation raised.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    /// The value, if one was produced.
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Value(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    /// The captured failure, if the computation raised.
    #[must_use]
    pub fn failure(&self) -> Option<&E> {
        match self {
            Outcome::Value(_) => None,
            Outcome::Failure(err) => Some(err),
        }
    }

    /// Consumes the outcome, returning the value if present.
    #[must_use]
    pub fn into_value(self) -> Option<T> {
        match self {
            Outcome::Value(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    /// Consumes the outcome, returning the failure if present.
    #[must_use]
    pub fn into_failure(self) -> Option<E> {
        match self {
            Outcome::Value(_) => None,
            Outcome::Failure(err) => Some(err),
        }
    }

    /// Converts back into a plain `Result`.
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Outcome::Value(value) => Ok(value),
            Outcome::Failure(err) => Err(err),
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::Value(value),
            Err(err) => Outcome::Failure(err),
        }
    }
}
