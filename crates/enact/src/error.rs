//! Failure taxonomy for action invocation.
//!
//! Every failure that can reach the dispatcher is an [`ActionError`].
//! Navigation signals are a distinct kind, recognized structurally rather
//! than by matching a sentinel substring, so an ordinary failure
//! whose text happens to mention navigation cannot be mistaken for one.

use enact_trap::Panicked;

/// A control-flow escape: the invocation should not produce a result, the
/// host should navigate instead.
///
/// Raised from a handler or an authenticator (typically via [`redirect`]),
/// it passes through the dispatcher unchanged as an `Err` rather than being
/// folded into an [`ActionResult`](crate::ActionResult).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("navigation to {location}")]
pub struct NavigationSignal {
    location: String,
}

impl NavigationSignal {
    /// Creates a signal targeting `location`.
    pub fn new(location: impl Into<String>) -> Self {
        NavigationSignal {
            location: location.into(),
        }
    }

    /// The navigation target.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }
}

/// Shorthand for failing with a [`NavigationSignal`] wrapped in an
/// [`ActionError`], ready to return from a handler or authenticator:
///
/// ```rust,ignore
/// return Err(redirect("/login"));
/// ```
pub fn redirect(location: impl Into<String>) -> ActionError {
    ActionError::Signal(NavigationSignal::new(location))
}

/// Any failure raised during action invocation.
///
/// Handlers usually declare `Result<O, ActionError>` and lean on the
/// `anyhow` conversion for everything that is not a signal; `?` and
/// `.context(..)` both work. A signal buried inside a wrapped error is
/// still recognized when folding.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// A navigation signal; escapes the dispatcher unchanged.
    #[error(transparent)]
    Signal(#[from] NavigationSignal),

    /// A plain failure message.
    #[error("{0}")]
    Message(String),

    /// A runtime fault captured by the trap.
    #[error(transparent)]
    Panic(#[from] Panicked),

    /// Anything else, carried through `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ActionError {
    /// Creates a plain message failure.
    pub fn message(message: impl Into<String>) -> Self {
        ActionError::Message(message.into())
    }

    /// The navigation signal, if this failure is (or wraps) one.
    ///
    /// Looks through the `Other` arm's source chain, including a signal
    /// nested inside a wrapped `ActionError`, so `.context(..)` around a
    /// redirect does not stop it escaping.
    #[must_use]
    pub fn as_signal(&self) -> Option<&NavigationSignal> {
        match self {
            ActionError::Signal(signal) => Some(signal),
            ActionError::Other(err) => err.chain().find_map(|cause| {
                cause.downcast_ref::<NavigationSignal>().or_else(|| {
                    cause
                        .downcast_ref::<ActionError>()
                        .and_then(ActionError::as_signal)
                })
            }),
            _ => None,
        }
    }

    /// Returns true if this failure is (or wraps) a navigation signal.
    #[must_use]
    pub fn is_signal(&self) -> bool {
        self.as_signal().is_some()
    }
}
