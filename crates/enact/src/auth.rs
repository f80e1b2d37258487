//! The consumed principal-resolution contract.

use std::future::Future;
use std::pin::Pin;

use crate::error::ActionError;

/// Boxed future returned by [`Authenticator::resolve`].
pub type ResolveFuture<'a, P> =
    Pin<Box<dyn Future<Output = Result<P, ActionError>> + Send + 'a>>;

/// Resolves the authenticated principal for one invocation.
///
/// Called after validation succeeds and before the handler runs, and never
/// wrapped by the trap. Returning `Err(redirect(..))` bounces the caller:
/// the signal passes through the dispatcher unchanged. Any other failure
/// folds into the invocation's `Failed` result.
pub trait Authenticator: Send + Sync {
    /// The resolved identity handed to the handler.
    type Principal;

    /// Produces the principal or fails.
    fn resolve(&self) -> ResolveFuture<'_, Self::Principal>;
}

/// Adapts an async closure into an [`Authenticator`].
///
/// ```rust,ignore
/// let auth = FnAuthenticator::new(|| async { session_user().ok_or(redirect("/login")) });
/// ```
pub struct FnAuthenticator<F> {
    resolve: F,
}

impl<F> FnAuthenticator<F> {
    /// Wraps `resolve`, a closure returning the resolution future.
    pub fn new(resolve: F) -> Self {
        FnAuthenticator { resolve }
    }
}

impl<F, Fut, P> Authenticator for FnAuthenticator<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<P, ActionError>> + Send + 'static,
    P: Send + 'static,
{
    type Principal = P;

    fn resolve(&self) -> ResolveFuture<'_, P> {
        Box::pin((self.resolve)())
    }
}
