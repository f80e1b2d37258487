//! Action definition and invocation.
//!
//! An action is defined once (shape, schema, optional authenticator,
//! optional failure observer, handler) and invoked many times. The three
//! entry points ([`form`], [`object`], [`no_input`]) fix the input shape
//! statically; `.authenticated(..)` switches the builder into its
//! principal-carrying state, which changes the handler arity the terminal
//! `.handler(..)` call accepts. Nothing about an invocation is inferred
//! from the runtime shape of its argument.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::auth::Authenticator;
use crate::error::ActionError;
use crate::form::FormData;
use crate::handler::{run_trapped, ObserverFn, RunFn, RunFuture, RunOutcome};
use crate::result::ActionResult;
use crate::schema::Schema;

/// Marker: per-call input is a [`FormData`], flattened before validation.
#[derive(Debug, Clone, Copy)]
pub struct FormEncoded;

/// Marker: per-call input is an already-structured [`Value`], validated
/// unchanged.
#[derive(Debug, Clone, Copy)]
pub struct PlainObject;

/// Marker: the action takes no input and skips validation entirely.
#[derive(Debug, Clone, Copy)]
pub struct NoInput;

/// The input-shape discriminant, decided at definition time and recorded
/// on the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// Key/value form entries, flattened to an object.
    FormEncoded,
    /// A structured value, passed through as-is.
    PlainObject,
    /// No per-call input.
    NoInput,
}

/// Builder state: no authenticator configured.
pub struct NoAuth;

/// Builder state: an authenticator is configured; the handler receives
/// its principal.
pub struct WithAuth<P>(Arc<dyn Authenticator<Principal = P>>);

/// Starts a form-encoded action validated by `schema`.
pub fn form<S>(schema: S) -> FormBuilder<S::Output>
where
    S: Schema + 'static,
{
    FormBuilder {
        schema: Arc::new(schema),
        auth: NoAuth,
        name: None,
        observer: None,
    }
}

/// Starts a plain-object action validated by `schema`.
pub fn object<S>(schema: S) -> ObjectBuilder<S::Output>
where
    S: Schema + 'static,
{
    ObjectBuilder {
        schema: Arc::new(schema),
        auth: NoAuth,
        name: None,
        observer: None,
    }
}

/// Starts an action that takes no input.
pub fn no_input() -> NoInputBuilder {
    NoInputBuilder {
        auth: NoAuth,
        name: None,
        observer: None,
    }
}

/// Builder for form-encoded actions.
pub struct FormBuilder<T, A = NoAuth> {
    schema: Arc<dyn Schema<Output = T>>,
    auth: A,
    name: Option<String>,
    observer: Option<ObserverFn>,
}

/// Builder for plain-object actions.
pub struct ObjectBuilder<T, A = NoAuth> {
    schema: Arc<dyn Schema<Output = T>>,
    auth: A,
    name: Option<String>,
    observer: Option<ObserverFn>,
}

/// Builder for no-input actions.
pub struct NoInputBuilder<A = NoAuth> {
    auth: A,
    name: Option<String>,
    observer: Option<ObserverFn>,
}

impl<T, A> FormBuilder<T, A> {
    /// Sets the diagnostic label carried in log events.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Registers the failure observer, called with every non-navigation
    /// failure before it is folded. A panic inside the observer is not
    /// trapped and unwinds to the invocation's caller.
    pub fn on_failure(mut self, observer: impl Fn(&ActionError) + Send + Sync + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }
}

impl<T> FormBuilder<T, NoAuth> {
    /// Requires a resolved principal; the handler gains a second argument.
    pub fn authenticated<A>(self, authenticator: A) -> FormBuilder<T, WithAuth<A::Principal>>
    where
        A: Authenticator + 'static,
    {
        FormBuilder {
            schema: self.schema,
            auth: WithAuth(Arc::new(authenticator)),
            name: self.name,
            observer: self.observer,
        }
    }

    /// Installs the handler and returns the invocation handle.
    pub fn handler<F, Fut, O, E>(self, handler: F) -> Action<FormEncoded, T, O>
    where
        T: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, E>> + Send + 'static,
        E: Into<ActionError> + 'static,
        O: Send + 'static,
    {
        Action::new(
            ShapeKind::FormEncoded,
            false,
            self.name,
            Some(self.schema),
            unauthenticated_run(handler),
            self.observer,
        )
    }
}

impl<T, P> FormBuilder<T, WithAuth<P>> {
    /// Installs the handler and returns the invocation handle.
    pub fn handler<F, Fut, O, E>(self, handler: F) -> Action<FormEncoded, T, O>
    where
        T: Send + 'static,
        P: Send + 'static,
        F: Fn(T, P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, E>> + Send + 'static,
        E: Into<ActionError> + 'static,
        O: Send + 'static,
    {
        Action::new(
            ShapeKind::FormEncoded,
            true,
            self.name,
            Some(self.schema),
            authenticated_run(self.auth.0, handler),
            self.observer,
        )
    }
}

impl<T, A> ObjectBuilder<T, A> {
    /// Sets the diagnostic label carried in log events.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Registers the failure observer, called with every non-navigation
    /// failure before it is folded. A panic inside the observer is not
    /// trapped and unwinds to the invocation's caller.
    pub fn on_failure(mut self, observer: impl Fn(&ActionError) + Send + Sync + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }
}

impl<T> ObjectBuilder<T, NoAuth> {
    /// Requires a resolved principal; the handler gains a second argument.
    pub fn authenticated<A>(self, authenticator: A) -> ObjectBuilder<T, WithAuth<A::Principal>>
    where
        A: Authenticator + 'static,
    {
        ObjectBuilder {
            schema: self.schema,
            auth: WithAuth(Arc::new(authenticator)),
            name: self.name,
            observer: self.observer,
        }
    }

    /// Installs the handler and returns the invocation handle.
    pub fn handler<F, Fut, O, E>(self, handler: F) -> Action<PlainObject, T, O>
    where
        T: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, E>> + Send + 'static,
        E: Into<ActionError> + 'static,
        O: Send + 'static,
    {
        Action::new(
            ShapeKind::PlainObject,
            false,
            self.name,
            Some(self.schema),
            unauthenticated_run(handler),
            self.observer,
        )
    }
}

impl<T, P> ObjectBuilder<T, WithAuth<P>> {
    /// Installs the handler and returns the invocation handle.
    pub fn handler<F, Fut, O, E>(self, handler: F) -> Action<PlainObject, T, O>
    where
        T: Send + 'static,
        P: Send + 'static,
        F: Fn(T, P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, E>> + Send + 'static,
        E: Into<ActionError> + 'static,
        O: Send + 'static,
    {
        Action::new(
            ShapeKind::PlainObject,
            true,
            self.name,
            Some(self.schema),
            authenticated_run(self.auth.0, handler),
            self.observer,
        )
    }
}

impl<A> NoInputBuilder<A> {
    /// Sets the diagnostic label carried in log events.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Registers the failure observer, called with every non-navigation
    /// failure before it is folded. A panic inside the observer is not
    /// trapped and unwinds to the invocation's caller.
    pub fn on_failure(mut self, observer: impl Fn(&ActionError) + Send + Sync + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }
}

impl NoInputBuilder<NoAuth> {
    /// Requires a resolved principal; the handler receives it as its only
    /// argument.
    pub fn authenticated<A>(self, authenticator: A) -> NoInputBuilder<WithAuth<A::Principal>>
    where
        A: Authenticator + 'static,
    {
        NoInputBuilder {
            auth: WithAuth(Arc::new(authenticator)),
            name: self.name,
            observer: self.observer,
        }
    }

    /// Installs the handler and returns the invocation handle.
    pub fn handler<F, Fut, O, E>(self, handler: F) -> Action<NoInput, (), O>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, E>> + Send + 'static,
        E: Into<ActionError> + 'static,
        O: Send + 'static,
    {
        Action::new(
            ShapeKind::NoInput,
            false,
            self.name,
            None,
            unauthenticated_run(move |_: ()| handler()),
            self.observer,
        )
    }
}

impl<P> NoInputBuilder<WithAuth<P>> {
    /// Installs the handler and returns the invocation handle.
    pub fn handler<F, Fut, O, E>(self, handler: F) -> Action<NoInput, (), O>
    where
        P: Send + 'static,
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, E>> + Send + 'static,
        E: Into<ActionError> + 'static,
        O: Send + 'static,
    {
        Action::new(
            ShapeKind::NoInput,
            true,
            self.name,
            None,
            authenticated_run(self.auth.0, move |_: (), principal: P| handler(principal)),
            self.observer,
        )
    }
}

fn unauthenticated_run<T, F, Fut, O, E>(handler: F) -> RunFn<T, O>
where
    T: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, E>> + Send + 'static,
    E: Into<ActionError> + 'static,
    O: Send + 'static,
{
    let handler = Arc::new(handler);
    Arc::new(move |input: T| -> RunFuture<O> {
        let handler = Arc::clone(&handler);
        Box::pin(run_trapped(move || (*handler)(input)))
    })
}

fn authenticated_run<T, P, F, Fut, O, E>(
    authenticator: Arc<dyn Authenticator<Principal = P>>,
    handler: F,
) -> RunFn<T, O>
where
    T: Send + 'static,
    P: Send + 'static,
    F: Fn(T, P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, E>> + Send + 'static,
    E: Into<ActionError> + 'static,
    O: Send + 'static,
{
    let handler = Arc::new(handler);
    Arc::new(move |input: T| -> RunFuture<O> {
        let handler = Arc::clone(&handler);
        let authenticator = Arc::clone(&authenticator);
        Box::pin(async move {
            // Resolution stays outside the trap: its failures are the
            // caller's to see (signals) or to fold, never `Panicked`.
            let principal = match authenticator.resolve().await {
                Ok(principal) => principal,
                Err(err) => return RunOutcome::AuthFailed(err),
            };
            run_trapped(move || (*handler)(input, principal)).await
        })
    })
}

/// An invocation handle: the immutable product of a builder.
///
/// Cheap to clone, safe to invoke concurrently; all configuration is
/// captured at definition time. `S` is the shape marker and fixes which
/// `invoke` signature exists.
pub struct Action<S, T, O> {
    inner: Arc<ActionInner<T, O>>,
    _shape: PhantomData<fn() -> S>,
}

/// Alias for form-encoded handles.
pub type FormAction<T, O> = Action<FormEncoded, T, O>;

/// Alias for plain-object handles.
pub type ObjectAction<T, O> = Action<PlainObject, T, O>;

/// Alias for no-input handles.
pub type NoInputAction<O> = Action<NoInput, (), O>;

struct ActionInner<T, O> {
    name: Option<String>,
    kind: ShapeKind,
    authenticated: bool,
    schema: Option<Arc<dyn Schema<Output = T>>>,
    run: RunFn<T, O>,
    observer: Option<ObserverFn>,
}

impl<S, T, O> Clone for Action<S, T, O> {
    fn clone(&self) -> Self {
        Action {
            inner: Arc::clone(&self.inner),
            _shape: PhantomData,
        }
    }
}

impl<S, T, O> fmt::Debug for Action<S, T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.label())
            .field("shape", &self.inner.kind)
            .field("authenticated", &self.inner.authenticated)
            .field("observer", &self.inner.observer.is_some())
            .finish()
    }
}

impl<S, T, O> Action<S, T, O> {
    fn new(
        kind: ShapeKind,
        authenticated: bool,
        name: Option<String>,
        schema: Option<Arc<dyn Schema<Output = T>>>,
        run: RunFn<T, O>,
        observer: Option<ObserverFn>,
    ) -> Self {
        trace!(
            action = name.as_deref().unwrap_or("action"),
            shape = ?kind,
            authenticated,
            "action defined"
        );
        Action {
            inner: Arc::new(ActionInner {
                name,
                kind,
                authenticated,
                schema,
                run,
                observer,
            }),
            _shape: PhantomData,
        }
    }

    /// The diagnostic label (`.name(..)` at definition, default
    /// `"action"`).
    #[must_use]
    pub fn label(&self) -> &str {
        self.inner.name.as_deref().unwrap_or("action")
    }

    /// The shape discriminant recorded at definition time.
    #[must_use]
    pub fn shape(&self) -> ShapeKind {
        self.inner.kind
    }

    /// Whether a principal is resolved before the handler runs.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.authenticated
    }

    async fn run_validated(&self, input: Value) -> Result<ActionResult<O>, ActionError> {
        let Some(schema) = self.inner.schema.as_deref() else {
            unreachable!("input-carrying actions always hold a schema");
        };
        let parsed = match schema.parse(&input) {
            Ok(parsed) => parsed,
            Err(field_errors) => {
                debug!(
                    action = self.label(),
                    fields = field_errors.len(),
                    "validation rejected input"
                );
                return Ok(ActionResult::invalid(field_errors));
            }
        };
        let outcome = (self.inner.run)(parsed).await;
        self.finish(outcome)
    }

    fn finish(&self, outcome: RunOutcome<O>) -> Result<ActionResult<O>, ActionError> {
        match outcome {
            RunOutcome::Done(value) => {
                trace!(action = self.label(), "handler completed");
                Ok(ActionResult::ok(value))
            }
            RunOutcome::AuthFailed(err) => {
                debug!(action = self.label(), "principal resolution failed");
                self.fold(err)
            }
            RunOutcome::HandlerFailed(err) => {
                debug!(action = self.label(), "handler failed");
                self.fold(err)
            }
        }
    }

    fn fold(&self, err: ActionError) -> Result<ActionResult<O>, ActionError> {
        if err.is_signal() {
            debug!(action = self.label(), "navigation signal passed through");
            return Err(err);
        }
        if let Some(observer) = &self.inner.observer {
            observer(&err);
        }
        Ok(ActionResult::failed(err.to_string()))
    }
}

impl<T, O> Action<FormEncoded, T, O> {
    /// Invokes with form entries: flatten, validate, run, fold.
    ///
    /// Returns `Err` only for a navigation signal raised during principal
    /// resolution or handler execution; every other outcome is an
    /// [`ActionResult`].
    pub async fn invoke(&self, form: FormData) -> Result<ActionResult<O>, ActionError> {
        self.run_validated(form.into_object()).await
    }
}

impl<T, O> Action<PlainObject, T, O> {
    /// Invokes with a structured value: validate, run, fold.
    ///
    /// Returns `Err` only for a navigation signal raised during principal
    /// resolution or handler execution; every other outcome is an
    /// [`ActionResult`].
    pub async fn invoke(&self, input: Value) -> Result<ActionResult<O>, ActionError> {
        self.run_validated(input).await
    }
}

impl<O> Action<NoInput, (), O> {
    /// Invokes with no input: run, fold. Validation is skipped entirely.
    ///
    /// Returns `Err` only for a navigation signal raised during principal
    /// resolution or handler execution; every other outcome is an
    /// [`ActionResult`].
    pub async fn invoke(&self) -> Result<ActionResult<O>, ActionError> {
        let outcome = (self.inner.run)(()).await;
        self.finish(outcome)
    }
}
