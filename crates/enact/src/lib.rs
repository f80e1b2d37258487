//! Validated action dispatch with definition-time configuration.
//!
//! An action is declared once with its input shape, validation schema,
//! optional authenticator, optional failure observer, and handler; the
//! builder returns an immutable handle that is invoked many times. Every
//! invocation walks the same pipeline: normalize the input for its
//! declared shape, validate it, resolve the principal if one was
//! required, run the handler with failures trapped, and fold whatever
//! happened into an [`ActionResult`] with exactly three wire shapes.
//!
//! # Features
//!
//! - Three statically-chosen input shapes: [`form`] (key/value entries,
//!   flattened to an object), [`object`] (an already-structured value),
//!   and [`no_input`].
//! - Validation failures short-circuit to per-field errors; the handler
//!   is never invoked and no principal is resolved.
//! - Handler errors and panics are trapped and folded into a plain
//!   message; navigation signals ([`redirect`]) pass through to the
//!   caller unchanged.
//! - An optional [`on_failure`](FormBuilder::on_failure) observer sees
//!   every folded failure; failures of the observer itself are not
//!   trapped.
//!
//! # Example
//!
//! ```rust,ignore
//! use enact::{form, redirect, ActionError, FnAuthenticator, JsonSchema};
//! use serde::Deserialize;
//! use serde_json::json;
//!
//! #[derive(Deserialize)]
//! struct Signup {
//!     email: String,
//! }
//!
//! let schema = JsonSchema::<Signup>::new(json!({
//!     "type": "object",
//!     "properties": {"email": {"type": "string", "minLength": 3}},
//!     "required": ["email"],
//! }))?;
//!
//! let signup = form(schema)
//!     .name("signup")
//!     .authenticated(FnAuthenticator::new(|| async { current_session().await }))
//!     .handler(|input: Signup, session: Session| async move {
//!         create_account(&session, &input.email).await?;
//!         Ok::<_, ActionError>(json!({"created": input.email}))
//!     });
//!
//! let result = signup.invoke(enact::form_data! { "email" => "a@b.c" }).await?;
//! assert!(result.is_ok());
//! ```

mod action;
mod auth;
mod error;
mod form;
mod handler;
mod result;
mod schema;

pub use action::{
    form, no_input, object, Action, FormAction, FormBuilder, FormEncoded, NoAuth, NoInput,
    NoInputAction, NoInputBuilder, ObjectAction, ObjectBuilder, PlainObject, ShapeKind, WithAuth,
};
pub use auth::{Authenticator, FnAuthenticator, ResolveFuture};
pub use error::{redirect, ActionError, NavigationSignal};
pub use form::FormData;
pub use handler::HandlerResult;
pub use result::{ActionResult, FieldErrors};
pub use schema::{JsonSchema, Schema, SchemaError};

pub use enact_trap::{trap, trap_future, Outcome, Panicked};
