//! The uniform result shape returned by action invocation.

use std::collections::BTreeMap;

use serde::ser::{Serialize, Serializer};
use serde::Deserialize;

/// Validation messages grouped by field path.
///
/// Paths are dot-joined (`user.name`); messages are kept verbatim as the
/// validator produced them. Messages that belong to no particular field
/// (the document itself was rejected) live under [`FieldErrors::ROOT`].
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Key for messages reported against the whole input.
    pub const ROOT: &'static str = "";

    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        FieldErrors::default()
    }

    /// Appends a message under `field`.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// The messages recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Number of fields with at least one message.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no field has a message.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(field, messages)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }
}

impl From<BTreeMap<String, Vec<String>>> for FieldErrors {
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        FieldErrors(map)
    }
}

impl IntoIterator for FieldErrors {
    type Item = (String, Vec<String>);
    type IntoIter = std::collections::btree_map::IntoIter<String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Outcome of one action invocation.
///
/// Exactly one of the three cases, mirroring the wire envelope the
/// serialized form produces:
///
/// | variant | serialized form |
/// |---|---|
/// | `Ok` | `{"result": <output>}` |
/// | `Invalid` | `{"error": {"fieldErrors": {..}}}` |
/// | `Failed` | `{"error": {"message": ".."}}` |
///
/// `result` and `error` are mutually exclusive by construction, and within
/// `error` only one of `fieldErrors`/`message` ever appears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult<O> {
    /// The handler ran to completion and returned a value.
    Ok { result: O },
    /// Validation rejected the input; the handler never ran.
    Invalid { field_errors: FieldErrors },
    /// The handler (or principal resolution) raised a non-navigation
    /// failure.
    Failed { message: String },
}

impl<O> ActionResult<O> {
    /// Wraps a handler value.
    pub fn ok(result: O) -> Self {
        ActionResult::Ok { result }
    }

    /// Wraps a validation rejection.
    pub fn invalid(field_errors: impl Into<FieldErrors>) -> Self {
        ActionResult::Invalid {
            field_errors: field_errors.into(),
        }
    }

    /// Wraps a folded execution failure.
    pub fn failed(message: impl Into<String>) -> Self {
        ActionResult::Failed {
            message: message.into(),
        }
    }

    /// Returns true for the success case.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, ActionResult::Ok { .. })
    }

    /// Returns true for the validation-rejection case.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, ActionResult::Invalid { .. })
    }

    /// Returns true for the folded-failure case.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, ActionResult::Failed { .. })
    }

    /// The handler's value, if the invocation succeeded.
    #[must_use]
    pub fn result(&self) -> Option<&O> {
        match self {
            ActionResult::Ok { result } => Some(result),
            _ => None,
        }
    }

    /// The validation messages, if validation rejected the input.
    #[must_use]
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ActionResult::Invalid { field_errors } => Some(field_errors),
            _ => None,
        }
    }

    /// The failure message, if the invocation folded a failure.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            ActionResult::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Consumes the result, returning the handler's value if the
    /// invocation succeeded.
    #[must_use]
    pub fn into_result(self) -> Option<O> {
        match self {
            ActionResult::Ok { result } => Some(result),
            _ => None,
        }
    }
}

impl<O: Serialize> Serialize for ActionResult<O> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(serde::Serialize)]
        struct ResultEnvelope<'a, O> {
            result: &'a O,
        }

        #[derive(serde::Serialize)]
        struct ErrorEnvelope<B> {
            error: B,
        }

        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        struct FieldErrorBody<'a> {
            field_errors: &'a FieldErrors,
        }

        #[derive(serde::Serialize)]
        struct MessageBody<'a> {
            message: &'a str,
        }

        match self {
            ActionResult::Ok { result } => ResultEnvelope { result }.serialize(serializer),
            ActionResult::Invalid { field_errors } => ErrorEnvelope {
                error: FieldErrorBody { field_errors },
            }
            .serialize(serializer),
            ActionResult::Failed { message } => ErrorEnvelope {
                error: MessageBody { message },
            }
            .serialize(serializer),
        }
    }
}
