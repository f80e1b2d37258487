//! The consumed validation contract and its JSON Schema implementation.

use std::marker::PhantomData;

use jsonschema::error::ValidationErrorKind;
use jsonschema::{ValidationError, Validator};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::result::FieldErrors;

/// Non-raising validation: either the parsed, typed data or the per-field
/// messages — never a panic, never a raw error.
pub trait Schema: Send + Sync {
    /// The parsed representation on success.
    type Output;

    /// Validates `input` and parses it into [`Schema::Output`].
    fn parse(&self, input: &Value) -> Result<Self::Output, FieldErrors>;
}

/// A schema document that failed to compile at definition time.
#[derive(Debug, thiserror::Error)]
#[error("invalid schema document: {message}")]
pub struct SchemaError {
    message: String,
}

impl SchemaError {
    /// What the schema compiler objected to.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A [`Schema`] backed by a compiled JSON Schema document.
///
/// The document is compiled once at construction; each `parse` collects
/// every validation error, grouped by dot-joined field path with the
/// validator's own messages verbatim, and on acceptance deserializes the
/// input into `T`.
pub struct JsonSchema<T> {
    validator: Validator,
    _output: PhantomData<fn() -> T>,
}

impl<T> JsonSchema<T> {
    /// Compiles `document` into a validator.
    pub fn new(document: Value) -> Result<Self, SchemaError> {
        let validator = jsonschema::validator_for(&document).map_err(|err| SchemaError {
            message: err.to_string(),
        })?;
        Ok(JsonSchema {
            validator,
            _output: PhantomData,
        })
    }
}

impl<T> std::fmt::Debug for JsonSchema<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonSchema").finish_non_exhaustive()
    }
}

impl<T: DeserializeOwned> Schema for JsonSchema<T> {
    type Output = T;

    fn parse(&self, input: &Value) -> Result<T, FieldErrors> {
        let mut errors = FieldErrors::new();
        for err in self.validator.iter_errors(input) {
            errors.push(field_key(&err), err.to_string());
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        // The document passed the schema; a mismatch with T at this point
        // belongs to no particular field.
        serde_json::from_value(input.clone()).map_err(|err| {
            let mut errors = FieldErrors::new();
            errors.push(FieldErrors::ROOT, err.to_string());
            errors
        })
    }
}

/// Field path for one validation error.
///
/// Instance paths come back as JSON pointers (`/user/name`) and are
/// dot-joined. A missing required property is reported at the object's
/// path, so the missing property's own name is appended to land the
/// message where field-level consumers expect it.
fn field_key(err: &ValidationError) -> String {
    let base = dotted(&err.instance_path().to_string());
    if let ValidationErrorKind::Required { property } = err.kind() {
        let name = property
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| property.to_string());
        return if base.is_empty() {
            name
        } else {
            format!("{base}.{name}")
        };
    }
    base
}

fn dotted(pointer: &str) -> String {
    pointer.trim_start_matches('/').replace('/', ".")
}
