//! Validation failure types
//!
//! Per-path failures are collected into a single aggregate error; individual
//! failures are never surfaced on their own. Both shapes are fixed:
//! - `ValidatorError` displays as
//!   ``Validator "<kind>" failed for path <path> with value `<value>` ``
//! - `ValidationError` serializes as
//!   `{name: "ValidationError", message: "Validation failed", errors: {...}}`
//!   with the `errors` mapping keyed by path in evaluation order.

use std::fmt;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::Value;

use super::message::value_repr;

/// Validator kind for required-field failures.
pub const KIND_REQUIRED: &str = "required";
/// Validator kind for lower-bound failures on numeric and date fields.
pub const KIND_MIN: &str = "min";
/// Validator kind for upper-bound failures on numeric and date fields.
pub const KIND_MAX: &str = "max";
/// Validator kind for permitted-value failures.
pub const KIND_ENUM: &str = "enum";
/// Validator kind for pattern failures on string fields.
pub const KIND_MATCH: &str = "match";
/// Validator kind for minimum-length failures on string fields.
pub const KIND_MINLENGTH: &str = "minlength";
/// Validator kind for maximum-length failures on string fields.
pub const KIND_MAXLENGTH: &str = "maxlength";
/// Default kind for custom validators without a caller-supplied label.
pub const KIND_USER_DEFINED: &str = "user defined";

/// A single validator failure on one path.
///
/// Immutable once constructed. `cause` carries the rendered error of a
/// predicate that failed by erroring rather than by returning false.
#[derive(Debug, Clone)]
pub struct ValidatorError {
    kind: String,
    path: String,
    value: Value,
    message: String,
    cause: Option<String>,
}

impl ValidatorError {
    /// Creates a failure record.
    pub fn new(
        kind: impl Into<String>,
        path: impl Into<String>,
        value: Value,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            path: path.into(),
            value,
            message: message.into(),
            cause: None,
        }
    }

    /// Attaches the underlying failure of an erroring predicate.
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// The validator kind (`required`, `min`, ..., or a custom label).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The failing field path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The value that failed validation.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The rendered failure message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The underlying predicate error, if the predicate errored.
    pub fn cause(&self) -> Option<&str> {
        self.cause.as_deref()
    }
}

impl fmt::Display for ValidatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Validator \"{}\" failed for path {} with value `{}`",
            self.kind,
            self.path,
            value_repr(&self.value)
        )
    }
}

impl std::error::Error for ValidatorError {}

// The wire shape is fixed to {kind, path, value, message}; the cause is
// engine-side context only.
impl Serialize for ValidatorError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidatorError", 4)?;
        state.serialize_field("kind", &self.kind)?;
        state.serialize_field("path", &self.path)?;
        state.serialize_field("value", &self.value)?;
        state.serialize_field("message", &self.message)?;
        state.end()
    }
}

/// Aggregate validation failure for one run.
///
/// Holds at most one `ValidatorError` per path; insertion order is the path
/// evaluation order of the run that produced it.
#[derive(Debug, Clone, Default)]
pub struct ValidationError {
    errors: IndexMap<String, ValidatorError>,
}

impl ValidationError {
    /// Fixed error name on the wire.
    pub const NAME: &'static str = "ValidationError";
    /// Fixed top-level message.
    pub const MESSAGE: &'static str = "Validation failed";

    /// Empty aggregate.
    pub fn new() -> Self {
        Self {
            errors: IndexMap::new(),
        }
    }

    /// Records a failure under its path.
    ///
    /// The first failure recorded for a path wins; later ones are dropped.
    pub fn add(&mut self, error: ValidatorError) {
        self.errors.entry(error.path().to_string()).or_insert(error);
    }

    /// Collects failures into a result: `Ok(())` when none occurred.
    pub fn collect(failures: impl IntoIterator<Item = ValidatorError>) -> Result<(), Self> {
        let mut aggregate = Self::new();
        for failure in failures {
            aggregate.add(failure);
        }
        aggregate.into_result()
    }

    /// Converts the aggregate into the run's result.
    pub fn into_result(self) -> Result<(), Self> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Whether no path failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of failing paths.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The failure recorded for a path, if any.
    pub fn get(&self, path: &str) -> Option<&ValidatorError> {
        self.errors.get(path)
    }

    /// Failing paths in evaluation order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    /// Failures in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValidatorError)> {
        self.errors.iter().map(|(path, error)| (path.as_str(), error))
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", Self::NAME, Self::MESSAGE)
    }
}

impl std::error::Error for ValidationError {}

impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationError", 3)?;
        state.serialize_field("name", Self::NAME)?;
        state.serialize_field("message", Self::MESSAGE)?;
        state.serialize_field("errors", &self.errors)?;
        state.end()
    }
}
