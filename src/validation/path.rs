//! Per-path validator chains
//!
//! A `PathValidator` owns every validator bound to one dotted path and
//! evaluates them in registration order. The first failure settles the
//! path; later validators are not invoked.

use serde_json::Value;
use tracing::debug;

use super::context::ValidationContext;
use super::definition::{Predicate, PredicateResult, ValidatorDefinition};
use super::errors::ValidatorError;

/// Resolves a dotted path against a document.
///
/// Returns `None` when any segment is missing or an intermediate value is
/// not an object. Array indexing is not supported.
pub fn resolve_path<'v>(document: &'v Value, path: &str) -> Option<&'v Value> {
    let mut cursor = document;
    for segment in path.split('.') {
        cursor = cursor.as_object()?.get(segment)?;
    }
    Some(cursor)
}

/// The ordered validator chain for one dotted path.
#[derive(Debug, Clone)]
pub struct PathValidator {
    path: String,
    validators: Vec<ValidatorDefinition>,
}

impl PathValidator {
    pub fn new(path: impl Into<String>, validators: Vec<ValidatorDefinition>) -> Self {
        Self {
            path: path.into(),
            validators,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn validators(&self) -> &[ValidatorDefinition] {
        &self.validators
    }

    /// Appends a validator to the end of the chain.
    pub fn attach(&mut self, validator: ValidatorDefinition) {
        self.validators.push(validator);
    }

    /// Whether any validator in the chain must be awaited.
    pub fn has_async(&self) -> bool {
        self.validators.iter().any(|def| def.is_async())
    }

    /// Evaluates the chain against a resolved value.
    ///
    /// `None` means the path was absent from the subject; absent values
    /// (including JSON `null`) only run `required` validators, recorded
    /// against a `null` value.
    pub async fn evaluate(
        &self,
        value: Option<&Value>,
        ctx: &ValidationContext<'_>,
    ) -> Option<ValidatorError> {
        match value.filter(|v| !v.is_null()) {
            None => {
                let absent = Value::Null;
                for def in &self.validators {
                    if !def.is_required() {
                        continue;
                    }
                    if let Some(error) = self.invoke(def, &absent, ctx).await {
                        return Some(error);
                    }
                }
                None
            }
            Some(value) => {
                for def in &self.validators {
                    if let Some(error) = self.invoke(def, value, ctx).await {
                        return Some(error);
                    }
                }
                None
            }
        }
    }

    /// Evaluates the chain without awaiting.
    ///
    /// Asynchronous validators cannot produce a verdict here and are
    /// skipped; use [`evaluate`](Self::evaluate) to include them.
    pub fn evaluate_sync(
        &self,
        value: Option<&Value>,
        ctx: &ValidationContext<'_>,
    ) -> Option<ValidatorError> {
        match value.filter(|v| !v.is_null()) {
            None => {
                let absent = Value::Null;
                for def in &self.validators {
                    if !def.is_required() {
                        continue;
                    }
                    if let Some(error) = self.invoke_sync(def, &absent, ctx) {
                        return Some(error);
                    }
                }
                None
            }
            Some(value) => {
                for def in &self.validators {
                    if let Some(error) = self.invoke_sync(def, value, ctx) {
                        return Some(error);
                    }
                }
                None
            }
        }
    }

    async fn invoke(
        &self,
        def: &ValidatorDefinition,
        value: &Value,
        ctx: &ValidationContext<'_>,
    ) -> Option<ValidatorError> {
        let verdict = match def.predicate() {
            Predicate::Sync(f) => f(value, ctx),
            Predicate::Async(f) => f(value, ctx).await,
        };
        self.settle(def, value, verdict)
    }

    fn invoke_sync(
        &self,
        def: &ValidatorDefinition,
        value: &Value,
        ctx: &ValidationContext<'_>,
    ) -> Option<ValidatorError> {
        let verdict = match def.predicate() {
            Predicate::Sync(f) => f(value, ctx),
            Predicate::Async(_) => {
                debug!(
                    "Skipping async validator '{}' for path '{}' in synchronous run",
                    def.kind(),
                    self.path
                );
                return None;
            }
        };
        self.settle(def, value, verdict)
    }

    fn settle(
        &self,
        def: &ValidatorDefinition,
        value: &Value,
        verdict: PredicateResult,
    ) -> Option<ValidatorError> {
        match verdict {
            Ok(true) => None,
            Ok(false) => Some(self.failure(def, value)),
            Err(cause) => Some(self.failure(def, value).with_cause(cause.to_string())),
        }
    }

    fn failure(&self, def: &ValidatorDefinition, value: &Value) -> ValidatorError {
        let message = def.message().render(value, &self.path, def.kind());
        ValidatorError::new(def.kind(), self.path.clone(), value.clone(), message)
    }
}
