//! Validator definitions
//!
//! A validator is a predicate plus a message source, bound to a path by the
//! registry. Predicates are synchronous or asynchronous; an erroring
//! predicate marks the validator failed and carries the error as the
//! failure cause, it never aborts the run.

use std::fmt;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde_json::Value;

use super::context::ValidationContext;
use super::errors::{KIND_REQUIRED, KIND_USER_DEFINED};
use super::message::render_template;

/// Error raised by a predicate itself, as opposed to returning `false`.
pub type PredicateError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of a predicate invocation.
pub type PredicateResult = Result<bool, PredicateError>;

/// Synchronous predicate function.
pub type SyncPredicate =
    Arc<dyn Fn(&Value, &ValidationContext<'_>) -> PredicateResult + Send + Sync>;

/// Asynchronous predicate function returning a deferred verdict.
pub type AsyncPredicate = Arc<
    dyn for<'a> Fn(&'a Value, &'a ValidationContext<'a>) -> BoxFuture<'a, PredicateResult>
        + Send
        + Sync,
>;

/// A validator's accept/reject function.
#[derive(Clone)]
pub enum Predicate {
    /// Evaluated inline by both entry points.
    Sync(SyncPredicate),
    /// Evaluated as a deferred unit; skipped entirely by synchronous runs.
    Async(AsyncPredicate),
}

impl Predicate {
    /// Wraps a plain boolean function as a synchronous predicate.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&Value, &ValidationContext<'_>) -> bool + Send + Sync + 'static,
    {
        Self::Sync(Arc::new(move |value, ctx| Ok(f(value, ctx))))
    }

    /// Wraps a fallible function; `Err` marks the validator failed and
    /// carries the error as the failure cause.
    pub fn try_sync<F>(f: F) -> Self
    where
        F: Fn(&Value, &ValidationContext<'_>) -> PredicateResult + Send + Sync + 'static,
    {
        Self::Sync(Arc::new(f))
    }

    /// Wraps an asynchronous predicate function.
    pub fn async_fn<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a Value, &'a ValidationContext<'a>) -> BoxFuture<'a, PredicateResult>
            + Send
            + Sync
            + 'static,
    {
        Self::Async(Arc::new(f))
    }

    /// Whether this predicate must be awaited.
    pub fn is_async(&self) -> bool {
        matches!(self, Self::Async(_))
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync(_) => f.write_str("Predicate::Sync(..)"),
            Self::Async(_) => f.write_str("Predicate::Async(..)"),
        }
    }
}

/// Where a validator's failure message comes from.
#[derive(Clone)]
pub enum MessageSource {
    /// Template with `{VALUE}`, `{PATH}` and `{KIND}` tokens.
    Template(String),
    /// Function receiving (value, path, kind).
    Generator(Arc<dyn Fn(&Value, &str, &str) -> String + Send + Sync>),
}

impl MessageSource {
    /// Template message.
    pub fn template(template: impl Into<String>) -> Self {
        Self::Template(template.into())
    }

    /// Generated message.
    pub fn generator<F>(f: F) -> Self
    where
        F: Fn(&Value, &str, &str) -> String + Send + Sync + 'static,
    {
        Self::Generator(Arc::new(f))
    }

    /// Renders the message for a concrete failure.
    pub fn render(&self, value: &Value, path: &str, kind: &str) -> String {
        match self {
            Self::Template(template) => render_template(template, value, path, kind),
            Self::Generator(f) => f(value, path, kind),
        }
    }
}

impl fmt::Debug for MessageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template(template) => write!(f, "MessageSource::Template({:?})", template),
            Self::Generator(_) => f.write_str("MessageSource::Generator(..)"),
        }
    }
}

/// Default message for custom validators.
const DEFAULT_CUSTOM_MESSAGE: &str = "Validator failed for path `{PATH}` with value `{VALUE}`";

/// A predicate plus message bound to a path by the registry.
#[derive(Debug, Clone)]
pub struct ValidatorDefinition {
    kind: String,
    predicate: Predicate,
    message: MessageSource,
}

impl ValidatorDefinition {
    /// Creates a definition with an explicit kind and message.
    pub fn new(kind: impl Into<String>, predicate: Predicate, message: MessageSource) -> Self {
        Self {
            kind: kind.into(),
            predicate,
            message,
        }
    }

    /// Custom validator with the default `user defined` kind.
    pub fn custom(predicate: Predicate) -> Self {
        Self::new(
            KIND_USER_DEFINED,
            predicate,
            MessageSource::template(DEFAULT_CUSTOM_MESSAGE),
        )
    }

    /// Custom validator whose label doubles as kind and message.
    pub fn custom_labeled(predicate: Predicate, label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            kind: label.clone(),
            predicate,
            message: MessageSource::Template(label),
        }
    }

    /// Replaces the failure message.
    pub fn with_message(mut self, message: MessageSource) -> Self {
        self.message = message;
        self
    }

    /// The validator kind reported on failure.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The accept/reject function.
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// The failure message source.
    pub fn message(&self) -> &MessageSource {
        &self.message
    }

    /// Whether the predicate must be awaited.
    pub fn is_async(&self) -> bool {
        self.predicate.is_async()
    }

    /// Whether this definition fires on absent values instead of content.
    pub fn is_required(&self) -> bool {
        self.kind == KIND_REQUIRED
    }
}
