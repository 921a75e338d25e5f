//! Validation subsystem for veridoc
//!
//! Runs registered validator chains against documents and update payloads
//! and aggregates failures into a single, serializable error value.
//!
//! # Design Principles
//!
//! - Validators run in registration order per path
//! - First failure settles a path; one error per path in the aggregate
//! - Aggregate entry order matches registration order, never completion order
//! - Absent values only run `required` validators
//! - Asynchronous and synchronous runs agree wherever both can vote
//! - Updates validate touched paths only, and only when requested

mod context;
mod definition;
mod errors;
mod message;
mod path;
mod runner;
mod update;

pub use context::{ExecutionMode, ValidationContext};
pub use definition::{
    AsyncPredicate, MessageSource, Predicate, PredicateError, PredicateResult, SyncPredicate,
    ValidatorDefinition,
};
pub use errors::{
    ValidationError, ValidatorError, KIND_ENUM, KIND_MATCH, KIND_MAX, KIND_MAXLENGTH, KIND_MIN,
    KIND_MINLENGTH, KIND_REQUIRED, KIND_USER_DEFINED,
};
pub use message::{render_template, value_repr, KIND_TOKEN, PATH_TOKEN, VALUE_TOKEN};
pub use path::{resolve_path, PathValidator};
pub use runner::ValidationRunner;
pub use update::{UpdateOptions, UpdateValidator};
