//! Schema subsystem for veridoc
//!
//! Schemas declare typed fields with constraints and compile into
//! validator registries consumed by the validation subsystem.
//!
//! # Design Principles
//!
//! - Field declaration order is preserved end to end
//! - Constraints compile to the same chains as hand-built validators
//! - Constraint faults surface at compile time, not mid-validation
//! - A compiled registry is immutable during a validation run

mod builtins;
mod errors;
mod registry;
mod types;

pub use builtins::compile_field;
pub use errors::{DefinitionError, SchemaResult};
pub use registry::ValidatorRegistry;
pub use types::{FieldDef, FieldType, Schema};
