//! Validator registry compiled from a schema
//!
//! The registry is the bridge between schema declarations and the
//! validation subsystem: every dotted path in the schema gets one
//! [`PathValidator`] holding its compiled chain. Compilation happens
//! once; runners borrow the registry and never mutate it.

use indexmap::IndexMap;
use tracing::debug;

use super::builtins::compile_field;
use super::errors::SchemaResult;
use super::types::Schema;
use crate::validation::{PathValidator, ValidatorDefinition};

/// Compiled validator chains indexed by dotted path, in declaration order.
#[derive(Debug, Clone)]
pub struct ValidatorRegistry {
    name: String,
    validators: IndexMap<String, PathValidator>,
}

impl ValidatorRegistry {
    /// Compiles a schema into a registry.
    ///
    /// Every path appears in the registry, constrained or not, so custom
    /// validators can be registered against any declared field later.
    /// Constraint faults abort compilation.
    pub fn from_schema(schema: &Schema) -> SchemaResult<Self> {
        let mut validators = IndexMap::new();
        for (path, def) in schema.paths() {
            let chain = compile_field(&path, def)?;
            validators.insert(path.clone(), PathValidator::new(path, chain));
        }

        debug!(
            "Compiled schema '{}' into {} path validators",
            schema.name,
            validators.len()
        );
        Ok(Self {
            name: schema.name.clone(),
            validators,
        })
    }

    /// The name of the schema this registry was compiled from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends a validator to a path's chain.
    ///
    /// A path the schema never declared gets a fresh chain, enumerated
    /// after the declared paths.
    pub fn register(&mut self, path: &str, validator: ValidatorDefinition) {
        self.validators
            .entry(path.to_string())
            .or_insert_with(|| PathValidator::new(path, Vec::new()))
            .attach(validator);
    }

    /// Returns the validator chain for a path, empty when none is registered.
    pub fn lookup(&self, path: &str) -> &[ValidatorDefinition] {
        self.validators
            .get(path)
            .map(PathValidator::validators)
            .unwrap_or(&[])
    }

    /// Checks whether a path is registered.
    pub fn contains(&self, path: &str) -> bool {
        self.validators.contains_key(path)
    }

    /// Returns all chains in declaration order.
    pub fn validators(&self) -> impl Iterator<Item = &PathValidator> {
        self.validators.values()
    }

    /// Returns all registered paths in declaration order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.validators.keys().map(String::as_str)
    }

    /// Whether any registered chain carries an asynchronous validator.
    pub fn has_async(&self) -> bool {
        self.validators.values().any(PathValidator::has_async)
    }

    /// Returns the number of registered paths.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}
