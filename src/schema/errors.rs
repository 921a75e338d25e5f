//! # Schema Definition Errors
//!
//! Errors raised while compiling a schema into a validator registry.
//! These are definition-time faults and are distinct from validation
//! failures, which are reported through the validation subsystem.

use thiserror::Error;

/// Result type for schema compilation
pub type SchemaResult<T> = Result<T, DefinitionError>;

/// Schema definition errors
#[derive(Debug, Clone, Error)]
pub enum DefinitionError {
    // ==================
    // Constraint Errors
    // ==================
    /// Constraint declared on a type it does not apply to
    #[error("Constraint '{constraint}' does not apply to {field_type} path '{path}'")]
    InapplicableConstraint {
        path: String,
        constraint: String,
        field_type: &'static str,
    },

    /// Constraint bound has the wrong shape for the field type
    #[error("Invalid '{constraint}' bound for path '{path}': {reason}")]
    InvalidBound {
        path: String,
        constraint: String,
        reason: String,
    },

    /// Pattern failed to compile
    #[error("Invalid pattern for path '{path}': {reason}")]
    InvalidPattern { path: String, reason: String },

    /// Enum constraint with no permitted values
    #[error("Enum for path '{path}' must list at least one value")]
    EmptyEnum { path: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let error = DefinitionError::InapplicableConstraint {
            path: "active".into(),
            constraint: "min".into(),
            field_type: "bool",
        };
        assert_eq!(
            error.to_string(),
            "Constraint 'min' does not apply to bool path 'active'"
        );

        let error = DefinitionError::EmptyEnum { path: "color".into() };
        assert_eq!(
            error.to_string(),
            "Enum for path 'color' must list at least one value"
        );
    }
}
