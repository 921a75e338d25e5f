//! Built-in constraint validators
//!
//! Compiles a field definition into its validator chain. Chain order is
//! fixed regardless of declaration order in the definition:
//!
//! 1. required
//! 2. min / max
//! 3. enum
//! 4. match
//! 5. minlength / maxlength
//! 6. custom validators, in attachment order
//!
//! Constraints are type aware: bounds apply to int, float and date
//! fields, string constraints to string fields. Declaring a constraint
//! on a type it does not apply to fails compilation. A value whose shape
//! does not fit a constraint fails that constraint at validation time.

use chrono::{DateTime, FixedOffset};
use regex::Regex;
use serde_json::Value;

use super::errors::{DefinitionError, SchemaResult};
use super::types::{FieldDef, FieldType};
use crate::validation::{
    value_repr, MessageSource, Predicate, ValidatorDefinition, KIND_ENUM, KIND_MATCH, KIND_MAX,
    KIND_MAXLENGTH, KIND_MIN, KIND_MINLENGTH, KIND_REQUIRED,
};

const REQUIRED_TEMPLATE: &str = "Path `{PATH}` is required.";
const MIN_TEMPLATE: &str = "Path `{PATH}` ({VALUE}) is less than minimum allowed value ({MIN}).";
const MAX_TEMPLATE: &str = "Path `{PATH}` ({VALUE}) is more than maximum allowed value ({MAX}).";
const ENUM_TEMPLATE: &str = "`{VALUE}` is not a valid enum value for path `{PATH}`.";
const MATCH_TEMPLATE: &str = "Path `{PATH}` is invalid ({VALUE}).";
const MINLENGTH_TEMPLATE: &str =
    "Path `{PATH}` (`{VALUE}`) is shorter than the minimum allowed length ({MINLENGTH}).";
const MAXLENGTH_TEMPLATE: &str =
    "Path `{PATH}` (`{VALUE}`) is longer than the maximum allowed length ({MAXLENGTH}).";

/// Which side of a range a constraint guards
#[derive(Debug, Clone, Copy)]
enum Bound {
    Min,
    Max,
}

/// Compiles one field definition into its ordered validator chain.
pub fn compile_field(path: &str, def: &FieldDef) -> SchemaResult<Vec<ValidatorDefinition>> {
    let mut chain = Vec::new();

    if def.required {
        chain.push(required_validator(def));
    }
    if let Some(limit) = &def.min {
        chain.push(bound_validator(path, def, Bound::Min, limit)?);
    }
    if let Some(limit) = &def.max {
        chain.push(bound_validator(path, def, Bound::Max, limit)?);
    }
    if let Some(values) = &def.enum_values {
        chain.push(enum_validator(path, def, values)?);
    }
    if let Some(pattern) = &def.pattern {
        chain.push(pattern_validator(path, def, pattern)?);
    }
    if let Some(limit) = def.min_length {
        chain.push(length_validator(path, def, Bound::Min, limit)?);
    }
    if let Some(limit) = def.max_length {
        chain.push(length_validator(path, def, Bound::Max, limit)?);
    }

    chain.extend(def.validators.iter().cloned());
    Ok(chain)
}

fn required_validator(def: &FieldDef) -> ValidatorDefinition {
    // Empty strings count as missing on string fields.
    let string_typed = matches!(def.field_type, FieldType::String);
    let predicate = Predicate::sync(move |value, _| match value {
        Value::Null => false,
        Value::String(s) => !(string_typed && s.is_empty()),
        _ => true,
    });

    ValidatorDefinition::new(
        KIND_REQUIRED,
        predicate,
        MessageSource::template(message_for(def, KIND_REQUIRED, REQUIRED_TEMPLATE)),
    )
}

fn bound_validator(
    path: &str,
    def: &FieldDef,
    bound: Bound,
    limit: &Value,
) -> SchemaResult<ValidatorDefinition> {
    let (kind, template, token) = match bound {
        Bound::Min => (KIND_MIN, MIN_TEMPLATE, "{MIN}"),
        Bound::Max => (KIND_MAX, MAX_TEMPLATE, "{MAX}"),
    };

    let predicate = match def.field_type {
        FieldType::Int | FieldType::Float => {
            let limit = limit.as_f64().ok_or_else(|| DefinitionError::InvalidBound {
                path: path.to_string(),
                constraint: kind.to_string(),
                reason: format!("expected a number, got {}", limit),
            })?;
            match bound {
                Bound::Min => Predicate::sync(move |value, _| {
                    value.as_f64().map(|v| v >= limit).unwrap_or(false)
                }),
                Bound::Max => Predicate::sync(move |value, _| {
                    value.as_f64().map(|v| v <= limit).unwrap_or(false)
                }),
            }
        }
        FieldType::Date => {
            let raw = limit.as_str().ok_or_else(|| DefinitionError::InvalidBound {
                path: path.to_string(),
                constraint: kind.to_string(),
                reason: format!("expected an RFC 3339 string, got {}", limit),
            })?;
            let limit =
                DateTime::parse_from_rfc3339(raw).map_err(|e| DefinitionError::InvalidBound {
                    path: path.to_string(),
                    constraint: kind.to_string(),
                    reason: format!("not a valid RFC 3339 timestamp: {}", e),
                })?;
            match bound {
                Bound::Min => Predicate::sync(move |value, _| {
                    parse_date(value).map(|v| v >= limit).unwrap_or(false)
                }),
                Bound::Max => Predicate::sync(move |value, _| {
                    parse_date(value).map(|v| v <= limit).unwrap_or(false)
                }),
            }
        }
        _ => {
            return Err(DefinitionError::InapplicableConstraint {
                path: path.to_string(),
                constraint: kind.to_string(),
                field_type: def.field_type.type_name(),
            })
        }
    };

    let template = bake(&message_for(def, kind, template), token, &value_repr(limit));
    Ok(ValidatorDefinition::new(
        kind,
        predicate,
        MessageSource::template(template),
    ))
}

fn enum_validator(
    path: &str,
    def: &FieldDef,
    values: &[Value],
) -> SchemaResult<ValidatorDefinition> {
    match def.field_type {
        FieldType::String | FieldType::Int | FieldType::Float => {}
        _ => {
            return Err(DefinitionError::InapplicableConstraint {
                path: path.to_string(),
                constraint: KIND_ENUM.to_string(),
                field_type: def.field_type.type_name(),
            })
        }
    }
    if values.is_empty() {
        return Err(DefinitionError::EmptyEnum {
            path: path.to_string(),
        });
    }

    let permitted = values.to_vec();
    let predicate = Predicate::sync(move |value, _| permitted.iter().any(|p| p == value));

    Ok(ValidatorDefinition::new(
        KIND_ENUM,
        predicate,
        MessageSource::template(message_for(def, KIND_ENUM, ENUM_TEMPLATE)),
    ))
}

fn pattern_validator(
    path: &str,
    def: &FieldDef,
    pattern: &str,
) -> SchemaResult<ValidatorDefinition> {
    if !matches!(def.field_type, FieldType::String) {
        return Err(DefinitionError::InapplicableConstraint {
            path: path.to_string(),
            constraint: KIND_MATCH.to_string(),
            field_type: def.field_type.type_name(),
        });
    }
    let regex = Regex::new(pattern).map_err(|e| DefinitionError::InvalidPattern {
        path: path.to_string(),
        reason: e.to_string(),
    })?;

    let predicate =
        Predicate::sync(move |value, _| value.as_str().map(|s| regex.is_match(s)).unwrap_or(false));

    Ok(ValidatorDefinition::new(
        KIND_MATCH,
        predicate,
        MessageSource::template(message_for(def, KIND_MATCH, MATCH_TEMPLATE)),
    ))
}

fn length_validator(
    path: &str,
    def: &FieldDef,
    bound: Bound,
    limit: usize,
) -> SchemaResult<ValidatorDefinition> {
    let (kind, template, token) = match bound {
        Bound::Min => (KIND_MINLENGTH, MINLENGTH_TEMPLATE, "{MINLENGTH}"),
        Bound::Max => (KIND_MAXLENGTH, MAXLENGTH_TEMPLATE, "{MAXLENGTH}"),
    };
    if !matches!(def.field_type, FieldType::String) {
        return Err(DefinitionError::InapplicableConstraint {
            path: path.to_string(),
            constraint: kind.to_string(),
            field_type: def.field_type.type_name(),
        });
    }

    // Lengths are counted in characters, not bytes.
    let predicate = match bound {
        Bound::Min => Predicate::sync(move |value, _| {
            value
                .as_str()
                .map(|s| s.chars().count() >= limit)
                .unwrap_or(false)
        }),
        Bound::Max => Predicate::sync(move |value, _| {
            value
                .as_str()
                .map(|s| s.chars().count() <= limit)
                .unwrap_or(false)
        }),
    };

    let template = bake(&message_for(def, kind, template), token, &limit.to_string());
    Ok(ValidatorDefinition::new(
        kind,
        predicate,
        MessageSource::template(template),
    ))
}

fn parse_date(value: &Value) -> Option<DateTime<FixedOffset>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
}

/// Picks the message template, preferring a per-field override.
fn message_for(def: &FieldDef, kind: &str, default: &str) -> String {
    def.messages
        .get(kind)
        .map(String::as_str)
        .unwrap_or(default)
        .to_string()
}

/// Replaces a bound token with the concrete limit at compile time.
fn bake(template: &str, token: &str, limit: &str) -> String {
    template.replace(token, limit)
}
