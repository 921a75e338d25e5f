//! Schema type definitions
//!
//! Supported types:
//! - string: UTF-8 string
//! - int: 64-bit signed integer
//! - bool: Boolean
//! - float: 64-bit floating point
//! - date: RFC 3339 timestamp string
//! - object: Nested object with field schema
//! - array: Homogeneous array with element type
//!
//! Constraints are declared per field and compiled into validator chains
//! by the registry. A constraint on a type it does not apply to is
//! rejected at compile time, not silently ignored.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::ValidatorDefinition;

/// Supported field types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Int,
    /// Boolean
    Bool,
    /// 64-bit floating point
    Float,
    /// RFC 3339 timestamp string
    Date,
    /// Nested object with its own field schema
    Object {
        /// Nested field definitions
        fields: IndexMap<String, FieldDef>,
    },
    /// Homogeneous array with single element type
    Array {
        /// Element type (boxed to allow recursive types)
        element_type: Box<FieldType>,
    },
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Bool => "bool",
            FieldType::Float => "float",
            FieldType::Date => "date",
            FieldType::Object { .. } => "object",
            FieldType::Array { .. } => "array",
        }
    }
}

/// Field definition with declared constraints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field data type
    #[serde(flatten)]
    pub field_type: FieldType,
    /// Whether the field must carry a value
    #[serde(default)]
    pub required: bool,
    /// Lower bound for int, float and date fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Value>,
    /// Upper bound for int, float and date fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Value>,
    /// Permitted values
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    /// Pattern a string field must match
    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Minimum string length in characters
    #[serde(rename = "minlength", default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    /// Maximum string length in characters
    #[serde(rename = "maxlength", default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Message overrides keyed by validator kind
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub messages: IndexMap<String, String>,
    /// Custom validators, attached programmatically only
    #[serde(skip)]
    pub validators: Vec<ValidatorDefinition>,
}

impl FieldDef {
    /// Creates an unconstrained optional field of the given type.
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            min: None,
            max: None,
            enum_values: None,
            pattern: None,
            min_length: None,
            max_length: None,
            messages: IndexMap::new(),
            validators: Vec::new(),
        }
    }

    /// Creates an object field from nested definitions.
    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, FieldDef)>,
        K: Into<String>,
    {
        Self::new(FieldType::Object {
            fields: fields
                .into_iter()
                .map(|(name, def)| (name.into(), def))
                .collect(),
        })
    }

    /// Creates an array field with the given element type.
    pub fn array(element_type: FieldType) -> Self {
        Self::new(FieldType::Array {
            element_type: Box::new(element_type),
        })
    }

    /// Marks the field required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the lower bound.
    pub fn min(mut self, bound: impl Into<Value>) -> Self {
        self.min = Some(bound.into());
        self
    }

    /// Sets the upper bound.
    pub fn max(mut self, bound: impl Into<Value>) -> Self {
        self.max = Some(bound.into());
        self
    }

    /// Restricts the field to the listed values.
    pub fn enum_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Requires string values to match the pattern.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Sets the minimum string length.
    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    /// Sets the maximum string length.
    pub fn max_length(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }

    /// Overrides the failure message for one validator kind.
    pub fn message(mut self, kind: impl Into<String>, template: impl Into<String>) -> Self {
        self.messages.insert(kind.into(), template.into());
        self
    }

    /// Attaches a custom validator, run after the built-in chain.
    pub fn with_validator(mut self, validator: ValidatorDefinition) -> Self {
        self.validators.push(validator);
        self
    }
}

/// Complete schema definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    /// Schema name, usually the collection it governs
    pub name: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Field definitions in declaration order
    #[serde(default)]
    pub fields: IndexMap<String, FieldDef>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: IndexMap::new(),
        }
    }

    /// Declares a field. Declaration order is preserved.
    pub fn field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        self.fields.insert(name.into(), def);
        self
    }

    /// Flattens the schema into dotted paths, depth first.
    ///
    /// Object fields appear before their children, so `profile` precedes
    /// `profile.email`.
    pub fn paths(&self) -> Vec<(String, &FieldDef)> {
        let mut paths = Vec::new();
        collect_paths("", &self.fields, &mut paths);
        paths
    }
}

fn collect_paths<'s>(
    prefix: &str,
    fields: &'s IndexMap<String, FieldDef>,
    paths: &mut Vec<(String, &'s FieldDef)>,
) {
    for (name, def) in fields {
        let path = make_path(prefix, name);
        if let FieldType::Object { fields } = &def.field_type {
            paths.push((path.clone(), def));
            collect_paths(&path, fields, paths);
        } else {
            paths.push((path, def));
        }
    }
}

/// Builds a dotted path from a prefix and a field name
fn make_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}
