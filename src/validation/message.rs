//! Failure message rendering
//!
//! Message templates carry `{VALUE}`, `{PATH}` and `{KIND}` tokens that are
//! substituted when a validator fails. String values render raw (no quotes);
//! everything else renders in its JSON form.

use serde_json::Value;

/// Token replaced with the failing value's string representation.
pub const VALUE_TOKEN: &str = "{VALUE}";
/// Token replaced with the field path.
pub const PATH_TOKEN: &str = "{PATH}";
/// Token replaced with the validator kind.
pub const KIND_TOKEN: &str = "{KIND}";

/// Renders a value the way messages and error displays show it.
///
/// Strings render raw so `grease` stays `grease`; other values use their
/// JSON form (`null`, `42`, `["a","b"]`).
pub fn value_repr(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Substitutes message tokens against a concrete failure.
///
/// The value substitutes last, so token text inside a failing value renders
/// literally instead of being rewritten by the path and kind passes.
pub fn render_template(template: &str, value: &Value, path: &str, kind: &str) -> String {
    template
        .replace(PATH_TOKEN, path)
        .replace(KIND_TOKEN, kind)
        .replace(VALUE_TOKEN, &value_repr(value))
}
