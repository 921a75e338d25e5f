//! Execution context for validator predicates
//!
//! Predicates receive an explicit context instead of an implicit receiver.
//! Full-document runs expose the document under validation; update runs
//! expose nothing by default (the full document may not be resident), or the
//! raw update payload when the `query` context option is selected.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Execution context selector for predicate invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Predicates see the document under validation, when one is resident.
    #[default]
    Document,
    /// Predicates see the raw update payload.
    Query,
}

/// Context handed to every predicate invocation.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    mode: ExecutionMode,
    subject: Option<&'a Value>,
}

impl<'a> ValidationContext<'a> {
    /// Context for validating a full document instance.
    pub fn for_document(document: &'a Value) -> Self {
        Self {
            mode: ExecutionMode::Document,
            subject: Some(document),
        }
    }

    /// Context for an update run that exposes the update payload.
    pub fn for_query(update: &'a Value) -> Self {
        Self {
            mode: ExecutionMode::Query,
            subject: Some(update),
        }
    }

    /// Context for an update run with no resident document.
    ///
    /// Predicates that assume subject access must tolerate `None` here.
    pub fn detached() -> Self {
        Self {
            mode: ExecutionMode::Document,
            subject: None,
        }
    }

    /// The selected execution mode.
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// The subject exposed to predicates, if any.
    pub fn subject(&self) -> Option<&'a Value> {
        self.subject
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_context_exposes_subject() {
        let doc = json!({"name": "Alice"});
        let ctx = ValidationContext::for_document(&doc);

        assert_eq!(ctx.mode(), ExecutionMode::Document);
        assert_eq!(ctx.subject(), Some(&doc));
    }

    #[test]
    fn test_query_context_exposes_update() {
        let update = json!({"$set": {"name": "Bob"}});
        let ctx = ValidationContext::for_query(&update);

        assert_eq!(ctx.mode(), ExecutionMode::Query);
        assert_eq!(ctx.subject(), Some(&update));
    }

    #[test]
    fn test_detached_context_has_no_subject() {
        let ctx = ValidationContext::detached();

        assert_eq!(ctx.mode(), ExecutionMode::Document);
        assert!(ctx.subject().is_none());
    }

    #[test]
    fn test_mode_wire_values() {
        assert_eq!(serde_json::to_value(ExecutionMode::Document).unwrap(), json!("document"));
        assert_eq!(serde_json::to_value(ExecutionMode::Query).unwrap(), json!("query"));

        let parsed: ExecutionMode = serde_json::from_value(json!("query")).unwrap();
        assert_eq!(parsed, ExecutionMode::Query);
    }
}
