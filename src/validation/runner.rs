//! Whole-document validation
//!
//! The runner walks every registered path, resolves its value from the
//! subject document, and evaluates the path's validator chain. Failures
//! from all paths are aggregated into one `ValidationError` whose entry
//! order matches registration order.

use futures_util::future::join_all;
use serde_json::Value;
use tracing::debug;

use super::context::ValidationContext;
use super::errors::ValidationError;
use super::path::resolve_path;
use crate::schema::ValidatorRegistry;

/// Validates whole documents against a compiled registry.
#[derive(Debug, Clone, Copy)]
pub struct ValidationRunner<'a> {
    registry: &'a ValidatorRegistry,
}

impl<'a> ValidationRunner<'a> {
    pub fn new(registry: &'a ValidatorRegistry) -> Self {
        Self { registry }
    }

    /// Validates a document, awaiting asynchronous validators.
    ///
    /// Every path is evaluated as its own deferred unit; no path observes
    /// another path's outcome, so the aggregate is the same regardless of
    /// completion order.
    pub async fn validate(&self, document: &Value) -> Result<(), ValidationError> {
        debug!(
            "Validating document against {} registered paths",
            self.registry.len()
        );
        let ctx = ValidationContext::for_document(document);

        let units = self.registry.validators().map(|chain| {
            let ctx = ctx;
            async move {
                tokio::task::yield_now().await;
                let value = resolve_path(document, chain.path());
                chain.evaluate(value, &ctx).await
            }
        });

        let failures = join_all(units).await;
        ValidationError::collect(failures.into_iter().flatten())
    }

    /// Validates a document without awaiting.
    ///
    /// Asynchronous validators are skipped; a registry that carries any
    /// should be run through [`validate`](Self::validate) for a full
    /// verdict.
    pub fn validate_sync(&self, document: &Value) -> Result<(), ValidationError> {
        debug!(
            "Validating document synchronously against {} registered paths",
            self.registry.len()
        );
        let ctx = ValidationContext::for_document(document);

        let failures = self.registry.validators().filter_map(|chain| {
            let value = resolve_path(document, chain.path());
            chain.evaluate_sync(value, &ctx)
        });

        ValidationError::collect(failures)
    }
}
