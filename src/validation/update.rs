//! Update payload validation
//!
//! Update payloads carry operator blocks instead of full documents. Only
//! paths the update actually touches are validated: `$set` entries and
//! bare top-level keys supply values, `$unset` entries remove them, and
//! every other operator is left alone. Validation is opt-in through
//! [`UpdateOptions`].

use futures_util::future::join_all;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::context::{ExecutionMode, ValidationContext};
use super::errors::ValidationError;
use super::path::resolve_path;
use crate::schema::ValidatorRegistry;

const SET_OPERATOR: &str = "$set";
const UNSET_OPERATOR: &str = "$unset";

/// How an update touches one dotted path.
#[derive(Debug, Clone, Copy)]
enum Touch<'u> {
    /// The path is written with this value.
    Set(&'u Value),
    /// The path is removed.
    Unset,
}

/// Per-call validation options for updates.
///
/// Validation is off unless `run_validators` is set. The `context` picks
/// what custom validators observe as their subject: nothing in document
/// mode, the update payload itself in query mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateOptions {
    pub run_validators: bool,
    pub context: ExecutionMode,
}

impl UpdateOptions {
    /// Options that run validators in document mode.
    pub fn enabled() -> Self {
        Self {
            run_validators: true,
            context: ExecutionMode::Document,
        }
    }

    /// Options that run validators with the update payload as subject.
    pub fn enabled_with_query_context() -> Self {
        Self {
            run_validators: true,
            context: ExecutionMode::Query,
        }
    }
}

/// Validates update payloads against a compiled registry.
#[derive(Debug, Clone, Copy)]
pub struct UpdateValidator<'a> {
    registry: &'a ValidatorRegistry,
}

impl<'a> UpdateValidator<'a> {
    pub fn new(registry: &'a ValidatorRegistry) -> Self {
        Self { registry }
    }

    /// Validates an update payload, awaiting asynchronous validators.
    pub async fn validate_update(
        &self,
        update: &Value,
        options: &UpdateOptions,
    ) -> Result<(), ValidationError> {
        if !options.run_validators {
            debug!("Update validation not requested, skipping");
            return Ok(());
        }

        let touches = collect_touches(update);
        debug!("Validating update with {} touched paths", touches.len());
        let ctx = self.context_for(update, options);

        let units = self.registry.validators().filter_map(|chain| {
            let value = touch_target(chain.path(), &touches)?;
            let ctx = ctx;
            Some(async move {
                tokio::task::yield_now().await;
                chain.evaluate(value, &ctx).await
            })
        });

        let failures = join_all(units).await;
        ValidationError::collect(failures.into_iter().flatten())
    }

    /// Validates an update payload without awaiting.
    ///
    /// Asynchronous validators are skipped, matching the behavior of
    /// synchronous document validation.
    pub fn validate_update_sync(
        &self,
        update: &Value,
        options: &UpdateOptions,
    ) -> Result<(), ValidationError> {
        if !options.run_validators {
            debug!("Update validation not requested, skipping");
            return Ok(());
        }

        let touches = collect_touches(update);
        debug!("Validating update with {} touched paths", touches.len());
        let ctx = self.context_for(update, options);

        let failures = self.registry.validators().filter_map(|chain| {
            let value = touch_target(chain.path(), &touches)?;
            chain.evaluate_sync(value, &ctx)
        });

        ValidationError::collect(failures)
    }

    fn context_for<'u>(&self, update: &'u Value, options: &UpdateOptions) -> ValidationContext<'u> {
        match options.context {
            ExecutionMode::Document => ValidationContext::detached(),
            ExecutionMode::Query => ValidationContext::for_query(update),
        }
    }
}

/// Flattens an update payload into per-path touches.
///
/// `$set` entries take precedence over bare top-level keys, which in turn
/// take precedence over `$unset` entries for the same path. Operators
/// other than `$set` and `$unset` never touch a path.
fn collect_touches(update: &Value) -> IndexMap<&str, Touch<'_>> {
    let mut touches = IndexMap::new();
    let update = match update.as_object() {
        Some(update) => update,
        None => return touches,
    };

    if let Some(set) = update.get(SET_OPERATOR).and_then(Value::as_object) {
        for (path, value) in set {
            touches.entry(path.as_str()).or_insert(Touch::Set(value));
        }
    }

    for (key, value) in update {
        if key.starts_with('$') {
            continue;
        }
        touches.entry(key.as_str()).or_insert(Touch::Set(value));
    }

    if let Some(unset) = update.get(UNSET_OPERATOR).and_then(Value::as_object) {
        for path in unset.keys() {
            touches.entry(path.as_str()).or_insert(Touch::Unset);
        }
    }

    touches
}

/// Resolves what an update leaves at a registered path.
///
/// Outer `None` means the path is untouched and must not be validated.
/// `Some(None)` means the path is touched but ends up absent. An exact
/// touch beats ancestor touches; among ancestors the longest prefix wins,
/// with the remaining segments resolved inside the written value.
fn touch_target<'u>(
    path: &str,
    touches: &IndexMap<&str, Touch<'u>>,
) -> Option<Option<&'u Value>> {
    if let Some(touch) = touches.get(path) {
        return Some(match *touch {
            Touch::Set(value) => Some(value),
            Touch::Unset => None,
        });
    }

    let mut end = path.len();
    while let Some(dot) = path[..end].rfind('.') {
        if let Some(touch) = touches.get(&path[..dot]) {
            return Some(match *touch {
                Touch::Set(value) => resolve_path(value, &path[dot + 1..]),
                Touch::Unset => None,
            });
        }
        end = dot;
    }

    None
}
