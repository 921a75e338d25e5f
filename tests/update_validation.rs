//! Update Validation Tests
//!
//! End-to-end tests for operator payload validation:
//! - Validation is opt-in per call and skipped by default
//! - Only touched paths are validated; untouched constraints stay silent
//! - `$set` supplies values, `$unset` removes them, bare keys imply `$set`
//! - Every other operator is ignored, even when it breaks a constraint
//! - Nested paths validate through ancestor writes
//! - Query context exposes the raw update payload to custom validators

use serde_json::json;
use veridoc::schema::{FieldDef, FieldType, Schema, ValidatorRegistry};
use veridoc::validation::{
    MessageSource, Predicate, UpdateOptions, UpdateValidator, ValidatorDefinition,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn account_schema() -> Schema {
    Schema::new("accounts")
        .field("name", FieldDef::new(FieldType::String).required())
        .field("number", FieldDef::new(FieldType::Int).max(0))
        .field(
            "status",
            FieldDef::new(FieldType::String).enum_values(["open", "closed"]),
        )
        .field(
            "profile",
            FieldDef::object([("email", FieldDef::new(FieldType::String).required())]),
        )
}

fn account_registry() -> ValidatorRegistry {
    ValidatorRegistry::from_schema(&account_schema()).unwrap()
}

// =============================================================================
// Opt-In Gate Tests
// =============================================================================

/// Updates are not validated unless explicitly requested.
#[test]
fn test_validation_is_opt_in() {
    let registry = account_registry();
    let updater = UpdateValidator::new(&registry);

    // Violates max(0), but validation was not requested.
    let update = json!({"$set": {"number": 99}});
    assert!(updater
        .validate_update_sync(&update, &UpdateOptions::default())
        .is_ok());
}

/// The options bag deserializes from its wire names with correct defaults.
#[test]
fn test_options_wire_format() {
    let options: UpdateOptions =
        serde_json::from_value(json!({"runValidators": true, "context": "query"})).unwrap();
    assert_eq!(options, UpdateOptions::enabled_with_query_context());

    let defaults: UpdateOptions = serde_json::from_value(json!({})).unwrap();
    assert!(!defaults.run_validators);
}

// =============================================================================
// Touched Path Tests
// =============================================================================

/// `$set` values run the full validator chain for their path.
#[test]
fn test_set_values_are_validated() {
    let registry = account_registry();
    let updater = UpdateValidator::new(&registry);

    let error = updater
        .validate_update_sync(
            &json!({"$set": {"number": 5, "status": "frozen"}}),
            &UpdateOptions::enabled(),
        )
        .unwrap_err();

    assert_eq!(error.get("number").unwrap().kind(), "max");
    assert_eq!(error.get("status").unwrap().kind(), "enum");
    assert_eq!(error.len(), 2);
}

/// Bare top-level keys validate exactly like `$set` entries.
#[test]
fn test_bare_keys_validate_like_set() {
    let registry = account_registry();
    let updater = UpdateValidator::new(&registry);

    let bare = updater
        .validate_update_sync(&json!({"number": 5}), &UpdateOptions::enabled())
        .unwrap_err();
    let explicit = updater
        .validate_update_sync(&json!({"$set": {"number": 5}}), &UpdateOptions::enabled())
        .unwrap_err();

    assert_eq!(
        serde_json::to_value(&bare).unwrap(),
        serde_json::to_value(&explicit).unwrap()
    );
}

/// Removing a required path fails with a `required` error against null.
#[test]
fn test_unset_of_required_path_fails() {
    let registry = account_registry();
    let updater = UpdateValidator::new(&registry);

    let error = updater
        .validate_update_sync(&json!({"$unset": {"name": 1}}), &UpdateOptions::enabled())
        .unwrap_err();
    let failure = error.get("name").unwrap();
    assert_eq!(failure.kind(), "required");
    assert_eq!(failure.value(), &json!(null));
    assert_eq!(failure.message(), "Path `name` is required.");
}

/// Removing an optional path is allowed.
#[test]
fn test_unset_of_optional_path_passes() {
    let registry = account_registry();
    let updater = UpdateValidator::new(&registry);

    assert!(updater
        .validate_update_sync(&json!({"$unset": {"status": 1}}), &UpdateOptions::enabled())
        .is_ok());
}

/// Constraints on untouched paths stay silent.
#[test]
fn test_untouched_paths_stay_silent() {
    let registry = account_registry();
    let updater = UpdateValidator::new(&registry);

    // "name" is required but the update never touches it.
    assert!(updater
        .validate_update_sync(&json!({"$set": {"number": -1}}), &UpdateOptions::enabled())
        .is_ok());
}

/// Paths not declared in the schema are ignored.
#[test]
fn test_undeclared_paths_are_ignored() {
    let registry = account_registry();
    let updater = UpdateValidator::new(&registry);

    assert!(updater
        .validate_update_sync(
            &json!({"$set": {"nickname": "al"}}),
            &UpdateOptions::enabled()
        )
        .is_ok());
}

// =============================================================================
// Operator Isolation Tests
// =============================================================================

/// `$inc` can push a value past its bound without triggering validation.
#[test]
fn test_inc_is_never_validated() {
    let registry = account_registry();
    let updater = UpdateValidator::new(&registry);

    // max(0) on "number" does not fire for an increment.
    assert!(updater
        .validate_update_sync(&json!({"$inc": {"number": 1}}), &UpdateOptions::enabled())
        .is_ok());
}

/// Unknown operators never touch a path.
#[test]
fn test_unknown_operators_are_ignored() {
    let registry = account_registry();
    let updater = UpdateValidator::new(&registry);

    let update = json!({
        "$push": {"status": "frozen"},
        "$rename": {"name": "title"},
        "$mul": {"number": 10}
    });
    assert!(updater
        .validate_update_sync(&update, &UpdateOptions::enabled())
        .is_ok());
}

/// `$set` wins when the same path appears in `$set` and `$unset`.
#[test]
fn test_set_wins_over_unset() {
    let registry = account_registry();
    let updater = UpdateValidator::new(&registry);

    let update = json!({"$set": {"name": "Ada"}, "$unset": {"name": 1}});
    assert!(updater
        .validate_update_sync(&update, &UpdateOptions::enabled())
        .is_ok());
}

// =============================================================================
// Nested Path Tests
// =============================================================================

/// Dotted `$set` keys touch exactly the nested path.
#[test]
fn test_dotted_keys_touch_nested_paths() {
    let registry = account_registry();
    let updater = UpdateValidator::new(&registry);

    assert!(updater
        .validate_update_sync(
            &json!({"$set": {"profile.email": "a@b.c"}}),
            &UpdateOptions::enabled()
        )
        .is_ok());

    let error = updater
        .validate_update_sync(
            &json!({"$unset": {"profile.email": 1}}),
            &UpdateOptions::enabled()
        )
        .unwrap_err();
    assert_eq!(error.get("profile.email").unwrap().kind(), "required");
}

/// Writing a whole object validates the registered paths beneath it.
#[test]
fn test_object_write_validates_nested_paths() {
    let registry = account_registry();
    let updater = UpdateValidator::new(&registry);

    assert!(updater
        .validate_update_sync(
            &json!({"$set": {"profile": {"email": "a@b.c"}}}),
            &UpdateOptions::enabled()
        )
        .is_ok());

    // The written object drops the required sub-field.
    let error = updater
        .validate_update_sync(
            &json!({"$set": {"profile": {"bio": "hi"}}}),
            &UpdateOptions::enabled()
        )
        .unwrap_err();
    assert_eq!(error.get("profile.email").unwrap().kind(), "required");
}

/// Removing an ancestor removes every registered path beneath it.
#[test]
fn test_ancestor_unset_cascades() {
    let registry = account_registry();
    let updater = UpdateValidator::new(&registry);

    let error = updater
        .validate_update_sync(&json!({"$unset": {"profile": 1}}), &UpdateOptions::enabled())
        .unwrap_err();
    assert_eq!(error.get("profile.email").unwrap().kind(), "required");
}

// =============================================================================
// Execution Context Tests
// =============================================================================

/// Query context hands custom validators the raw update payload.
#[test]
fn test_query_context_exposes_payload() {
    let schema = account_schema().field(
        "audited",
        FieldDef::new(FieldType::Bool).with_validator(
            ValidatorDefinition::custom(Predicate::sync(|_, ctx| {
                // Reject the write unless the update also touches "name".
                ctx.subject()
                    .and_then(|update| update.get("$set"))
                    .and_then(|set| set.get("name"))
                    .is_some()
            }))
            .with_message(MessageSource::template("Audited writes must rename")),
        ),
    );
    let registry = ValidatorRegistry::from_schema(&schema).unwrap();
    let updater = UpdateValidator::new(&registry);

    let with_name = json!({"$set": {"audited": true, "name": "Ada"}});
    assert!(updater
        .validate_update_sync(&with_name, &UpdateOptions::enabled_with_query_context())
        .is_ok());

    let without_name = json!({"$set": {"audited": true}});
    let error = updater
        .validate_update_sync(&without_name, &UpdateOptions::enabled_with_query_context())
        .unwrap_err();
    assert_eq!(
        error.get("audited").unwrap().message(),
        "Audited writes must rename"
    );
}

/// Document context exposes no subject during update validation.
#[test]
fn test_document_context_exposes_nothing() {
    let schema = Schema::new("flags").field(
        "flag",
        FieldDef::new(FieldType::Bool).with_validator(ValidatorDefinition::custom(
            Predicate::sync(|_, ctx| ctx.subject().is_none()),
        )),
    );
    let registry = ValidatorRegistry::from_schema(&schema).unwrap();
    let updater = UpdateValidator::new(&registry);

    assert!(updater
        .validate_update_sync(&json!({"$set": {"flag": true}}), &UpdateOptions::enabled())
        .is_ok());
}

// =============================================================================
// Asynchronous Update Tests
// =============================================================================

/// Async and sync update validation agree on synchronous registries.
#[tokio::test]
async fn test_async_update_matches_sync() {
    let registry = account_registry();
    let updater = UpdateValidator::new(&registry);
    let update = json!({"$set": {"number": 5}, "$unset": {"name": 1}});

    let async_error = updater
        .validate_update(&update, &UpdateOptions::enabled())
        .await
        .unwrap_err();
    let sync_error = updater
        .validate_update_sync(&update, &UpdateOptions::enabled())
        .unwrap_err();

    assert_eq!(
        serde_json::to_value(&async_error).unwrap(),
        serde_json::to_value(&sync_error).unwrap()
    );
}

/// Async update validation reports paths in declaration order, every run.
#[tokio::test]
async fn test_async_update_order_is_stable() {
    let registry = account_registry();
    let updater = UpdateValidator::new(&registry);
    let update = json!({
        "$set": {"status": "frozen", "number": 5},
        "$unset": {"name": 1}
    });

    for _ in 0..50 {
        let error = updater
            .validate_update(&update, &UpdateOptions::enabled())
            .await
            .unwrap_err();
        let paths: Vec<&str> = error.paths().collect();
        assert_eq!(paths, vec!["name", "number", "status"]);
    }
}
