//! End-to-end scenarios covering literals, never, stringbool, time, and
//! object refinements.

use serde_json::{json, Value};
use zod_runtime::prelude::*;

// =============================================================================
// Literals
// =============================================================================

#[test]
fn literal_rejects_other_strings_and_other_types() {
    let schema = literal("hello");
    assert_eq!(schema.parse(&json!("hello")).unwrap(), json!("hello"));

    let err = schema.parse(&json!("world")).unwrap_err();
    assert_eq!(err.issues().len(), 1);
    let issue = &err.issues()[0];
    assert_eq!(issue.code(), IssueCode::InvalidValue);
    assert!(issue.path.is_empty());
    match &issue.kind {
        IssueKind::InvalidValue { values } => assert_eq!(values, &vec![json!("hello")]),
        other => panic!("unexpected kind {:?}", other),
    }

    let err = schema.parse(&json!(123)).unwrap_err();
    match &err.issues()[0].kind {
        IssueKind::InvalidType { expected, received } => {
            assert_eq!(*expected, TypeCode::Literal);
            assert_eq!(received, "number");
        }
        other => panic!("unexpected kind {:?}", other),
    }
}

// =============================================================================
// Never with prefault
// =============================================================================

#[test]
fn never_prefault_still_fails_but_nilable_accepts_null() {
    let schema = never().prefault("x");
    assert!(schema.parse(&Value::Null).is_err());

    let nilable = never().nilable().prefault("x");
    assert_eq!(nilable.parse(&Value::Null).unwrap(), None);
}

// =============================================================================
// StringBool
// =============================================================================

#[test]
fn string_bool_with_custom_case_sensitive_spellings() {
    let options = StringBoolOptions::new(["si"], ["no"]).case_sensitive();
    let schema = string_bool_with(options, ());

    assert!(schema.parse(&json!("si")).unwrap());
    assert!(!schema.parse(&json!("no")).unwrap());

    let err = schema.parse(&json!("SI")).unwrap_err();
    assert_eq!(err.issues()[0].code(), IssueCode::InvalidValue);
    assert!(schema.parse(&json!("true")).is_err());
}

#[test]
fn string_bool_default_versus_prefault() {
    let defaulted = string_bool().default(true);
    assert!(defaulted.parse(&Value::Null).unwrap());

    let prefaulted = string_bool().prefault("false");
    assert!(!prefaulted.parse(&Value::Null).unwrap());
    assert!(prefaulted.parse(&json!("invalid")).is_err());
}

// =============================================================================
// Time
// =============================================================================

#[cfg(feature = "chrono")]
#[test]
fn time_overwrite_then_refine_sees_rewritten_value() {
    use chrono::Utc;

    let schema = time()
        .overwrite(|t| t.with_timezone(&Utc).fixed_offset())
        .refine(|t| t.offset().local_minus_utc() == 0, "expected UTC");

    let parsed = schema.parse(&json!("2024-05-01T09:30:00+05:30")).unwrap();
    assert_eq!(parsed.offset().local_minus_utc(), 0);
    assert_eq!(parsed.to_rfc3339(), "2024-05-01T04:00:00+00:00");
}

// =============================================================================
// Object refinements
// =============================================================================

#[test]
fn object_refinement_reports_at_given_path() {
    let schema = object([
        ("password", string().min(6, ()).into_dyn()),
        ("confirm", string().min(6, ()).into_dyn()),
    ])
    .refine(
        |form| form.get("password") == form.get("confirm"),
        Params::new().message("Passwords don't match").path(["confirm"]),
    );

    assert!(schema
        .parse(&json!({"password": "secret1", "confirm": "secret1"}))
        .is_ok());

    let err = schema
        .parse(&json!({"password": "secret1", "confirm": "secret2"}))
        .unwrap_err();
    assert_eq!(err.issues().len(), 1);
    assert_eq!(err.issues()[0].code(), IssueCode::Custom);
    assert_eq!(err.issues()[0].path, vec![PathSegment::Key("confirm".into())]);
    assert_eq!(err.issues()[0].message, "Passwords don't match");
}
