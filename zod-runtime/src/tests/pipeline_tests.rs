//! Property-based tests for the parse pipeline
//!
//! These tests cover schema immutability, null handling (default, prefault,
//! optionality), and check ordering.

use crate::prelude::*;
use proptest::prelude::*;
use serde_json::{json, Value};

/// Strategy for integers well inside the safe range
fn arb_int() -> impl Strategy<Value = i64> {
    -1_000_000_i64..1_000_000
}

/// Strategy for arbitrary non-null JSON scalars
fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        arb_int().prop_map(Value::from),
        ".{0,12}".prop_map(Value::from),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // --- Copy-on-write ---

    /// Adding a check never changes the receiver
    #[test]
    fn prop_modifiers_leave_receiver_untouched(s in ".{0,20}", limit in 0_usize..10) {
        let base = string();
        let bounded = base.max(limit, ());
        prop_assert!(base.parse(&json!(s)).is_ok());
        prop_assert_ne!(base.id(), bounded.id());
        prop_assert!(base.internals().checks().is_empty());
        prop_assert_eq!(bounded.internals().checks().len(), 1);
        prop_assert_eq!(
            bounded.parse(&json!(s)).is_ok(),
            s.chars().count() <= limit
        );
    }

    /// Applying an identity modifier twice behaves like applying it once
    #[test]
    fn prop_identity_modifiers_are_idempotent(input in proptest::option::of(arb_scalar())) {
        let input = input.unwrap_or(Value::Null);
        let once = int().optional();
        let twice = int().optional().optional();
        prop_assert_eq!(once.parse(&input).ok(), twice.parse(&input).ok());

        let once = string().nullish();
        let twice = string().nullish().nilable().optional();
        prop_assert_eq!(once.parse(&input).ok(), twice.parse(&input).ok());
    }

    // --- Default and prefault ---

    /// A default is returned for null input without running checks
    #[test]
    fn prop_default_short_circuits_checks(value in arb_int()) {
        let schema = int().gt(value, ()).default(value);
        prop_assert_eq!(schema.parse(&Value::Null).unwrap(), value);
        prop_assert!(schema.parse(&json!(value)).is_err());
    }

    /// A prefault is parsed like real input, and only replaces null
    #[test]
    fn prop_prefault_only_replaces_null(s in "[a-z]{1,8}", fallback in "[a-z]{1,8}") {
        let schema = string().to_uppercase().prefault(fallback.clone());
        prop_assert_eq!(schema.parse(&Value::Null).unwrap(), fallback.to_uppercase());
        prop_assert_eq!(schema.parse(&json!(s)).unwrap(), s.to_uppercase());
        prop_assert!(schema.parse(&json!(1)).is_err());
    }

    /// A prefault that fails the schema fails the parse
    #[test]
    fn prop_prefault_is_validated(value in arb_int()) {
        let schema = int().lt(value, ()).prefault(value);
        prop_assert!(schema.parse(&Value::Null).is_err());
    }

    // --- Check ordering ---

    /// Issues from failing checks appear in insertion order
    #[test]
    fn prop_check_order_is_stable(count in 1_usize..8) {
        let mut schema = number();
        for index in 0..count {
            schema = schema.refine(|_| false, index.to_string());
        }
        let err = schema.parse(&json!(0)).unwrap_err();
        let messages: Vec<String> = err.issues().iter().map(|issue| issue.message.clone()).collect();
        let expected: Vec<String> = (0..count).map(|index| index.to_string()).collect();
        prop_assert_eq!(messages, expected);
    }

    /// An aborting check stops the checks after it, and only when it fails
    #[test]
    fn prop_abort_stops_later_checks(count in 2_usize..8, abort_at in 0_usize..8, pass in any::<bool>()) {
        let abort_at = abort_at % count;
        let mut schema = number();
        for index in 0..count {
            let fails = !(index == abort_at && pass);
            let params = if index == abort_at {
                Params::new().message(index.to_string()).abort()
            } else {
                Params::new().message(index.to_string())
            };
            schema = schema.refine(move |_| !fails, params);
        }
        let err = schema.parse(&json!(0)).unwrap_err();
        let seen: Vec<usize> = err
            .issues()
            .iter()
            .map(|issue| issue.message.parse().unwrap())
            .collect();
        let expected: Vec<usize> = if pass {
            (0..count).filter(|index| *index != abort_at).collect()
        } else {
            (0..=abort_at).collect()
        };
        prop_assert_eq!(seen, expected);
    }

    /// Overwrites are visible to every check that follows them
    #[test]
    fn prop_overwrite_runs_before_later_checks(value in arb_int()) {
        let schema = int()
            .overwrite(|n| n + 1)
            .refine(move |n| *n == value + 1, "not incremented");
        prop_assert_eq!(schema.parse(&json!(value)).unwrap(), value + 1);
    }

    /// Type issues are reported before any check runs
    #[test]
    fn prop_type_check_precedes_checks(s in ".{0,12}") {
        let schema = int().refine(|_| false, "refined");
        let err = schema.parse(&json!(s)).unwrap_err();
        prop_assert_eq!(err.issues().len(), 1);
        prop_assert_eq!(err.issues()[0].code(), IssueCode::InvalidType);
    }
}
