//! Property-based tests for composed schemas
//!
//! Transforms, pipes, unions, and intersections built from simpler schemas.

use crate::prelude::*;
use proptest::prelude::*;
use serde_json::json;
use std::convert::Infallible;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Chained transforms apply in order, each seeing the previous output
    #[test]
    fn prop_transforms_chain_in_order(value in -10_000_i64..10_000) {
        let schema = int()
            .transform(|n, _| Ok::<_, Infallible>(n + 1))
            .transform(|n, _| Ok::<_, Infallible>(n * 2))
            .transform(|n, _| Ok::<_, Infallible>(n.to_string()));
        prop_assert_eq!(schema.parse(&json!(value)).unwrap(), ((value + 1) * 2).to_string());
    }

    /// A transform never runs when its source fails
    #[test]
    fn prop_transform_skipped_on_source_failure(s in "[a-z]{0,8}") {
        let schema = int().transform(|_, ctx| {
            ctx.add_issue("transform ran");
            Ok::<_, Infallible>(0)
        });
        let err = schema.parse(&json!(s)).unwrap_err();
        prop_assert_eq!(err.issues()[0].code(), IssueCode::InvalidType);
    }

    /// A union returns the output of the first option that accepts the input
    #[test]
    fn prop_union_first_match(value in -1_000_i64..1_000) {
        let schema = union([
            int().positive(()).transform(|_, _| Ok::<_, Infallible>("positive")).into_dyn(),
            int().transform(|_, _| Ok::<_, Infallible>("other")).into_dyn(),
        ]);
        let expected = if value > 0 { "positive" } else { "other" };
        prop_assert_eq!(schema.parse(&json!(value)).unwrap(), json!(expected));
    }

    /// Intersected objects keep the fields of both sides
    #[test]
    fn prop_intersection_merges_fields(a in "[a-z]{1,8}", b in -1_000_i64..1_000) {
        let schema = object([("a", string().into_dyn())]).and(object([("b", int().into_dyn())]));
        prop_assert_eq!(
            schema.parse(&json!({"a": a, "b": b})).unwrap(),
            json!({"a": a, "b": b})
        );
    }

    /// strict_parse runs checks against a typed value without extraction
    #[test]
    fn prop_strict_parse_matches_parse(value in -1_000_i64..1_000) {
        let schema = int().nonnegative(()).multiple_of(3, ());
        prop_assert_eq!(
            schema.strict_parse(value).is_ok(),
            schema.parse(&json!(value)).is_ok()
        );
    }

    /// Pipes feed transformed output into the target schema
    #[test]
    fn prop_pipe_validates_transformed_output(s in "[0-9]{1,4}") {
        let schema = string()
            .transform(|s, _| s.parse::<i64>())
            .pipe(int().max(500, ()));
        let value: i64 = s.parse().unwrap();
        prop_assert_eq!(schema.parse(&json!(s)).is_ok(), value <= 500);
    }
}
