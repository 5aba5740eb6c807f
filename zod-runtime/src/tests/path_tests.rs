//! Property-based tests for issue paths
//!
//! Issues raised deep inside objects, arrays, and tuples must carry the
//! absolute path from the top-level input.

use crate::prelude::*;
use proptest::prelude::*;
use serde_json::{json, Value};

/// Strategy for a list of item flags, at least one of which is bad
fn arb_items() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(any::<bool>(), 1..12)
        .prop_filter("needs a bad item", |items| items.iter().any(|ok| !ok))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Each bad array item is reported at `[index].name`
    #[test]
    fn prop_nested_paths_are_absolute(items in arb_items()) {
        let schema = object([(
            "users",
            array(object([("name", string().min(1, ()).into_dyn())])).into_dyn(),
        )]);
        let users: Vec<Value> = items
            .iter()
            .map(|ok| if *ok { json!({"name": "ok"}) } else { json!({"name": ""}) })
            .collect();

        let err = schema.parse(&json!({ "users": users })).unwrap_err();
        let expected: Vec<Vec<PathSegment>> = items
            .iter()
            .enumerate()
            .filter(|(_, ok)| !**ok)
            .map(|(index, _)| {
                vec![
                    PathSegment::Key("users".into()),
                    PathSegment::Index(index),
                    PathSegment::Key("name".into()),
                ]
            })
            .collect();
        let actual: Vec<Vec<PathSegment>> = err.issues().iter().map(|issue| issue.path.clone()).collect();
        prop_assert_eq!(actual, expected);
    }

    /// Refinement paths are appended to the path of the refined schema
    #[test]
    fn prop_refinement_path_is_relative_to_schema(key in "[a-z]{1,6}", field in "[a-z]{1,6}") {
        let inner = object([(field.as_str(), string().into_dyn())])
            .refine(|_| false, Params::new().message("bad").path([field.as_str()]));
        let outer = object([(key.as_str(), inner.into_dyn())]);

        let err = outer.parse(&json!({ key.clone(): { field.clone(): "x" } })).unwrap_err();
        prop_assert_eq!(
            err.issues()[0].path.clone(),
            vec![PathSegment::Key(key.clone()), PathSegment::Key(field.clone())]
        );
        prop_assert_eq!(err.issues()[0].message.as_str(), "bad");
    }

    /// Tuple slots report their position
    #[test]
    fn prop_tuple_positions(bad in 0_usize..3) {
        let schema = tuple([int().into_dyn(), int().into_dyn(), int().into_dyn()]);
        let mut values = vec![json!(1), json!(2), json!(3)];
        values[bad] = json!("x");
        let err = schema.parse(&Value::Array(values)).unwrap_err();
        prop_assert_eq!(err.issues()[0].path.clone(), vec![PathSegment::Index(bad)]);
    }

    /// Flattening groups issues by their first key
    #[test]
    fn prop_flatten_groups_by_field(keys in prop::collection::btree_set("[a-z]{1,6}", 1..5)) {
        let shape: Vec<(String, std::sync::Arc<dyn DynSchema>)> = keys
            .iter()
            .map(|key| (key.clone(), int().into_dyn()))
            .collect();
        let err = object(shape).parse(&json!({})).unwrap_err();
        let flat = err.flatten();
        prop_assert!(flat.form_errors.is_empty());
        prop_assert_eq!(
            flat.field_errors.keys().cloned().collect::<Vec<_>>(),
            keys.iter().cloned().collect::<Vec<_>>()
        );
    }
}
