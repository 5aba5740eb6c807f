//! Snapshot tests for rendered and serialized errors.

use serde_json::json;
use zod_runtime::prelude::*;

fn signup() -> zod_runtime::ZodObject {
    object([
        ("name", string().min(2, ()).into_dyn()),
        (
            "tags",
            array(string().max(3, ())).min(1, ()).into_dyn(),
        ),
        ("role", enumeration(["admin", "user"]).into_dyn()),
    ])
}

#[test]
fn snapshot_rendered_error() {
    let err = signup()
        .parse(&json!({"name": "A", "tags": ["ok", "toolong"], "role": "root"}))
        .unwrap_err();

    insta::assert_snapshot!(err.to_string(), @r#"
    ✖ Too small: expected string to have >=2 characters
      → at name
    ✖ Too big: expected string to have <=3 characters
      → at tags[1]
    ✖ Invalid option: expected one of "admin"|"user"
      → at role
    "#);
}

#[test]
fn snapshot_root_error() {
    let err = number().parse(&json!("3")).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"✖ Invalid input: expected number, received string");
}

#[test]
fn snapshot_serialized_issue() {
    let err = int().max(10, ()).parse(&json!(11)).unwrap_err();
    let value = serde_json::to_value(&err).unwrap();
    insta::assert_snapshot!(
        serde_json::to_string(&value).unwrap(),
        @r#"{"issues":[{"code":"too_big","exact":false,"inclusive":true,"input":11,"maximum":10,"message":"Too big: expected number to be <=10","origin":"number","path":[]}]}"#
    );
}
