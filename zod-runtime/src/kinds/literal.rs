//! Literal schemas.

use serde_json::Value;

use crate::constraint::Required;
use crate::error::{create_invalid_type_issue, create_invalid_value_issue, RawIssue};
use crate::internals::{ValueSet, ZodTypeInternals};
use crate::kinds::{Schema, SchemaKind};
use crate::params::SchemaParams;
use crate::parse::ParseContext;
use crate::types::TypeCode;

#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralKind;

fn same_json_type(a: &Value, b: &Value) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}

impl SchemaKind for LiteralKind {
    type Base = Value;
    const TYPE_CODE: TypeCode = TypeCode::Literal;

    fn extract(
        &self,
        input: &Value,
        internals: &ZodTypeInternals<Value>,
        _ctx: &ParseContext,
    ) -> Result<Value, Vec<RawIssue>> {
        let Some(values) = internals.values() else {
            return Err(vec![create_invalid_type_issue(TypeCode::Literal, input)]);
        };
        if values.contains(input) {
            return Ok(input.clone());
        }
        if values.values().iter().any(|value| same_json_type(value, input)) {
            Err(vec![create_invalid_value_issue(values.values().to_vec(), input)])
        } else {
            Err(vec![create_invalid_type_issue(TypeCode::Literal, input)])
        }
    }

    fn forwards_null(&self, internals: &ZodTypeInternals<Value>) -> bool {
        internals
            .values()
            .is_some_and(|values| values.contains(&Value::Null))
    }
}

pub type ZodLiteral<C = Required> = Schema<LiteralKind, C>;

/// Exactly `value`.
///
/// A value of the same JSON type that differs fails with `invalid_value`;
/// a value of another JSON type fails with `invalid_type`.
pub fn literal(value: impl Into<Value>) -> ZodLiteral {
    literals([value.into()])
}

/// Any of `values`.
pub fn literals(values: impl IntoIterator<Item = Value>) -> ZodLiteral {
    literals_with(values, ())
}

pub fn literals_with(
    values: impl IntoIterator<Item = Value>,
    params: impl Into<SchemaParams>,
) -> ZodLiteral {
    let set = ValueSet::new(values);
    Schema::with_params(LiteralKind, params).seeded(|internals| internals.set_values(set))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{IssueCode, IssueKind};
    use crate::traits::{ZodType, ZodTypeExt};
    use serde_json::json;

    #[test]
    fn test_number_literal() {
        let schema = literal(42);
        assert_eq!(schema.parse(&json!(42)).unwrap(), json!(42));
        assert_eq!(schema.parse(&json!(41)).unwrap_err().issues()[0].code(), IssueCode::InvalidValue);
        assert_eq!(schema.parse(&json!("42")).unwrap_err().issues()[0].code(), IssueCode::InvalidType);
    }

    #[test]
    fn test_multiple_literals_list_options() {
        let schema = literals([json!("a"), json!("b"), json!(true)]);
        assert!(schema.parse(&json!(true)).is_ok());
        let err = schema.parse(&json!("c")).unwrap_err();
        match &err.issues()[0].kind {
            IssueKind::InvalidValue { values } => {
                assert_eq!(values, &vec![json!("a"), json!("b"), json!(true)])
            }
            other => panic!("unexpected kind {:?}", other),
        }
        assert_eq!(err.issues()[0].message, "Invalid option: expected one of \"a\"|\"b\"|true");
    }

    #[test]
    fn test_null_literal() {
        let schema = literal(Value::Null);
        assert_eq!(schema.parse(&json!(null)).unwrap(), json!(null));
        assert_eq!(schema.parse(&json!(0)).unwrap_err().issues()[0].code(), IssueCode::InvalidType);

        let mixed = literals([json!("a"), Value::Null]);
        assert!(mixed.parse(&json!(null)).is_ok());
        assert!(literal("a").parse(&json!(null)).is_err());
    }

    #[test]
    fn test_null_literal_rejects_missing_key() {
        let schema = crate::object([("tag", literal(Value::Null).into_dyn())]);
        assert!(schema.parse(&json!({"tag": null})).is_ok());
        let err = schema.parse(&json!({})).unwrap_err();
        assert_eq!(
            err.issues()[0].message,
            "Invalid input: expected literal, received undefined"
        );
    }

    #[test]
    fn test_literal_exposes_value_set() {
        let schema = literal("admin");
        let values = schema.internals().values().unwrap();
        assert_eq!(values.values(), &[json!("admin")]);
    }
}
