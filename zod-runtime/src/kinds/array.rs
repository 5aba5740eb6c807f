//! Array schemas.

use serde_json::{json, Value};
use std::fmt;

use crate::check::Check;
use crate::constraint::{Constraint, Required};
use crate::error::{create_invalid_type_issue, PathSegment, RawIssue};
use crate::internals::ZodTypeInternals;
use crate::kinds::{Schema, SchemaKind};
use crate::params::SchemaParams;
use crate::parse::{parse_schema, ParseContext};
use crate::traits::{Output, ZodType};
use crate::types::TypeCode;

/// Arrays whose items all match one element schema.
#[derive(Clone)]
pub struct ArrayKind<S: ZodType> {
    element: S,
}

impl<S: ZodType> fmt::Debug for ArrayKind<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayKind")
            .field("element", &self.element.type_code())
            .finish()
    }
}

impl<S: ZodType> SchemaKind for ArrayKind<S> {
    type Base = Vec<Output<S>>;
    const TYPE_CODE: TypeCode = TypeCode::Array;

    fn extract(
        &self,
        input: &Value,
        _internals: &ZodTypeInternals<Self::Base>,
        ctx: &ParseContext,
    ) -> Result<Self::Base, Vec<RawIssue>> {
        let Value::Array(items) = input else {
            return Err(vec![create_invalid_type_issue(TypeCode::Array, input)]);
        };

        let mut output = Vec::with_capacity(items.len());
        let mut issues = Vec::new();
        for (index, item) in items.iter().enumerate() {
            match parse_schema(&self.element, Some(item), ctx) {
                Ok(Some(value)) => output.push(value),
                Ok(None) => {}
                Err(child) => issues.extend(
                    child
                        .into_iter()
                        .map(|issue| issue.prefixed(PathSegment::Index(index))),
                ),
            }
        }

        if issues.is_empty() {
            Ok(output)
        } else {
            Err(issues)
        }
    }
}

pub type ZodArray<S, C = Required> = Schema<ArrayKind<S>, C>;

/// Array of `element`.
pub fn array<S: ZodType>(element: S) -> ZodArray<S> {
    Schema::new(ArrayKind { element })
}

pub fn array_with<S: ZodType>(element: S, params: impl Into<SchemaParams>) -> ZodArray<S> {
    Schema::with_params(ArrayKind { element }, params)
}

impl<S: ZodType, C: Constraint> Schema<ArrayKind<S>, C> {
    /// The element schema.
    pub fn element(&self) -> &S {
        &self.kind().element
    }

    /// At least `minimum` items.
    pub fn min(&self, minimum: usize, params: impl Into<SchemaParams>) -> Self {
        self.push_check(
            Check::min_size(minimum, params),
            &[("min_items", json!(minimum))],
        )
    }

    /// At most `maximum` items.
    pub fn max(&self, maximum: usize, params: impl Into<SchemaParams>) -> Self {
        self.push_check(
            Check::max_size(maximum, params),
            &[("max_items", json!(maximum))],
        )
    }

    /// Exactly `length` items.
    pub fn length(&self, length: usize, params: impl Into<SchemaParams>) -> Self {
        self.push_check(
            Check::exact_size(length, params),
            &[("min_items", json!(length)), ("max_items", json!(length))],
        )
    }

    pub fn nonempty(&self, params: impl Into<SchemaParams>) -> Self {
        self.min(1, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IssueCode;
    use crate::kinds::number::int;
    use crate::kinds::string::string;
    use crate::traits::ZodTypeExt;

    #[test]
    fn test_typed_items() {
        let schema = array(int());
        let parsed: Vec<i64> = schema.parse(&json!([1, 2, 3])).unwrap();
        assert_eq!(parsed, vec![1, 2, 3]);
    }

    #[test]
    fn test_item_issues_use_indices() {
        let err = array(string().min(2, ()))
            .parse(&json!(["ok", "x", 3]))
            .unwrap_err();
        let paths: Vec<_> = err.issues().iter().map(|issue| issue.path.clone()).collect();
        assert_eq!(
            paths,
            vec![vec![PathSegment::Index(1)], vec![PathSegment::Index(2)]]
        );
        assert_eq!(err.to_string().lines().nth(1), Some("  → at [1]"));
    }

    #[test]
    fn test_optional_items_keep_nulls() {
        let parsed = array(int().optional()).parse(&json!([1, null])).unwrap();
        assert_eq!(parsed, vec![Some(1), None]);
    }

    #[test]
    fn test_length_checks() {
        let schema = array(int()).min(1, ()).max(2, ());
        assert_eq!(
            schema.parse(&json!([])).unwrap_err().issues()[0].message,
            "Too small: expected array to have >=1 items"
        );
        assert_eq!(
            schema.parse(&json!([1, 2, 3])).unwrap_err().issues()[0].code(),
            IssueCode::TooBig
        );
        assert_eq!(array(int()).length(2, ()).internals().bag()["max_items"], json!(2));
    }
}
