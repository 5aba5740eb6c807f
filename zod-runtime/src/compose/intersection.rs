//! Intersections: both sides parse the same input and their outputs merge.

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::constraint::Required;
use crate::error::{IssueKind, PathSegment, RawIssue};
use crate::internals::ZodTypeInternals;
use crate::kinds::{Schema, SchemaKind};
use crate::params::SchemaParams;
use crate::parse::ParseContext;
use crate::traits::{DynSchema, ZodType, ZodTypeExt};
use crate::types::TypeCode;

#[derive(Debug, Clone)]
pub struct IntersectionKind {
    left: Arc<dyn DynSchema>,
    right: Arc<dyn DynSchema>,
}

impl IntersectionKind {
    pub fn left(&self) -> &Arc<dyn DynSchema> {
        &self.left
    }

    pub fn right(&self) -> &Arc<dyn DynSchema> {
        &self.right
    }
}

/// Deep-merge two outputs. On conflict, returns the path of the first
/// conflicting value.
fn merge_values(
    left: Value,
    right: Value,
    path: &mut Vec<PathSegment>,
) -> Result<Value, Vec<PathSegment>> {
    if left == right {
        return Ok(left);
    }
    match (left, right) {
        (Value::Object(mut merged), Value::Object(right)) => {
            for (key, theirs) in right {
                let value = match merged.remove(&key) {
                    Some(ours) => {
                        path.push(PathSegment::Key(key.clone()));
                        let value = merge_values(ours, theirs, path)?;
                        path.pop();
                        value
                    }
                    None => theirs,
                };
                merged.insert(key, value);
            }
            Ok(Value::Object(merged))
        }
        (Value::Array(ours), Value::Array(theirs)) if ours.len() == theirs.len() => {
            let mut merged = Vec::with_capacity(ours.len());
            for (index, (a, b)) in ours.into_iter().zip(theirs).enumerate() {
                path.push(PathSegment::Index(index));
                merged.push(merge_values(a, b, path)?);
                path.pop();
            }
            Ok(Value::Array(merged))
        }
        _ => Err(path.clone()),
    }
}

impl SchemaKind for IntersectionKind {
    type Base = Value;
    const TYPE_CODE: TypeCode = TypeCode::Intersection;

    fn extract(
        &self,
        input: &Value,
        _internals: &ZodTypeInternals<Value>,
        ctx: &ParseContext,
    ) -> Result<Value, Vec<RawIssue>> {
        let (left, right) = match (
            self.left.parse_dyn(Some(input), ctx),
            self.right.parse_dyn(Some(input), ctx),
        ) {
            (Ok(left), Ok(right)) => (left, right),
            (left, right) => {
                let issues = left.err().into_iter().chain(right.err()).flatten();
                return Err(issues.collect());
            }
        };

        let left = left.unwrap_or(Value::Null);
        let right = right.unwrap_or(Value::Null);
        merge_values(left, right, &mut Vec::new()).map_err(|path| {
            let mut params = Map::new();
            params.insert("reason".to_string(), Value::from("unmergeable"));
            vec![RawIssue::new(IssueKind::Custom { params }, input.clone())
                .with_message("Unmergeable intersection")
                .with_path(path)]
        })
    }
}

pub type ZodIntersection<C = Required> = Schema<IntersectionKind, C>;

/// Values accepted by both `left` and `right`.
pub fn intersection<A: ZodType, B: ZodType>(left: A, right: B) -> ZodIntersection {
    intersection_with(left, right, ())
}

pub fn intersection_with<A: ZodType, B: ZodType>(
    left: A,
    right: B,
    params: impl Into<SchemaParams>,
) -> ZodIntersection {
    Schema::with_params(
        IntersectionKind {
            left: left.into_dyn(),
            right: right.into_dyn(),
        },
        params,
    )
}

#[cfg(test)]
mod tests {
    use super::merge_values;
    use crate::prelude::*;
    use serde_json::json;

    #[test]
    fn test_merges_object_outputs() {
        let named = object([("name", string().into_dyn())]);
        let aged = object([("age", int().into_dyn())]);
        let person = named.and(aged);
        assert_eq!(
            person.parse(&json!({"name": "Ada", "age": 36, "x": 0})).unwrap(),
            json!({"name": "Ada", "age": 36})
        );
    }

    #[test]
    fn test_collects_issues_from_both_sides() {
        let schema = intersection(string().min(3, ()), string().max(1, ()));
        let err = schema.parse(&json!("ab")).unwrap_err();
        let codes: Vec<_> = err.issues().iter().map(|issue| issue.code()).collect();
        assert_eq!(codes, vec![IssueCode::TooSmall, IssueCode::TooBig]);
    }

    #[test]
    fn test_conflicting_outputs() {
        let schema = intersection(string().to_uppercase(), string());
        let err = schema.parse(&json!("ab")).unwrap_err();
        assert_eq!(err.issues()[0].code(), IssueCode::Custom);
        assert_eq!(err.issues()[0].message, "Unmergeable intersection");
        assert!(schema.parse(&json!("AB")).is_ok());
    }

    #[test]
    fn test_merge_reports_conflict_path() {
        let path = merge_values(
            json!({"a": {"b": [1, 2]}}),
            json!({"a": {"b": [1, 3]}}),
            &mut Vec::new(),
        )
        .unwrap_err();
        assert_eq!(
            path,
            vec![
                PathSegment::Key("a".into()),
                PathSegment::Key("b".into()),
                PathSegment::Index(1)
            ]
        );
    }
}
