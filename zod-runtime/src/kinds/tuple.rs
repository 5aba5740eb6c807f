//! Tuple schemas.

use serde_json::Value;
use std::sync::Arc;

use crate::constraint::{Constraint, Required};
use crate::error::{create_invalid_type_issue, IssueKind, PathSegment, RawIssue};
use crate::internals::ZodTypeInternals;
use crate::kinds::{Schema, SchemaKind};
use crate::params::SchemaParams;
use crate::parse::ParseContext;
use crate::traits::DynSchema;
use crate::types::TypeCode;

/// Fixed-position items, optionally followed by a rest schema.
#[derive(Debug, Clone, Default)]
pub struct TupleKind {
    items: Vec<Arc<dyn DynSchema>>,
    rest: Option<Arc<dyn DynSchema>>,
}

impl TupleKind {
    /// Items up to and including the last one that must be present.
    fn required_len(&self) -> usize {
        self.items
            .iter()
            .rposition(|item| !item.accepts_absent())
            .map_or(0, |index| index + 1)
    }
}

impl SchemaKind for TupleKind {
    type Base = Vec<Value>;
    const TYPE_CODE: TypeCode = TypeCode::Tuple;

    fn extract(
        &self,
        input: &Value,
        _internals: &ZodTypeInternals<Vec<Value>>,
        ctx: &ParseContext,
    ) -> Result<Vec<Value>, Vec<RawIssue>> {
        let Value::Array(values) = input else {
            return Err(vec![create_invalid_type_issue(TypeCode::Tuple, input)]);
        };

        let required = self.required_len();
        if values.len() < required {
            return Err(vec![RawIssue::new(
                IssueKind::TooFew {
                    minimum: required,
                    received: values.len(),
                },
                input.clone(),
            )]);
        }
        if self.rest.is_none() && values.len() > self.items.len() {
            return Err(vec![RawIssue::new(
                IssueKind::TooMany {
                    maximum: self.items.len(),
                    received: values.len(),
                },
                input.clone(),
            )]);
        }

        let mut output = Vec::with_capacity(values.len());
        let mut issues = Vec::new();
        let slots = self
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| (index, item, values.get(index)));
        let extra = values
            .iter()
            .enumerate()
            .skip(self.items.len())
            .filter_map(|(index, value)| {
                self.rest.as_ref().map(|rest| (index, rest, Some(value)))
            });

        for (index, schema, value) in slots.chain(extra) {
            match schema.parse_dyn(value, ctx) {
                Ok(Some(parsed)) => output.push(parsed),
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

pub type ZodTuple<C = Required> = Schema<TupleKind, C>;

/// Tuple of `items`, rejecting extra values.
pub fn tuple(items: impl IntoIterator<Item = Arc<dyn DynSchema>>) -> ZodTuple {
    tuple_with(items, ())
}

pub fn tuple_with(
    items: impl IntoIterator<Item = Arc<dyn DynSchema>>,
    params: impl Into<SchemaParams>,
) -> ZodTuple {
    Schema::with_params(
        TupleKind {
            items: items.into_iter().collect(),
            rest: None,
        },
        params,
    )
}

impl<C: Constraint> Schema<TupleKind, C> {
    pub fn items(&self) -> &[Arc<dyn DynSchema>] {
        &self.kind().items
    }

    /// Accept any number of trailing values matching `rest`.
    pub fn rest(&self, rest: Arc<dyn DynSchema>) -> Self {
        self.with_kind(TupleKind {
            items: self.kind().items.clone(),
            rest: Some(rest),
        })
    }
}
