//! Boolean schemas.

use serde_json::Value;

use crate::coerce::to_bool_value;
use crate::constraint::Required;
use crate::error::{create_invalid_type_issue, RawIssue};
use crate::internals::ZodTypeInternals;
use crate::kinds::{Schema, SchemaKind};
use crate::params::SchemaParams;
use crate::parse::ParseContext;
use crate::types::TypeCode;

#[derive(Debug, Clone, Copy, Default)]
pub struct BoolKind;

impl SchemaKind for BoolKind {
    type Base = bool;
    const TYPE_CODE: TypeCode = TypeCode::Bool;

    fn extract(
        &self,
        input: &Value,
        _internals: &ZodTypeInternals<bool>,
        _ctx: &ParseContext,
    ) -> Result<bool, Vec<RawIssue>> {
        input
            .as_bool()
            .ok_or_else(|| vec![create_invalid_type_issue(TypeCode::Bool, input)])
    }

    fn coerce(&self, input: &Value) -> Option<Value> {
        to_bool_value(input)
    }
}

pub type ZodBool<C = Required> = Schema<BoolKind, C>;

pub fn boolean() -> ZodBool {
    Schema::new(BoolKind)
}

pub fn boolean_with(params: impl Into<SchemaParams>) -> ZodBool {
    Schema::with_params(BoolKind, params)
}
