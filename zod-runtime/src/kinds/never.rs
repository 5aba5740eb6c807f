//! The schema that accepts nothing.

use serde_json::Value;

use crate::constraint::Required;
use crate::error::{create_invalid_type_issue, RawIssue};
use crate::internals::ZodTypeInternals;
use crate::kinds::{Schema, SchemaKind};
use crate::params::SchemaParams;
use crate::parse::ParseContext;
use crate::types::TypeCode;

#[derive(Debug, Clone, Copy, Default)]
pub struct NeverKind;

impl SchemaKind for NeverKind {
    type Base = Value;
    const TYPE_CODE: TypeCode = TypeCode::Never;

    fn extract(
        &self,
        input: &Value,
        _internals: &ZodTypeInternals<Value>,
        _ctx: &ParseContext,
    ) -> Result<Value, Vec<RawIssue>> {
        Err(vec![create_invalid_type_issue(TypeCode::Never, input)])
    }
}

pub type ZodNever<C = Required> = Schema<NeverKind, C>;

/// Fails every non-null input. Null handling still follows the modifiers,
/// so `never().nilable()` accepts exactly null.
pub fn never() -> ZodNever {
    Schema::new(NeverKind)
}

pub fn never_with(params: impl Into<SchemaParams>) -> ZodNever {
    Schema::with_params(NeverKind, params)
}
