//! The schema that accepts anything.

use serde_json::Value;

use crate::constraint::Required;
use crate::error::RawIssue;
use crate::internals::ZodTypeInternals;
use crate::kinds::{Schema, SchemaKind};
use crate::parse::ParseContext;
use crate::types::TypeCode;

#[derive(Debug, Clone, Copy, Default)]
pub struct UnknownKind;

impl SchemaKind for UnknownKind {
    type Base = Value;
    const TYPE_CODE: TypeCode = TypeCode::Unknown;

    fn extract(
        &self,
        input: &Value,
        _internals: &ZodTypeInternals<Value>,
        _ctx: &ParseContext,
    ) -> Result<Value, Vec<RawIssue>> {
        Ok(input.clone())
    }

    fn forwards_null(&self, _internals: &ZodTypeInternals<Value>) -> bool {
        true
    }

    fn extract_absent(
        &self,
        _internals: &ZodTypeInternals<Value>,
        _ctx: &ParseContext,
    ) -> Result<Option<Value>, Vec<RawIssue>> {
        Ok(None)
    }

    fn extracts_absent(&self) -> bool {
        true
    }
}

pub type ZodUnknown<C = Required> = Schema<UnknownKind, C>;

/// Accepts any value, null included. A missing object key stays missing.
pub fn unknown() -> ZodUnknown {
    Schema::new(UnknownKind)
}
