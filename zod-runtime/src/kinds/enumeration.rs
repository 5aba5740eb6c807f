//! String enum schemas.

use serde_json::Value;

use crate::constraint::{Constraint, Required};
use crate::error::{create_invalid_type_issue, create_invalid_value_issue, RawIssue};
use crate::internals::{ValueSet, ZodTypeInternals};
use crate::kinds::{Schema, SchemaKind};
use crate::params::SchemaParams;
use crate::parse::ParseContext;
use crate::traits::ZodTypeExt;
use crate::types::TypeCode;

#[derive(Debug, Clone, Default)]
pub struct EnumKind {
    options: Vec<String>,
}

impl SchemaKind for EnumKind {
    type Base = String;
    const TYPE_CODE: TypeCode = TypeCode::Enum;

    fn extract(
        &self,
        input: &Value,
        internals: &ZodTypeInternals<String>,
        _ctx: &ParseContext,
    ) -> Result<String, Vec<RawIssue>> {
        let Value::String(s) = input else {
            return Err(vec![create_invalid_type_issue(TypeCode::Enum, input)]);
        };
        if self.options.iter().any(|option| option == s) {
            return Ok(s.clone());
        }
        let allowed = internals
            .values()
            .map(|set| set.values().to_vec())
            .unwrap_or_default();
        Err(vec![create_invalid_value_issue(allowed, input)])
    }
}

pub type ZodEnum<C = Required> = Schema<EnumKind, C>;

/// One of a fixed set of strings.
pub fn enumeration<I, S>(options: I) -> ZodEnum
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    enumeration_with(options, ())
}

pub fn enumeration_with<I, S>(options: I, params: impl Into<SchemaParams>) -> ZodEnum
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut kind = EnumKind::default();
    for option in options {
        let option = option.into();
        if !kind.options.contains(&option) {
            kind.options.push(option);
        }
    }
    let set = ValueSet::new(kind.options.iter().cloned().map(Value::String));
    Schema::with_params(kind, params).seeded(|internals| internals.set_values(set))
}

impl<C: Constraint> Schema<EnumKind, C> {
    /// The allowed strings, in declaration order.
    pub fn options(&self) -> &[String] {
        &self.kind().options
    }

    /// Enum restricted to `keep`.
    pub fn extract_options<S: AsRef<str>>(&self, keep: &[S]) -> Self {
        self.filtered(|option| keep.iter().any(|k| k.as_ref() == option))
    }

    /// Enum without `drop`.
    pub fn exclude<S: AsRef<str>>(&self, drop: &[S]) -> Self {
        self.filtered(|option| !drop.iter().any(|d| d.as_ref() == option))
    }

    fn filtered(&self, keep: impl Fn(&str) -> bool) -> Self {
        let options: Vec<String> = self
            .options()
            .iter()
            .filter(|option| keep(option))
            .cloned()
            .collect();
        let set = ValueSet::new(options.iter().cloned().map(Value::String));
        self.with_kind(EnumKind { options })
            .modify(|internals| internals.set_values(set))
    }
}
