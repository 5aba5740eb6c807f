//! String schemas.

use regex::Regex;
use serde_json::{json, Value};

use crate::check::Check;
use crate::coerce::to_string_value;
use crate::constraint::{Constraint, Required};
use crate::error::{create_invalid_type_issue, RawIssue};
use crate::internals::ZodTypeInternals;
use crate::kinds::{Schema, SchemaKind};
use crate::params::SchemaParams;
use crate::parse::ParseContext;
use crate::traits::ZodTypeExt;
use crate::types::TypeCode;

#[derive(Debug, Clone, Copy, Default)]
pub struct StringKind;

impl SchemaKind for StringKind {
    type Base = String;
    const TYPE_CODE: TypeCode = TypeCode::String;

    fn extract(
        &self,
        input: &Value,
        _internals: &ZodTypeInternals<String>,
        _ctx: &ParseContext,
    ) -> Result<String, Vec<RawIssue>> {
        match input {
            Value::String(s) => Ok(s.clone()),
            other => Err(vec![create_invalid_type_issue(TypeCode::String, other)]),
        }
    }

    fn coerce(&self, input: &Value) -> Option<Value> {
        to_string_value(input)
    }
}

pub type ZodString<C = Required> = Schema<StringKind, C>;

/// String schema.
pub fn string() -> ZodString {
    Schema::new(StringKind)
}

/// String schema with a schema-level error or other parameters.
pub fn string_with(params: impl Into<SchemaParams>) -> ZodString {
    Schema::with_params(StringKind, params)
}

impl<C: Constraint> Schema<StringKind, C> {
    /// At least `minimum` characters.
    pub fn min(&self, minimum: usize, params: impl Into<SchemaParams>) -> Self {
        self.push_check(
            Check::min_size(minimum, params),
            &[("min_length", json!(minimum))],
        )
    }

    /// At most `maximum` characters.
    pub fn max(&self, maximum: usize, params: impl Into<SchemaParams>) -> Self {
        self.push_check(
            Check::max_size(maximum, params),
            &[("max_length", json!(maximum))],
        )
    }

    /// Exactly `length` characters.
    pub fn length(&self, length: usize, params: impl Into<SchemaParams>) -> Self {
        self.push_check(
            Check::exact_size(length, params),
            &[("min_length", json!(length)), ("max_length", json!(length))],
        )
    }

    /// At least one character.
    pub fn nonempty(&self, params: impl Into<SchemaParams>) -> Self {
        self.min(1, params)
    }

    /// Matches `pattern`.
    pub fn regex(&self, pattern: Regex, params: impl Into<SchemaParams>) -> Self {
        let source = json!(pattern.as_str());
        let check = Check::regex(pattern, params);
        self.modify(|internals| {
            internals.add_check(check);
            internals.push_bag_item("patterns", source);
        })
    }

    pub fn starts_with(&self, prefix: impl Into<String>, params: impl Into<SchemaParams>) -> Self {
        self.add_check(Check::starts_with(prefix, params))
    }

    pub fn ends_with(&self, suffix: impl Into<String>, params: impl Into<SchemaParams>) -> Self {
        self.add_check(Check::ends_with(suffix, params))
    }

    pub fn includes(&self, needle: impl Into<String>, params: impl Into<SchemaParams>) -> Self {
        self.add_check(Check::includes(needle, params))
    }

    pub fn lowercase(&self, params: impl Into<SchemaParams>) -> Self {
        self.add_check(Check::lowercase(params))
    }

    pub fn uppercase(&self, params: impl Into<SchemaParams>) -> Self {
        self.add_check(Check::uppercase(params))
    }

    pub fn email(&self, params: impl Into<SchemaParams>) -> Self {
        self.push_check(Check::email(params), &[("format", json!("email"))])
    }

    pub fn uuid(&self, params: impl Into<SchemaParams>) -> Self {
        self.push_check(Check::uuid(params), &[("format", json!("uuid"))])
    }

    pub fn url(&self, params: impl Into<SchemaParams>) -> Self {
        self.push_check(Check::url(params), &[("format", json!("url"))])
    }

    /// Trim surrounding whitespace before later checks run.
    pub fn trim(&self) -> Self {
        self.overwrite(|s: &String| s.trim().to_string())
    }

    pub fn to_lowercase(&self) -> Self {
        self.overwrite(|s: &String| s.to_lowercase())
    }

    pub fn to_uppercase(&self) -> Self {
        self.overwrite(|s: &String| s.to_uppercase())
    }
}
