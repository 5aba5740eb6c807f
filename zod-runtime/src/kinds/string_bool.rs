//! Strings that spell booleans ("yes", "off", "1", ...).

use serde_json::Value;

use crate::constraint::{Constraint, Required};
use crate::error::{create_invalid_type_issue, create_invalid_value_issue, RawIssue};
use crate::internals::ZodTypeInternals;
use crate::kinds::{Schema, SchemaKind};
use crate::params::SchemaParams;
use crate::parse::ParseContext;
use crate::types::TypeCode;

/// Case handling when matching truthy and falsy spellings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Case {
    Sensitive,
    #[default]
    Insensitive,
}

/// Accepted spellings for [`string_bool_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringBoolOptions {
    pub truthy: Vec<String>,
    pub falsy: Vec<String>,
    pub case: Case,
}

impl Default for StringBoolOptions {
    fn default() -> Self {
        Self {
            truthy: ["true", "1", "yes", "on", "y", "enabled"]
                .map(String::from)
                .to_vec(),
            falsy: ["false", "0", "no", "off", "n", "disabled"]
                .map(String::from)
                .to_vec(),
            case: Case::Insensitive,
        }
    }
}

impl StringBoolOptions {
    pub fn new<T, F>(truthy: T, falsy: F) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        Self {
            truthy: truthy.into_iter().map(Into::into).collect(),
            falsy: falsy.into_iter().map(Into::into).collect(),
            case: Case::Insensitive,
        }
    }

    pub fn case_sensitive(mut self) -> Self {
        self.case = Case::Sensitive;
        self
    }

    fn normalize(&self, s: &str) -> String {
        match self.case {
            Case::Sensitive => s.to_string(),
            Case::Insensitive => s.to_lowercase(),
        }
    }

    fn lookup(&self, s: &str) -> Option<bool> {
        let needle = self.normalize(s);
        if self.truthy.iter().any(|t| self.normalize(t) == needle) {
            Some(true)
        } else if self.falsy.iter().any(|f| self.normalize(f) == needle) {
            Some(false)
        } else {
            None
        }
    }

    fn spellings(&self) -> Vec<Value> {
        self.truthy
            .iter()
            .chain(&self.falsy)
            .cloned()
            .map(Value::String)
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct StringBoolKind {
    options: StringBoolOptions,
}

impl SchemaKind for StringBoolKind {
    type Base = bool;
    const TYPE_CODE: TypeCode = TypeCode::StringBool;

    fn extract(
        &self,
        input: &Value,
        _internals: &ZodTypeInternals<bool>,
        _ctx: &ParseContext,
    ) -> Result<bool, Vec<RawIssue>> {
        let Value::String(s) = input else {
            return Err(vec![create_invalid_type_issue(TypeCode::StringBool, input)]);
        };
        self.options
            .lookup(s)
            .ok_or_else(|| vec![create_invalid_value_issue(self.options.spellings(), input)])
    }
}

pub type ZodStringBool<C = Required> = Schema<StringBoolKind, C>;

/// String-encoded boolean with the default spellings, case-insensitive.
pub fn string_bool() -> ZodStringBool {
    Schema::new(StringBoolKind::default())
}

pub fn string_bool_with(
    options: StringBoolOptions,
    params: impl Into<SchemaParams>,
) -> ZodStringBool {
    Schema::with_params(StringBoolKind { options }, params)
}

impl<C: Constraint> Schema<StringBoolKind, C> {
    pub fn options(&self) -> &StringBoolOptions {
        &self.kind().options
    }
}
