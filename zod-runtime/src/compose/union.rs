//! Unions and discriminated unions.
//!
//! A plain union tries its options in order and returns the first success.
//! When every option fails, the result is a single `invalid_union` issue
//! carrying each option's finalized issues, except when exactly one option
//! got past type extraction: its issues are returned directly, since that
//! option clearly matched the shape of the input.
//!
//! A discriminated union reads one key of an object input and routes to
//! the option whose literal value for that key matches.
//!
//! Null and absent input reach the options unchanged, so a union accepts
//! them whenever one of its options does.

use serde_json::Value;
use std::sync::Arc;
use tracing::{trace, warn};

use crate::config::global_config;
use crate::constraint::Required;
use crate::error::{
    create_invalid_type_issue, create_missing_issue, finalize, IssueKind, PathSegment, RawIssue,
};
use crate::internals::ZodTypeInternals;
use crate::kinds::{Schema, SchemaKind};
use crate::params::SchemaParams;
use crate::parse::ParseContext;
use crate::traits::DynSchema;
use crate::types::TypeCode;

#[derive(Debug, Clone)]
struct Discriminator {
    key: String,
    routes: Vec<(Value, usize)>,
}

#[derive(Debug, Clone, Default)]
pub struct UnionKind {
    options: Vec<Arc<dyn DynSchema>>,
    discriminator: Option<Discriminator>,
}

impl UnionKind {
    pub fn options(&self) -> &[Arc<dyn DynSchema>] {
        &self.options
    }

    /// The routing key of a discriminated union.
    pub fn discriminator(&self) -> Option<&str> {
        self.discriminator.as_ref().map(|d| d.key.as_str())
    }

    /// `input` is `None` when the value is absent; every option sees it
    /// that way, and `Ok(None)` means the chosen option omitted it.
    fn parse_first(
        &self,
        input: Option<&Value>,
        ctx: &ParseContext,
    ) -> Result<Option<Value>, Vec<RawIssue>> {
        let mut failures = Vec::with_capacity(self.options.len());
        for option in &self.options {
            match option.parse_dyn(input, ctx) {
                Ok(output) => return Ok(output),
                Err(issues) => failures.push(issues),
            }
        }

        let matched_shape: Vec<usize> = failures
            .iter()
            .enumerate()
            .filter(|(_, issues)| !issues.iter().any(RawIssue::is_fatal))
            .map(|(index, _)| index)
            .collect();
        if let [index] = matched_shape[..] {
            trace!(option = index, "Single union option passed extraction");
            return Err(failures.swap_remove(index));
        }

        let config = global_config();
        let errors = failures
            .into_iter()
            .map(|issues| {
                issues
                    .into_iter()
                    .map(|issue| finalize(issue, ctx, &config))
                    .collect()
            })
            .collect();
        Err(vec![RawIssue::new(
            IssueKind::InvalidUnion { errors, note: None },
            input.cloned().unwrap_or(Value::Null),
        )])
    }

    fn parse_routed(
        &self,
        discriminator: &Discriminator,
        input: &Value,
        ctx: &ParseContext,
    ) -> Result<Value, Vec<RawIssue>> {
        let Value::Object(fields) = input else {
            return Err(vec![create_invalid_type_issue(TypeCode::Object, input)]);
        };
        let tag = fields.get(&discriminator.key).cloned().unwrap_or(Value::Null);
        let route = discriminator
            .routes
            .iter()
            .find(|(value, _)| *value == tag)
            .map(|(_, index)| *index);

        match route.and_then(|index| self.options.get(index)) {
            Some(option) => option
                .parse_dyn(Some(input), ctx)
                .map(|output| output.unwrap_or(Value::Null)),
            None => Err(vec![RawIssue::new(
                IssueKind::InvalidUnion {
                    errors: Vec::new(),
                    note: Some("No matching discriminator".to_string()),
                },
                tag,
            )
            .with_path(vec![PathSegment::Key(discriminator.key.clone())])]),
        }
    }
}

impl SchemaKind for UnionKind {
    type Base = Value;
    const TYPE_CODE: TypeCode = TypeCode::Union;

    fn extract(
        &self,
        input: &Value,
        _internals: &ZodTypeInternals<Value>,
        ctx: &ParseContext,
    ) -> Result<Value, Vec<RawIssue>> {
        match &self.discriminator {
            Some(discriminator) => self.parse_routed(discriminator, input, ctx),
            None => self
                .parse_first(Some(input), ctx)
                .map(|output| output.unwrap_or(Value::Null)),
        }
    }

    fn forwards_null(&self, _internals: &ZodTypeInternals<Value>) -> bool {
        true
    }

    fn extract_absent(
        &self,
        _internals: &ZodTypeInternals<Value>,
        ctx: &ParseContext,
    ) -> Result<Option<Value>, Vec<RawIssue>> {
        match &self.discriminator {
            Some(_) => Err(vec![create_missing_issue(TypeCode::Object)]),
            None => self.parse_first(None, ctx),
        }
    }

    fn extracts_absent(&self) -> bool {
        self.discriminator.is_none() && self.options.iter().any(|option| option.accepts_absent())
    }

    fn property_values(&self, key: &str) -> Option<Vec<Value>> {
        let mut values = Vec::new();
        for option in &self.options {
            values.extend(option.literal_values(key)?);
        }
        Some(values)
    }
}

pub type ZodUnion<C = Required> = Schema<UnionKind, C>;

/// First of `options` that accepts the input.
pub fn union<I>(options: I) -> ZodUnion
where
    I: IntoIterator<Item = Arc<dyn DynSchema>>,
{
    union_with(options, ())
}

pub fn union_with<I>(options: I, params: impl Into<SchemaParams>) -> ZodUnion
where
    I: IntoIterator<Item = Arc<dyn DynSchema>>,
{
    Schema::with_params(
        UnionKind {
            options: options.into_iter().collect(),
            discriminator: None,
        },
        params,
    )
}

/// Union of object options routed on the literal value of `key`.
pub fn discriminated_union<I>(key: impl Into<String>, options: I) -> ZodUnion
where
    I: IntoIterator<Item = Arc<dyn DynSchema>>,
{
    discriminated_union_with(key, options, ())
}

pub fn discriminated_union_with<I>(
    key: impl Into<String>,
    options: I,
    params: impl Into<SchemaParams>,
) -> ZodUnion
where
    I: IntoIterator<Item = Arc<dyn DynSchema>>,
{
    let key = key.into();
    let options: Vec<Arc<dyn DynSchema>> = options.into_iter().collect();
    let mut routes: Vec<(Value, usize)> = Vec::new();
    for (index, option) in options.iter().enumerate() {
        match option.literal_values(&key) {
            Some(values) if !values.is_empty() => {
                for value in values {
                    if routes.iter().any(|(existing, _)| *existing == value) {
                        warn!(discriminator = %key, %value, option = index, "Duplicate discriminator value");
                    } else {
                        routes.push((value, index));
                    }
                }
            }
            _ => warn!(discriminator = %key, option = index, "Union option has no literal discriminator"),
        }
    }
    Schema::with_params(
        UnionKind {
            options,
            discriminator: Some(Discriminator { key, routes }),
        },
        params,
    )
}
