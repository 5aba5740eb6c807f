//! Concrete schema kinds.
//!
//! A kind supplies what is specific to one schema type (type tag, base type,
//! extraction, coercion) and [`Schema`] supplies everything else: internals,
//! modifiers, and the [`ZodType`] implementation. Kind-specific builder
//! methods (`min`, `email`, `strict`, ...) are inherent methods on
//! `Schema<Kind, C>`.

use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::check::{Check, Comparable, Numeric};
use crate::constraint::{to_json, BaseValue, Constraint, Required};
use crate::error::{create_missing_issue, RawIssue};
use crate::internals::ZodTypeInternals;
use crate::params::SchemaParams;
use crate::parse::ParseContext;
use crate::registry::global_registry;
use crate::traits::{ZodType, ZodTypeExt};
use crate::types::{GlobalMeta, TypeCode};

pub mod array;
pub mod boolean;
pub mod enumeration;
pub mod literal;
pub mod never;
pub mod number;
pub mod object;
pub mod string;
pub mod string_bool;
#[cfg(feature = "chrono")]
pub mod time;
pub mod tuple;
pub mod unknown;

/// Kind-specific behavior of a schema.
pub trait SchemaKind: Send + Sync + 'static {
    /// Value produced by extraction.
    type Base: BaseValue;

    /// Tag reported in `invalid_type` issues.
    const TYPE_CODE: TypeCode;

    /// Extract the base value from non-null input (or null, when the kind
    /// forwards it).
    fn extract(
        &self,
        input: &Value,
        internals: &ZodTypeInternals<Self::Base>,
        ctx: &ParseContext,
    ) -> Result<Self::Base, Vec<RawIssue>>;

    /// Convert input before extraction when coercion is enabled.
    fn coerce(&self, _input: &Value) -> Option<Value> {
        None
    }

    /// Pass null input to [`extract`](SchemaKind::extract).
    fn forwards_null(&self, _internals: &ZodTypeInternals<Self::Base>) -> bool {
        false
    }

    /// Handle absent input of a kind that forwards null. `Ok(None)` omits
    /// the value from the parent.
    fn extract_absent(
        &self,
        _internals: &ZodTypeInternals<Self::Base>,
        _ctx: &ParseContext,
    ) -> Result<Option<Self::Base>, Vec<RawIssue>> {
        Err(vec![create_missing_issue(Self::TYPE_CODE)])
    }

    fn extracts_absent(&self) -> bool {
        false
    }

    fn property_values(&self, _key: &str) -> Option<Vec<Value>> {
        None
    }
}

/// A schema of kind `K` with output constraint `C`.
pub struct Schema<K: SchemaKind, C: Constraint = Required> {
    kind: Arc<K>,
    internals: ZodTypeInternals<K::Base>,
    _constraint: PhantomData<C>,
}

impl<K: SchemaKind, C: Constraint> Clone for Schema<K, C> {
    fn clone(&self) -> Self {
        Self {
            kind: Arc::clone(&self.kind),
            internals: self.internals.clone(),
            _constraint: PhantomData,
        }
    }
}

impl<K: SchemaKind + fmt::Debug, C: Constraint> fmt::Debug for Schema<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("kind", &self.kind)
            .field("internals", &self.internals)
            .field("nullable", &C::NULLABLE)
            .finish()
    }
}

impl<K: SchemaKind> Schema<K, Required> {
    /// Build a schema from a kind and constructor parameters.
    ///
    /// A message or error mapper in `params` becomes the schema-level error,
    /// `coerce` turns on coercion, and a description is registered in the
    /// global registry.
    pub fn with_params(kind: K, params: impl Into<SchemaParams>) -> Self {
        let params = params.into().normalize();
        let mut internals = ZodTypeInternals::new(K::TYPE_CODE);
        internals.set_error(params.error);
        internals.set_coerce(params.coerce);
        let schema = Self {
            kind: Arc::new(kind),
            internals,
            _constraint: PhantomData,
        };
        if let Some(description) = params.description {
            global_registry().add(
                schema.internals.id(),
                GlobalMeta::new().with_description(description),
            );
        }
        schema
    }

    pub fn new(kind: K) -> Self {
        Self::with_params(kind, ())
    }
}

impl<K: SchemaKind, C: Constraint> Schema<K, C> {
    /// The kind.
    pub fn kind(&self) -> &K {
        &self.kind
    }

    /// Edit internals of a schema that has not been handed out yet.
    pub(crate) fn seeded(mut self, edit: impl FnOnce(&mut ZodTypeInternals<K::Base>)) -> Self {
        edit(&mut self.internals);
        self
    }

    /// Same internals (forked) around a new kind.
    pub(crate) fn with_kind(&self, kind: K) -> Self {
        Self {
            kind: Arc::new(kind),
            internals: self.internals.fork(),
            _constraint: PhantomData,
        }
    }

    /// Append a check and record bag entries for it.
    pub(crate) fn push_check(&self, check: Check<K::Base>, bag: &[(&str, Value)]) -> Self {
        self.modify(|internals| {
            internals.add_check(check);
            for (key, value) in bag {
                internals.set_bag_entry(*key, value.clone());
            }
        })
    }
}

impl<K: SchemaKind, C: Constraint> ZodType for Schema<K, C> {
    type Base = K::Base;
    type Constraint = C;
    type Retyped<C2: Constraint> = Schema<K, C2>;

    fn internals(&self) -> &ZodTypeInternals<K::Base> {
        &self.internals
    }

    fn with_internals(&self, internals: ZodTypeInternals<K::Base>) -> Self {
        Self {
            kind: Arc::clone(&self.kind),
            internals,
            _constraint: PhantomData,
        }
    }

    fn rebuild<C2: Constraint>(&self, internals: ZodTypeInternals<K::Base>) -> Schema<K, C2> {
        Schema {
            kind: Arc::clone(&self.kind),
            internals,
            _constraint: PhantomData,
        }
    }

    fn extract(&self, input: &Value, ctx: &ParseContext) -> Result<K::Base, Vec<RawIssue>> {
        self.kind.extract(input, &self.internals, ctx)
    }

    fn coerce_input(&self, input: &Value) -> Option<Value> {
        self.kind.coerce(input)
    }

    fn forwards_null(&self) -> bool {
        self.kind.forwards_null(&self.internals)
    }

    fn extract_absent(&self, ctx: &ParseContext) -> Result<Option<K::Base>, Vec<RawIssue>> {
        self.kind.extract_absent(&self.internals, ctx)
    }

    fn extracts_absent(&self) -> bool {
        self.kind.extracts_absent()
    }

    fn property_values(&self, key: &str) -> Option<Vec<Value>> {
        self.kind.property_values(key)
    }
}

/// Range checks shared by numbers, integers, and times.
impl<K, C> Schema<K, C>
where
    K: SchemaKind,
    K::Base: Comparable,
    C: Constraint,
{
    /// Greater than `bound`.
    pub fn gt(&self, bound: K::Base, params: impl Into<SchemaParams>) -> Self {
        let limit = to_json(&bound);
        self.push_check(
            Check::greater_than(bound, false, params),
            &[("exclusive_minimum", limit)],
        )
    }

    /// Greater than or equal to `bound`.
    pub fn gte(&self, bound: K::Base, params: impl Into<SchemaParams>) -> Self {
        let limit = to_json(&bound);
        self.push_check(
            Check::greater_than(bound, true, params),
            &[("minimum", limit)],
        )
    }

    /// Less than `bound`.
    pub fn lt(&self, bound: K::Base, params: impl Into<SchemaParams>) -> Self {
        let limit = to_json(&bound);
        self.push_check(
            Check::less_than(bound, false, params),
            &[("exclusive_maximum", limit)],
        )
    }

    /// Less than or equal to `bound`.
    pub fn lte(&self, bound: K::Base, params: impl Into<SchemaParams>) -> Self {
        let limit = to_json(&bound);
        self.push_check(Check::less_than(bound, true, params), &[("maximum", limit)])
    }
}

/// Sign and step checks shared by numbers and integers.
impl<K, C> Schema<K, C>
where
    K: SchemaKind,
    K::Base: Numeric,
    C: Constraint,
{
    pub fn positive(&self, params: impl Into<SchemaParams>) -> Self {
        self.gt(<K::Base as Numeric>::zero(), params)
    }

    pub fn negative(&self, params: impl Into<SchemaParams>) -> Self {
        self.lt(<K::Base as Numeric>::zero(), params)
    }

    pub fn nonnegative(&self, params: impl Into<SchemaParams>) -> Self {
        self.gte(<K::Base as Numeric>::zero(), params)
    }

    pub fn nonpositive(&self, params: impl Into<SchemaParams>) -> Self {
        self.lte(<K::Base as Numeric>::zero(), params)
    }

    /// Divisible by `step`.
    pub fn multiple_of(&self, step: K::Base, params: impl Into<SchemaParams>) -> Self {
        let divisor = to_json(&step);
        self.push_check(Check::multiple_of(step, params), &[("multiple_of", divisor)])
    }

    /// Alias of [`multiple_of`](Self::multiple_of).
    pub fn step(&self, step: K::Base, params: impl Into<SchemaParams>) -> Self {
        self.multiple_of(step, params)
    }
}
