//! Core schema traits.
//!
//! This module defines [`ZodType`], the interface every schema implements,
//! [`ZodTypeExt`], the modifier methods available on every schema, and
//! [`DynSchema`], the object-safe view used wherever schemas of different
//! types are stored together (object shapes, unions, tuples).
//!
//! ## Overview
//!
//! A schema has a *base* type, produced by extraction and seen by checks,
//! and a [`Constraint`] that decides its *output* type:
//!
//! | Schema                              | Base     | Output           |
//! |-------------------------------------|----------|------------------|
//! | `string()`                          | `String` | `String`         |
//! | `string().optional()`               | `String` | `Option<String>` |
//! | `string().optional().non_optional()`| `String` | `String`         |
//!
//! The output type of schema `S` is spelled [`Output<S>`].
//!
//! ## Immutability
//!
//! Schemas never change after construction. Every modifier forks the
//! internals (fresh [`SchemaId`], copied flags and checks), applies its edit
//! to the fork, and returns a new schema:
//!
//! ```rust
//! use zod_runtime::prelude::*;
//! use serde_json::json;
//!
//! let base = string();
//! let short = base.max(3, ());
//! assert!(base.parse(&json!("long enough")).is_ok());
//! assert!(short.parse(&json!("long enough")).is_err());
//! assert_ne!(base.id(), short.id());
//! ```
//!
//! ## Implementing a schema
//!
//! Concrete kinds implement [`SchemaKind`](crate::kinds::SchemaKind) and get
//! a `ZodType` implementation from [`Schema`](crate::kinds::Schema). Types
//! that wrap other schemas, like transforms and pipes, implement `ZodType`
//! directly.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::check::{kinds, Check, CheckDef, ParsePayload};
use crate::compose::{
    intersection, union, RefinementCtx, ZodIntersection, ZodPipe, ZodTransform, ZodUnion,
};
use crate::constraint::{to_json, BaseValue, Constraint, Nullable, Required};
use crate::error::{IssueKind, RawIssue, ZodError};
use crate::internals::{SchemaId, ValueSet, ZodTypeInternals};
use crate::params::SchemaParams;
use crate::parse::{parse_schema, parse_value, strict_parse, ParseContext};
use crate::registry::global_registry;
use crate::types::{GlobalMeta, TypeCode};

/// Output type of schema `S`.
pub type Output<S> = <<S as ZodType>::Constraint as Constraint>::Output<<S as ZodType>::Base>;

/// The schema interface.
///
/// # Required Methods
///
/// - [`internals`](ZodType::internals) - Shared state (flags, checks, fallbacks)
/// - [`with_internals`](ZodType::with_internals) - Same schema type around new internals
/// - [`rebuild`](ZodType::rebuild) - Same kind with a different output constraint
/// - [`extract`](ZodType::extract) - Turn non-null input into the base value
///
/// # Hooks
///
/// - [`coerce_input`](ZodType::coerce_input) - Input conversion used when coercion is on
/// - [`forwards_null`](ZodType::forwards_null) - Pass null to `extract` instead of rejecting it
/// - [`extract_absent`](ZodType::extract_absent) - Handle absent input when null is forwarded
/// - [`extracts_absent`](ZodType::extracts_absent) - Whether `extract_absent` can succeed
/// - [`property_values`](ZodType::property_values) - Literal values of a named property
pub trait ZodType: Clone + Send + Sync + 'static {
    /// What extraction produces and checks inspect.
    type Base: BaseValue;

    /// Output constraint.
    type Constraint: Constraint;

    /// This schema with another output constraint.
    type Retyped<C: Constraint>: ZodType<Base = Self::Base, Constraint = C>;

    /// Internal state.
    fn internals(&self) -> &ZodTypeInternals<Self::Base>;

    /// Build a schema of the same type around `internals`.
    fn with_internals(&self, internals: ZodTypeInternals<Self::Base>) -> Self;

    /// Build a schema of the same kind with constraint `C` around `internals`.
    fn rebuild<C: Constraint>(&self, internals: ZodTypeInternals<Self::Base>) -> Self::Retyped<C>;

    /// Extract the base value from non-null input (null when the schema
    /// forwards null).
    fn extract(&self, input: &Value, ctx: &ParseContext) -> Result<Self::Base, Vec<RawIssue>>;

    fn coerce_input(&self, _input: &Value) -> Option<Value> {
        None
    }

    fn forwards_null(&self) -> bool {
        false
    }

    /// Extract from absent input. Only called when null is forwarded.
    ///
    /// `Ok(None)` omits the value from the parent. By default absence is
    /// treated like explicit null.
    fn extract_absent(&self, ctx: &ParseContext) -> Result<Option<Self::Base>, Vec<RawIssue>> {
        self.extract(&Value::Null, ctx).map(Some)
    }

    fn extracts_absent(&self) -> bool {
        false
    }

    fn property_values(&self, _key: &str) -> Option<Vec<Value>> {
        None
    }

    fn type_code(&self) -> TypeCode {
        self.internals().type_code
    }

    fn id(&self) -> SchemaId {
        self.internals().id()
    }

    fn is_optional(&self) -> bool {
        self.internals().flags.optional
    }

    fn is_nilable(&self) -> bool {
        self.internals().flags.nilable
    }

    /// Parse a JSON value.
    fn parse(&self, input: &Value) -> Result<Output<Self>, ZodError> {
        parse_value(self, input, &ParseContext::default())
    }

    /// Parse a JSON value with a context.
    fn parse_with(&self, input: &Value, ctx: &ParseContext) -> Result<Output<Self>, ZodError> {
        parse_value(self, input, ctx)
    }

    /// Parse and return the output as JSON.
    fn parse_any(&self, input: &Value) -> Result<Value, ZodError> {
        self.parse(input).map(|output| to_json(&output))
    }

    /// Parse, panicking with the rendered error on failure.
    fn must_parse(&self, input: &Value) -> Output<Self> {
        match self.parse(input) {
            Ok(output) => output,
            Err(err) => panic!("{}", err),
        }
    }

    /// Validate an already typed value: checks only, no extraction.
    fn strict_parse(&self, input: Output<Self>) -> Result<Output<Self>, ZodError> {
        strict_parse(self, input, &ParseContext::default())
    }

    fn strict_parse_with(
        &self,
        input: Output<Self>,
        ctx: &ParseContext,
    ) -> Result<Output<Self>, ZodError> {
        strict_parse(self, input, ctx)
    }

    /// [`strict_parse`](ZodType::strict_parse), panicking on failure.
    fn must_strict_parse(&self, input: Output<Self>) -> Output<Self> {
        match self.strict_parse(input) {
            Ok(output) => output,
            Err(err) => panic!("{}", err),
        }
    }
}

/// Modifiers available on every schema.
///
/// All methods return new schemas; the receiver is left untouched.
pub trait ZodTypeExt: ZodType {
    /// Fork the internals, edit the fork, and wrap it in a new schema.
    fn modify(&self, edit: impl FnOnce(&mut ZodTypeInternals<Self::Base>)) -> Self {
        let mut next = self.internals().fork();
        edit(&mut next);
        self.with_internals(next)
    }

    /// Append a check.
    fn add_check(&self, check: Check<Self::Base>) -> Self {
        self.modify(|internals| internals.add_check(check))
    }

    /// Accept absent and null input, producing `None`.
    fn optional(&self) -> Self::Retyped<Nullable> {
        let mut next = self.internals().fork();
        next.set_optional(true);
        next.set_non_optional(false);
        self.rebuild::<Nullable>(next)
    }

    /// Accept explicit null, producing `None`.
    fn nilable(&self) -> Self::Retyped<Nullable> {
        let mut next = self.internals().fork();
        next.set_nilable(true);
        next.set_non_optional(false);
        self.rebuild::<Nullable>(next)
    }

    /// Optional and nilable.
    fn nullish(&self) -> Self::Retyped<Nullable> {
        let mut next = self.internals().fork();
        next.set_optional(true);
        next.set_nilable(true);
        next.set_non_optional(false);
        self.rebuild::<Nullable>(next)
    }

    /// Accept an absent object key, but not an explicit null.
    fn exact_optional(&self) -> Self {
        self.modify(|internals| internals.set_exact_optional(true))
    }

    /// Reject absent and null input again; output switches back to the base type.
    fn non_optional(&self) -> Self::Retyped<Required> {
        let mut next = self.internals().fork();
        next.set_non_optional(true);
        self.rebuild::<Required>(next)
    }

    /// Value returned for null or absent input. Checks are skipped.
    fn default(&self, value: Self::Base) -> Self {
        self.modify(|internals| internals.set_default_value(value))
    }

    /// Like [`default`](ZodTypeExt::default), computed on every use.
    fn default_fn<F>(&self, f: F) -> Self
    where
        F: Fn() -> Self::Base + Send + Sync + 'static,
    {
        self.modify(|internals| internals.set_default_func(Arc::new(f)))
    }

    /// Input substituted for null or absent input before parsing.
    fn prefault(&self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.modify(|internals| internals.set_prefault_value(value))
    }

    /// Like [`prefault`](ZodTypeExt::prefault), computed on every use.
    fn prefault_fn<F>(&self, f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.modify(|internals| internals.set_prefault_func(Arc::new(f)))
    }

    /// Convert input with the kind's coercion before extraction.
    fn coerce(&self) -> Self {
        self.modify(|internals| internals.set_coerce(true))
    }

    /// Schema-level error message or mapper for type issues.
    fn error(&self, params: impl Into<SchemaParams>) -> Self {
        let error = params.into().normalize().error;
        self.modify(|internals| internals.set_error(error))
    }

    /// Fail with a `custom` issue when `predicate` rejects the base value.
    fn refine<F>(&self, predicate: F, params: impl Into<SchemaParams>) -> Self
    where
        F: Fn(&Self::Base) -> bool + Send + Sync + 'static,
    {
        self.add_check(Check::custom(predicate, params))
    }

    /// Like [`refine`](ZodTypeExt::refine), on the JSON form of the value.
    fn refine_any<F>(&self, predicate: F, params: impl Into<SchemaParams>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.add_check(Check::new(
            kinds::CUSTOM,
            params,
            move |payload: &mut ParsePayload<Self::Base>, def: &CheckDef| {
                let value = to_json(payload.value());
                if !predicate(&value) {
                    payload.add_issue(def.issue(
                        IssueKind::Custom {
                            params: def.params.clone(),
                        },
                        value,
                    ));
                }
            },
        ))
    }

    /// Run a callback that may add any number of issues to the payload.
    fn check<F>(&self, f: F) -> Self
    where
        F: Fn(&mut ParsePayload<Self::Base>) + Send + Sync + 'static,
    {
        self.add_check(Check::from_def(
            CheckDef::new(kinds::CUSTOM),
            move |payload: &mut ParsePayload<Self::Base>, _: &CheckDef| f(payload),
        ))
    }

    /// Alias of [`check`](ZodTypeExt::check).
    fn with<F>(&self, f: F) -> Self
    where
        F: Fn(&mut ParsePayload<Self::Base>) + Send + Sync + 'static,
    {
        self.check(f)
    }

    /// Rewrite the base value in place of the check list.
    fn overwrite<F>(&self, f: F) -> Self
    where
        F: Fn(&Self::Base) -> Self::Base + Send + Sync + 'static,
    {
        self.add_check(Check::overwrite(f))
    }

    /// Map the output to a new type after a successful parse.
    fn transform<U, E, F>(&self, f: F) -> ZodTransform<Self, U>
    where
        U: BaseValue,
        E: fmt::Display + 'static,
        F: Fn(Output<Self>, &mut RefinementCtx) -> Result<U, E> + Send + Sync + 'static,
    {
        ZodTransform::new(self.clone(), f)
    }

    /// Feed the output, as JSON, into `target`.
    fn pipe<T: ZodType>(&self, target: T) -> ZodPipe<Self, T> {
        ZodPipe::new(self.clone(), target)
    }

    /// Union of this schema and `other`.
    fn or<T: ZodType>(&self, other: T) -> ZodUnion {
        union([self.clone().into_dyn(), other.into_dyn()])
    }

    /// Intersection of this schema and `other`.
    fn and<T: ZodType>(&self, other: T) -> ZodIntersection {
        intersection(self.clone(), other)
    }

    /// Type-erase the schema.
    fn into_dyn(self) -> Arc<dyn DynSchema> {
        Arc::new(self)
    }

    /// Fork and register a description, keeping other registered metadata.
    fn describe(&self, description: impl Into<String>) -> Self {
        let existing = self.meta().unwrap_or_default();
        let next = self.modify(|_| {});
        global_registry().add(next.id(), existing.with_description(description));
        next
    }

    /// Fork and register `meta` for the new schema.
    fn with_meta(&self, meta: GlobalMeta) -> Self {
        let next = self.modify(|_| {});
        global_registry().add(next.id(), meta);
        next
    }

    /// Registered metadata.
    fn meta(&self) -> Option<GlobalMeta> {
        global_registry().get(self.id())
    }

    /// Registered description.
    fn description(&self) -> Option<String> {
        self.meta().and_then(|meta| meta.description)
    }
}

impl<S: ZodType> ZodTypeExt for S {}

/// Object-safe schema view, with JSON output.
pub trait DynSchema: Send + Sync {
    fn schema_id(&self) -> SchemaId;

    fn schema_type(&self) -> TypeCode;

    /// Whether an absent value is acceptable (optional, exact-optional, or
    /// covered by a default or prefault).
    fn accepts_absent(&self) -> bool;

    /// Parse through the pipeline; `Ok(None)` means "omit".
    fn parse_dyn(
        &self,
        input: Option<&Value>,
        ctx: &ParseContext,
    ) -> Result<Option<Value>, Vec<RawIssue>>;

    /// Allowed values of literal-like schemas.
    fn value_set(&self) -> Option<Arc<ValueSet>>;

    /// Literal values of a property, for discriminated unions.
    fn literal_values(&self, key: &str) -> Option<Vec<Value>>;

    /// Optional copy.
    fn optional_dyn(&self) -> Arc<dyn DynSchema>;

    /// Non-optional copy.
    fn required_dyn(&self) -> Arc<dyn DynSchema>;
}

impl<S: ZodType> DynSchema for S {
    fn schema_id(&self) -> SchemaId {
        self.id()
    }

    fn schema_type(&self) -> TypeCode {
        self.type_code()
    }

    fn accepts_absent(&self) -> bool {
        let internals = self.internals();
        internals.flags.optional
            || internals.flags.exact_optional
            || internals.default_value().is_some()
            || internals.prefault_value().is_some()
            || self.extracts_absent()
    }

    fn parse_dyn(
        &self,
        input: Option<&Value>,
        ctx: &ParseContext,
    ) -> Result<Option<Value>, Vec<RawIssue>> {
        parse_schema(self, input, ctx).map(|output| output.map(|value| to_json(&value)))
    }

    fn value_set(&self) -> Option<Arc<ValueSet>> {
        self.internals().values().cloned()
    }

    fn literal_values(&self, key: &str) -> Option<Vec<Value>> {
        self.property_values(key)
    }

    fn optional_dyn(&self) -> Arc<dyn DynSchema> {
        Arc::new(self.optional())
    }

    fn required_dyn(&self) -> Arc<dyn DynSchema> {
        Arc::new(self.non_optional())
    }
}

impl fmt::Debug for dyn DynSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynSchema")
            .field("id", &self.schema_id())
            .field("type", &self.schema_type())
            .finish()
    }
}
