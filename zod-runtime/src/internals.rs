//! Per-schema state: identity, flags, checks, fallbacks, and bookkeeping.
//!
//! Internals are never mutated once a schema is handed out. Every modifier
//! calls [`ZodTypeInternals::fork`], edits the fork, and builds a new schema
//! around it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::check::Check;
use crate::config::ErrorMap;
use crate::types::TypeCode;

static NEXT_SCHEMA_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identity of a schema instance. Forks get a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaId(u64);

impl SchemaId {
    pub(crate) fn next() -> Self {
        Self(NEXT_SCHEMA_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "schema#{}", self.0)
    }
}

/// Modifier flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaFlags {
    /// Absent or null input yields the null output.
    pub optional: bool,
    /// Explicit null yields the null output.
    pub nilable: bool,
    /// Absent object keys are accepted; explicit null is not.
    pub exact_optional: bool,
    /// Set by `non_optional()`.
    pub non_optional: bool,
    /// Coerce input before extraction.
    pub coerce: bool,
    /// Set by `non_optional()`; marks an object key as mandatory.
    pub required: bool,
}

/// A fallback value: either stored or produced on demand.
pub enum Fallback<T> {
    Value(T),
    Func(Arc<dyn Fn() -> T + Send + Sync>),
}

impl<T: Clone> Fallback<T> {
    /// Produce the fallback value.
    pub fn resolve(&self) -> T {
        match self {
            Self::Value(value) => value.clone(),
            Self::Func(func) => func(),
        }
    }
}

impl<T: Clone> Clone for Fallback<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Value(value) => Self::Value(value.clone()),
            Self::Func(func) => Self::Func(Arc::clone(func)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Fallback<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Func(_) => f.write_str("Func(..)"),
        }
    }
}

/// Allowed literal values with constant-time membership.
#[derive(Debug, Clone, Default)]
pub struct ValueSet {
    values: Vec<Value>,
    index: HashSet<String>,
}

impl ValueSet {
    /// Build a set, dropping duplicates and keeping first-seen order.
    pub fn new(values: impl IntoIterator<Item = Value>) -> Self {
        let mut set = Self::default();
        for value in values {
            if set.index.insert(value.to_string()) {
                set.values.push(value);
            }
        }
        set
    }

    /// Membership test by JSON equality.
    pub fn contains(&self, value: &Value) -> bool {
        self.index.contains(&value.to_string())
    }

    /// Values in insertion order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Internal state of a schema with base type `T`.
pub struct ZodTypeInternals<T> {
    /// Kind tag.
    pub type_code: TypeCode,
    id: SchemaId,
    /// Modifier flags.
    pub flags: SchemaFlags,
    checks: Vec<Check<T>>,
    default: Option<Fallback<T>>,
    prefault: Option<Fallback<Value>>,
    error: Option<ErrorMap>,
    bag: Map<String, Value>,
    values: Option<Arc<ValueSet>>,
}

impl<T: Clone> Clone for ZodTypeInternals<T> {
    fn clone(&self) -> Self {
        Self {
            type_code: self.type_code,
            id: self.id,
            flags: self.flags,
            checks: self.checks.clone(),
            default: self.default.clone(),
            prefault: self.prefault.clone(),
            error: self.error.clone(),
            bag: self.bag.clone(),
            values: self.values.clone(),
        }
    }
}

impl<T> fmt::Debug for ZodTypeInternals<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZodTypeInternals")
            .field("type_code", &self.type_code)
            .field("id", &self.id)
            .field("flags", &self.flags)
            .field("checks", &self.checks.iter().map(Check::kind).collect::<Vec<_>>())
            .field("default", &self.default.is_some())
            .field("prefault", &self.prefault.is_some())
            .field("error", &self.error.is_some())
            .field("bag", &self.bag)
            .finish()
    }
}

impl<T: Clone> ZodTypeInternals<T> {
    /// Fresh internals for a kind.
    pub fn new(type_code: TypeCode) -> Self {
        Self {
            type_code,
            id: SchemaId::next(),
            flags: SchemaFlags::default(),
            checks: Vec::new(),
            default: None,
            prefault: None,
            error: None,
            bag: Map::new(),
            values: None,
        }
    }

    /// Copy with a fresh identity.
    pub fn fork(&self) -> Self {
        let mut fork = self.clone();
        fork.id = SchemaId::next();
        fork
    }

    pub fn id(&self) -> SchemaId {
        self.id
    }

    pub fn checks(&self) -> &[Check<T>] {
        &self.checks
    }

    pub fn default_value(&self) -> Option<&Fallback<T>> {
        self.default.as_ref()
    }

    pub fn prefault_value(&self) -> Option<&Fallback<Value>> {
        self.prefault.as_ref()
    }

    /// Schema-level error mapper.
    pub fn error(&self) -> Option<&ErrorMap> {
        self.error.as_ref()
    }

    /// Bookkeeping written by checks (`minimum`, `patterns`, ...).
    pub fn bag(&self) -> &Map<String, Value> {
        &self.bag
    }

    /// Allowed values for literal-like kinds.
    pub fn values(&self) -> Option<&Arc<ValueSet>> {
        self.values.as_ref()
    }

    pub fn add_check(&mut self, check: Check<T>) {
        self.checks.push(check);
    }

    pub fn set_optional(&mut self, optional: bool) {
        self.flags.optional = optional;
    }

    pub fn set_nilable(&mut self, nilable: bool) {
        self.flags.nilable = nilable;
    }

    pub fn set_exact_optional(&mut self, exact_optional: bool) {
        self.flags.exact_optional = exact_optional;
    }

    /// Clears optional, nilable, and exact-optional, and marks the schema required.
    pub fn set_non_optional(&mut self, non_optional: bool) {
        self.flags.non_optional = non_optional;
        if non_optional {
            self.flags.optional = false;
            self.flags.nilable = false;
            self.flags.exact_optional = false;
            self.flags.required = true;
        }
    }

    pub fn set_coerce(&mut self, coerce: bool) {
        self.flags.coerce = coerce;
    }

    pub fn set_required(&mut self, required: bool) {
        self.flags.required = required;
    }

    pub fn set_default_value(&mut self, value: T) {
        self.default = Some(Fallback::Value(value));
    }

    pub fn set_default_func(&mut self, func: Arc<dyn Fn() -> T + Send + Sync>) {
        self.default = Some(Fallback::Func(func));
    }

    pub fn set_prefault_value(&mut self, value: Value) {
        self.prefault = Some(Fallback::Value(value));
    }

    pub fn set_prefault_func(&mut self, func: Arc<dyn Fn() -> Value + Send + Sync>) {
        self.prefault = Some(Fallback::Func(func));
    }

    pub fn set_error(&mut self, error: Option<ErrorMap>) {
        self.error = error;
    }

    pub fn set_bag_entry(&mut self, key: impl Into<String>, value: Value) {
        self.bag.insert(key.into(), value);
    }

    /// Append to an array entry of the bag.
    pub fn push_bag_item(&mut self, key: &str, value: Value) {
        match self.bag.get_mut(key) {
            Some(Value::Array(items)) => items.push(value),
            _ => {
                self.bag.insert(key.to_string(), Value::Array(vec![value]));
            }
        }
    }

    pub fn set_values(&mut self, values: ValueSet) {
        self.values = Some(Arc::new(values));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fork_assigns_fresh_id() {
        let original: ZodTypeInternals<String> = ZodTypeInternals::new(TypeCode::String);
        let fork = original.fork();
        assert_ne!(original.id(), fork.id());
        assert_eq!(original.type_code, fork.type_code);
    }

    #[test]
    fn test_fork_does_not_leak_edits() {
        let original: ZodTypeInternals<String> = ZodTypeInternals::new(TypeCode::String);
        let mut fork = original.fork();
        fork.add_check(Check::overwrite(|s: &String| s.trim().to_string()));
        fork.set_optional(true);
        fork.set_bag_entry("minimum", json!(3));

        assert!(original.checks().is_empty());
        assert!(!original.flags.optional);
        assert!(original.bag().is_empty());
        assert_eq!(fork.checks().len(), 1);
    }

    #[test]
    fn test_non_optional_clears_optionality() {
        let mut internals: ZodTypeInternals<i64> = ZodTypeInternals::new(TypeCode::Int);
        internals.set_optional(true);
        internals.set_nilable(true);
        internals.set_exact_optional(true);
        internals.set_non_optional(true);
        assert!(!internals.flags.optional);
        assert!(!internals.flags.nilable);
        assert!(!internals.flags.exact_optional);
        assert!(internals.flags.required);
    }

    #[test]
    fn test_value_set_dedupes_in_order() {
        let set = ValueSet::new([json!("a"), json!(1), json!("a"), json!(true)]);
        assert_eq!(set.values(), &[json!("a"), json!(1), json!(true)]);
        assert!(set.contains(&json!(1)));
        assert!(!set.contains(&json!("1")));
    }

    #[test]
    fn test_fallback_func_runs_each_time() {
        use std::sync::atomic::AtomicUsize;
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let fallback: Fallback<usize> =
            Fallback::Func(Arc::new(move || counter.fetch_add(1, Ordering::SeqCst)));
        assert_eq!(fallback.resolve(), 0);
        assert_eq!(fallback.resolve(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_push_bag_item_appends() {
        let mut internals: ZodTypeInternals<String> = ZodTypeInternals::new(TypeCode::String);
        internals.push_bag_item("patterns", json!("^a"));
        internals.push_bag_item("patterns", json!("b$"));
        assert_eq!(internals.bag()["patterns"], json!(["^a", "b$"]));
    }
}
