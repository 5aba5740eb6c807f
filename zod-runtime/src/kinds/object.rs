//! Object schemas.
//!
//! An object schema holds an ordered shape of named field schemas. Fields
//! are parsed in shape order; keys not in the shape are dropped, rejected,
//! or kept depending on the [`UnknownKeys`] mode.
//!
//! ```rust
//! use zod_runtime::prelude::*;
//! use serde_json::json;
//!
//! let user = object([
//!     ("name", string().min(1, ()).into_dyn()),
//!     ("age", int().nonnegative(()).optional().into_dyn()),
//! ]);
//!
//! let parsed = user.parse(&json!({"name": "Ada", "extra": true})).unwrap();
//! assert_eq!(serde_json::Value::Object(parsed), json!({"name": "Ada"}));
//!
//! let err = user.strict().parse(&json!({"name": "Ada", "extra": true})).unwrap_err();
//! assert_eq!(err.issues()[0].code(), IssueCode::UnrecognizedKeys);
//! ```

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::constraint::{Constraint, Required};
use crate::error::{create_invalid_type_issue, IssueKind, RawIssue};
use crate::internals::ZodTypeInternals;
use crate::kinds::enumeration::{enumeration, ZodEnum};
use crate::kinds::{Schema, SchemaKind};
use crate::params::SchemaParams;
use crate::parse::ParseContext;
use crate::traits::DynSchema;
use crate::types::TypeCode;

/// Handling of keys outside the shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownKeys {
    /// Drop them from the output.
    #[default]
    Strip,
    /// Fail with `unrecognized_keys`.
    Strict,
    /// Copy them to the output unchanged.
    Passthrough,
}

/// A named field of an object shape.
pub type Field = (String, Arc<dyn DynSchema>);

#[derive(Debug, Clone, Default)]
pub struct ObjectKind {
    shape: Vec<Field>,
    unknown_keys: UnknownKeys,
}

impl ObjectKind {
    fn field(&self, key: &str) -> Option<&Arc<dyn DynSchema>> {
        self.shape
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, schema)| schema)
    }

    fn insert(&mut self, key: String, schema: Arc<dyn DynSchema>) {
        match self.shape.iter_mut().find(|(name, _)| *name == key) {
            Some(slot) => slot.1 = schema,
            None => self.shape.push((key, schema)),
        }
    }

    fn mapped(&self, f: impl Fn(&Arc<dyn DynSchema>) -> Arc<dyn DynSchema>) -> Self {
        Self {
            shape: self
                .shape
                .iter()
                .map(|(key, schema)| (key.clone(), f(schema)))
                .collect(),
            unknown_keys: self.unknown_keys,
        }
    }
}

impl SchemaKind for ObjectKind {
    type Base = Map<String, Value>;
    const TYPE_CODE: TypeCode = TypeCode::Object;

    fn extract(
        &self,
        input: &Value,
        _internals: &ZodTypeInternals<Map<String, Value>>,
        ctx: &ParseContext,
    ) -> Result<Map<String, Value>, Vec<RawIssue>> {
        let Value::Object(fields) = input else {
            return Err(vec![create_invalid_type_issue(TypeCode::Object, input)]);
        };

        let mut output = Map::new();
        let mut issues = Vec::new();
        for (key, schema) in &self.shape {
            match schema.parse_dyn(fields.get(key), ctx) {
                Ok(Some(value)) => {
                    output.insert(key.clone(), value);
                }
                Ok(None) => {}
                Err(child) => {
                    issues.extend(child.into_iter().map(|issue| issue.prefixed(key.as_str())))
                }
            }
        }

        let unknown = fields
            .iter()
            .filter(|(key, _)| self.field(key).is_none());
        match self.unknown_keys {
            UnknownKeys::Strip => {}
            UnknownKeys::Passthrough => {
                for (key, value) in unknown {
                    output.insert(key.clone(), value.clone());
                }
            }
            UnknownKeys::Strict => {
                let keys: Vec<String> = unknown.map(|(key, _)| key.clone()).collect();
                if !keys.is_empty() {
                    issues.push(RawIssue::new(
                        IssueKind::UnrecognizedKeys { keys },
                        input.clone(),
                    ));
                }
            }
        }

        if issues.is_empty() {
            Ok(output)
        } else {
            Err(issues)
        }
    }

    fn property_values(&self, key: &str) -> Option<Vec<Value>> {
        self.field(key)
            .and_then(|schema| schema.value_set())
            .map(|set| set.values().to_vec())
    }
}

pub type ZodObject<C = Required> = Schema<ObjectKind, C>;

fn build<I, K>(fields: I, unknown_keys: UnknownKeys, params: impl Into<SchemaParams>) -> ZodObject
where
    I: IntoIterator<Item = (K, Arc<dyn DynSchema>)>,
    K: Into<String>,
{
    let mut kind = ObjectKind {
        shape: Vec::new(),
        unknown_keys,
    };
    for (key, schema) in fields {
        kind.insert(key.into(), schema);
    }
    Schema::with_params(kind, params)
}

/// Object that strips unknown keys.
pub fn object<I, K>(fields: I) -> ZodObject
where
    I: IntoIterator<Item = (K, Arc<dyn DynSchema>)>,
    K: Into<String>,
{
    build(fields, UnknownKeys::Strip, ())
}

pub fn object_with<I, K>(fields: I, params: impl Into<SchemaParams>) -> ZodObject
where
    I: IntoIterator<Item = (K, Arc<dyn DynSchema>)>,
    K: Into<String>,
{
    build(fields, UnknownKeys::Strip, params)
}

/// Object that rejects unknown keys.
pub fn strict_object<I, K>(fields: I) -> ZodObject
where
    I: IntoIterator<Item = (K, Arc<dyn DynSchema>)>,
    K: Into<String>,
{
    build(fields, UnknownKeys::Strict, ())
}

/// Object that keeps unknown keys.
pub fn loose_object<I, K>(fields: I) -> ZodObject
where
    I: IntoIterator<Item = (K, Arc<dyn DynSchema>)>,
    K: Into<String>,
{
    build(fields, UnknownKeys::Passthrough, ())
}

impl<C: Constraint> Schema<ObjectKind, C> {
    pub fn shape(&self) -> &[Field] {
        &self.kind().shape
    }

    /// Field names in shape order.
    pub fn keys(&self) -> Vec<&str> {
        self.shape().iter().map(|(key, _)| key.as_str()).collect()
    }

    pub fn unknown_keys(&self) -> UnknownKeys {
        self.kind().unknown_keys
    }

    /// Schema of field `key`.
    pub fn get(&self, key: &str) -> Option<Arc<dyn DynSchema>> {
        self.kind().field(key).cloned()
    }

    /// Enum of the field names.
    pub fn keyof(&self) -> ZodEnum {
        enumeration(self.keys())
    }

    fn with_unknown_keys(&self, unknown_keys: UnknownKeys) -> Self {
        self.with_kind(ObjectKind {
            shape: self.kind().shape.clone(),
            unknown_keys,
        })
    }

    pub fn strict(&self) -> Self {
        self.with_unknown_keys(UnknownKeys::Strict)
    }

    pub fn strip(&self) -> Self {
        self.with_unknown_keys(UnknownKeys::Strip)
    }

    pub fn passthrough(&self) -> Self {
        self.with_unknown_keys(UnknownKeys::Passthrough)
    }

    /// Add fields, replacing fields of the same name.
    pub fn extend<I, K>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Arc<dyn DynSchema>)>,
        K: Into<String>,
    {
        let mut kind = self.kind().clone();
        for (key, schema) in fields {
            kind.insert(key.into(), schema);
        }
        self.with_kind(kind)
    }

    /// Add every field of `other`. Unknown-key handling of `other` wins.
    pub fn merge<C2: Constraint>(&self, other: &Schema<ObjectKind, C2>) -> Self {
        let mut kind = self.kind().clone();
        for (key, schema) in other.shape() {
            kind.insert(key.clone(), Arc::clone(schema));
        }
        kind.unknown_keys = other.unknown_keys();
        self.with_kind(kind)
    }

    /// Keep only `keys`.
    pub fn pick(&self, keys: &[&str]) -> Self {
        let mut kind = self.kind().clone();
        kind.shape.retain(|(key, _)| keys.contains(&key.as_str()));
        self.with_kind(kind)
    }

    /// Drop `keys`.
    pub fn omit(&self, keys: &[&str]) -> Self {
        let mut kind = self.kind().clone();
        kind.shape.retain(|(key, _)| !keys.contains(&key.as_str()));
        self.with_kind(kind)
    }

    /// Every field optional.
    pub fn partial(&self) -> Self {
        self.with_kind(self.kind().mapped(|schema| schema.optional_dyn()))
    }

    /// Every field non-optional.
    pub fn required(&self) -> Self {
        self.with_kind(self.kind().mapped(|schema| schema.required_dyn()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{IssueCode, PathSegment};
    use crate::kinds::literal::literal;
    use crate::kinds::number::int;
    use crate::kinds::string::string;
    use crate::traits::{ZodType, ZodTypeExt};
    use serde_json::json;

    fn person() -> ZodObject {
        object([
            ("name", string().into_dyn()),
            ("age", int().into_dyn()),
        ])
    }

    #[test]
    fn test_field_issues_carry_key_path() {
        let err = person().parse(&json!({"name": 5, "age": "x"})).unwrap_err();
        let paths: Vec<_> = err.issues().iter().map(|issue| issue.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                vec![PathSegment::Key("name".into())],
                vec![PathSegment::Key("age".into())],
            ]
        );
    }

    #[test]
    fn test_missing_required_field() {
        let err = person().parse(&json!({"name": "Ada"})).unwrap_err();
        assert_eq!(err.issues().len(), 1);
        assert_eq!(err.issues()[0].path, vec![PathSegment::Key("age".into())]);
        assert_eq!(
            err.issues()[0].message,
            "Invalid input: expected int, received undefined"
        );

        let err = person().parse(&json!({"name": "Ada", "age": null})).unwrap_err();
        assert_eq!(
            err.issues()[0].message,
            "Invalid input: expected int, received null"
        );
    }

    #[test]
    fn test_unknown_key_modes() {
        let input = json!({"name": "Ada", "age": 36, "x": 1});
        let stripped = person().parse(&input).unwrap();
        assert!(!stripped.contains_key("x"));

        let kept = person().passthrough().parse(&input).unwrap();
        assert_eq!(kept["x"], json!(1));

        let err = person().strict().parse(&input).unwrap_err();
        assert_eq!(err.issues()[0].code(), IssueCode::UnrecognizedKeys);
        assert_eq!(err.issues()[0].message, "Unrecognized key: \"x\"");
        assert!(err.issues()[0].path.is_empty());
    }

    #[test]
    fn test_optional_and_exact_optional_fields() {
        let schema = object([
            ("a", string().optional().into_dyn()),
            ("b", string().exact_optional().into_dyn()),
        ]);
        assert_eq!(schema.parse(&json!({})).unwrap(), Map::new());
        let out = schema.parse(&json!({"a": null})).unwrap();
        assert_eq!(out["a"], Value::Null);
        let err = schema.parse(&json!({"b": null})).unwrap_err();
        assert_eq!(err.issues()[0].path, vec![PathSegment::Key("b".into())]);
    }

    #[test]
    fn test_shape_editing() {
        let base = person();
        assert_eq!(base.pick(&["name"]).keys(), vec!["name"]);
        assert_eq!(base.omit(&["name"]).keys(), vec!["age"]);
        let extended = base.extend([("email", string().email(()).into_dyn())]);
        assert_eq!(extended.keys(), vec!["name", "age", "email"]);
        assert_eq!(base.keys(), vec!["name", "age"]);

        let partial = base.partial();
        assert!(partial.parse(&json!({})).is_ok());
        assert!(partial.required().parse(&json!({})).is_err());
    }

    #[test]
    fn test_merge_and_keyof() {
        let merged = person().merge(&strict_object([("id", int().into_dyn())]));
        assert_eq!(merged.keys(), vec!["name", "age", "id"]);
        assert_eq!(merged.unknown_keys(), UnknownKeys::Strict);
        let keys = merged.keyof();
        assert!(keys.parse(&json!("id")).is_ok());
        assert!(keys.parse(&json!("other")).is_err());
    }

    #[test]
    fn test_property_values_read_literal_fields() {
        let schema = object([("type", literal("circle").into_dyn())]);
        assert_eq!(schema.property_values("type"), Some(vec![json!("circle")]));
        assert_eq!(schema.property_values("radius"), None);
    }
}
