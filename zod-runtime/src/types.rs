//! Schema kind tags and registry metadata.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Tag identifying a schema kind.
///
/// Used in `invalid_type` messages ("expected string") and for introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum TypeCode {
    String,
    Number,
    Int,
    #[serde(rename = "boolean")]
    Bool,
    #[serde(rename = "date")]
    Time,
    Literal,
    Enum,
    Never,
    Unknown,
    #[serde(rename = "stringbool")]
    StringBool,
    Object,
    Array,
    Tuple,
    Union,
    Intersection,
    Transform,
    Pipe,
}

impl TypeCode {
    /// Returns the string representation of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Int => "int",
            Self::Bool => "boolean",
            Self::Time => "date",
            Self::Literal => "literal",
            Self::Enum => "enum",
            Self::Never => "never",
            Self::Unknown => "unknown",
            Self::StringBool => "stringbool",
            Self::Object => "object",
            Self::Array => "array",
            Self::Tuple => "tuple",
            Self::Union => "union",
            Self::Intersection => "intersection",
            Self::Transform => "transform",
            Self::Pipe => "pipe",
        }
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata attached to schemas through the global registry.
///
/// Unknown keys supplied with the metadata are kept in `extra` and
/// serialized inline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalMeta {
    /// Stable identifier for the schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Short title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Description of the schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether the schema is deprecated.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,

    /// Deprecation message if deprecated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecation_message: Option<String>,

    /// Example values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Value>,

    /// Tags for categorization.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Free-form keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GlobalMeta {
    /// Create new empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark as deprecated.
    pub fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    /// Set deprecation message.
    pub fn with_deprecation_message(mut self, message: impl Into<String>) -> Self {
        self.deprecation_message = Some(message.into());
        self.deprecated = true;
        self
    }

    /// Add an example.
    pub fn with_example(mut self, example: impl Into<Value>) -> Self {
        self.examples.push(example.into());
        self
    }

    /// Add a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Add a free-form key.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Overlay `other` on top of `self`. Fields set in `other` win.
    pub fn merge(mut self, other: GlobalMeta) -> Self {
        if other.id.is_some() {
            self.id = other.id;
        }
        if other.title.is_some() {
            self.title = other.title;
        }
        if other.description.is_some() {
            self.description = other.description;
        }
        if other.deprecation_message.is_some() {
            self.deprecation_message = other.deprecation_message;
        }
        self.deprecated |= other.deprecated;
        self.examples.extend(other.examples);
        for tag in other.tags {
            if !self.tags.contains(&tag) {
                self.tags.push(tag);
            }
        }
        self.extra.extend(other.extra);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_code_serializes_like_display() {
        for code in [TypeCode::Bool, TypeCode::Time, TypeCode::StringBool, TypeCode::Enum] {
            assert_eq!(serde_json::to_value(code).unwrap(), json!(code.as_str()));
        }
    }

    #[test]
    fn test_meta_merge_overlays() {
        let base = GlobalMeta::new()
            .with_title("User")
            .with_description("old")
            .with_tag("auth");
        let merged = base.merge(
            GlobalMeta::new()
                .with_description("new")
                .with_tag("auth")
                .with_tag("v2"),
        );
        assert_eq!(merged.title.as_deref(), Some("User"));
        assert_eq!(merged.description.as_deref(), Some("new"));
        assert_eq!(merged.tags, vec!["auth", "v2"]);
    }

    #[test]
    fn test_meta_extra_keys_flatten() {
        let meta = GlobalMeta::new()
            .with_description("A user")
            .with_extra("x-internal", true);
        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(value, json!({"description": "A user", "x-internal": true}));

        let back: GlobalMeta = serde_json::from_value(value).unwrap();
        assert_eq!(back, meta);
    }
}
