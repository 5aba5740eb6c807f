//! Issue model for schema parsing.
//!
//! A parse failure is described by one or more [`Issue`]s collected in a
//! [`ZodError`]. Checks and extractors produce [`RawIssue`]s, which carry no
//! final message yet; [`finalize`] resolves the message through the mapper
//! chain (issue-local, parse context, global custom, global locale, built-in
//! default).
//!
//! # Issue codes
//!
//! Codes are represented by the [`IssueCode`] enum and serialized in
//! snake_case (`invalid_type`, `too_small`, ...). Code-specific data lives in
//! [`IssueKind`], which serializes with the code as its tag.
//!
//! # Example
//! ```rust
//! use zod_runtime::prelude::*;
//! use serde_json::json;
//!
//! let err = string().parse(&json!(42)).unwrap_err();
//! assert_eq!(err.issues()[0].code(), IssueCode::InvalidType);
//! assert_eq!(err.to_string(), "✖ Invalid input: expected string, received number");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use thiserror::Error;
use tracing::trace;

use crate::config::{ErrorMap, ZodConfig};
use crate::locale;
use crate::parse::ParseContext;
use crate::types::TypeCode;

/// One segment of an issue path: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Array or tuple position
    Index(usize),
    /// Object key
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{}", index),
            Self::Key(key) => f.write_str(key),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Render a path the way error messages show it: `items[0].name`.
pub fn dotted_path(path: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in path {
        match segment {
            PathSegment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            PathSegment::Index(index) => {
                let _ = write!(out, "[{}]", index);
            }
        }
    }
    out
}

/// Type-safe issue codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum IssueCode {
    /// The input has the wrong type
    InvalidType,
    /// The input is not one of the allowed values
    InvalidValue,
    /// The input is below a size or range limit
    TooSmall,
    /// The input is above a size or range limit
    TooBig,
    /// A tuple received fewer items than it requires
    TooFew,
    /// A tuple received more items than it accepts
    TooMany,
    /// A number is not a multiple of the required step
    NotMultipleOf,
    /// A strict object received keys outside its shape
    UnrecognizedKeys,
    /// No union option accepted the input
    InvalidUnion,
    /// A string does not match a required format
    InvalidFormat,
    /// A user-supplied refinement failed
    Custom,
}

impl IssueCode {
    /// Returns the string representation of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidType => "invalid_type",
            Self::InvalidValue => "invalid_value",
            Self::TooSmall => "too_small",
            Self::TooBig => "too_big",
            Self::TooFew => "too_few",
            Self::TooMany => "too_many",
            Self::NotMultipleOf => "not_multiple_of",
            Self::UnrecognizedKeys => "unrecognized_keys",
            Self::InvalidUnion => "invalid_union",
            Self::InvalidFormat => "invalid_format",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Code-specific issue data. Serialized with the code as the `code` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
#[non_exhaustive]
pub enum IssueKind {
    /// Wrong input type.
    InvalidType {
        /// Type the schema expected
        expected: TypeCode,
        /// Type observed in the input
        received: String,
    },
    /// Input outside the allowed value set.
    InvalidValue {
        /// Every allowed value
        values: Vec<Value>,
    },
    /// Below a minimum.
    TooSmall {
        /// What was measured (`string`, `array`, `number`, `date`)
        origin: String,
        /// The limit
        minimum: Value,
        /// Whether the limit itself is allowed
        inclusive: bool,
        /// Whether the limit is an exact size requirement
        #[serde(default)]
        exact: bool,
    },
    /// Above a maximum.
    TooBig {
        /// What was measured
        origin: String,
        /// The limit
        maximum: Value,
        /// Whether the limit itself is allowed
        inclusive: bool,
        /// Whether the limit is an exact size requirement
        #[serde(default)]
        exact: bool,
    },
    /// Tuple arity below the required item count.
    TooFew {
        /// Required item count
        minimum: usize,
        /// Received item count
        received: usize,
    },
    /// Tuple arity above the accepted item count.
    TooMany {
        /// Accepted item count
        maximum: usize,
        /// Received item count
        received: usize,
    },
    /// Number not divisible by the step.
    NotMultipleOf {
        /// The step
        divisor: Value,
    },
    /// Keys not declared in a strict object shape.
    UnrecognizedKeys {
        /// The extra keys
        keys: Vec<String>,
    },
    /// All union options failed.
    InvalidUnion {
        /// Finalized issues of each option, in option order
        errors: Vec<Vec<Issue>>,
        /// Extra context (e.g. an unknown discriminator)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
    /// String format mismatch.
    InvalidFormat {
        /// Format name (`email`, `regex`, `starts_with`, ...)
        format: String,
        /// Pattern source or literal text the format refers to
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pattern: Option<String>,
    },
    /// Refinement failure.
    Custom {
        /// Free-form parameters supplied with the refinement
        #[serde(default, skip_serializing_if = "Map::is_empty")]
        params: Map<String, Value>,
    },
}

impl IssueKind {
    /// The code this kind is tagged with.
    pub fn code(&self) -> IssueCode {
        match self {
            Self::InvalidType { .. } => IssueCode::InvalidType,
            Self::InvalidValue { .. } => IssueCode::InvalidValue,
            Self::TooSmall { .. } => IssueCode::TooSmall,
            Self::TooBig { .. } => IssueCode::TooBig,
            Self::TooFew { .. } => IssueCode::TooFew,
            Self::TooMany { .. } => IssueCode::TooMany,
            Self::NotMultipleOf { .. } => IssueCode::NotMultipleOf,
            Self::UnrecognizedKeys { .. } => IssueCode::UnrecognizedKeys,
            Self::InvalidUnion { .. } => IssueCode::InvalidUnion,
            Self::InvalidFormat { .. } => IssueCode::InvalidFormat,
            Self::Custom { .. } => IssueCode::Custom,
        }
    }

    /// Empty custom kind.
    pub fn custom() -> Self {
        Self::Custom { params: Map::new() }
    }
}

/// An issue before its message has been resolved.
///
/// The path is relative to the schema that is currently parsing; parents
/// prefix their own segment when they merge child issues.
#[derive(Clone)]
pub struct RawIssue {
    /// Code-specific data
    pub kind: IssueKind,
    /// The value at the point of failure
    pub input: Value,
    /// Path relative to the parsing schema
    pub path: Vec<PathSegment>,
    /// Explicit message that bypasses every mapper
    pub message: Option<String>,
    pub(crate) error: Option<ErrorMap>,
    pub(crate) resolved: bool,
    pub(crate) fatal: bool,
}

impl RawIssue {
    /// Create a raw issue with an empty path.
    pub fn new(kind: IssueKind, input: Value) -> Self {
        Self {
            kind,
            input,
            path: Vec::new(),
            message: None,
            error: None,
            resolved: false,
            fatal: false,
        }
    }

    /// Create a custom issue with an explicit message.
    pub fn custom(message: impl Into<String>, input: Value) -> Self {
        Self::new(IssueKind::custom(), input).with_message(message)
    }

    /// The issue code.
    pub fn code(&self) -> IssueCode {
        self.kind.code()
    }

    /// Replace the relative path.
    pub fn with_path(mut self, path: Vec<PathSegment>) -> Self {
        self.path = path;
        self
    }

    /// Set an explicit message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach the mapper of the check or schema that raised this issue.
    pub fn with_error_map(mut self, error: Option<ErrorMap>) -> Self {
        self.error = error;
        self
    }

    /// Prefix the path with a parent segment.
    pub fn prefixed(mut self, segment: impl Into<PathSegment>) -> Self {
        self.path.insert(0, segment.into());
        self
    }

    /// Whether this issue came from type extraction rather than a check.
    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    /// Attach the raising schema's mapper if no check claimed the issue yet.
    pub(crate) fn claim(mut self, schema_error: Option<&ErrorMap>, fatal: bool) -> Self {
        if !self.resolved {
            if self.error.is_none() {
                self.error = schema_error.cloned();
            }
            self.resolved = true;
            self.fatal = fatal;
        }
        self
    }
}

impl fmt::Debug for RawIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawIssue")
            .field("kind", &self.kind)
            .field("input", &self.input)
            .field("path", &self.path)
            .field("message", &self.message)
            .field("error", &self.error.is_some())
            .field("fatal", &self.fatal)
            .finish()
    }
}

/// Name of the JSON type of `value`, as used in `received` fields.
pub fn received_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Raw `invalid_type` issue for `input`.
pub fn create_invalid_type_issue(expected: TypeCode, input: &Value) -> RawIssue {
    RawIssue::new(
        IssueKind::InvalidType {
            expected,
            received: received_type(input).to_string(),
        },
        input.clone(),
    )
}

/// Raw `invalid_type` issue for an absent value (missing key or slot).
///
/// The input is recorded as null and `received` reads `undefined`.
pub fn create_missing_issue(expected: TypeCode) -> RawIssue {
    RawIssue::new(
        IssueKind::InvalidType {
            expected,
            received: "undefined".to_string(),
        },
        Value::Null,
    )
}

/// Raw `invalid_value` issue listing the allowed values.
pub fn create_invalid_value_issue(values: Vec<Value>, input: &Value) -> RawIssue {
    RawIssue::new(IssueKind::InvalidValue { values }, input.clone())
}

/// Resolve the message of a raw issue.
///
/// Probes, in order: the explicit message, the issue's own mapper (check or
/// schema), the context mapper, the global custom mapper, the global locale
/// mapper, and finally the built-in English message for the code.
pub fn finalize(raw: RawIssue, ctx: &ParseContext, config: &ZodConfig) -> Issue {
    let message = raw
        .message
        .clone()
        .or_else(|| raw.error.as_ref().and_then(|map| map.map(&raw)))
        .or_else(|| ctx.error.as_ref().and_then(|map| map.map(&raw)))
        .or_else(|| config.custom_error.as_ref().and_then(|map| map.map(&raw)))
        .or_else(|| config.locale_error.as_ref().and_then(|map| map.map(&raw)))
        .unwrap_or_else(|| locale::default_message(&raw));

    trace!(code = %raw.code(), path = ?raw.path, "Finalized issue");

    Issue {
        kind: raw.kind,
        message,
        path: raw.path,
        input: raw.input,
    }
}

/// A finalized, path-annotated failure record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Code and code-specific data
    #[serde(flatten)]
    pub kind: IssueKind,
    /// Human-readable message
    pub message: String,
    /// Absolute path from the top-level parse, root first
    pub path: Vec<PathSegment>,
    /// The offending input
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub input: Value,
}

impl Issue {
    /// The issue code.
    pub fn code(&self) -> IssueCode {
        self.kind.code()
    }
}

/// Ordered, non-empty list of finalized issues returned by a failed parse.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{}", render_issues(.issues))]
pub struct ZodError {
    issues: Vec<Issue>,
}

fn render_issues(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(|issue| {
            if issue.path.is_empty() {
                format!("✖ {}", issue.message)
            } else {
                format!("✖ {}\n  → at {}", issue.message, dotted_path(&issue.path))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl ZodError {
    /// Wrap finalized issues. Callers pass at least one issue.
    pub fn new(issues: Vec<Issue>) -> Self {
        debug_assert!(!issues.is_empty(), "a ZodError carries at least one issue");
        Self { issues }
    }

    pub(crate) fn from_raw(raw: Vec<RawIssue>, ctx: &ParseContext, config: &ZodConfig) -> Self {
        Self::new(
            raw.into_iter()
                .map(|issue| finalize(issue, ctx, config))
                .collect(),
        )
    }

    /// The issues, in the order they were raised.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Consume the error, returning its issues.
    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }

    /// The first issue.
    pub fn first(&self) -> Option<&Issue> {
        self.issues.first()
    }

    /// Group messages by the first path segment.
    ///
    /// Root-level issues land in `form_errors`.
    pub fn flatten(&self) -> FlattenedError {
        let mut flattened = FlattenedError::default();
        for issue in &self.issues {
            match issue.path.first() {
                Some(segment) => flattened
                    .field_errors
                    .entry(segment.to_string())
                    .or_default()
                    .push(issue.message.clone()),
                None => flattened.form_errors.push(issue.message.clone()),
            }
        }
        flattened
    }
}

/// Messages grouped by top-level field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlattenedError {
    /// Messages of issues at the root
    pub form_errors: Vec<String>,
    /// Messages keyed by first path segment
    pub field_errors: BTreeMap<String, Vec<String>>,
}

/// Find a [`ZodError`] in an error or anywhere in its source chain.
///
/// ```rust
/// use zod_runtime::prelude::*;
/// use serde_json::json;
///
/// let err: Box<dyn std::error::Error> = Box::new(number().parse(&json!("x")).unwrap_err());
/// assert!(zod_runtime::is_error(err.as_ref()).is_some());
/// ```
pub fn is_error<'a>(err: &'a (dyn std::error::Error + 'static)) -> Option<&'a ZodError> {
    let mut current = Some(err);
    while let Some(candidate) = current {
        if let Some(found) = candidate.downcast_ref::<ZodError>() {
            return Some(found);
        }
        current = candidate.source();
    }
    None
}
