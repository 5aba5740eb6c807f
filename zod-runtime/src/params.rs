//! Schema and check parameters.
//!
//! Constructors and check methods accept `impl Into<SchemaParams>`: pass
//! `()` for none, a string for an error message, or a [`Params`] record.
//!
//! ```rust
//! use zod_runtime::prelude::*;
//! use serde_json::json;
//!
//! let schema = string().min(3, "Too short!");
//! let err = schema.parse(&json!("ab")).unwrap_err();
//! assert_eq!(err.issues()[0].message, "Too short!");
//!
//! let schema = number().refine(|n| *n != 13.0, Params::new().message("Unlucky").abort());
//! assert!(schema.parse(&json!(13)).is_err());
//! ```

use serde_json::{Map, Value};
use std::fmt;

use crate::config::{message_map, ErrorMap, ErrorMapper};
use crate::error::{PathSegment, RawIssue};

/// Error customization carried by a [`Params`] record.
#[derive(Clone)]
pub enum ErrorSpec {
    /// Fixed message.
    Message(String),
    /// Mapper consulted with the raw issue.
    Map(ErrorMap),
}

impl ErrorSpec {
    fn into_map(self) -> ErrorMap {
        match self {
            Self::Message(message) => message_map(message),
            Self::Map(map) => map,
        }
    }
}

impl fmt::Debug for ErrorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(message) => f.debug_tuple("Message").field(message).finish(),
            Self::Map(_) => f.write_str("Map(..)"),
        }
    }
}

/// Parameter record.
#[derive(Debug, Clone, Default)]
pub struct Params {
    /// Error message or mapper.
    pub error: Option<ErrorSpec>,
    /// Description registered in the global registry.
    pub description: Option<String>,
    /// Enable input coercion.
    pub coerce: bool,
    /// Issue path, relative to the schema (refinements only).
    pub path: Vec<PathSegment>,
    /// Stop running later checks if this one fails.
    pub abort: bool,
    /// Free-form data copied into `custom` issues.
    pub params: Map<String, Value>,
}

impl Params {
    /// Empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed error message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.error = Some(ErrorSpec::Message(message.into()));
        self
    }

    /// Error mapper.
    pub fn error<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&RawIssue) -> Option<String> + Send + Sync + 'static,
    {
        self.error = Some(ErrorSpec::Map(std::sync::Arc::new(mapper)));
        self
    }

    /// Error mapper from any [`ErrorMapper`].
    pub fn error_mapper<M: ErrorMapper + 'static>(mut self, mapper: M) -> Self {
        self.error = Some(ErrorSpec::Map(std::sync::Arc::new(mapper)));
        self
    }

    /// Description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Enable coercion.
    pub fn coerce(mut self) -> Self {
        self.coerce = true;
        self
    }

    /// Issue path.
    pub fn path<I, P>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathSegment>,
    {
        self.path = path.into_iter().map(Into::into).collect();
        self
    }

    /// Abort remaining checks on failure.
    pub fn abort(mut self) -> Self {
        self.abort = true;
        self
    }

    /// Add a free-form parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// What a constructor or check method accepts as parameters.
#[derive(Debug, Clone, Default)]
pub enum SchemaParams {
    /// No parameters.
    #[default]
    None,
    /// Error message shorthand.
    Message(String),
    /// Full record.
    Record(Params),
}

impl From<()> for SchemaParams {
    fn from(_: ()) -> Self {
        Self::None
    }
}

impl From<&str> for SchemaParams {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

impl From<String> for SchemaParams {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl From<Params> for SchemaParams {
    fn from(params: Params) -> Self {
        Self::Record(params)
    }
}

impl SchemaParams {
    /// Normalize a single parameter value.
    pub fn normalize(self) -> NormalizedParams {
        let mut normalized = NormalizedParams::default();
        normalized.merge(self);
        normalized
    }
}

/// Parameters after normalization: messages turned into mappers.
#[derive(Clone, Default)]
pub struct NormalizedParams {
    pub error: Option<ErrorMap>,
    pub description: Option<String>,
    pub coerce: bool,
    pub path: Vec<PathSegment>,
    pub abort: bool,
    pub params: Map<String, Value>,
}

impl fmt::Debug for NormalizedParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizedParams")
            .field("error", &self.error.is_some())
            .field("description", &self.description)
            .field("coerce", &self.coerce)
            .field("path", &self.path)
            .field("abort", &self.abort)
            .field("params", &self.params)
            .finish()
    }
}

impl NormalizedParams {
    fn merge(&mut self, params: SchemaParams) {
        match params {
            SchemaParams::None => {}
            SchemaParams::Message(message) => self.error = Some(message_map(message)),
            SchemaParams::Record(record) => {
                if let Some(error) = record.error {
                    self.error = Some(error.into_map());
                }
                if record.description.is_some() {
                    self.description = record.description;
                }
                self.coerce |= record.coerce;
                self.abort |= record.abort;
                if !record.path.is_empty() {
                    self.path = record.path;
                }
                self.params.extend(record.params);
            }
        }
    }
}

/// Fold several parameter values; later values override earlier ones.
pub fn normalize_params<I, P>(items: I) -> NormalizedParams
where
    I: IntoIterator<Item = P>,
    P: Into<SchemaParams>,
{
    let mut normalized = NormalizedParams::default();
    for item in items {
        normalized.merge(item.into());
    }
    normalized
}
