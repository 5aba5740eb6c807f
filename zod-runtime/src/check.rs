//! Check framework.
//!
//! A [`Check`] is a named, shareable validation step that runs after a
//! schema has extracted its base value. Checks see a [`ParsePayload`] and
//! may append issues or rewrite the value. They run in insertion order; a
//! check marked `abort` stops the list when it emits.
//!
//! Kind families are generic over the value they inspect:
//!
//! - size checks over [`Measurable`] values (strings count characters,
//!   arrays count items);
//! - range checks over [`Comparable`] values (numbers, integers, times);
//! - step checks over [`Numeric`] values;
//! - string format checks.

use regex::Regex;
use serde_json::{json, Map, Value};
use std::fmt;
use std::sync::{Arc, LazyLock};
use tracing::trace;

use crate::config::{global_config, ErrorMap};
use crate::constraint::{to_json, BaseValue};
use crate::error::{IssueKind, PathSegment, RawIssue, ZodError};
use crate::params::{NormalizedParams, SchemaParams};
use crate::parse::ParseContext;
use crate::types::TypeCode;

/// Check kind names.
pub mod kinds {
    pub const CUSTOM: &str = "custom";
    pub const OVERWRITE: &str = "overwrite";
    pub const MIN_SIZE: &str = "min_size";
    pub const MAX_SIZE: &str = "max_size";
    pub const EXACT_SIZE: &str = "exact_size";
    pub const GREATER_THAN: &str = "greater_than";
    pub const LESS_THAN: &str = "less_than";
    pub const MULTIPLE_OF: &str = "multiple_of";
    pub const INT: &str = "int";
    pub const STRING_FORMAT: &str = "string_format";
}

/// Value under validation plus the issues raised so far.
#[derive(Debug, Clone)]
pub struct ParsePayload<T> {
    value: T,
    issues: Vec<RawIssue>,
}

impl<T> ParsePayload<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            issues: Vec::new(),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub fn set_value(&mut self, value: T) {
        self.value = value;
    }

    pub fn add_issue(&mut self, issue: RawIssue) {
        self.issues.push(issue);
    }

    /// Add a custom issue with an explicit message at the payload root.
    pub fn add_message(&mut self, message: impl Into<String>)
    where
        T: BaseValue,
    {
        let input = to_json(&self.value);
        self.issues.push(RawIssue::custom(message, input));
    }

    pub fn issues(&self) -> &[RawIssue] {
        &self.issues
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Merge issues from a child value, prefixing their paths with `segment`.
    pub fn merge_child(
        &mut self,
        segment: impl Into<PathSegment>,
        issues: impl IntoIterator<Item = RawIssue>,
    ) {
        let segment = segment.into();
        self.issues
            .extend(issues.into_iter().map(|issue| issue.prefixed(segment.clone())));
    }

    pub fn into_parts(self) -> (T, Vec<RawIssue>) {
        (self.value, self.issues)
    }
}

/// Static description of a check.
#[derive(Clone, Default)]
pub struct CheckDef {
    /// Kind name, see [`kinds`].
    pub kind: &'static str,
    /// Mapper attached to every issue this check raises.
    pub error: Option<ErrorMap>,
    /// Stop the check list when this check emits.
    pub abort: bool,
    /// Path of raised issues, relative to the schema.
    pub path: Vec<PathSegment>,
    /// Free-form parameters.
    pub params: Map<String, Value>,
}

impl fmt::Debug for CheckDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckDef")
            .field("kind", &self.kind)
            .field("error", &self.error.is_some())
            .field("abort", &self.abort)
            .field("path", &self.path)
            .field("params", &self.params)
            .finish()
    }
}

impl CheckDef {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn from_params(kind: &'static str, params: NormalizedParams) -> Self {
        Self {
            kind,
            error: params.error,
            abort: params.abort,
            path: params.path,
            params: params.params,
        }
    }

    /// A raw issue owned by this check.
    pub fn issue(&self, kind: IssueKind, input: Value) -> RawIssue {
        let mut issue = RawIssue::new(kind, input)
            .with_path(self.path.clone())
            .with_error_map(self.error.clone());
        issue.resolved = true;
        issue
    }
}

type CheckFn<T> = dyn Fn(&mut ParsePayload<T>, &CheckDef) + Send + Sync;

/// A validation step for values of type `T`.
pub struct Check<T> {
    def: CheckDef,
    run: Arc<CheckFn<T>>,
}

impl<T> Clone for Check<T> {
    fn clone(&self) -> Self {
        Self {
            def: self.def.clone(),
            run: Arc::clone(&self.run),
        }
    }
}

impl<T> fmt::Debug for Check<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check").field("def", &self.def).finish()
    }
}

impl<T> Check<T> {
    pub fn kind(&self) -> &'static str {
        self.def.kind
    }

    pub fn def(&self) -> &CheckDef {
        &self.def
    }

    pub fn aborts(&self) -> bool {
        self.def.abort
    }

    /// Run the check against a payload.
    pub fn run(&self, payload: &mut ParsePayload<T>) {
        (self.run)(payload, &self.def)
    }
}

impl<T: BaseValue> Check<T> {
    /// Raw constructor.
    pub fn new<F>(kind: &'static str, params: impl Into<SchemaParams>, run: F) -> Self
    where
        F: Fn(&mut ParsePayload<T>, &CheckDef) + Send + Sync + 'static,
    {
        Self::from_def(CheckDef::from_params(kind, params.into().normalize()), run)
    }

    pub fn from_def<F>(def: CheckDef, run: F) -> Self
    where
        F: Fn(&mut ParsePayload<T>, &CheckDef) + Send + Sync + 'static,
    {
        Self {
            def,
            run: Arc::new(run),
        }
    }

    /// Emit a `custom` issue when `predicate` returns false.
    pub fn custom<F>(predicate: F, params: impl Into<SchemaParams>) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::new(
            kinds::CUSTOM,
            params,
            move |payload: &mut ParsePayload<T>, def: &CheckDef| {
                if !predicate(payload.value()) {
                    let input = to_json(payload.value());
                    payload.add_issue(def.issue(
                        IssueKind::Custom {
                            params: def.params.clone(),
                        },
                        input,
                    ));
                }
            },
        )
    }

    /// Replace the value with `f(value)`. Never emits.
    pub fn overwrite<F>(f: F) -> Self
    where
        F: Fn(&T) -> T + Send + Sync + 'static,
    {
        Self::from_def(
            CheckDef::new(kinds::OVERWRITE),
            move |payload: &mut ParsePayload<T>, _: &CheckDef| {
                let next = f(payload.value());
                payload.set_value(next);
            },
        )
    }
}

/// Values with a size: strings count characters, sequences count items.
pub trait Measurable {
    /// `origin` reported in size issues.
    const ORIGIN: &'static str;

    fn size(&self) -> usize;
}

impl Measurable for String {
    const ORIGIN: &'static str = "string";

    fn size(&self) -> usize {
        self.chars().count()
    }
}

impl<T> Measurable for Vec<T> {
    const ORIGIN: &'static str = "array";

    fn size(&self) -> usize {
        self.len()
    }
}

impl<T: BaseValue + Measurable> Check<T> {
    pub fn min_size(minimum: usize, params: impl Into<SchemaParams>) -> Self {
        Self::new(
            kinds::MIN_SIZE,
            params,
            move |payload: &mut ParsePayload<T>, def: &CheckDef| {
                if payload.value().size() < minimum {
                    let input = to_json(payload.value());
                    payload.add_issue(def.issue(
                        IssueKind::TooSmall {
                            origin: T::ORIGIN.to_string(),
                            minimum: json!(minimum),
                            inclusive: true,
                            exact: false,
                        },
                        input,
                    ));
                }
            },
        )
    }

    pub fn max_size(maximum: usize, params: impl Into<SchemaParams>) -> Self {
        Self::new(
            kinds::MAX_SIZE,
            params,
            move |payload: &mut ParsePayload<T>, def: &CheckDef| {
                if payload.value().size() > maximum {
                    let input = to_json(payload.value());
                    payload.add_issue(def.issue(
                        IssueKind::TooBig {
                            origin: T::ORIGIN.to_string(),
                            maximum: json!(maximum),
                            inclusive: true,
                            exact: false,
                        },
                        input,
                    ));
                }
            },
        )
    }

    pub fn exact_size(size: usize, params: impl Into<SchemaParams>) -> Self {
        Self::new(
            kinds::EXACT_SIZE,
            params,
            move |payload: &mut ParsePayload<T>, def: &CheckDef| {
                let actual = payload.value().size();
                if actual == size {
                    return;
                }
                let input = to_json(payload.value());
                let origin = T::ORIGIN.to_string();
                let kind = if actual < size {
                    IssueKind::TooSmall {
                        origin,
                        minimum: json!(size),
                        inclusive: true,
                        exact: true,
                    }
                } else {
                    IssueKind::TooBig {
                        origin,
                        maximum: json!(size),
                        inclusive: true,
                        exact: true,
                    }
                };
                payload.add_issue(def.issue(kind, input));
            },
        )
    }
}

/// Ordered values usable in range checks.
pub trait Comparable: BaseValue + PartialOrd {
    /// `origin` reported in range issues.
    const ORIGIN: &'static str;
}

impl Comparable for f64 {
    const ORIGIN: &'static str = "number";
}

impl Comparable for i64 {
    const ORIGIN: &'static str = "number";
}

#[cfg(feature = "chrono")]
impl Comparable for chrono::DateTime<chrono::FixedOffset> {
    const ORIGIN: &'static str = "date";
}

impl<T: Comparable> Check<T> {
    /// `value > bound`, or `value >= bound` when inclusive.
    pub fn greater_than(bound: T, inclusive: bool, params: impl Into<SchemaParams>) -> Self {
        let limit = to_json(&bound);
        Self::new(
            kinds::GREATER_THAN,
            params,
            move |payload: &mut ParsePayload<T>, def: &CheckDef| {
                let value = payload.value();
                let ok = if inclusive {
                    *value >= bound
                } else {
                    *value > bound
                };
                if !ok {
                    let input = to_json(value);
                    payload.add_issue(def.issue(
                        IssueKind::TooSmall {
                            origin: T::ORIGIN.to_string(),
                            minimum: limit.clone(),
                            inclusive,
                            exact: false,
                        },
                        input,
                    ));
                }
            },
        )
    }

    /// `value < bound`, or `value <= bound` when inclusive.
    pub fn less_than(bound: T, inclusive: bool, params: impl Into<SchemaParams>) -> Self {
        let limit = to_json(&bound);
        Self::new(
            kinds::LESS_THAN,
            params,
            move |payload: &mut ParsePayload<T>, def: &CheckDef| {
                let value = payload.value();
                let ok = if inclusive {
                    *value <= bound
                } else {
                    *value < bound
                };
                if !ok {
                    let input = to_json(value);
                    payload.add_issue(def.issue(
                        IssueKind::TooBig {
                            origin: T::ORIGIN.to_string(),
                            maximum: limit.clone(),
                            inclusive,
                            exact: false,
                        },
                        input,
                    ));
                }
            },
        )
    }
}

/// Numbers with a zero and a divisibility test.
pub trait Numeric: Comparable + Copy {
    fn zero() -> Self;

    fn is_multiple_of(&self, step: Self) -> bool;
}

impl Numeric for f64 {
    fn zero() -> Self {
        0.0
    }

    fn is_multiple_of(&self, step: Self) -> bool {
        float_safe_remainder(*self, step) == 0.0
    }
}

impl Numeric for i64 {
    fn zero() -> Self {
        0
    }

    fn is_multiple_of(&self, step: Self) -> bool {
        self.checked_rem(step) == Some(0)
    }
}

fn decimal_places(value: f64) -> i32 {
    let rendered = format!("{}", value);
    rendered
        .split_once('.')
        .map(|(_, fraction)| fraction.len().min(15) as i32)
        .unwrap_or(0)
}

/// Remainder computed on scaled integers so that `0.3 % 0.1` is zero.
///
/// Magnitudes beyond `i128` carry no fractional digits, so the plain float
/// remainder is exact for them.
fn float_safe_remainder(value: f64, step: f64) -> f64 {
    let decimals = decimal_places(value).max(decimal_places(step));
    let scale = 10f64.powi(decimals);
    let scaled_value = (value * scale).round();
    let scaled_step = (step * scale).round();
    if scaled_step == 0.0 {
        return value;
    }
    if !fits_i128(scaled_value) || !fits_i128(scaled_step) {
        return value % step;
    }
    (scaled_value as i128 % scaled_step as i128) as f64 / scale
}

fn fits_i128(value: f64) -> bool {
    value.abs() < i128::MAX as f64
}

impl<T: Numeric> Check<T> {
    pub fn multiple_of(step: T, params: impl Into<SchemaParams>) -> Self {
        let divisor = to_json(&step);
        Self::new(
            kinds::MULTIPLE_OF,
            params,
            move |payload: &mut ParsePayload<T>, def: &CheckDef| {
                if !payload.value().is_multiple_of(step) {
                    let input = to_json(payload.value());
                    payload.add_issue(def.issue(
                        IssueKind::NotMultipleOf {
                            divisor: divisor.clone(),
                        },
                        input,
                    ));
                }
            },
        )
    }
}

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl Check<f64> {
    /// The number is a safe integer.
    pub fn integer(params: impl Into<SchemaParams>) -> Self {
        Self::new(
            kinds::INT,
            params,
            |payload: &mut ParsePayload<f64>, def: &CheckDef| {
                let value = *payload.value();
                if value.fract() != 0.0 || value.abs() > MAX_SAFE_INTEGER {
                    payload.add_issue(def.issue(
                        IssueKind::InvalidType {
                            expected: TypeCode::Int,
                            received: "number".to_string(),
                        },
                        json!(value),
                    ));
                }
            },
        )
    }
}

static EMAIL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-\.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .ok()
});

static URL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^\s/?#]+[^\s]*$").ok());

#[cfg(not(feature = "uuid"))]
static UUID: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .ok()
});

fn matches(pattern: &LazyLock<Option<Regex>>, value: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(value))
}

fn is_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && matches(&EMAIL, value)
}

#[cfg(feature = "uuid")]
fn is_uuid(value: &str) -> bool {
    value.len() == 36 && uuid::Uuid::parse_str(value).is_ok()
}

#[cfg(not(feature = "uuid"))]
fn is_uuid(value: &str) -> bool {
    matches(&UUID, value)
}

impl Check<String> {
    fn format<F>(
        format: &'static str,
        pattern: Option<String>,
        params: impl Into<SchemaParams>,
        accept: F,
    ) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self::new(
            kinds::STRING_FORMAT,
            params,
            move |payload: &mut ParsePayload<String>, def: &CheckDef| {
                if !accept(payload.value()) {
                    let input = Value::String(payload.value().clone());
                    payload.add_issue(def.issue(
                        IssueKind::InvalidFormat {
                            format: format.to_string(),
                            pattern: pattern.clone(),
                        },
                        input,
                    ));
                }
            },
        )
    }

    pub fn regex(pattern: Regex, params: impl Into<SchemaParams>) -> Self {
        let source = pattern.as_str().to_string();
        Self::format("regex", Some(source), params, move |value| {
            pattern.is_match(value)
        })
    }

    pub fn starts_with(prefix: impl Into<String>, params: impl Into<SchemaParams>) -> Self {
        let prefix = prefix.into();
        Self::format("starts_with", Some(prefix.clone()), params, move |value| {
            value.starts_with(prefix.as_str())
        })
    }

    pub fn ends_with(suffix: impl Into<String>, params: impl Into<SchemaParams>) -> Self {
        let suffix = suffix.into();
        Self::format("ends_with", Some(suffix.clone()), params, move |value| {
            value.ends_with(suffix.as_str())
        })
    }

    pub fn includes(needle: impl Into<String>, params: impl Into<SchemaParams>) -> Self {
        let needle = needle.into();
        Self::format("includes", Some(needle.clone()), params, move |value| {
            value.contains(needle.as_str())
        })
    }

    pub fn lowercase(params: impl Into<SchemaParams>) -> Self {
        Self::format("lowercase", None, params, |value| {
            value == value.to_lowercase()
        })
    }

    pub fn uppercase(params: impl Into<SchemaParams>) -> Self {
        Self::format("uppercase", None, params, |value| {
            value == value.to_uppercase()
        })
    }

    pub fn email(params: impl Into<SchemaParams>) -> Self {
        Self::format("email", None, params, is_email)
    }

    pub fn uuid(params: impl Into<SchemaParams>) -> Self {
        Self::format("uuid", None, params, is_uuid)
    }

    pub fn url(params: impl Into<SchemaParams>) -> Self {
        Self::format("url", None, params, |value| matches(&URL, value))
    }
}

/// Run checks in order, stopping after an aborting check that emitted.
pub fn run_checks<T>(payload: &mut ParsePayload<T>, checks: &[Check<T>]) {
    for check in checks {
        let before = payload.issues.len();
        check.run(payload);
        if check.aborts() && payload.issues.len() > before {
            trace!(check = check.kind(), "Check aborted the remaining checks");
            break;
        }
    }
}

/// Run checks against a value and finalize any issues.
pub fn apply_checks<T: BaseValue>(
    value: T,
    checks: &[Check<T>],
    ctx: &ParseContext,
) -> Result<T, ZodError> {
    let mut payload = ParsePayload::new(value);
    run_checks(&mut payload, checks);
    let (value, issues) = payload.into_parts();
    if issues.is_empty() {
        Ok(value)
    } else {
        Err(ZodError::from_raw(issues, ctx, &global_config()))
    }
}
