//! Output transforms.

use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::constraint::{to_json, BaseValue, Constraint, Required};
use crate::error::{create_invalid_type_issue, RawIssue};
use crate::internals::ZodTypeInternals;
use crate::parse::{parse_schema, ParseContext};
use crate::traits::{Output, ZodType};
use crate::types::TypeCode;

/// Side channel for transform functions to report issues.
///
/// Any issue added here fails the parse, even if the function returns `Ok`.
#[derive(Debug)]
pub struct RefinementCtx {
    input: Value,
    issues: Vec<RawIssue>,
}

impl RefinementCtx {
    pub(crate) fn new(input: Value) -> Self {
        Self {
            input,
            issues: Vec::new(),
        }
    }

    /// The transformed value, as JSON.
    pub fn input(&self) -> &Value {
        &self.input
    }

    /// Add a `custom` issue with a fixed message.
    pub fn add_issue(&mut self, message: impl Into<String>) {
        let issue = RawIssue::custom(message, self.input.clone());
        self.issues.push(issue);
    }

    pub fn add_raw_issue(&mut self, issue: RawIssue) {
        self.issues.push(issue);
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Schema that parses with `S`, then maps the output to `U`.
///
/// Checks added to a transform see the mapped value. A default on the
/// transform short-circuits both the source and the function.
pub struct ZodTransform<S: ZodType, U: BaseValue, C: Constraint = Required> {
    source: S,
    func: Arc<dyn Fn(Output<S>, &mut RefinementCtx) -> Result<U, String> + Send + Sync>,
    internals: ZodTypeInternals<U>,
    _constraint: PhantomData<C>,
}

impl<S: ZodType, U: BaseValue> ZodTransform<S, U> {
    pub fn new<E, F>(source: S, f: F) -> Self
    where
        E: fmt::Display + 'static,
        F: Fn(Output<S>, &mut RefinementCtx) -> Result<U, E> + Send + Sync + 'static,
    {
        Self {
            source,
            func: Arc::new(move |output: Output<S>, ctx: &mut RefinementCtx| {
                f(output, ctx).map_err(|err| err.to_string())
            }),
            internals: ZodTypeInternals::new(TypeCode::Transform),
            _constraint: PhantomData,
        }
    }
}

impl<S: ZodType, U: BaseValue, C: Constraint> ZodTransform<S, U, C> {
    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: ZodType, U: BaseValue, C: Constraint> Clone for ZodTransform<S, U, C> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            func: Arc::clone(&self.func),
            internals: self.internals.clone(),
            _constraint: PhantomData,
        }
    }
}

impl<S: ZodType, U: BaseValue, C: Constraint> fmt::Debug for ZodTransform<S, U, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZodTransform")
            .field("source", &self.source.type_code())
            .field("internals", &self.internals)
            .finish()
    }
}

impl<S: ZodType, U: BaseValue, C: Constraint> ZodType for ZodTransform<S, U, C> {
    type Base = U;
    type Constraint = C;
    type Retyped<C2: Constraint> = ZodTransform<S, U, C2>;

    fn internals(&self) -> &ZodTypeInternals<U> {
        &self.internals
    }

    fn with_internals(&self, internals: ZodTypeInternals<U>) -> Self {
        self.rebuild::<C>(internals)
    }

    fn rebuild<C2: Constraint>(&self, internals: ZodTypeInternals<U>) -> ZodTransform<S, U, C2> {
        ZodTransform {
            source: self.source.clone(),
            func: Arc::clone(&self.func),
            internals,
            _constraint: PhantomData,
        }
    }

    fn extract(&self, input: &Value, ctx: &ParseContext) -> Result<U, Vec<RawIssue>> {
        let Some(output) = parse_schema(&self.source, Some(input), ctx)? else {
            return Err(vec![create_invalid_type_issue(self.source.type_code(), input)]);
        };

        let mut refinement = RefinementCtx::new(to_json(&output));
        let result = (self.func)(output, &mut refinement);
        let RefinementCtx { input, mut issues } = refinement;
        match result {
            Ok(value) if issues.is_empty() => Ok(value),
            Ok(_) => Err(issues),
            Err(message) => {
                issues.push(RawIssue::custom(message, input));
                Err(issues)
            }
        }
    }

    fn forwards_null(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use serde_json::{json, Value};
    use std::convert::Infallible;

    #[test]
    fn test_maps_output_type() {
        let length = string().transform(|s, _| Ok::<_, Infallible>(s.chars().count()));
        assert_eq!(length.parse(&json!("héllo")).unwrap(), 5);
        assert_eq!(length.type_code(), TypeCode::Transform);
    }

    #[test]
    fn test_source_issues_pass_through() {
        let length = string().min(2, ()).transform(|s, _| Ok::<_, Infallible>(s.len()));
        let err = length.parse(&json!("a")).unwrap_err();
        assert_eq!(err.issues()[0].code(), IssueCode::TooSmall);
    }

    #[test]
    fn test_err_becomes_custom_issue() {
        let parsed = string().transform(|s, _| s.parse::<i64>());
        assert_eq!(parsed.parse(&json!("12")).unwrap(), 12);
        let err = parsed.parse(&json!("twelve")).unwrap_err();
        assert_eq!(err.issues()[0].code(), IssueCode::Custom);
        assert_eq!(err.issues()[0].message, "invalid digit found in string");
        assert_eq!(err.issues()[0].input, json!("twelve"));
    }

    #[test]
    fn test_ctx_issues_fail_the_parse() {
        let schema = number().transform(|n, ctx| {
            if n < 0.0 {
                ctx.add_issue("negative");
            }
            Ok::<_, Infallible>(n * 2.0)
        });
        assert_eq!(schema.parse(&json!(2)).unwrap(), 4.0);
        assert_eq!(schema.parse(&json!(-1)).unwrap_err().issues()[0].message, "negative");
    }

    #[test]
    fn test_nullable_source_sees_none() {
        let schema = string()
            .nilable()
            .transform(|s, _| Ok::<_, Infallible>(s.unwrap_or_else(|| "fallback".into())));
        assert_eq!(schema.parse(&Value::Null).unwrap(), "fallback");
        assert_eq!(schema.parse(&json!("x")).unwrap(), "x");
    }

    #[test]
    fn test_checks_see_transformed_value() {
        let schema = string()
            .transform(|s, _| Ok::<_, Infallible>(s.len()))
            .refine(|n| *n > 2, "too short");
        assert!(schema.parse(&json!("abc")).is_ok());
        assert_eq!(schema.parse(&json!("ab")).unwrap_err().issues()[0].message, "too short");
    }

    #[test]
    fn test_default_skips_function() {
        let schema = string()
            .transform(|_, _| Err::<usize, _>("never called"))
            .default(7);
        assert_eq!(schema.parse(&Value::Null).unwrap(), 7);
    }
}
